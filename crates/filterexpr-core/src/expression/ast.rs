//! Tree produced by the logical parser.
//!
//! Leaves are not parsed further here: a [`Expr::Condition`] is only a span of
//! the source, decomposed later by the condition evaluator against the
//! operator registry in effect.

use std::ops::Range;

/// Logical expression over leaf conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Leaf condition text, as a byte range into the source.
    Condition(Range<usize>),
    /// Logical negation: `NOT expr`.
    Not(Box<Expr>),
    /// Logical combination: `left AND right` or `left OR right`.
    Logical {
        /// The connective.
        op: LogicalOp,
        /// Left operand, evaluated first.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
}

/// Logical connectives. Both bind equally tight and associate to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl LogicalOp {
    /// Combine two booleans.
    #[must_use]
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Self::And => left && right,
            Self::Or => left || right,
        }
    }
}

impl Expr {
    /// Number of leaf conditions in the tree.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        match self {
            Self::Condition(_) => 1,
            Self::Not(inner) => inner.condition_count(),
            Self::Logical { left, right, .. } => left.condition_count() + right.condition_count(),
        }
    }

    /// Leaf condition texts in evaluation order. Spans outside `source` are
    /// skipped.
    #[must_use]
    pub fn conditions<'a>(&self, source: &'a str) -> Vec<&'a str> {
        let mut out = Vec::with_capacity(self.condition_count());
        self.collect_conditions(source, &mut out);
        out
    }

    fn collect_conditions<'a>(&self, source: &'a str, out: &mut Vec<&'a str>) {
        match self {
            Self::Condition(span) => out.extend(source.get(span.clone())),
            Self::Not(inner) => inner.collect_conditions(source, out),
            Self::Logical { left, right, .. } => {
                left.collect_conditions(source, out);
                right.collect_conditions(source, out);
            }
        }
    }
}
