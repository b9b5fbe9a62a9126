//! Logical parser: folds terms into an [`Expr`] tree, one nesting level at a
//! time.
//!
//! Each level must alternate operands and connectives. An operand is any
//! number of `NOT`s followed by a parenthesized group or by a run of words
//! (a leaf condition). Inside a leaf `NOT` is an ordinary word, which keeps
//! operators such as `IS NOT` intact. `AND` and `OR` have equal precedence
//! and fold left to right.
//!
//! [`DefaultExpressionParser`] is used unless a parser is given to
//! [`ExpressionEvaluator::with_parser`](crate::ExpressionEvaluator::with_parser).

use std::ops::Range;

use super::ast::{Expr, LogicalOp};
use super::lexer::{Term, TermKind, split_terms};
use crate::error::{ExpressionError, Result};

/// Turns expression text into an [`Expr`] tree.
///
/// Leaf spans in the returned tree must be byte ranges into `expression`.
pub trait ExpressionParser: Send + Sync {
    /// Parse `expression`.
    fn parse(&self, expression: &str) -> Result<Expr>;
}

/// The built-in parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExpressionParser;

impl ExpressionParser for DefaultExpressionParser {
    fn parse(&self, expression: &str) -> Result<Expr> {
        parse_expression(expression)
    }
}

/// Parse a whole expression with the built-in grammar.
///
/// # Examples
///
/// ```
/// use filterexpr_core::expression::parser::parse_expression;
///
/// let source = "a = 1 OR NOT (b = 2)";
/// let expr = parse_expression(source).unwrap();
/// assert_eq!(expr.conditions(source), vec!["a = 1", "b = 2"]);
/// ```
pub fn parse_expression(source: &str) -> Result<Expr> {
    Parser { source }.parse_level(0..source.len())
}

struct Parser<'a> {
    source: &'a str,
}

impl Parser<'_> {
    /// Parse the text in `range` (the whole source, or a group's inner span).
    fn parse_level(&self, range: Range<usize>) -> Result<Expr> {
        let terms = split_terms(self.source, range.clone())?;
        let text = self.source[range].trim();
        if terms.is_empty() {
            return Err(ExpressionError::EmptyExpression {
                expression: text.to_owned(),
            });
        }

        let level = Level {
            parser: self,
            terms: &terms,
            text,
        };
        let mut pos = 0;
        let mut acc = level.parse_operand(&mut pos)?;

        while let Some(term) = terms.get(pos) {
            let op = match term.kind {
                TermKind::And => LogicalOp::And,
                TermKind::Or => LogicalOp::Or,
                _ => return Err(level.incomplete()),
            };
            pos += 1;
            let right = level.parse_operand(&mut pos)?;
            acc = Expr::Logical {
                op,
                left: Box::new(acc),
                right: Box::new(right),
            };
        }

        Ok(acc)
    }
}

/// The terms of one nesting level and the text used in error messages.
struct Level<'p, 'a> {
    parser: &'p Parser<'a>,
    terms: &'p [Term],
    text: &'p str,
}

impl Level<'_, '_> {
    fn incomplete(&self) -> ExpressionError {
        ExpressionError::IncompleteLogicalOperation {
            expression: self.text.to_owned(),
        }
    }

    fn parse_operand(&self, pos: &mut usize) -> Result<Expr> {
        let mut negations = 0usize;
        while matches!(self.terms.get(*pos), Some(t) if t.kind == TermKind::Not) {
            negations += 1;
            *pos += 1;
        }

        let Some(term) = self.terms.get(*pos) else {
            return Err(self.incomplete());
        };

        let mut expr = match &term.kind {
            TermKind::And | TermKind::Or => return Err(self.incomplete()),
            TermKind::Group { inner } => {
                *pos += 1;
                if self.parser.source[inner.clone()].trim().is_empty() {
                    return Err(ExpressionError::EmptyExpression {
                        expression: self.text.to_owned(),
                    });
                }
                self.parser.parse_level(inner.clone())?
            }
            TermKind::Not | TermKind::Word => {
                let start = term.span.start;
                let mut end = term.span.end;
                *pos += 1;
                while let Some(next) = self.terms.get(*pos) {
                    if matches!(next.kind, TermKind::And | TermKind::Or) {
                        break;
                    }
                    end = next.span.end;
                    *pos += 1;
                }
                Expr::Condition(start..end)
            }
        };

        for _ in 0..negations {
            expr = Expr::Not(Box::new(expr));
        }
        Ok(expr)
    }
}
