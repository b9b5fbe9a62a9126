//! Leaf condition evaluation: `<lhs> <operator> <literal>`.
//!
//! The left-hand side is a quoted string, a function call such as
//! `LEN(name)`, or a field path. The operator follows immediately: a run of
//! symbol characters must equal a registered symbol operator exactly, while
//! keyword operators are matched word by word, longest first. Whatever
//! remains is the literal.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::trace;

use super::lexer::{quoted_len, unquote};
use crate::context::ExpressionContext;
use crate::error::{ExpressionError, Result};
use crate::registry::{Operator, OperatorRegistry, is_symbol_char};
use crate::value::{AttributePath, Value};

/// Evaluates one leaf condition against a context.
///
/// [`DefaultConditionEvaluator`] is used unless an evaluator is installed with
/// [`with_condition_evaluator`](crate::ExpressionEvaluator::with_condition_evaluator).
pub trait ConditionEvaluator: Send + Sync {
    /// Evaluate `condition` (a leaf with no logical connectives).
    fn evaluate(&self, condition: &str, ctx: &ExpressionContext<'_>) -> Result<bool>;
}

/// The built-in leaf evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConditionEvaluator;

impl ConditionEvaluator for DefaultConditionEvaluator {
    fn evaluate(&self, condition: &str, ctx: &ExpressionContext<'_>) -> Result<bool> {
        evaluate_condition(condition, ctx)
    }
}

/// Evaluate a single leaf condition.
///
/// # Errors
///
/// Returns `InvalidCondition` when the leaf does not decompose into
/// `<lhs> <operator> <literal>`, `InvalidFunctionArgument` or
/// `UnknownFunction` for bad function calls, and whatever the operator or
/// function itself reports.
pub fn evaluate_condition(condition: &str, ctx: &ExpressionContext<'_>) -> Result<bool> {
    let parsed = ParsedCondition::parse(condition, ctx.operators)?;

    let value: Option<Cow<'_, Value>> = match parsed.lhs {
        Lhs::Quoted(raw) => {
            let text = unquote(raw).ok_or_else(|| parsed.invalid())?;
            Some(Cow::Owned(Value::String(text)))
        }
        Lhs::Path(path) => {
            let path = AttributePath::parse(path).ok_or_else(|| parsed.invalid())?;
            ctx.object.resolve(&path).map(Cow::Borrowed)
        }
        Lhs::Call { name, args } => {
            let args = split_arguments(name, args)?;
            let function = ctx
                .functions
                .get(name)
                .ok_or_else(|| ExpressionError::UnknownFunction {
                    function: name.to_owned(),
                })?;
            Some(Cow::Owned(function.evaluate(ctx, &args)?))
        }
    };

    let tokens = [parsed.lhs_text, parsed.op_text, parsed.literal_raw];
    let result = parsed
        .operator
        .evaluate(value.as_deref(), &parsed.literal, &tokens, ctx)?;

    trace!(condition = parsed.text, result, "evaluated condition");
    Ok(result)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lhs<'a> {
    /// Raw quoted text, quotes included.
    Quoted(&'a str),
    /// `name(args)`; `args` is the raw text between the parens.
    Call { name: &'a str, args: &'a str },
    /// Unparsed field path.
    Path(&'a str),
}

struct ParsedCondition<'a, 'r> {
    text: &'a str,
    lhs: Lhs<'a>,
    lhs_text: &'a str,
    op_text: &'a str,
    operator: &'r Arc<dyn Operator>,
    literal_raw: &'a str,
    literal: Cow<'a, str>,
}

impl<'a, 'r> ParsedCondition<'a, 'r> {
    fn parse(condition: &'a str, operators: &'r OperatorRegistry) -> Result<Self> {
        let text = condition.trim();
        let invalid = || ExpressionError::InvalidCondition {
            condition: text.to_owned(),
        };

        let (lhs, lhs_end) = parse_lhs(text).ok_or_else(invalid)?;

        let op_start = skip_whitespace(text, lhs_end);
        let rest = &text[op_start..];
        let (op_text, operator, literal_start) = if rest.starts_with(is_symbol_char) {
            let len = rest.find(|c: char| !is_symbol_char(c)).unwrap_or(rest.len());
            let symbol = &rest[..len];
            let operator = operators.get_symbol(symbol).ok_or_else(invalid)?;
            (symbol, operator, op_start + len)
        } else {
            let words = word_spans(text, op_start, operators.max_keyword_words());
            (1..=words.len())
                .rev()
                .find_map(|n| {
                    let candidate: Vec<&str> =
                        words[..n].iter().map(|w| &text[w.clone()]).collect();
                    operators.get_keyword(&candidate).map(|op| {
                        let end = words[n - 1].end;
                        (&text[op_start..end], op, end)
                    })
                })
                .ok_or_else(invalid)?
        };

        let literal_raw = text[literal_start..].trim();
        let literal = parse_literal(literal_raw, operators).ok_or_else(invalid)?;

        Ok(Self {
            text,
            lhs,
            lhs_text: &text[..lhs_end],
            op_text,
            operator,
            literal_raw,
            literal,
        })
    }

    fn invalid(&self) -> ExpressionError {
        ExpressionError::InvalidCondition {
            condition: self.text.to_owned(),
        }
    }
}

/// Parse the left-hand side, returning it and the byte offset where it ends.
fn parse_lhs(text: &str) -> Option<(Lhs<'_>, usize)> {
    if text.starts_with('"') {
        let len = quoted_len(text)?;
        return Some((Lhs::Quoted(&text[..len]), len));
    }

    let name_end = text
        .find(|c: char| c.is_whitespace() || is_symbol_char(c) || matches!(c, '"' | '(' | ')'))
        .unwrap_or(text.len());
    if name_end == 0 {
        return None;
    }
    let name = &text[..name_end];

    let paren = skip_whitespace(text, name_end);
    if text[paren..].starts_with('(') {
        let close = matching_paren(text, paren)?;
        let args = &text[paren + 1..close];
        return Some((Lhs::Call { name, args }, close + 1));
    }

    Some((Lhs::Path(name), name_end))
}

/// Parse the literal: one quoted string, or bare words joined by single spaces.
///
/// A multi-word bare literal may not contain `NOT`, the first word of a
/// keyword operator, or a registered symbol operator; those mean a connective
/// is missing between two conditions.
fn parse_literal<'a>(raw: &'a str, operators: &OperatorRegistry) -> Option<Cow<'a, str>> {
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with('"') {
        return unquote(raw).map(Cow::Owned);
    }
    if raw.contains(['"', '(', ')']) {
        return None;
    }
    if !raw.contains(char::is_whitespace) {
        return Some(Cow::Borrowed(raw));
    }
    let words: Vec<&str> = raw.split_whitespace().collect();
    if words.iter().any(|w| starts_condition(w, operators)) {
        return None;
    }
    Some(Cow::Owned(words.join(" ")))
}

fn starts_condition(word: &str, operators: &OperatorRegistry) -> bool {
    word.eq_ignore_ascii_case("NOT")
        || operators.starts_keyword(word)
        || word
            .split(|c: char| !is_symbol_char(c))
            .any(|run| !run.is_empty() && operators.get_symbol(run).is_some())
}

/// Split function arguments on top-level commas.
///
/// `NAME()` has no arguments; any empty argument otherwise is an error.
fn split_arguments<'a>(name: &str, args: &'a str) -> Result<Vec<&'a str>> {
    if args.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut escaped = false;
    for (i, c) in args.char_indices() {
        if in_quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quote = false;
            }
            continue;
        }
        match c {
            '"' => in_quote = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());

    if parts.iter().any(|p| p.is_empty()) {
        return Err(ExpressionError::InvalidFunctionArgument {
            function: name.to_owned(),
        });
    }
    Ok(parts)
}

/// Index of the `)` matching the `(` at `open`, honoring quotes.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut escaped = false;
    for (i, c) in text[open..].char_indices() {
        if in_quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quote = false;
            }
            continue;
        }
        match c {
            '"' => in_quote = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .find(|c: char| !c.is_whitespace())
        .map_or(text.len(), |i| from + i)
}

/// Up to `max` whitespace-separated words starting at `from`.
fn word_spans(text: &str, from: usize, max: usize) -> Vec<std::ops::Range<usize>> {
    let mut spans = Vec::with_capacity(max);
    let mut pos = skip_whitespace(text, from);
    while spans.len() < max && pos < text.len() {
        let end = text[pos..]
            .find(char::is_whitespace)
            .map_or(text.len(), |i| pos + i);
        spans.push(pos..end);
        pos = skip_whitespace(text, end);
    }
    spans
}
