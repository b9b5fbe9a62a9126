//! Quote- and paren-aware splitter for filter expressions.
//!
//! The splitter never copies text: every [`Term`] is a byte range into the
//! source expression, so error messages can quote the source exactly.

use std::ops::Range;

use crate::error::{ExpressionError, Result};

/// Classification of one top-level term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TermKind {
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `NOT`
    Not,
    /// A balanced `( ... )` span; `inner` excludes the outer parens.
    Group {
        /// Range of the text between the outer parens.
        inner: Range<usize>,
    },
    /// Any other whitespace-delimited piece of a leaf condition.
    Word,
}

/// A term and its location in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Term {
    pub kind: TermKind,
    pub span: Range<usize>,
}

/// Split `source[range]` into top-level terms.
///
/// Whitespace separates terms only outside quotes and outside parentheses. A
/// term that opens with `(` ends as soon as its parentheses balance, and a
/// `(` right after a bare logical keyword starts a new term, so `NOT(a = 1)`
/// splits like `NOT (a = 1)`.
pub(crate) fn split_terms(source: &str, range: Range<usize>) -> Result<Vec<Term>> {
    let text = &source[range.clone()];
    let base = range.start;

    let mut terms = Vec::new();
    let mut start: Option<usize> = None;
    let mut paren_term = false;
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        let pos = base + i;

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
            c if c.is_whitespace() => {
                if depth == 0 {
                    if let Some(s) = start.take() {
                        terms.push(classify(source, s..pos, paren_term));
                    }
                }
            }
            '(' => {
                if depth == 0 {
                    if let Some(s) = start {
                        if keyword_kind(&source[s..pos]).is_some() {
                            terms.push(classify(source, s..pos, false));
                            start = None;
                        }
                    }
                }
                if start.is_none() {
                    start = Some(pos);
                    paren_term = true;
                }
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    return Err(ExpressionError::UnbalancedParens {
                        expression: source.trim().to_owned(),
                    });
                }
                depth -= 1;
                if depth == 0 && paren_term {
                    if let Some(s) = start.take() {
                        terms.push(classify(source, s..pos + 1, true));
                    }
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(pos);
                    paren_term = false;
                }
                if c == '"' {
                    in_quote = true;
                }
            }
        }
    }

    if in_quote {
        return Err(ExpressionError::UnterminatedQuote {
            expression: source.trim().to_owned(),
        });
    }
    if depth != 0 {
        return Err(ExpressionError::UnbalancedParens {
            expression: source.trim().to_owned(),
        });
    }
    if let Some(s) = start {
        terms.push(classify(source, s..range.end, paren_term));
    }

    Ok(terms)
}

fn classify(source: &str, span: Range<usize>, paren_term: bool) -> Term {
    let kind = if paren_term {
        TermKind::Group {
            inner: span.start + 1..span.end - 1,
        }
    } else {
        keyword_kind(&source[span.clone()]).unwrap_or(TermKind::Word)
    };
    Term { kind, span }
}

fn keyword_kind(word: &str) -> Option<TermKind> {
    if word.eq_ignore_ascii_case("AND") {
        Some(TermKind::And)
    } else if word.eq_ignore_ascii_case("OR") {
        Some(TermKind::Or)
    } else if word.eq_ignore_ascii_case("NOT") {
        Some(TermKind::Not)
    } else {
        None
    }
}

/// Returns the unescaped content if `text` is exactly one quoted string.
///
/// Inside quotes a backslash escapes the next character; `\"` becomes `"` and
/// `\\` becomes `\`. Other escapes are kept verbatim.
#[must_use]
pub fn unquote(text: &str) -> Option<String> {
    let inner = text.strip_prefix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            },
            '"' => return chars.as_str().is_empty().then_some(out),
            c => out.push(c),
        }
    }
    None
}

/// Byte length of the quoted string at the start of `text`, closing quote
/// included, or `None` if it never closes.
pub(crate) fn quoted_len(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in text.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Some(i + 1);
        }
    }
    None
}
