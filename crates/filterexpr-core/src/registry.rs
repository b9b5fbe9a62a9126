//! Operator and function registries.
//!
//! Both registries are plain name-to-capability maps. Registering a name twice
//! replaces the earlier entry. Lookups happen while a leaf condition is being
//! evaluated, so an unknown name is only reported when an expression uses it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::ExpressionContext;
use crate::error::Result;
use crate::value::Value;

/// A comparison operator such as `=` or `IN`.
///
/// `value` is the resolved left-hand side (`None` when the field is absent),
/// `literal` is the right-hand side with quotes already stripped and escapes
/// resolved, and `tokens` holds the raw `[lhs, operator, literal]` text of the
/// leaf condition.
pub trait Operator: Send + Sync {
    /// Compare `value` against `literal`.
    fn evaluate(
        &self,
        value: Option<&Value>,
        literal: &str,
        tokens: &[&str],
        ctx: &ExpressionContext<'_>,
    ) -> Result<bool>;
}

impl<F> Operator for F
where
    F: Fn(Option<&Value>, &str, &[&str], &ExpressionContext<'_>) -> Result<bool> + Send + Sync,
{
    fn evaluate(
        &self,
        value: Option<&Value>,
        literal: &str,
        tokens: &[&str],
        ctx: &ExpressionContext<'_>,
    ) -> Result<bool> {
        self(value, literal, tokens, ctx)
    }
}

/// A function usable on the left-hand side of a condition, e.g. `LEN(name)`.
///
/// Arguments are passed as raw trimmed text; quoted arguments keep their
/// quotes so the function can tell literals from field paths.
pub trait ExpressionFunction: Send + Sync {
    /// Compute the derived value.
    fn evaluate(&self, ctx: &ExpressionContext<'_>, args: &[&str]) -> Result<Value>;
}

impl<F> ExpressionFunction for F
where
    F: Fn(&ExpressionContext<'_>, &[&str]) -> Result<Value> + Send + Sync,
{
    fn evaluate(&self, ctx: &ExpressionContext<'_>, args: &[&str]) -> Result<Value> {
        self(ctx, args)
    }
}

/// How an operator is written in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OperatorKind {
    /// Made only of symbol characters (`=`, `>=`); may touch its operands.
    Symbol,
    /// One or more words (`IS`, `NOT IN`); matched case-insensitively.
    Keyword,
}

/// Returns `true` for characters that build symbol operators.
#[must_use]
pub fn is_symbol_char(c: char) -> bool {
    matches!(
        c,
        '=' | '<' | '>' | '!' | '~' | '^' | '*' | '%' | '&' | '|' | '?'
    )
}

/// Normalize an operator name: keywords are upper-cased with single spaces.
fn normalize_operator(name: &str) -> (String, OperatorKind) {
    let name = name.trim();
    if !name.is_empty() && name.chars().all(is_symbol_char) {
        (name.to_owned(), OperatorKind::Symbol)
    } else {
        let words: Vec<String> = name
            .split_whitespace()
            .map(str::to_ascii_uppercase)
            .collect();
        (words.join(" "), OperatorKind::Keyword)
    }
}

struct OperatorEntry {
    kind: OperatorKind,
    operator: Arc<dyn Operator>,
}

/// Registry of comparison operators keyed by symbol or keyword.
///
/// [`Default`] yields the default operator set; use [`OperatorRegistry::empty`]
/// to start from nothing.
#[derive(Clone)]
pub struct OperatorRegistry {
    entries: HashMap<String, Arc<OperatorEntry>>,
}

impl OperatorRegistry {
    /// Create a registry with no operators.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry holding the default operator set.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        crate::operators::register_defaults(&mut registry);
        registry
    }

    /// Register an operator, replacing any previous one with the same name.
    pub fn register(&mut self, name: &str, operator: impl Operator + 'static) -> &mut Self {
        self.register_arc(name, Arc::new(operator))
    }

    /// Register a shared operator, replacing any previous one with the same name.
    pub fn register_arc(&mut self, name: &str, operator: Arc<dyn Operator>) -> &mut Self {
        let (key, kind) = normalize_operator(name);
        self.entries
            .insert(key, Arc::new(OperatorEntry { kind, operator }));
        self
    }

    /// Look up an operator by symbol or (case-insensitive) keyword.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Operator>> {
        let (key, _) = normalize_operator(name);
        self.entries.get(&key).map(|e| &e.operator)
    }

    /// Look up a symbol operator by its exact text.
    #[must_use]
    pub fn get_symbol(&self, symbol: &str) -> Option<&Arc<dyn Operator>> {
        self.entries
            .get(symbol)
            .filter(|e| e.kind == OperatorKind::Symbol)
            .map(|e| &e.operator)
    }

    /// Look up a keyword operator from already split words.
    #[must_use]
    pub fn get_keyword(&self, words: &[&str]) -> Option<&Arc<dyn Operator>> {
        let key = words
            .iter()
            .map(|w| w.to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(" ");
        self.entries
            .get(&key)
            .filter(|e| e.kind == OperatorKind::Keyword)
            .map(|e| &e.operator)
    }

    /// Returns `true` if some keyword operator begins with `word`.
    #[must_use]
    pub fn starts_keyword(&self, word: &str) -> bool {
        self.entries.iter().any(|(key, e)| {
            e.kind == OperatorKind::Keyword
                && key
                    .split(' ')
                    .next()
                    .is_some_and(|first| first.eq_ignore_ascii_case(word))
        })
    }

    /// The largest number of words in any registered keyword operator.
    #[must_use]
    pub fn max_keyword_words(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, e)| e.kind == OperatorKind::Keyword)
            .map(|(k, _)| k.split(' ').count())
            .max()
            .unwrap_or(0)
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of registered operators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no operators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered operator names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("operators", &self.names())
            .finish()
    }
}

/// Registry of expression functions keyed by upper-case name.
///
/// [`Default`] yields the default function set.
#[derive(Clone)]
pub struct FunctionRegistry {
    entries: HashMap<String, Arc<dyn ExpressionFunction>>,
}

impl FunctionRegistry {
    /// Create a registry with no functions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry holding the default function set.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        crate::functions::register_defaults(&mut registry);
        registry
    }

    /// Register a function, replacing any previous one with the same name.
    pub fn register(
        &mut self,
        name: &str,
        function: impl ExpressionFunction + 'static,
    ) -> &mut Self {
        self.register_arc(name, Arc::new(function))
    }

    /// Register a shared function, replacing any previous one with the same name.
    pub fn register_arc(&mut self, name: &str, function: Arc<dyn ExpressionFunction>) -> &mut Self {
        self.entries
            .insert(name.trim().to_ascii_uppercase(), function);
        self
    }

    /// Look up a function by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ExpressionFunction>> {
        self.entries.get(&name.trim().to_ascii_uppercase())
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no functions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered function names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
