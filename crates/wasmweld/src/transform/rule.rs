//! Transform rules
//!
//! Rules arrive pre-parsed from the rule source: pattern selectors already
//! carry a compiled [`regex::Regex`]. Application order is list order.

use crate::diag::SourceRef;
use crate::ir::ElementKind;
use regex::Regex;

/// How a selector picks elements of its kind
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exactly one element; absence is a diagnostic
    Exact(String),
    /// Zero or more elements; zero matches is allowed
    Pattern(Regex),
}

impl Matcher {
    /// Whether `name` is selected
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::Exact(exact) => exact == name,
            Matcher::Pattern(re) => re.is_match(name),
        }
    }
}

/// Rule-matching criterion, scoped to one element kind
#[derive(Debug, Clone)]
pub struct Selector {
    pub kind: ElementKind,
    pub matcher: Matcher,
}

impl Selector {
    /// Select one element of `kind` by exact IDL name
    pub fn exact(kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            matcher: Matcher::Exact(name.into()),
        }
    }

    /// Select every element of `kind` whose IDL name matches `pattern`
    pub fn pattern(kind: ElementKind, pattern: Regex) -> Self {
        Self {
            kind,
            matcher: Matcher::Pattern(pattern),
        }
    }
}

/// What a rule does to each selected element
#[derive(Debug, Clone)]
pub enum Action {
    /// Set a whitelisted property, e.g. `package=html`
    SetProperty { key: String, value: String },
    /// Rename a member (method, attribute or enum variant)
    RenameMember { from: String, to: String },
    /// Broadcast marker around another action; dispatch is identical to
    /// the wrapped action, only the miss policy differs at the call site
    Global(Box<Action>),
}

impl Action {
    /// Create a property-set action
    pub fn set_property(key: impl Into<String>, value: impl Into<String>) -> Self {
        Action::SetProperty {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a rename action
    pub fn rename(from: impl Into<String>, to: impl Into<String>) -> Self {
        Action::RenameMember {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Wrap into a broadcast marker
    pub fn global(inner: Action) -> Self {
        Action::Global(Box::new(inner))
    }

    /// The action that actually executes, with broadcast markers unwrapped
    pub fn innermost(&self) -> &Action {
        match self {
            Action::Global(inner) => inner.innermost(),
            other => other,
        }
    }

    /// Whether this action carries broadcast semantics
    pub fn is_global(&self) -> bool {
        matches!(self, Action::Global(_))
    }
}

/// One transform rule: selector + action + where it came from
#[derive(Debug, Clone)]
pub struct Rule {
    pub selector: Selector,
    pub action: Action,
    pub source: SourceRef,
}

impl Rule {
    /// Create a rule
    pub fn new(selector: Selector, action: Action, source: SourceRef) -> Self {
        Self {
            selector,
            action,
            source,
        }
    }
}
