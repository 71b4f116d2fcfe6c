//! Debug-print rule table.
//!
//! A rule names one function whose call, used as a bare statement, counts as
//! leftover debug output. Matching is on the identifier text as written in
//! the source: `fmt.Println` matches even when `fmt` is an import alias for
//! some other package, and an aliased import of `fmt` under another name does
//! not match. Import resolution is not attempted.

use std::fmt;
use std::str::FromStr;

use crate::domain::syntax::{Callee, Expression};

/// One recognized debug-print signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchRule {
    /// A bare builtin-style call: `println(...)`.
    Bare(String),
    /// A package-qualified call: `fmt.Println(...)`.
    Qualified { qualifier: String, member: String },
}

impl MatchRule {
    pub fn bare(name: impl Into<String>) -> Self {
        MatchRule::Bare(name.into())
    }

    pub fn qualified(qualifier: impl Into<String>, member: impl Into<String>) -> Self {
        MatchRule::Qualified {
            qualifier: qualifier.into(),
            member: member.into(),
        }
    }

    /// Exact, case-sensitive comparison against a callee.
    pub fn matches(&self, callee: &Callee) -> bool {
        match (self, callee) {
            (MatchRule::Bare(name), Callee::Ident(ident)) => name == ident,
            (
                MatchRule::Qualified { qualifier, member },
                Callee::Selector {
                    qualifier: q,
                    member: m,
                },
            ) => qualifier == q && member == m,
            _ => false,
        }
    }

    /// Text whose presence in a comment marks it as a commented-out call.
    pub fn comment_pattern(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRule::Bare(name) => write!(f, "{}", name),
            MatchRule::Qualified { qualifier, member } => write!(f, "{}.{}", qualifier, member),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

impl FromStr for MatchRule {
    type Err = String;

    /// Parses `name` or `qualifier.member`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('.') {
            None if is_identifier(s) => Ok(MatchRule::bare(s)),
            Some((qualifier, member)) if is_identifier(qualifier) && is_identifier(member) => {
                Ok(MatchRule::qualified(qualifier, member))
            }
            _ => Err(format!(
                "invalid rule `{}`: expected `name` or `qualifier.member`",
                s
            )),
        }
    }
}

/// The active rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<MatchRule>,
}

impl RuleSet {
    pub fn new(rules: impl IntoIterator<Item = MatchRule>) -> Self {
        let mut set = Self { rules: Vec::new() };
        set.extend(rules);
        set
    }

    /// The built-in table.
    ///
    /// `ufmt.Sprintf` only formats and returns a string; it is listed because a
    /// bare `ufmt.Sprintf(...)` statement discards its result and is almost
    /// always a leftover. Calls whose result is used are never statements of
    /// their own and so are never removed.
    pub fn defaults() -> Self {
        Self::new([
            MatchRule::bare("println"),
            MatchRule::qualified("fmt", "Println"),
            MatchRule::qualified("ufmt", "Println"),
            MatchRule::qualified("ufmt", "Sprintf"),
            MatchRule::qualified("log", "Println"),
        ])
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, rule: MatchRule) {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = MatchRule>) {
        for rule in rules {
            self.push(rule);
        }
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_debug_callee(&self, callee: &Callee) -> bool {
        self.rules.iter().any(|rule| rule.matches(callee))
    }

    /// True iff `expr` is a call whose callee matches a rule.
    pub fn is_debug_call(&self, expr: &Expression) -> bool {
        match expr {
            Expression::Call(call) => self.is_debug_callee(&call.callee),
            Expression::Other => false,
        }
    }

    /// True iff `text` contains the textual form of any rule.
    pub fn mentioned_in(&self, text: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| text.contains(rule.comment_pattern().as_str()))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::defaults()
    }
}
