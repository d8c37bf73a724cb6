//! Filter compiler
//!
//! Turns [`FilterOptions`] into a conjunctive [`Predicate`]: a WHERE fragment
//! plus the values bound to its `?` placeholders.
//!
//! Only fixed literals are spliced into the fragment text. Crossing numbers
//! and cusp counts travel as bound parameters.

use rusqlite::types::Value;

use super::options::{FilterOptions, KnotsVsLinks};

/// Alternating diagrams carry an `a` flavor marker in their name.
const ALTERNATING: &str = "name LIKE '%a%'";
/// Non-alternating diagrams carry an `n` flavor marker.
const NON_ALTERNATING: &str = "name LIKE '%n%'";
const KNOTS_ONLY: &str = "cusps = 1";
const LINKS_ONLY: &str = "cusps > 1";
/// Crossing number immediately followed by either flavor marker, with or
/// without a one-letter `K`/`L` prefix.
const CROSSINGS: &str = "(name GLOB ? OR name GLOB ?)";
const CUSPS: &str = "cusps = ?";

/// A conjunction of SQL conditions with their bound parameters.
///
/// Parameters appear in the same order as the placeholders of the rendered
/// fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Predicate {
    /// The unconstrained predicate
    pub fn new() -> Self {
        Self::default()
    }

    /// True when there is nothing to filter on
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of conjoined conditions
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// The fragment to splice after `WHERE`; empty when unconstrained
    pub fn sql(&self) -> String {
        self.clauses.join(" AND ")
    }

    /// `" WHERE <fragment>"`, or an empty string when unconstrained
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.sql())
        }
    }

    /// Bound values, in placeholder order
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    fn push(&mut self, clause: &str, params: Vec<Value>) {
        self.clauses.push(clause.to_string());
        self.params.extend(params);
    }

    /// AND `other` onto this predicate.
    ///
    /// An empty side contributes nothing, so the result is the other side
    /// alone; two non-empty sides are joined with `AND`.
    pub fn and(&mut self, other: Predicate) {
        self.clauses.extend(other.clauses);
        self.params.extend(other.params);
    }
}

/// Compiles filter options into predicates
pub struct FilterCompiler;

impl FilterCompiler {
    /// Compile `options` on their own.
    pub fn compile(options: &FilterOptions) -> Predicate {
        let mut predicate = Predicate::new();

        if let Some(cusps) = options.cusps {
            predicate.push(CUSPS, vec![Value::Integer(i64::from(cusps))]);
        }

        match options.alternating {
            Some(true) => predicate.push(ALTERNATING, Vec::new()),
            Some(false) => predicate.push(NON_ALTERNATING, Vec::new()),
            None => {}
        }

        match options.knots_vs_links {
            Some(KnotsVsLinks::Knots) => predicate.push(KNOTS_ONLY, Vec::new()),
            Some(KnotsVsLinks::Links) => predicate.push(LINKS_ONLY, Vec::new()),
            None => {}
        }

        if let Some(crossings) = options.crossings {
            predicate.push(
                CROSSINGS,
                vec![
                    Value::Text(format!("{}[an]*", crossings)),
                    Value::Text(format!("[KL]{}[an]*", crossings)),
                ],
            );
        }

        predicate
    }

    /// Compile `options` and AND them onto an existing base predicate.
    pub fn extend(base: &Predicate, options: &FilterOptions) -> Predicate {
        let mut combined = base.clone();
        combined.and(Self::compile(options));
        combined
    }
}
