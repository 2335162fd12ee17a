//! Discount rule conditions.
//!
//! Catalog rules carry their condition as text such as `"cameras > 6"` or
//! `"storage >= 32TB && ai == enterprise"`. The text is parsed once, when the
//! catalog is loaded, into a closed set of clauses:
//!
//! ```text
//! condition := clause ( "&&" clause )*
//! clause    := "cameras" op INTEGER
//!            | "storage" op CAPACITY
//!            | "ai" op LEVEL
//!            | "addon(" ID ")"
//!            | "installation"
//!            | "maintenance"
//! op        := ">" | ">=" | "<" | "<=" | "==" | "!="
//! ```

use super::package::{AiLevel, StorageLabel, parse_capacity_gb};
use super::selection::ResolvedSelection;
use crate::error::PricingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl Comparison {
    // Two-character operators first so ">=" is not read as ">".
    const ALL: [(&'static str, Comparison); 6] = [
        (">=", Comparison::Ge),
        ("<=", Comparison::Le),
        ("==", Comparison::Eq),
        ("!=", Comparison::Ne),
        (">", Comparison::Gt),
        ("<", Comparison::Lt),
    ];

    pub fn holds<T: Ord>(&self, lhs: T, rhs: T) -> bool {
        match self {
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
        }
    }

    fn split(input: &str) -> Option<(Comparison, &str)> {
        Self::ALL
            .iter()
            .find_map(|(symbol, op)| input.strip_prefix(symbol).map(|rest| (*op, rest.trim())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Cameras(Comparison, u32),
    /// Compares capacities; the label always parses to a capacity.
    Storage(Comparison, StorageLabel),
    Ai(Comparison, AiLevel),
    Addon(String),
    Installation,
    Maintenance,
}

impl Clause {
    fn matches(&self, selection: &ResolvedSelection<'_>) -> bool {
        match self {
            Clause::Cameras(op, threshold) => op.holds(selection.cameras, *threshold),
            Clause::Storage(op, threshold) => {
                match (
                    selection.storage.and_then(StorageLabel::capacity_gb),
                    threshold.capacity_gb(),
                ) {
                    (Some(selected), Some(threshold)) => op.holds(selected, threshold),
                    _ => false,
                }
            }
            Clause::Ai(op, level) => selection.ai.is_some_and(|ai| op.holds(ai, *level)),
            Clause::Addon(id) => selection.addons.contains(id),
            Clause::Installation => selection.installation,
            Clause::Maintenance => selection.maintenance,
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Cameras(op, n) => write!(f, "cameras {} {}", op.symbol(), n),
            Clause::Storage(op, label) => write!(f, "storage {} {}", op.symbol(), label),
            Clause::Ai(op, level) => write!(f, "ai {} {}", op.symbol(), level),
            Clause::Addon(id) => write!(f, "addon({})", id),
            Clause::Installation => f.write_str("installation"),
            Clause::Maintenance => f.write_str("maintenance"),
        }
    }
}

impl FromStr for Clause {
    type Err = PricingError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let invalid = || PricingError::InvalidPredicate(input.to_string());

        if let Some(inner) = input
            .strip_prefix("addon(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let id = inner.trim();
            if id.is_empty() {
                return Err(invalid());
            }
            return Ok(Clause::Addon(id.to_string()));
        }

        match input {
            "installation" => return Ok(Clause::Installation),
            "maintenance" => return Ok(Clause::Maintenance),
            _ => {}
        }

        let subject_len = input
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(input.len());
        let (subject, rest) = input.split_at(subject_len);
        let (op, value) = Comparison::split(rest.trim()).ok_or_else(invalid)?;
        if value.is_empty() {
            return Err(invalid());
        }

        match subject {
            "cameras" => value
                .parse::<u32>()
                .map(|n| Clause::Cameras(op, n))
                .map_err(|_| invalid()),
            "storage" => parse_capacity_gb(value)
                .map(|_| Clause::Storage(op, StorageLabel::new(value)))
                .ok_or_else(invalid),
            "ai" => AiLevel::parse(value)
                .map(|level| Clause::Ai(op, level))
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }
}

/// A conjunction of clauses. Every clause must hold for the rule to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, selection: &ResolvedSelection<'_>) -> bool {
        self.clauses.iter().all(|clause| clause.matches(selection))
    }

    /// Addon ids the predicate refers to, so the catalog can check them.
    pub fn referenced_addons(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().filter_map(|clause| match clause {
            Clause::Addon(id) => Some(id.as_str()),
            _ => None,
        })
    }
}

impl FromStr for Predicate {
    type Err = PricingError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Err(PricingError::InvalidPredicate(input.to_string()));
        }
        let clauses = input
            .split("&&")
            .map(str::parse)
            .collect::<Result<Vec<Clause>, _>>()?;
        Ok(Self { clauses })
    }
}

impl TryFrom<String> for Predicate {
    type Error = PricingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Predicate> for String {
    fn from(predicate: Predicate) -> Self {
        predicate.to_string()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}
