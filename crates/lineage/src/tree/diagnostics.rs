//! Recoverable data problems found while laying out a graph
//!
//! None of these stop a layout pass. Whether they are handed back to the
//! caller is governed by [`DiagnosticPolicy`]; either way each one is logged
//! at debug level.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::RelationKind;

/// What to do with diagnostics raised during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticPolicy {
    /// Drop them after logging
    #[default]
    Silent,
    /// Return them alongside the result
    Collect,
}

/// A recoverable problem in the relationship data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// `person` lists `missing` under `relation`, but no such person exists
    #[serde(rename_all = "camelCase")]
    DanglingReference {
        person: String,
        relation: RelationKind,
        missing: String,
    },
    /// Following `relation` links from `person` leads back to `related`,
    /// which is already on the chain being followed
    #[serde(rename_all = "camelCase")]
    CyclicRelation {
        person: String,
        relation: RelationKind,
        related: String,
    },
    /// A second record reused an id; the first record was kept
    #[serde(rename_all = "camelCase")]
    DuplicatePerson { id: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DanglingReference {
                person,
                relation,
                missing,
            } => write!(f, "'{}' lists unknown {} '{}'", person, relation, missing),
            Diagnostic::CyclicRelation {
                person,
                relation: RelationKind::Child,
                related,
            } => write!(f, "'{}' lists its own ancestor '{}' as a child", person, related),
            Diagnostic::CyclicRelation {
                person,
                relation: RelationKind::Parent,
                related,
            } => write!(f, "'{}' lists its own descendant '{}' as a parent", person, related),
            Diagnostic::CyclicRelation {
                person,
                relation,
                related,
            } => write!(f, "'{}' closes a {} loop through '{}'", person, relation, related),
            Diagnostic::DuplicatePerson { id } => {
                write!(f, "duplicate person id '{}' ignored", id)
            }
        }
    }
}

/// Sink for diagnostics that honors a [`DiagnosticPolicy`]
#[derive(Debug, Default)]
pub struct Diagnostics {
    policy: DiagnosticPolicy,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(policy: DiagnosticPolicy) -> Self {
        Self {
            policy,
            items: Vec::new(),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        debug!(diagnostic = %diagnostic, "Recovered from malformed relation data");
        if self.policy == DiagnosticPolicy::Collect && !self.items.contains(&diagnostic) {
            self.items.push(diagnostic);
        }
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
