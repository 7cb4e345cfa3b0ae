//! JSON person-list parser
//!
//! Accepts either a bare array of person records or an object with a
//! `people` array. No relation validation happens here.

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info, span, trace, Level};

use super::{FamilyGraph, Person};
use crate::core::{Database, LineageError, Parser};

#[derive(Deserialize)]
#[serde(untagged)]
enum PeopleDocument {
    List(Vec<Person>),
    Wrapped { people: Vec<Person> },
}

/// Parser for JSON person lists
#[derive(Debug, Default, Clone, Copy)]
pub struct PersonListParser;

impl PersonListParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode records without building a graph
    pub fn parse_people(&self, input: &str) -> Result<Vec<Person>, LineageError> {
        // Decode as a value first so syntax errors keep their line/column
        let value: serde_json::Value = serde_json::from_str(input)?;
        let document: PeopleDocument = serde_json::from_value(value).map_err(|e| {
            LineageError::parse_error(
                format!("expected a list of people: {}", e),
                0,
                0,
            )
        })?;
        Ok(match document {
            PeopleDocument::List(people) | PeopleDocument::Wrapped { people } => people,
        })
    }
}

impl Parser<FamilyGraph> for PersonListParser {
    fn parse(&self, input: &str, database: &mut FamilyGraph) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_people", input_len = input.len());
        let _enter = parse_span.enter();

        trace!("Decoding person records");
        let people = self.parse_people(input)?;
        debug!(record_count = people.len(), "Decoded person records");

        for person in people {
            database.add_node(person)?;
        }

        info!(person_count = database.node_count(), "Parsing completed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "person-list"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        let trimmed = input.trim_start();
        trimmed.starts_with('[') || trimmed.starts_with('{')
    }
}
