//! Core parser trait for input decoding
//!
//! This trait defines the interface for turning raw input into records
//! stored in a [`Database`].

use anyhow::Result;

use super::Database;

/// Core trait for input parsers
///
/// A parser reads the whole input and populates the given database. It must
/// not validate relations; that is left to the layout stage, which tolerates
/// malformed graphs.
pub trait Parser<D: Database>: Send + Sync {
    /// Parse the input and populate the database
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input looks like something this parser accepts
    fn can_parse(&self, input: &str) -> bool;
}
