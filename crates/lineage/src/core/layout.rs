//! Core layout trait for positioning
//!
//! This trait defines the interface for arranging graph elements in a
//! coordinate system.

use anyhow::Result;

use super::Database;

/// Core trait for layout algorithms
///
/// # Example
/// ```
/// use lineage::core::LayoutAlgorithm;
/// use lineage::tree::{FamilyGraph, FamilyLayoutAlgorithm};
///
/// let graph = FamilyGraph::new();
/// let layout = FamilyLayoutAlgorithm::new();
/// let positioned = layout.layout(&graph).unwrap();
/// assert!(positioned.is_empty());
/// ```
pub trait LayoutAlgorithm<D: Database>: Send + Sync {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange elements in the database using this layout algorithm
    fn layout(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;

    /// Get the version of this layout algorithm
    fn version(&self) -> &'static str;

    /// Get the layout direction
    fn direction(&self) -> &'static str;
}
