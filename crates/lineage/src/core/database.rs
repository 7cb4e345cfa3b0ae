//! Core database trait for relationship data storage
//!
//! This trait defines the interface for storing and querying the records a
//! layout pass consumes. Each graph implementation picks its own node and
//! edge types.

use anyhow::Result;

/// Core trait for graph databases
///
/// This trait represents the data storage layer. Implementations hold nodes
/// keyed by id and expose the relations between them as edges.
///
/// Edges are derived from the stored nodes, so they are yielded by value.
pub trait Database: Send + Sync {
    /// The node data type for this database
    type Node: Clone + Send + Sync;

    /// The edge data type for this database
    type Edge: Clone + Send + Sync;

    /// Add a node to the database
    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    /// Add an edge to the database
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    /// Get a node by ID
    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    /// Iterate over all nodes in insertion order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges
    fn edges(&self) -> impl Iterator<Item = Self::Edge> + '_;

    /// Clear all data from the database
    fn clear(&mut self);

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}
