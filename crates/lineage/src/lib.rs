//! Lineage - family-tree layout and SVG rendering
//!
//! A library for laying out people connected by parent, spouse and child
//! relations, deriving the connector lines between them, and rendering the
//! result as a self-contained SVG document or a terminal preview.
//!
//! # Quick Start
//!
//! ```rust
//! use lineage::render_svg;
//!
//! let people = r#"[
//!     {"id": "a", "name": "Ada", "spouseIds": ["b"], "childrenIds": ["c"]},
//!     {"id": "b", "name": "Ben", "spouseIds": ["a"], "childrenIds": ["c"]},
//!     {"id": "c", "name": "Cy", "parentIds": ["a", "b"]}
//! ]"#;
//! let svg = render_svg(people).unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use lineage::prelude::*;
//! use std::collections::HashSet;
//!
//! let input = r#"[{"id": "p", "name": "Pat", "childrenIds": ["k"]},
//!                 {"id": "k", "name": "Kim", "parentIds": ["p"]}]"#;
//!
//! // Parse into a graph
//! let parser = PersonListParser::new();
//! let mut graph = FamilyGraph::new();
//! parser.parse(input, &mut graph).unwrap();
//! assert_eq!(graph.node_count(), 2);
//!
//! // Lay out with "p" collapsed
//! let collapsed: HashSet<String> = ["p".to_string()].into();
//! let layout = FamilyLayoutAlgorithm::new().layout_with_collapsed(&graph, &collapsed);
//! assert!(layout.contains("p"));
//! assert!(!layout.contains("k"));
//!
//! // Connectors, scene, SVG
//! let connectors = build_connectors(&graph, &layout, &collapsed);
//! let scene = Scene::build(&graph, &layout, &connectors, &Viewport::new(), &Selection::default(), &collapsed);
//! let svg = SvgRenderer::new().render(&scene).unwrap();
//! assert!(svg.contains("Pat"));
//! ```

pub mod core;
pub mod tree;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        CharacterSet, Database, ExportSpace, LayoutAlgorithm, LineageError, PanDirection, Parser,
        Point, Rect, Renderer,
    };
    pub use crate::tree::{
        build_connectors, Command, Connector, Diagnostic, DiagnosticPolicy, Effect, FamilyGraph,
        FamilyLayoutAlgorithm, Gender, LayoutConfig, Person, PersonListParser, RenderConfig, Scene,
        Selection, SvgRenderer, TextPreviewRenderer, TreeExplorer, TreeLayout, Viewport,
    };
}

/// Parse a JSON person list into a graph
///
/// # Example
/// ```rust
/// use lineage::parse;
/// use lineage::prelude::Database;
///
/// let graph = parse(r#"[{"id": "a", "name": "Ada"}]"#).unwrap();
/// assert_eq!(graph.node_count(), 1);
/// ```
pub fn parse(input: &str) -> anyhow::Result<tree::FamilyGraph> {
    use crate::core::Parser as _;

    let parser = tree::PersonListParser::new();
    let mut graph = tree::FamilyGraph::new();
    parser.parse(input, &mut graph)?;
    Ok(graph)
}

/// Lay out a JSON person list and render it as SVG with default settings
pub fn render_svg(input: &str) -> anyhow::Result<String> {
    let graph = parse(input)?;
    let explorer = tree::TreeExplorer::new(graph);
    let bytes = explorer.export_svg()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Lay out a JSON person list and render a terminal preview
///
/// # Example
/// ```rust
/// use lineage::{render_preview, CharacterSet};
///
/// let text = render_preview(r#"[{"id": "a", "name": "Ada"}]"#, CharacterSet::Ascii).unwrap();
/// assert!(text.contains("Ada"));
/// ```
pub fn render_preview(input: &str, style: CharacterSet) -> anyhow::Result<String> {
    let graph = parse(input)?;
    tree::TreeExplorer::new(graph).preview(style)
}
