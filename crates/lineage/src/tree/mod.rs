//! Family-tree pipeline
//!
//! Person graph → layout → connectors → scene → SVG or text preview, plus
//! the viewport controller and the explorer session that drives them.

mod connectors;
mod diagnostics;
mod explorer;
mod graph;
mod layout;
mod parser;
mod person;
mod preview;
mod scene;
mod svg;
mod viewport;

pub use connectors::*;
pub use diagnostics::*;
pub use explorer::*;
pub use graph::*;
pub use layout::*;
pub use parser::*;
pub use person::*;
pub use preview::*;
pub use scene::*;
pub use svg::*;
pub use viewport::*;
