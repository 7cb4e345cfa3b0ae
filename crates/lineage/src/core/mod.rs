//! Core abstractions for family-tree processing
//!
//! This module defines the traits every pipeline stage implements
//! (storage, parsing, layout, rendering) together with the shared
//! error, logging, geometry and text helpers.

mod box_drawing;
mod canvas;
mod database;
mod error;
mod layout;
pub mod logging;
mod parser;
mod renderer;
mod text;
mod types;

pub use box_drawing::*;
pub use canvas::*;
pub use database::*;
pub use error::*;
pub use layout::*;
pub use logging::*;
pub use parser::*;
pub use renderer::*;
pub use text::*;
pub use types::*;
