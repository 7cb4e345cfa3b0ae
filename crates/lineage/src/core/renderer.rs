//! Core renderer trait for output
//!
//! This trait defines the interface for turning a prepared scene into an
//! output format (SVG, terminal text, ...).

use anyhow::Result;

/// Core trait for renderers
///
/// Renderers are generic over their input so the same scene description
/// can feed several output surfaces.
pub trait Renderer<S>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the input into the output format
    fn render(&self, scene: &S) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the version of this renderer
    fn version(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
