//! SVG export
//!
//! Produces a self-contained document: every style is an inline attribute,
//! nothing is fetched from outside, and image URLs are never embedded.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::{debug, info, span, Level};

use super::{Connector, Scene, SceneNode};
use crate::core::{ExportSpace, LineageError, Renderer};

const CONNECTOR_STROKE: &str = "#94a3b8";
const MARKER_FILL: &str = "#f43f5e";
const TEXT_FILL: &str = "#1f2937";
const MUTED_FILL: &str = "#6b7280";
const SELECTED_STROKE: &str = "#f59e0b";

/// SVG output options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub export_space: ExportSpace,
    pub font_family: String,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            export_space: ExportSpace::Model,
            font_family: "sans-serif".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn with_export_space(mut self, space: ExportSpace) -> Self {
        self.export_space = space;
        self
    }
}

/// Scene to SVG writer
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    config: RenderConfig,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn write_document(&self, scene: &Scene, out: &mut String) -> std::fmt::Result {
        let w = scene.extents.width;
        let h = scene.extents.height;
        writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        )?;
        writeln!(
            out,
            "  <rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"{}\"/>",
            escape_xml(&self.config.background)
        )?;

        let wrapped =
            self.config.export_space == ExportSpace::Viewport && !scene.transform.is_identity();
        if wrapped {
            writeln!(out, "  <g transform=\"{}\">", scene.transform.to_svg())?;
        }

        writeln!(out, "  <g class=\"connectors\">")?;
        for connector in &scene.connectors {
            self.write_connector(connector, out)?;
        }
        writeln!(out, "  </g>")?;

        writeln!(out, "  <g class=\"people\">")?;
        for node in &scene.nodes {
            self.write_node(node, out)?;
        }
        writeln!(out, "  </g>")?;

        if wrapped {
            writeln!(out, "  </g>")?;
        }
        writeln!(out, "</svg>")
    }

    fn write_connector(&self, connector: &Connector, out: &mut String) -> std::fmt::Result {
        let mut d = String::new();
        for segment in connector.segments() {
            let sep = if d.is_empty() { "" } else { " " };
            write!(
                d,
                "{sep}M{},{} L{},{}",
                segment.start.x,
                segment.start.y,
                segment.end.x,
                segment.end.y
            )?;
        }
        writeln!(
            out,
            "    <path d=\"{d}\" fill=\"none\" stroke=\"{CONNECTOR_STROKE}\" stroke-width=\"2\"/>"
        )?;
        if let Connector::Spouse { marker, .. } = connector {
            writeln!(
                out,
                "    <circle cx=\"{}\" cy=\"{}\" r=\"4\" fill=\"{MARKER_FILL}\"/>",
                marker.x, marker.y
            )?;
        }
        Ok(())
    }

    fn write_node(&self, node: &SceneNode, out: &mut String) -> std::fmt::Result {
        let r = node.rect;
        let font = escape_xml(&self.config.font_family);
        let (stroke, stroke_width) = if node.selected {
            (SELECTED_STROKE, 3)
        } else if node.hovered {
            (node.palette.stroke, 2)
        } else {
            (node.palette.stroke, 1)
        };

        writeln!(out, "    <g data-id=\"{}\">", escape_xml(&node.id))?;
        writeln!(
            out,
            "      <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"8\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            r.x, r.y, r.width, r.height, node.palette.fill, stroke, stroke_width
        )?;

        // Avatar glyph on the left, text block beside it
        let avatar_x = r.x + 28.0;
        let avatar_y = r.y + 32.0;
        writeln!(
            out,
            "      <circle cx=\"{avatar_x}\" cy=\"{avatar_y}\" r=\"16\" fill=\"{}\"/>",
            node.palette.stroke
        )?;
        writeln!(
            out,
            "      <text x=\"{avatar_x}\" y=\"{}\" text-anchor=\"middle\" font-family=\"{font}\" font-size=\"14\" font-weight=\"bold\" fill=\"#ffffff\">{}</text>",
            avatar_y + 5.0,
            escape_xml(&node.avatar)
        )?;

        let text_x = r.x + 52.0;
        writeln!(
            out,
            "      <text x=\"{text_x}\" y=\"{}\" font-family=\"{font}\" font-size=\"14\" font-weight=\"bold\" fill=\"{TEXT_FILL}\">{}</text>",
            r.y + 30.0,
            escape_xml(&node.name)
        )?;
        if !node.years.is_empty() {
            writeln!(
                out,
                "      <text x=\"{text_x}\" y=\"{}\" font-family=\"{font}\" font-size=\"12\" fill=\"{MUTED_FILL}\">{}</text>",
                r.y + 48.0,
                escape_xml(&node.years)
            )?;
        }
        if let Some(bio) = &node.bio {
            writeln!(
                out,
                "      <text x=\"{}\" y=\"{}\" font-family=\"{font}\" font-size=\"11\" fill=\"{MUTED_FILL}\">{}</text>",
                r.x + 12.0,
                r.y + 74.0,
                escape_xml(bio)
            )?;
        }

        if let Some(toggle) = node.toggle {
            writeln!(
                out,
                "      <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"#ffffff\" stroke=\"{}\" stroke-width=\"1\"/>",
                toggle.center.x, toggle.center.y, toggle.radius, node.palette.stroke
            )?;
            writeln!(
                out,
                "      <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"{font}\" font-size=\"14\" fill=\"{TEXT_FILL}\">{}</text>",
                toggle.center.x,
                toggle.center.y + 5.0,
                toggle.glyph()
            )?;
        }
        writeln!(out, "    </g>")
    }
}

impl Renderer<Scene> for SvgRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> Result<Self::Output> {
        let render_span = span!(
            Level::INFO,
            "render_svg",
            node_count = scene.nodes.len(),
            connector_count = scene.connectors.len(),
            export_space = %self.config.export_space
        );
        let _enter = render_span.enter();

        let mut out = String::new();
        self.write_document(scene, &mut out)
            .map_err(|e| LineageError::render_error(format!("failed to format SVG: {}", e)))?;

        debug!(bytes = out.len(), "SVG document written");
        info!("SVG rendering completed");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "svg"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "svg"
    }
}

/// Escape text for use in XML content and attribute values
pub fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PanDirection;
    use crate::tree::{build_connectors, FamilyGraph, FamilyLayoutAlgorithm, Person, Selection, Viewport};
    use std::collections::HashSet;

    fn scene(viewport: &Viewport) -> Scene {
        let mut cy = Person::new("c", "Cy").with_parents(&["a", "b"]);
        cy.image_url = Some("https://example.invalid/cy.png".into());
        let graph = FamilyGraph::from_people([
            Person::new("a", "Ana <\"Nan\"> & Co").with_spouses(&["b"]).with_children(&["c"]),
            Person::new("b", "Ben").with_spouses(&["a"]).with_children(&["c"]),
            cy,
        ]);

        let collapsed = HashSet::new();
        let layout = FamilyLayoutAlgorithm::new().layout_with_collapsed(&graph, &collapsed);
        let connectors = build_connectors(&graph, &layout, &collapsed);
        Scene::build(&graph, &layout, &connectors, viewport, &Selection::default(), &collapsed)
    }

    #[test]
    fn test_document_is_self_contained() {
        let svg = SvgRenderer::new().render(&scene(&Viewport::new())).unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(!svg.contains("href"));
        assert!(!svg.contains("example.invalid"));
        assert!(!svg.contains("<style"));
        assert!(svg.contains("data-id=\"c\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let svg = SvgRenderer::new().render(&scene(&Viewport::new())).unwrap();
        assert!(svg.contains("Ana &lt;&quot;Nan&quot;&gt; &amp; Co"));
    }

    #[test]
    fn test_model_space_ignores_viewport() {
        let mut viewport = Viewport::new();
        viewport.zoom_in();
        viewport.pan(PanDirection::Up, 50.0);
        let moved = SvgRenderer::new().render(&scene(&viewport)).unwrap();
        let still = SvgRenderer::new().render(&scene(&Viewport::new())).unwrap();
        assert_eq!(moved, still);
        assert!(!moved.contains("transform="));
    }

    #[test]
    fn test_viewport_space_wraps_transform() {
        let mut viewport = Viewport::new();
        viewport.zoom_in();
        viewport.pan(PanDirection::Up, 50.0);
        let config = RenderConfig::default().with_export_space(ExportSpace::Viewport);
        let svg = SvgRenderer::with_config(config).render(&scene(&viewport)).unwrap();
        assert!(svg.contains("<g transform=\"scale(1.1) translate(0, 50)\">"));
    }

    #[test]
    fn test_viewport_space_at_rest_has_no_wrapper() {
        let config = RenderConfig::default().with_export_space(ExportSpace::Viewport);
        let svg = SvgRenderer::with_config(config).render(&scene(&Viewport::new())).unwrap();
        let model = SvgRenderer::new().render(&scene(&Viewport::new())).unwrap();
        assert!(!svg.contains("transform="));
        assert_eq!(svg, model);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a'b"), "a&apos;b");
        assert_eq!(escape_xml("plain"), "plain");
    }
}
