//! Terminal preview of a scene
//!
//! Model coordinates are scaled down onto the character canvas: ten pixels
//! per column and twenty-five per row, so a default node becomes a 20x5
//! box. Connectors are drawn first and boxes are drawn over them.

use anyhow::Result;
use tracing::{debug, span, Level};
use unicode_width::UnicodeWidthStr;

use super::{Connector, Scene, SceneNode};
use crate::core::{truncate_label, BoxChars, CharCanvas, CharacterSet, LineChars, Renderer, Segment};

const PX_PER_COL: f64 = 10.0;
const PX_PER_ROW: f64 = 25.0;

/// Character-canvas renderer for scenes
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPreviewRenderer {
    style: CharacterSet,
}

impl TextPreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: CharacterSet) -> Self {
        Self { style }
    }

    pub fn style(&self) -> CharacterSet {
        self.style
    }

    fn col(x: f64) -> usize {
        (x / PX_PER_COL).round().max(0.0) as usize
    }

    fn row(y: f64) -> usize {
        (y / PX_PER_ROW).round().max(0.0) as usize
    }

    fn draw_segment(&self, canvas: &mut CharCanvas, segment: &Segment, c: char, lines: &LineChars) {
        if segment.is_vertical() {
            canvas.draw_vline(
                Self::col(segment.start.x),
                Self::row(segment.start.y),
                Self::row(segment.end.y),
                lines,
            );
        } else {
            // Diagonal spouse links (partners on different rows) are drawn
            // at the first partner's row
            canvas.draw_hline(
                Self::col(segment.start.x),
                Self::col(segment.end.x),
                Self::row(segment.start.y),
                c,
                lines,
            );
        }
    }

    fn draw_connector(&self, canvas: &mut CharCanvas, connector: &Connector, lines: &LineChars) {
        match connector {
            Connector::Spouse { segment, .. } => {
                self.draw_segment(canvas, segment, lines.spouse, lines);
            }
            Connector::Descent { segments, .. } => {
                for segment in segments {
                    self.draw_segment(canvas, segment, lines.horizontal, lines);
                }
            }
        }
    }

    fn draw_node(&self, canvas: &mut CharCanvas, node: &SceneNode) {
        let x = Self::col(node.rect.x);
        let y = Self::row(node.rect.y);
        let width = Self::col(node.rect.right()).saturating_sub(x);
        let height = Self::row(node.rect.bottom()).saturating_sub(y) + 1;
        let chars = if node.selected {
            BoxChars::double(self.style)
        } else {
            BoxChars::rectangle(self.style)
        };
        canvas.draw_box(x, y, width, height, &chars);

        let inner = width.saturating_sub(2);
        let years = if self.style.is_ascii() {
            node.years.replace('–', "-")
        } else {
            node.years.clone()
        };
        let lines = [Some(node.name.as_str()), Some(years.as_str()), node.bio.as_deref()];
        for (i, text) in lines.into_iter().enumerate() {
            let Some(text) = text.filter(|t| !t.is_empty()) else {
                continue;
            };
            if i + 2 >= height {
                break;
            }
            canvas.draw_text(x + 1, y + 1 + i, &fit(text, inner), inner);
        }

        if let Some(toggle) = node.toggle {
            let glyph = toggle.glyph().chars().next().unwrap_or('+');
            canvas.set_char(Self::col(toggle.center.x), y + height - 1, glyph);
        }
    }
}

/// Shorten to `width` columns, keeping an ellipsis when cut
fn fit(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        text.to_string()
    } else {
        truncate_label(text, width.saturating_sub(3))
    }
}

impl Renderer<Scene> for TextPreviewRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> Result<Self::Output> {
        let preview_span = span!(
            Level::INFO,
            "render_preview",
            node_count = scene.nodes.len(),
            style = %self.style
        );
        let _enter = preview_span.enter();

        let lines = LineChars::new(self.style);
        let mut canvas = CharCanvas::new(
            Self::col(scene.extents.width) + 1,
            Self::row(scene.extents.height) + 1,
        );
        for connector in &scene.connectors {
            self.draw_connector(&mut canvas, connector, &lines);
        }
        // Markers last so descent stubs do not overwrite them
        for connector in &scene.connectors {
            if let Connector::Spouse { marker, .. } = connector {
                canvas.set_char(Self::col(marker.x), Self::row(marker.y), lines.marker);
            }
        }
        for node in &scene.nodes {
            self.draw_node(&mut canvas, node);
        }

        debug!(width = canvas.width, height = canvas.height, "Preview canvas drawn");
        Ok(canvas.to_string())
    }

    fn name(&self) -> &'static str {
        "text-preview"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "text"
    }
}
