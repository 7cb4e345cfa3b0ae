//! Interactive exploration session
//!
//! [`TreeExplorer`] owns the graph together with every piece of session
//! state (collapsed set, viewport, selection) and caches the layout and
//! connectors. Only collapse changes and [`TreeExplorer::replace_graph`]
//! run the layout again; viewport gestures never do.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use tracing::{debug, info, span, trace, Level};

use super::{
    build_connectors, Connector, FamilyGraph, FamilyLayoutAlgorithm, FullscreenRequest, Hit,
    LayoutConfig, RenderConfig, Scene, Selection, SvgRenderer, TextPreviewRenderer, TreeLayout,
    Viewport, DEFAULT_PAN_STEP,
};
use crate::core::{CharacterSet, LineageError, PanDirection, Point, Renderer};

/// Named session command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Command {
    ToggleCollapse(String),
    Expand(String),
    Collapse(String),
    ExpandAll,
    SelectNode(String),
    ClearSelection,
    HoverNode(Option<String>),
    ZoomIn,
    ZoomOut,
    Pan(PanDirection),
    ResetView,
    ToggleFullscreen,
    FullscreenChanged(bool),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
}

/// What a command changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "request", rename_all = "camelCase")]
pub enum Effect {
    /// Nothing changed
    None,
    /// Layout was recomputed
    Relayout,
    /// Only presentation state changed
    Redraw,
    /// The host should enter or leave fullscreen
    Fullscreen(FullscreenRequest),
}

/// Family-tree exploration session
#[derive(Debug, Clone)]
pub struct TreeExplorer {
    graph: FamilyGraph,
    algorithm: FamilyLayoutAlgorithm,
    render_config: RenderConfig,
    collapsed: HashSet<String>,
    viewport: Viewport,
    selection: Selection,
    layout: TreeLayout,
    connectors: Vec<Connector>,
    layout_passes: usize,
}

impl TreeExplorer {
    pub fn new(graph: FamilyGraph) -> Self {
        Self::with_config(graph, LayoutConfig::default(), RenderConfig::default())
    }

    pub fn with_config(graph: FamilyGraph, layout: LayoutConfig, render: RenderConfig) -> Self {
        let algorithm = FamilyLayoutAlgorithm::with_config(layout);
        let collapsed = HashSet::new();
        let tree_layout = algorithm.layout_with_collapsed(&graph, &collapsed);
        let connectors = build_connectors(&graph, &tree_layout, &collapsed);
        Self {
            graph,
            algorithm,
            render_config: render,
            collapsed,
            viewport: Viewport::new(),
            selection: Selection::default(),
            layout: tree_layout,
            connectors,
            layout_passes: 1,
        }
    }

    pub fn graph(&self) -> &FamilyGraph {
        &self.graph
    }

    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn collapsed(&self) -> &HashSet<String> {
        &self.collapsed
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    /// Number of layout passes run so far, including the initial one
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    /// Swap in new people; collapse and selection state for ids that are
    /// gone is dropped
    pub fn replace_graph(&mut self, graph: FamilyGraph) {
        self.graph = graph;
        let graph = &self.graph;
        self.collapsed.retain(|id| graph.has_children(id));
        if self
            .selection
            .selected
            .as_deref()
            .is_some_and(|id| !graph.contains(id))
        {
            self.selection.selected = None;
        }
        if self
            .selection
            .hovered
            .as_deref()
            .is_some_and(|id| !graph.contains(id))
        {
            self.selection.hovered = None;
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        self.layout = self
            .algorithm
            .layout_with_collapsed(&self.graph, &self.collapsed);
        self.connectors = build_connectors(&self.graph, &self.layout, &self.collapsed);
        self.layout_passes += 1;
        debug!(passes = self.layout_passes, "Layout recomputed");
    }

    /// Apply a command
    pub fn dispatch(&mut self, command: Command) -> Effect {
        let dispatch_span = span!(Level::DEBUG, "dispatch", command = ?command);
        let _enter = dispatch_span.enter();

        let effect = match command {
            Command::ToggleCollapse(id) => {
                if !self.graph.has_children(&id) {
                    Effect::None
                } else {
                    if !self.collapsed.remove(&id) {
                        self.collapsed.insert(id);
                    }
                    self.relayout();
                    Effect::Relayout
                }
            }
            Command::Expand(id) => {
                if self.collapsed.remove(&id) {
                    self.relayout();
                    Effect::Relayout
                } else {
                    Effect::None
                }
            }
            Command::Collapse(id) => {
                if self.graph.has_children(&id) && self.collapsed.insert(id) {
                    self.relayout();
                    Effect::Relayout
                } else {
                    Effect::None
                }
            }
            Command::ExpandAll => {
                if self.collapsed.is_empty() {
                    Effect::None
                } else {
                    self.collapsed.clear();
                    self.relayout();
                    Effect::Relayout
                }
            }
            Command::SelectNode(id) => {
                if self.graph.contains(&id) {
                    self.selection.selected = Some(id);
                    Effect::Redraw
                } else {
                    Effect::None
                }
            }
            Command::ClearSelection => {
                if self.selection.selected.take().is_some() {
                    Effect::Redraw
                } else {
                    Effect::None
                }
            }
            Command::HoverNode(id) => {
                let id = id.filter(|id| self.graph.contains(id));
                if self.selection.hovered == id {
                    Effect::None
                } else {
                    self.selection.hovered = id;
                    Effect::Redraw
                }
            }
            Command::ZoomIn => {
                self.viewport.zoom_in();
                Effect::Redraw
            }
            Command::ZoomOut => {
                self.viewport.zoom_out();
                Effect::Redraw
            }
            Command::Pan(direction) => {
                self.viewport.pan(direction, DEFAULT_PAN_STEP);
                Effect::Redraw
            }
            Command::ResetView => {
                self.viewport.reset_view();
                Effect::Redraw
            }
            Command::ToggleFullscreen => Effect::Fullscreen(self.viewport.toggle_fullscreen()),
            Command::FullscreenChanged(on) => {
                self.viewport.fullscreen_changed(on);
                Effect::Redraw
            }
            Command::PointerDown(p) => {
                self.viewport.pointer_down(p);
                Effect::None
            }
            Command::PointerMove(p) => {
                if self.viewport.is_dragging() {
                    self.viewport.pointer_move(p);
                    Effect::Redraw
                } else {
                    Effect::None
                }
            }
            Command::PointerUp => {
                self.viewport.pointer_up();
                Effect::None
            }
            Command::PointerLeave => {
                self.viewport.pointer_leave();
                Effect::None
            }
        };
        trace!(?effect, "Command applied");
        effect
    }

    /// Resolve a click at a screen point into exactly one command and apply it
    pub fn click(&mut self, screen: Point) -> Command {
        let model = self.viewport.screen_to_model(screen);
        let command = match self.scene().hit_test(model) {
            Some(Hit::Toggle(id)) => Command::ToggleCollapse(id),
            Some(Hit::Node(id)) => Command::SelectNode(id),
            None => Command::ClearSelection,
        };
        self.dispatch(command.clone());
        command
    }

    /// Current drawable scene
    pub fn scene(&self) -> Scene {
        Scene::build(
            &self.graph,
            &self.layout,
            &self.connectors,
            &self.viewport,
            &self.selection,
            &self.collapsed,
        )
    }

    /// Serialize the current tree to SVG
    pub fn export_svg(&self) -> Result<Vec<u8>> {
        let renderer = SvgRenderer::with_config(self.render_config.clone());
        let svg = renderer.render(&self.scene())?;
        Ok(svg.into_bytes())
    }

    /// Write the SVG export to `writer`
    pub fn export_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.export_svg()?;
        writer
            .write_all(&bytes)
            .and_then(|_| writer.flush())
            .map_err(LineageError::export_error)?;
        info!(bytes = bytes.len(), "Exported SVG");
        Ok(())
    }

    /// Text rendering of the current scene
    pub fn preview(&self, style: CharacterSet) -> Result<String> {
        TextPreviewRenderer::with_style(style).render(&self.scene())
    }
}
