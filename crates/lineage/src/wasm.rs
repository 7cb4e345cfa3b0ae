//! WebAssembly bindings for Lineage
//!
//! Exposes a [`TreeView`] handle that a browser shell drives with explorer
//! commands. Structured values cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::core::{CharacterSet, PanDirection, Point};
use crate::tree::{Command, Effect, FamilyGraph, LayoutConfig, RenderConfig, TreeExplorer};

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn effect_json(effect: Effect) -> Result<String, JsValue> {
    serde_json::to_string(&effect).map_err(js_error)
}

/// Browser handle onto an explorer session
#[wasm_bindgen]
pub struct TreeView {
    explorer: TreeExplorer,
}

#[wasm_bindgen]
impl TreeView {
    /// Build a view from a JSON person list
    #[wasm_bindgen(constructor)]
    pub fn new(people_json: &str) -> Result<TreeView, JsValue> {
        let graph = crate::parse(people_json).map_err(js_error)?;
        Ok(TreeView {
            explorer: TreeExplorer::new(graph),
        })
    }

    /// Build a view with JSON layout and render configs (either may be empty)
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        people_json: &str,
        layout_json: &str,
        render_json: &str,
    ) -> Result<TreeView, JsValue> {
        let graph = crate::parse(people_json).map_err(js_error)?;
        let layout: LayoutConfig = if layout_json.trim().is_empty() {
            LayoutConfig::default()
        } else {
            serde_json::from_str(layout_json).map_err(js_error)?
        };
        layout.validate().map_err(js_error)?;
        let render: RenderConfig = if render_json.trim().is_empty() {
            RenderConfig::default()
        } else {
            serde_json::from_str(render_json).map_err(js_error)?
        };
        Ok(TreeView {
            explorer: TreeExplorer::with_config(graph, layout, render),
        })
    }

    /// Replace the people shown, keeping viewport and valid session state
    #[wasm_bindgen(js_name = replacePeople)]
    pub fn replace_people(&mut self, people_json: &str) -> Result<(), JsValue> {
        let graph: FamilyGraph = crate::parse(people_json).map_err(js_error)?;
        self.explorer.replace_graph(graph);
        Ok(())
    }

    /// Apply a JSON command such as `{"type": "toggleCollapse", "value": "a"}`
    pub fn dispatch(&mut self, command_json: &str) -> Result<String, JsValue> {
        let command: Command = serde_json::from_str(command_json).map_err(js_error)?;
        effect_json(self.explorer.dispatch(command))
    }

    #[wasm_bindgen(js_name = toggleCollapse)]
    pub fn toggle_collapse(&mut self, id: &str) -> Result<String, JsValue> {
        effect_json(self.explorer.dispatch(Command::ToggleCollapse(id.to_string())))
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> Result<String, JsValue> {
        effect_json(self.explorer.dispatch(Command::ZoomIn))
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> Result<String, JsValue> {
        effect_json(self.explorer.dispatch(Command::ZoomOut))
    }

    /// Pan one step; `direction` is "up", "down", "left" or "right"
    pub fn pan(&mut self, direction: &str) -> Result<String, JsValue> {
        let dir = PanDirection::from_str(direction)
            .ok_or_else(|| js_error(format!("Unknown pan direction: {}", direction)))?;
        effect_json(self.explorer.dispatch(Command::Pan(dir)))
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) -> Result<String, JsValue> {
        effect_json(self.explorer.dispatch(Command::ResetView))
    }

    /// Returns `{"effect":"fullscreen","request":"enter"|"exit"}` for the host to act on
    #[wasm_bindgen(js_name = toggleFullscreen)]
    pub fn toggle_fullscreen(&mut self) -> Result<String, JsValue> {
        effect_json(self.explorer.dispatch(Command::ToggleFullscreen))
    }

    #[wasm_bindgen(js_name = fullscreenChanged)]
    pub fn fullscreen_changed(&mut self, fullscreen: bool) {
        self.explorer.dispatch(Command::FullscreenChanged(fullscreen));
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.explorer.dispatch(Command::PointerDown(Point::new(x, y)));
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        effect_json(self.explorer.dispatch(Command::PointerMove(Point::new(x, y))))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.explorer.dispatch(Command::PointerUp);
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.explorer.dispatch(Command::PointerLeave);
    }

    #[wasm_bindgen(js_name = hoverNode)]
    pub fn hover_node(&mut self, id: Option<String>) -> Result<String, JsValue> {
        effect_json(self.explorer.dispatch(Command::HoverNode(id)))
    }

    /// Hit-test a screen point and apply the resulting command; returns it as JSON
    pub fn click(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        let command = self.explorer.click(Point::new(x, y));
        serde_json::to_string(&command).map_err(js_error)
    }

    /// Current scene (nodes, connectors, transform) as JSON
    #[wasm_bindgen(js_name = sceneJson)]
    pub fn scene_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.explorer.scene()).map_err(js_error)
    }

    /// Current viewport state as JSON
    #[wasm_bindgen(js_name = viewportJson)]
    pub fn viewport_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.explorer.viewport()).map_err(js_error)
    }

    /// SVG export of the whole tree
    #[wasm_bindgen(js_name = exportSvg)]
    pub fn export_svg(&self) -> Result<Vec<u8>, JsValue> {
        self.explorer.export_svg().map_err(js_error)
    }

    /// Text preview; `style` is "ascii" or "unicode"
    pub fn preview(&self, style: &str) -> Result<String, JsValue> {
        let style = match style {
            "ascii" => CharacterSet::Ascii,
            "unicode" => CharacterSet::Unicode,
            other => return Err(js_error(format!("Unknown style: {}. Use 'ascii' or 'unicode'", other))),
        };
        self.explorer.preview(style).map_err(js_error)
    }

    #[wasm_bindgen(js_name = layoutPasses)]
    pub fn layout_passes(&self) -> usize {
        self.explorer.layout_passes()
    }
}
