//! Zoom, pan and drag state
//!
//! The viewport never touches layout. Its transform is always
//! `scale(zoom) translate(pan)`: the pan offset is expressed in model units
//! and applied before scaling.

use serde::Serialize;
use tracing::trace;

use crate::core::{PanDirection, Point};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_PAN_STEP: f64 = 50.0;

/// Pointer-drag state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DragState {
    #[default]
    Idle,
    Dragging { anchor: Point },
}

/// What the host should do after a fullscreen toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FullscreenRequest {
    Enter,
    Exit,
}

/// `scale(zoom) · translate(pan)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate: Point,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        scale: 1.0,
        translate: Point::ORIGIN,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Model point to screen point
    pub fn apply(&self, model: Point) -> Point {
        Point::new(
            (model.x + self.translate.x) * self.scale,
            (model.y + self.translate.y) * self.scale,
        )
    }

    /// Screen point to model point
    pub fn invert(&self, screen: Point) -> Point {
        Point::new(
            screen.x / self.scale - self.translate.x,
            screen.y / self.scale - self.translate.y,
        )
    }

    /// SVG `transform` attribute value
    pub fn to_svg(&self) -> String {
        format!(
            "scale({}) translate({}, {})",
            self.scale, self.translate.x, self.translate.y
        )
    }
}

/// Viewport controller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    zoom: f64,
    pan: Point,
    drag: DragState,
    fullscreen: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ORIGIN,
            drag: DragState::Idle,
            fullscreen: false,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan_offset(&self) -> Point {
        self.pan
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn pointer_down(&mut self, p: Point) {
        self.drag = DragState::Dragging { anchor: p };
    }

    /// Pan by the pointer delta while dragging; ignored when idle
    pub fn pointer_move(&mut self, p: Point) {
        if let DragState::Dragging { anchor } = self.drag {
            self.pan = self.pan + (p - anchor);
            self.drag = DragState::Dragging { anchor: p };
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Set the zoom factor, snapping to one decimal and clamping to
    /// [`MIN_ZOOM`, `MAX_ZOOM`]
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            return;
        }
        self.zoom = ((zoom * 10.0).round() / 10.0).clamp(MIN_ZOOM, MAX_ZOOM);
        trace!(zoom = self.zoom, "Zoom changed");
    }

    pub fn pan(&mut self, direction: PanDirection, amount: f64) {
        let unit = direction.unit();
        self.pan = self.pan.offset(unit.x * amount, unit.y * amount);
    }

    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::ORIGIN;
        self.drag = DragState::Idle;
    }

    /// Ask the host to change fullscreen; the flag itself only follows
    /// [`Viewport::fullscreen_changed`]
    pub fn toggle_fullscreen(&self) -> FullscreenRequest {
        if self.fullscreen {
            FullscreenRequest::Exit
        } else {
            FullscreenRequest::Enter
        }
    }

    pub fn fullscreen_changed(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            scale: self.zoom,
            translate: self.pan,
        }
    }

    pub fn screen_to_model(&self, screen: Point) -> Point {
        self.transform().invert(screen)
    }

    pub fn model_to_screen(&self, model: Point) -> Point {
        self.transform().apply(model)
    }
}
