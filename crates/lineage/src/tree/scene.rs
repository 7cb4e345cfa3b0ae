//! Declarative scene description
//!
//! A [`Scene`] is everything a surface needs to draw the tree: canvas size,
//! viewport transform, connectors and one [`SceneNode`] per positioned
//! person. Building it has no dependency on any live display.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, span, Level};

use super::{Connector, FamilyGraph, Gender, TreeLayout, ViewTransform, Viewport};
use crate::core::{initial, truncate_label, year_range, Extents, Point, Rect};

/// Display columns kept from a name
pub const NAME_MAX_WIDTH: usize = 18;
/// Display columns kept from a bio
pub const BIO_MAX_WIDTH: usize = 25;
/// Radius of the collapse affordance
pub const TOGGLE_RADIUS: f64 = 12.0;

/// Fill and stroke colors for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub fill: &'static str,
    pub stroke: &'static str,
}

impl Palette {
    pub fn for_gender(gender: Gender) -> Self {
        match gender {
            Gender::Male => Palette {
                fill: "#dbeafe",
                stroke: "#3b82f6",
            },
            Gender::Female => Palette {
                fill: "#fce7f3",
                stroke: "#ec4899",
            },
            Gender::Other => Palette {
                fill: "#ede9fe",
                stroke: "#8b5cf6",
            },
        }
    }
}

/// Selected and hovered person ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub selected: Option<String>,
    pub hovered: Option<String>,
}

/// Collapse/expand affordance drawn at the bottom edge of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollapseToggle {
    pub center: Point,
    pub radius: f64,
    pub collapsed: bool,
}

impl CollapseToggle {
    pub fn glyph(&self) -> &'static str {
        if self.collapsed {
            "+"
        } else {
            "-"
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        let d = p - self.center;
        d.x * d.x + d.y * d.y <= self.radius * self.radius
    }
}

/// One drawable person
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: String,
    pub rect: Rect,
    pub palette: Palette,
    pub avatar: String,
    pub name: String,
    pub years: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggle: Option<CollapseToggle>,
    pub selected: bool,
    pub hovered: bool,
}

/// Result of a hit test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// The collapse affordance of a person
    Toggle(String),
    /// The body of a person's node
    Node(String),
}

/// Drawable tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub extents: Extents,
    pub transform: ViewTransform,
    pub connectors: Vec<Connector>,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn build(
        graph: &FamilyGraph,
        layout: &TreeLayout,
        connectors: &[Connector],
        viewport: &Viewport,
        selection: &Selection,
        collapsed: &HashSet<String>,
    ) -> Self {
        let scene_span = span!(Level::DEBUG, "build_scene", node_count = layout.len());
        let _enter = scene_span.enter();

        let nodes: Vec<SceneNode> = layout
            .nodes
            .iter()
            .filter_map(|positioned| {
                let person = graph.get(&positioned.id)?;
                let rect = layout.rect(&person.id)?;
                let toggle = graph.has_children(&person.id).then(|| CollapseToggle {
                    center: Point::new(rect.x + rect.width / 2.0, rect.bottom()),
                    radius: TOGGLE_RADIUS,
                    collapsed: collapsed.contains(&person.id),
                });
                Some(SceneNode {
                    id: person.id.clone(),
                    rect,
                    palette: Palette::for_gender(person.gender),
                    avatar: initial(&person.name),
                    name: truncate_label(&person.name, NAME_MAX_WIDTH),
                    years: year_range(person.birth_date.as_deref(), person.death_date.as_deref()),
                    bio: person
                        .bio
                        .as_deref()
                        .filter(|b| !b.trim().is_empty())
                        .map(|b| truncate_label(b, BIO_MAX_WIDTH)),
                    toggle,
                    selected: selection.selected.as_deref() == Some(person.id.as_str()),
                    hovered: selection.hovered.as_deref() == Some(person.id.as_str()),
                })
            })
            .collect();

        debug!(nodes = nodes.len(), connectors = connectors.len(), "Scene built");
        Scene {
            extents: layout.extents,
            transform: viewport.transform(),
            connectors: connectors.to_vec(),
            nodes,
        }
    }

    pub fn node(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find what lies under a model-space point. Toggles win over node
    /// bodies, and later nodes are on top of earlier ones.
    pub fn hit_test(&self, p: Point) -> Option<Hit> {
        let toggle_hit = self.nodes.iter().rev().find(|n| {
            n.toggle.is_some_and(|t| t.contains(p))
        });
        if let Some(node) = toggle_hit {
            return Some(Hit::Toggle(node.id.clone()));
        }
        self.nodes
            .iter()
            .rev()
            .find(|n| n.rect.contains(p))
            .map(|n| Hit::Node(n.id.clone()))
    }
}
