//! Family-tree layout
//!
//! Depth-first layout with post-order width accumulation. Every family
//! unit (a person plus the spouses placed beside it) is centered over the
//! horizontal span of its visible descendants, and descendants are centered
//! under the unit when the unit is the wider of the two.
//!
//! Each call to [`FamilyLayoutAlgorithm::layout_with_collapsed`] owns its
//! own [`LayoutPass`]; the visited set is never shared between passes.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, span, trace, Level};

use super::{Diagnostic, DiagnosticPolicy, Diagnostics, FamilyGraph, Person, RelationKind};
use crate::core::{Database, Extents, LayoutAlgorithm, Rect};

/// How a collapse treats the space of the hidden descendants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollapseMode {
    /// Keep the hidden subtree's footprint so nothing else moves
    #[default]
    ReserveSpace,
    /// Leave hidden people out and let the tree close up
    Reflow,
}

/// Layout configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between sibling subtrees
    pub horizontal_spacing: f64,
    /// Gap between generations
    pub vertical_spacing: f64,
    /// Gap between a person and each spouse
    pub spouse_spacing: f64,
    /// Gap between independent root families
    pub family_spacing: f64,
    /// Canvas margin on every side
    pub padding: f64,
    pub collapse_mode: CollapseMode,
    pub diagnostics: DiagnosticPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 100.0,
            horizontal_spacing: 60.0,
            vertical_spacing: 100.0,
            spouse_spacing: 40.0,
            family_spacing: 120.0,
            padding: 50.0,
            collapse_mode: CollapseMode::ReserveSpace,
            diagnostics: DiagnosticPolicy::Silent,
        }
    }
}

impl LayoutConfig {
    pub fn with_collapse_mode(mut self, mode: CollapseMode) -> Self {
        self.collapse_mode = mode;
        self
    }

    pub fn with_diagnostics(mut self, policy: DiagnosticPolicy) -> Self {
        self.diagnostics = policy;
        self
    }

    /// Vertical distance between the tops of two consecutive generations
    pub fn generation_step(&self) -> f64 {
        self.node_height + self.vertical_spacing
    }

    /// Horizontal distance between a person and the next spouse slot
    pub fn spouse_step(&self) -> f64 {
        self.node_width + self.spouse_spacing
    }

    /// Reject values that would make boxes overlap or collapse to nothing
    pub fn validate(&self) -> Result<(), crate::core::LineageError> {
        let sizes = [("node_width", self.node_width), ("node_height", self.node_height)];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(crate::core::LineageError::config_error(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        let gaps = [
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
            ("spouse_spacing", self.spouse_spacing),
            ("family_spacing", self.family_spacing),
            ("padding", self.padding),
        ];
        for (name, value) in gaps {
            if !(value.is_finite() && value >= 0.0) {
                return Err(crate::core::LineageError::config_error(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Computed position of one person
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPosition {
    pub x: f64,
    pub y: f64,
    pub subtree_width: f64,
}

/// A person with its computed position
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedPerson {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub subtree_width: f64,
}

impl PositionedPerson {
    pub fn position(&self) -> LayoutPosition {
        LayoutPosition {
            x: self.x,
            y: self.y,
            subtree_width: self.subtree_width,
        }
    }
}

/// Layout output: visible people in visitation order plus canvas extents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeLayout {
    pub nodes: Vec<PositionedPerson>,
    pub extents: Extents,
    pub config: LayoutConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl TreeLayout {
    pub fn position(&self, id: &str) -> Option<LayoutPosition> {
        self.get(id).map(PositionedPerson::position)
    }

    pub fn get(&self, id: &str) -> Option<&PositionedPerson> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Bounding box of a person's node
    pub fn rect(&self, id: &str) -> Option<Rect> {
        self.get(id).map(|n| {
            Rect::new(n.x, n.y, self.config.node_width, self.config.node_height)
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Positions keyed by person id
    pub fn positions(&self) -> HashMap<&str, LayoutPosition> {
        self.nodes
            .iter()
            .map(|n| (n.id.as_str(), n.position()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Footprint {
    width: f64,
    height: f64,
}

impl Footprint {
    const EMPTY: Footprint = Footprint {
        width: 0.0,
        height: 0.0,
    };

    fn is_empty(&self) -> bool {
        self.width <= 0.0
    }
}

/// State owned by a single layout pass
struct LayoutPass<'g> {
    graph: &'g FamilyGraph,
    config: &'g LayoutConfig,
    /// Strict descendants of collapsed people
    hidden: HashSet<&'g str>,
    visited: HashSet<&'g str>,
    /// People on the current descent, for telling cycles from shared children
    path: HashSet<&'g str>,
    nodes: Vec<PositionedPerson>,
    diagnostics: Diagnostics,
    cursor_x: f64,
    tallest: f64,
    families: usize,
}

impl<'g> LayoutPass<'g> {
    fn new(
        graph: &'g FamilyGraph,
        config: &'g LayoutConfig,
        collapsed: &HashSet<String>,
    ) -> Self {
        Self {
            graph,
            config,
            hidden: graph.hidden_by(collapsed),
            visited: HashSet::with_capacity(graph.len()),
            path: HashSet::new(),
            nodes: Vec::with_capacity(graph.len()),
            diagnostics: Diagnostics::new(config.diagnostics),
            cursor_x: config.padding,
            tallest: 0.0,
            families: 0,
        }
    }

    fn is_hidden(&self, person: &Person) -> bool {
        self.hidden.contains(person.id.as_str())
    }

    /// Reflow leaves hidden people out of the pass entirely
    fn skips(&self, person: &Person) -> bool {
        self.config.collapse_mode == CollapseMode::Reflow && self.is_hidden(person)
    }

    fn lay_out_family(&mut self, root: &'g Person) {
        if self.skips(root) {
            return;
        }
        let gap = if self.families > 0 {
            self.config.family_spacing
        } else {
            0.0
        };
        let footprint = self.place(root, self.cursor_x + gap, self.config.padding);
        if footprint.is_empty() {
            return;
        }
        trace!(root = %root.id, width = footprint.width, height = footprint.height, "Placed family");
        self.cursor_x += gap + footprint.width;
        self.tallest = self.tallest.max(footprint.height);
        self.families += 1;
    }

    /// Lay out `person` and its descendants with the subtree's left edge at `x`.
    ///
    /// Hidden people are traversed and take up space but emit no position.
    /// The returned height covers only what was emitted.
    fn place(&mut self, person: &'g Person, x: f64, y: f64) -> Footprint {
        if !self.visited.insert(person.id.as_str()) {
            return Footprint::EMPTY;
        }
        self.path.insert(person.id.as_str());

        let cfg = self.config;
        let mut spouses: Vec<&'g Person> = Vec::new();
        for spouse in self.graph.spouses_of(person) {
            // Spouses already placed elsewhere keep their first position
            if !self.skips(spouse) && self.visited.insert(spouse.id.as_str()) {
                spouses.push(spouse);
            }
        }
        let unit_width = cfg.node_width + spouses.len() as f64 * cfg.spouse_step();

        // Reserve slots so output order is pre-order; x is filled in below
        let mut slots: Vec<(usize, usize)> = Vec::new();
        for (offset, member) in std::iter::once(person).chain(spouses.iter().copied()).enumerate() {
            if self.is_hidden(member) {
                continue;
            }
            slots.push((self.nodes.len(), offset));
            self.nodes.push(PositionedPerson {
                id: member.id.clone(),
                x: 0.0,
                y,
                subtree_width: cfg.node_width,
            });
        }
        let first_descendant = self.nodes.len();

        let child_y = y + cfg.generation_step();
        let mut children_width = 0.0;
        let mut children_height: f64 = 0.0;
        let mut placed_children = 0usize;
        for child in self.graph.children_of(person) {
            if self.path.contains(child.id.as_str()) {
                self.diagnostics.report(Diagnostic::CyclicRelation {
                    person: person.id.clone(),
                    relation: RelationKind::Child,
                    related: child.id.clone(),
                });
                continue;
            }
            if self.skips(child) {
                continue;
            }
            let gap = if placed_children > 0 {
                cfg.horizontal_spacing
            } else {
                0.0
            };
            let footprint = self.place(child, x + children_width + gap, child_y);
            if footprint.is_empty() {
                continue;
            }
            children_width += gap + footprint.width;
            children_height = children_height.max(footprint.height);
            placed_children += 1;
        }

        let width = unit_width.max(children_width);
        let node_x = x + ((children_width - unit_width) / 2.0).max(0.0);

        if placed_children > 0 && unit_width > children_width {
            let shift = (unit_width - children_width) / 2.0;
            for node in &mut self.nodes[first_descendant..] {
                node.x += shift;
            }
        }

        for &(index, offset) in &slots {
            let node = &mut self.nodes[index];
            node.x = node_x + offset as f64 * cfg.spouse_step();
            if offset == 0 {
                node.subtree_width = width;
            }
        }

        self.path.remove(person.id.as_str());

        let height = if children_height > 0.0 {
            cfg.node_height + cfg.vertical_spacing + children_height
        } else if slots.is_empty() {
            0.0
        } else {
            cfg.node_height
        };
        Footprint { width, height }
    }

    fn finish(self) -> TreeLayout {
        let extents = if self.families == 0 {
            Extents::default()
        } else {
            Extents {
                width: self.cursor_x + self.config.padding,
                height: self.config.padding * 2.0 + self.tallest,
            }
        };
        let index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        TreeLayout {
            nodes: self.nodes,
            extents,
            config: *self.config,
            diagnostics: self.diagnostics.into_vec(),
            index,
        }
    }
}

/// Family-tree layout algorithm
#[derive(Debug, Clone, Default)]
pub struct FamilyLayoutAlgorithm {
    config: LayoutConfig,
}

impl FamilyLayoutAlgorithm {
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out every person, hiding the strict descendants of collapsed people
    pub fn layout_with_collapsed(
        &self,
        graph: &FamilyGraph,
        collapsed: &HashSet<String>,
    ) -> TreeLayout {
        let layout_span = span!(
            Level::INFO,
            "layout_family_tree",
            person_count = graph.node_count(),
            collapsed_count = collapsed.len()
        );
        let _enter = layout_span.enter();

        let mut pass = LayoutPass::new(graph, &self.config, collapsed);

        for root in graph.roots() {
            pass.lay_out_family(root);
        }
        debug!(families = pass.families, "Root families placed");

        // People unreachable from any root: parent cycles, children known
        // only through a spouse, dangling-parent orphans already counted above
        let before = pass.families;
        for person in graph.people() {
            pass.lay_out_family(person);
        }
        if pass.families > before {
            debug!(extra_families = pass.families - before, "Placed unreachable people");
        }

        let layout = pass.finish();
        info!(
            positioned = layout.len(),
            width = layout.extents.width,
            height = layout.extents.height,
            "Family tree layout completed"
        );
        layout
    }
}

impl LayoutAlgorithm<FamilyGraph> for FamilyLayoutAlgorithm {
    type Output = TreeLayout;

    fn layout(&self, database: &FamilyGraph) -> Result<Self::Output> {
        Ok(self.layout_with_collapsed(database, &HashSet::new()))
    }

    fn name(&self) -> &'static str {
        "family-tree"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn direction(&self) -> &'static str {
        "top-down"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collapsed(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn couple_with_grandchild() -> FamilyGraph {
        FamilyGraph::from_people([
            Person::new("A", "A").with_spouses(&["B"]).with_children(&["C"]),
            Person::new("B", "B").with_spouses(&["A"]).with_children(&["C"]),
            Person::new("C", "C").with_parents(&["A", "B"]).with_children(&["D"]),
            Person::new("D", "D").with_parents(&["C"]),
        ])
    }

    #[test]
    fn test_single_person() {
        let graph = FamilyGraph::from_people([Person::new("solo", "Solo")]);
        let layout = FamilyLayoutAlgorithm::new().layout(&graph).unwrap();
        let pos = layout.position("solo").unwrap();
        assert_eq!((pos.x, pos.y, pos.subtree_width), (50.0, 50.0, 200.0));
        assert_eq!(layout.extents, Extents { width: 300.0, height: 200.0 });
    }

    #[test]
    fn test_empty_graph() {
        let layout = FamilyLayoutAlgorithm::new().layout(&FamilyGraph::new()).unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.extents, Extents::default());
    }

    #[test]
    fn test_couple_centered_over_descendants() {
        let layout = FamilyLayoutAlgorithm::new()
            .layout(&couple_with_grandchild())
            .unwrap();
        let a = layout.position("A").unwrap();
        let b = layout.position("B").unwrap();
        let c = layout.position("C").unwrap();
        let d = layout.position("D").unwrap();

        assert_eq!(a.y, b.y);
        assert_eq!(b.x - a.x, 240.0);
        assert_eq!(a.subtree_width, 440.0);
        // Couple midpoint is halfway between A's right edge and B's left edge
        let midpoint = (a.x + 200.0 + b.x) / 2.0;
        assert_eq!(c.x + 100.0, midpoint);
        assert_eq!(d.x, c.x);
        assert_eq!(c.y, a.y + 200.0);
        assert_eq!(d.y, c.y + 200.0);
    }

    #[test]
    fn test_parent_centered_over_wide_children() {
        let graph = FamilyGraph::from_people([
            Person::new("P", "P").with_children(&["K1", "K2"]),
            Person::new("K1", "K1").with_parents(&["P"]),
            Person::new("K2", "K2").with_parents(&["P"]),
        ]);
        let layout = FamilyLayoutAlgorithm::new().layout(&graph).unwrap();
        let p = layout.position("P").unwrap();
        let k1 = layout.position("K1").unwrap();
        let k2 = layout.position("K2").unwrap();
        assert_eq!(k1.x, 50.0);
        assert_eq!(k2.x, 310.0);
        assert_eq!(p.subtree_width, 460.0);
        assert_eq!(p.x, 50.0 + 130.0);
    }

    #[test]
    fn test_reserve_space_collapse_keeps_everyone_else() {
        let graph = FamilyGraph::from_people([
            Person::new("A", "A").with_children(&["B", "C"]),
            Person::new("B", "B").with_parents(&["A"]),
            Person::new("C", "C").with_parents(&["A"]).with_children(&["D"]),
            Person::new("D", "D").with_parents(&["C"]),
            Person::new("Z", "Z"),
        ]);
        let algo = FamilyLayoutAlgorithm::new();
        let open = algo.layout_with_collapsed(&graph, &HashSet::new());
        let shut = algo.layout_with_collapsed(&graph, &collapsed(&["A"]));

        assert_eq!(open.position("A"), shut.position("A"));
        assert_eq!(open.position("Z"), shut.position("Z"));
        for hidden in ["B", "C", "D"] {
            assert!(!shut.contains(hidden), "{hidden} should be hidden");
        }
    }

    #[test]
    fn test_reflow_collapse_closes_gap() {
        let graph = FamilyGraph::from_people([
            Person::new("A", "A").with_children(&["B", "C"]),
            Person::new("B", "B").with_parents(&["A"]),
            Person::new("C", "C").with_parents(&["A"]),
            Person::new("Z", "Z"),
        ]);
        let config = LayoutConfig::default().with_collapse_mode(CollapseMode::Reflow);
        let layout = FamilyLayoutAlgorithm::with_config(config)
            .layout_with_collapsed(&graph, &collapsed(&["A"]));
        assert_eq!(layout.position("A").unwrap().x, 50.0);
        assert_eq!(layout.position("Z").unwrap().x, 50.0 + 200.0 + 120.0);
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn test_collapsed_descendants_are_not_swept_up() {
        // Hidden children have parents, so only the sweep could place them
        let graph = FamilyGraph::from_people([
            Person::new("A", "A").with_children(&["B"]),
            Person::new("B", "B").with_parents(&["A"]),
        ]);
        let config = LayoutConfig::default().with_collapse_mode(CollapseMode::Reflow);
        let layout = FamilyLayoutAlgorithm::with_config(config)
            .layout_with_collapsed(&graph, &collapsed(&["A"]));
        assert!(!layout.contains("B"));
    }

    fn blended_family() -> FamilyGraph {
        // C and D each have one listed parent, from either side of the couple
        FamilyGraph::from_people([
            Person::new("A", "A").with_spouses(&["B"]).with_children(&["C"]),
            Person::new("B", "B").with_spouses(&["A"]).with_children(&["D"]),
            Person::new("C", "C").with_parents(&["A"]),
            Person::new("D", "D").with_parents(&["B"]),
        ])
    }

    #[test]
    fn test_spouse_collapse_keeps_partners_children() {
        let algo = FamilyLayoutAlgorithm::new();
        let graph = blended_family();
        let open = algo.layout_with_collapsed(&graph, &HashSet::new());
        let shut = algo.layout_with_collapsed(&graph, &collapsed(&["B"]));

        assert_eq!(open.get("C").map(|n| (n.x, n.y)), Some((170.0, 250.0)));
        assert_eq!(open.get("D").map(|n| (n.x, n.y)), Some((610.0, 50.0)));
        for id in ["A", "B", "C"] {
            assert_eq!(open.position(id), shut.position(id), "{id} moved");
        }
        assert!(!shut.contains("D"));
        assert_eq!(open.extents.width, shut.extents.width);
    }

    #[test]
    fn test_spouse_collapse_reflow_drops_own_children_only() {
        let config = LayoutConfig::default().with_collapse_mode(CollapseMode::Reflow);
        let layout = FamilyLayoutAlgorithm::with_config(config)
            .layout_with_collapsed(&blended_family(), &collapsed(&["B"]));
        assert!(layout.contains("C"));
        assert!(!layout.contains("D"));
        assert_eq!(layout.extents.width, 540.0);
    }

    fn married_in() -> FamilyGraph {
        FamilyGraph::from_people([
            Person::new("X", "X").with_children(&["K"]),
            Person::new("K", "K").with_parents(&["X"]).with_spouses(&["M"]),
            Person::new("M", "M"),
        ])
    }

    #[test]
    fn test_married_in_spouse_survives_collapse() {
        let algo = FamilyLayoutAlgorithm::new();
        let open = algo.layout_with_collapsed(&married_in(), &HashSet::new());
        let shut = algo.layout_with_collapsed(&married_in(), &collapsed(&["X"]));

        assert_eq!(open.get("M").map(|n| (n.x, n.y)), Some((290.0, 250.0)));
        assert!(!shut.contains("K"));
        assert_eq!(open.position("M"), shut.position("M"));
        assert_eq!(open.position("X"), shut.position("X"));
    }

    #[test]
    fn test_married_in_spouse_reflows_to_own_family() {
        let config = LayoutConfig::default().with_collapse_mode(CollapseMode::Reflow);
        let layout = FamilyLayoutAlgorithm::with_config(config)
            .layout_with_collapsed(&married_in(), &collapsed(&["X"]));
        assert_eq!(layout.get("X").map(|n| (n.x, n.y)), Some((50.0, 50.0)));
        assert_eq!(layout.get("M").map(|n| (n.x, n.y)), Some((370.0, 50.0)));
        assert!(!layout.contains("K"));
    }

    #[test]
    fn test_parent_cycle_still_positions() {
        let graph = FamilyGraph::from_people([
            Person::new("X", "X").with_parents(&["Y"]),
            Person::new("Y", "Y").with_parents(&["X"]),
        ]);
        let layout = FamilyLayoutAlgorithm::new().layout(&graph).unwrap();
        assert!(layout.contains("X") || layout.contains("Y"));
    }

    #[test]
    fn test_child_cycle_reported_when_collecting() {
        let graph = FamilyGraph::from_people([
            Person::new("X", "X").with_children(&["Y"]),
            Person::new("Y", "Y").with_parents(&["X"]).with_children(&["X"]),
        ]);
        let config = LayoutConfig::default().with_diagnostics(DiagnosticPolicy::Collect);
        let layout = FamilyLayoutAlgorithm::with_config(config).layout(&graph).unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(
            layout.diagnostics,
            vec![Diagnostic::CyclicRelation {
                person: "Y".into(),
                relation: RelationKind::Child,
                related: "X".into()
            }]
        );
    }

    #[test]
    fn test_shared_child_laid_out_once() {
        let graph = FamilyGraph::from_people([
            Person::new("M", "M").with_children(&["K"]),
            Person::new("F", "F").with_children(&["K"]),
            Person::new("K", "K").with_parents(&["M", "F"]),
        ]);
        let config = LayoutConfig::default().with_diagnostics(DiagnosticPolicy::Collect);
        let layout = FamilyLayoutAlgorithm::with_config(config).layout(&graph).unwrap();
        assert_eq!(layout.nodes.iter().filter(|n| n.id == "K").count(), 1);
        assert_eq!(layout.position("K").unwrap().x, layout.position("M").unwrap().x);
        assert!(layout.diagnostics.is_empty());
    }

    #[test]
    fn test_visitation_order_is_preorder() {
        let layout = FamilyLayoutAlgorithm::new()
            .layout(&couple_with_grandchild())
            .unwrap();
        let order: Vec<_> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_config_validation() {
        assert!(LayoutConfig::default().validate().is_ok());
        let bad = LayoutConfig {
            node_width: 0.0,
            ..LayoutConfig::default()
        };
        assert!(bad.validate().is_err());
        let negative = LayoutConfig {
            spouse_spacing: -1.0,
            ..LayoutConfig::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_partial_config_json_uses_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"node_width": 160, "collapse_mode": "reflow"}"#).unwrap();
        assert_eq!(config.node_width, 160.0);
        assert_eq!(config.node_height, 100.0);
        assert_eq!(config.collapse_mode, CollapseMode::Reflow);
    }
}
