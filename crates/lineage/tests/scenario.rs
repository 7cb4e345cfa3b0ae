//! End-to-end scenarios: parse, lay out, connect and render small families

use lineage::prelude::*;
use lineage::tree::RelationKind;
use lineage::{parse, Segment};
use std::collections::HashSet;

const THREE_GENERATIONS: &str = r#"[
    {"id": "A", "name": "Alma", "gender": "female", "spouseIds": ["B"], "childrenIds": ["C"]},
    {"id": "B", "name": "Bert", "gender": "male", "spouseIds": ["A"], "childrenIds": ["C"]},
    {"id": "C", "name": "Cora", "parentIds": ["A", "B"], "childrenIds": ["D"]},
    {"id": "D", "name": "Dirk", "parentIds": ["C"]}
]"#;

fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
    Segment::new(Point::new(x1, y1), Point::new(x2, y2))
}

#[test]
fn test_three_generations_positions() {
    let graph = parse(THREE_GENERATIONS).unwrap();
    let layout = FamilyLayoutAlgorithm::new().layout(&graph).unwrap();

    let ids: Vec<&str> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C", "D"]);

    let at = |id: &str| {
        let p = layout.position(id).unwrap();
        (p.x, p.y)
    };
    assert_eq!(at("A"), (50.0, 50.0));
    assert_eq!(at("B"), (290.0, 50.0));
    // Child centered under the couple's midpoint
    assert_eq!(at("C"), (170.0, 250.0));
    assert_eq!(at("D"), (170.0, 450.0));

    assert_eq!(layout.extents.width, 540.0);
    assert_eq!(layout.extents.height, 600.0);
    assert_eq!(layout.get("A").unwrap().subtree_width, 440.0);
}

#[test]
fn test_three_generations_connectors() {
    let graph = parse(THREE_GENERATIONS).unwrap();
    let collapsed = HashSet::new();
    let layout = FamilyLayoutAlgorithm::new().layout_with_collapsed(&graph, &collapsed);
    let connectors = build_connectors(&graph, &layout, &collapsed);

    assert_eq!(connectors.len(), 3);
    assert_eq!(connectors.iter().filter(|c| c.is_spouse()).count(), 1);

    match &connectors[0] {
        Connector::Spouse {
            partners,
            segment,
            marker,
        } => {
            assert_eq!(partners, &["A".to_string(), "B".to_string()]);
            assert_eq!(*segment, seg(250.0, 100.0, 290.0, 100.0));
            assert_eq!(*marker, Point::new(270.0, 100.0));
        }
        other => panic!("expected spouse link first, got {:?}", other),
    }

    let couple_bus = connectors
        .iter()
        .find(|c| matches!(c, Connector::Descent { parents, .. } if parents.len() == 2))
        .expect("couple bus");
    assert_eq!(
        couple_bus.segments(),
        &[seg(270.0, 100.0, 270.0, 200.0), seg(270.0, 200.0, 270.0, 250.0)]
    );

    let single_bus = connectors
        .iter()
        .find(|c| matches!(c, Connector::Descent { parents, .. } if parents == &["C".to_string()]))
        .expect("single-parent bus");
    assert_eq!(
        single_bus.segments(),
        &[seg(270.0, 350.0, 270.0, 400.0), seg(270.0, 400.0, 270.0, 450.0)]
    );
}

#[test]
fn test_collapse_then_expand_restores_tree() {
    let mut explorer = TreeExplorer::new(parse(THREE_GENERATIONS).unwrap());
    let before = explorer.layout().clone();

    assert_eq!(explorer.dispatch(Command::ToggleCollapse("A".into())), Effect::Relayout);
    let ids: Vec<&str> = explorer.layout().nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    // Only the spouse link survives
    assert_eq!(explorer.connectors().len(), 1);
    assert!(explorer.connectors()[0].is_spouse());

    assert_eq!(explorer.dispatch(Command::ToggleCollapse("A".into())), Effect::Relayout);
    assert_eq!(explorer.layout(), &before);
    assert_eq!(explorer.layout_passes(), 3);
}

#[test]
fn test_collapsing_spouse_hides_shared_children() {
    let mut explorer = TreeExplorer::new(parse(THREE_GENERATIONS).unwrap());
    explorer.dispatch(Command::Collapse("B".into()));
    assert!(!explorer.layout().contains("C"));
    assert!(explorer.layout().contains("A"));
}

#[test]
fn test_mutual_parent_cycle_terminates() {
    let graph = FamilyGraph::from_people([
        Person::new("X", "Xan").with_parents(&["Y"]).with_children(&["Y"]),
        Person::new("Y", "Yul").with_parents(&["X"]).with_children(&["X"]),
    ]);
    let config = LayoutConfig::default().with_diagnostics(DiagnosticPolicy::Collect);
    let layout = FamilyLayoutAlgorithm::with_config(config).layout(&graph).unwrap();

    assert_eq!(layout.len(), 2);
    assert_eq!(layout.position("X").unwrap().y, 50.0);
    assert_eq!(layout.position("Y").unwrap().y, 250.0);
    assert_eq!(
        layout.diagnostics,
        vec![Diagnostic::CyclicRelation {
            person: "Y".into(),
            relation: RelationKind::Child,
            related: "X".into(),
        }]
    );
}

#[test]
fn test_parent_only_cycle_is_reported() {
    let graph = FamilyGraph::from_people([
        Person::new("X", "Xan").with_parents(&["Y"]),
        Person::new("Y", "Yul").with_parents(&["X"]),
    ]);
    let config = LayoutConfig::default().with_diagnostics(DiagnosticPolicy::Collect);
    let layout = FamilyLayoutAlgorithm::with_config(config).layout(&graph).unwrap();
    assert!(layout.contains("X") || layout.contains("Y"));

    let found = graph.diagnostics(DiagnosticPolicy::Collect);
    assert_eq!(
        found,
        vec![Diagnostic::CyclicRelation {
            person: "Y".into(),
            relation: RelationKind::Parent,
            related: "X".into(),
        }]
    );
    assert_eq!(found[0].to_string(), "'Y' lists its own descendant 'X' as a parent");
}

#[test]
fn test_collapsing_spouse_keeps_partners_other_children() {
    let graph = FamilyGraph::from_people([
        Person::new("A", "Ada").with_spouses(&["B"]).with_children(&["C"]),
        Person::new("B", "Bo").with_spouses(&["A"]).with_children(&["D"]),
        Person::new("C", "Cy").with_parents(&["A"]),
        Person::new("D", "Dee").with_parents(&["B"]),
    ]);
    let mut explorer = TreeExplorer::new(graph);
    let before = explorer.layout().position("C");
    explorer.dispatch(Command::Collapse("B".into()));
    assert_eq!(explorer.layout().position("C"), before);
    assert!(!explorer.layout().contains("D"));
}

#[test]
fn test_dangling_child_is_skipped() {
    let graph = parse(r#"[{"id": "A", "name": "Alma", "childrenIds": ["ghost"]}]"#).unwrap();
    let collapsed = HashSet::new();
    let layout = FamilyLayoutAlgorithm::new().layout_with_collapsed(&graph, &collapsed);

    assert_eq!(layout.len(), 1);
    assert_eq!(layout.get("A").unwrap().subtree_width, 200.0);
    assert!(build_connectors(&graph, &layout, &collapsed).is_empty());
    assert_eq!(
        graph.diagnostics(DiagnosticPolicy::Collect),
        vec![Diagnostic::DanglingReference {
            person: "A".into(),
            relation: RelationKind::Child,
            missing: "ghost".into(),
        }]
    );

    // A dangling child does not earn a collapse toggle
    let explorer = TreeExplorer::new(graph);
    assert!(explorer.scene().node("A").unwrap().toggle.is_none());
}

#[test]
fn test_independent_families_side_by_side() {
    let graph = FamilyGraph::from_people([Person::new("P", "Pia"), Person::new("Q", "Quin")]);
    let layout = FamilyLayoutAlgorithm::new().layout(&graph).unwrap();
    assert_eq!(layout.position("P").unwrap().x, 50.0);
    // node width plus family gap
    assert_eq!(layout.position("Q").unwrap().x, 370.0);
    assert_eq!(layout.extents.width, 620.0);
}

#[test]
fn test_click_toggle_then_select() {
    let mut explorer = TreeExplorer::new(parse(THREE_GENERATIONS).unwrap());
    // C's toggle sits on its bottom edge center
    let command = explorer.click(Point::new(270.0, 350.0));
    assert_eq!(command, Command::ToggleCollapse("C".into()));
    assert!(explorer.is_collapsed("C"));

    let command = explorer.click(Point::new(300.0, 80.0));
    assert_eq!(command, Command::SelectNode("B".into()));
    assert_eq!(explorer.selection().selected.as_deref(), Some("B"));

    let command = explorer.click(Point::new(10.0, 10.0));
    assert_eq!(command, Command::ClearSelection);
}
