//! Relationship connector geometry
//!
//! Spouse links run between facing node edges at mid-height. Children hang
//! off a bus: a vertical stub from the parents, one horizontal run across
//! the children's centers, and a drop into the top edge of each child.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, span, trace, Level};

use super::{FamilyGraph, Person, TreeLayout};
use crate::core::{Point, Rect, Segment};

/// A drawn relationship line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Connector {
    /// Marriage link between two positioned partners
    Spouse {
        partners: [String; 2],
        segment: Segment,
        marker: Point,
    },
    /// Bus from one or two parents down to their children
    Descent {
        parents: Vec<String>,
        children: Vec<String>,
        segments: Vec<Segment>,
    },
}

impl Connector {
    pub fn is_spouse(&self) -> bool {
        matches!(self, Connector::Spouse { .. })
    }

    /// Whether the connector touches the given person
    pub fn involves(&self, id: &str) -> bool {
        match self {
            Connector::Spouse { partners, .. } => partners.iter().any(|p| p == id),
            Connector::Descent {
                parents, children, ..
            } => parents.iter().chain(children).any(|p| p == id),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        match self {
            Connector::Spouse { segment, .. } => std::slice::from_ref(segment),
            Connector::Descent { segments, .. } => segments,
        }
    }
}

/// Derive connectors for every positioned person.
///
/// Couples claim their shared children first; each remaining visible child
/// gets a single-parent drop. No child receives more than one drop, and no
/// strict descendant of a collapsed person receives one at all.
pub fn build_connectors(
    graph: &FamilyGraph,
    layout: &TreeLayout,
    collapsed: &HashSet<String>,
) -> Vec<Connector> {
    let connector_span = span!(Level::DEBUG, "build_connectors", positioned = layout.len());
    let _enter = connector_span.enter();

    let mut builder = ConnectorBuilder {
        graph,
        layout,
        hidden: graph.hidden_by(collapsed),
        pairs: HashSet::new(),
        dropped: HashSet::new(),
        connectors: Vec::new(),
    };

    for member in graph.people().filter(|p| layout.contains(&p.id)) {
        builder.couples(member);
    }
    for member in graph.people().filter(|p| layout.contains(&p.id)) {
        builder.single_parent(member);
    }

    debug!(connector_count = builder.connectors.len(), "Connectors built");
    builder.connectors
}

struct ConnectorBuilder<'a> {
    graph: &'a FamilyGraph,
    layout: &'a TreeLayout,
    hidden: HashSet<&'a str>,
    pairs: HashSet<(&'a str, &'a str)>,
    dropped: HashSet<&'a str>,
    connectors: Vec<Connector>,
}

impl<'a> ConnectorBuilder<'a> {
    fn visible_rect(&self, id: &str) -> Option<Rect> {
        self.layout.rect(id)
    }

    fn couples(&mut self, member: &'a Person) {
        let Some(member_rect) = self.visible_rect(&member.id) else {
            return;
        };
        let graph = self.graph;
        for spouse in graph.spouses_of(member) {
            if spouse.id == member.id {
                continue;
            }
            let Some(spouse_rect) = self.visible_rect(&spouse.id) else {
                continue;
            };
            // Reciprocal pairs are drawn from the lower id only
            if member.id > spouse.id && spouse.lists_spouse(&member.id) {
                continue;
            }
            let key = if member.id < spouse.id {
                (member.id.as_str(), spouse.id.as_str())
            } else {
                (spouse.id.as_str(), member.id.as_str())
            };
            if !self.pairs.insert(key) {
                continue;
            }

            let (left, right) = if member_rect.x <= spouse_rect.x {
                (member_rect, spouse_rect)
            } else {
                (spouse_rect, member_rect)
            };
            let start = Point::new(left.right(), left.y + left.height / 2.0);
            let end = Point::new(right.x, right.y + right.height / 2.0);
            let marker = start.midpoint(end);
            trace!(member = %member.id, spouse = %spouse.id, "Spouse link");
            self.connectors.push(Connector::Spouse {
                partners: [member.id.clone(), spouse.id.clone()],
                segment: Segment::new(start, end),
                marker,
            });

            let children = self.claim_children(
                graph
                    .children_of(member)
                    .chain(graph.children_of(spouse))
                    .filter(|c| c.lists_parent(&member.id) && c.lists_parent(&spouse.id)),
            );
            if children.is_empty() {
                continue;
            }
            let bus_y = left.bottom().max(right.bottom()) + self.layout.config.vertical_spacing / 2.0;
            let segments = self.bus(marker, bus_y, &children);
            self.connectors.push(Connector::Descent {
                parents: vec![member.id.clone(), spouse.id.clone()],
                children: children.iter().map(|c| c.id.clone()).collect(),
                segments,
            });
        }
    }

    fn single_parent(&mut self, member: &'a Person) {
        let Some(rect) = self.visible_rect(&member.id) else {
            return;
        };
        let graph = self.graph;
        let children = self.claim_children(graph.children_of(member));
        if children.is_empty() {
            return;
        }
        let anchor = Point::new(rect.x + rect.width / 2.0, rect.bottom());
        let bus_y = rect.bottom() + self.layout.config.vertical_spacing / 2.0;
        let segments = self.bus(anchor, bus_y, &children);
        self.connectors.push(Connector::Descent {
            parents: vec![member.id.clone()],
            children: children.iter().map(|c| c.id.clone()).collect(),
            segments,
        });
    }

    /// Take the visible, not yet connected children from `candidates`
    fn claim_children(&mut self, candidates: impl Iterator<Item = &'a Person>) -> Vec<&'a Person> {
        let mut claimed = Vec::new();
        for child in candidates {
            let shown = self.layout.contains(&child.id) && !self.hidden.contains(child.id.as_str());
            if shown && self.dropped.insert(child.id.as_str()) {
                claimed.push(child);
            }
        }
        claimed
    }

    fn bus(&self, anchor: Point, bus_y: f64, children: &[&Person]) -> Vec<Segment> {
        let mut segments = vec![Segment::new(anchor, Point::new(anchor.x, bus_y))];

        let centers: Vec<(f64, f64)> = children
            .iter()
            .filter_map(|c| self.visible_rect(&c.id))
            .map(|r| (r.x + r.width / 2.0, r.y))
            .collect();
        let left = centers.iter().map(|c| c.0).fold(anchor.x, f64::min);
        let right = centers.iter().map(|c| c.0).fold(anchor.x, f64::max);
        if right > left {
            segments.push(Segment::new(Point::new(left, bus_y), Point::new(right, bus_y)));
        }
        for (x, top) in centers {
            segments.push(Segment::new(Point::new(x, bus_y), Point::new(x, top)));
        }
        segments
    }
}
