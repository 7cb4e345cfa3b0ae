//! Person graph storage
//!
//! Stores people in input order and resolves relation ids on demand. The
//! graph is ground truth: it never repairs relations, it only filters out
//! ids that do not resolve.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::{Diagnostic, DiagnosticPolicy, Diagnostics, Person, Relation, RelationKind};
use crate::core::Database;

/// In-memory family graph
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    people: Vec<Person>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl FamilyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from records in order; later duplicates of an id are skipped
    pub fn from_people(people: impl IntoIterator<Item = Person>) -> Self {
        let mut graph = Self::new();
        for person in people {
            graph.insert(person);
        }
        graph
    }

    /// Insert a person, returning false if the id was already taken
    pub fn insert(&mut self, person: Person) -> bool {
        if self.index.contains_key(&person.id) {
            debug!(person_id = %person.id, "Skipping duplicate person record");
            self.duplicates.push(person.id);
            return false;
        }
        self.index.insert(person.id.clone(), self.people.len());
        self.people.push(person);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.index.get(id).map(|&i| &self.people[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// People in input order
    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    /// Resolve a list of ids, skipping those not present
    pub fn resolve<'a>(&'a self, ids: &'a [String]) -> impl Iterator<Item = &'a Person> + 'a {
        ids.iter().filter_map(move |id| self.get(id))
    }

    pub fn parents_of<'a>(&'a self, person: &'a Person) -> impl Iterator<Item = &'a Person> + 'a {
        self.resolve(&person.parent_ids)
    }

    pub fn spouses_of<'a>(&'a self, person: &'a Person) -> impl Iterator<Item = &'a Person> + 'a {
        self.resolve(&person.spouse_ids)
    }

    pub fn children_of<'a>(&'a self, person: &'a Person) -> impl Iterator<Item = &'a Person> + 'a {
        self.resolve(&person.children_ids)
    }

    /// A root has no parent that resolves to a person in the graph
    pub fn is_root(&self, person: &Person) -> bool {
        self.parents_of(person).next().is_none()
    }

    /// Root members in input order
    pub fn roots(&self) -> impl Iterator<Item = &Person> {
        self.people.iter().filter(|p| self.is_root(p))
    }

    /// Whether the person lists at least one child present in the graph
    pub fn has_children(&self, id: &str) -> bool {
        self.get(id)
            .is_some_and(|p| self.children_of(p).next().is_some())
    }

    /// Strict descendants of the collapsed people.
    ///
    /// A child is anyone a person lists in `childrenIds` or anyone listing
    /// that person in `parentIds`. A collapsed person is never hidden by its
    /// own collapse, even when a cycle leads back to it.
    pub fn hidden_by<'a>(&'a self, collapsed: &HashSet<String>) -> HashSet<&'a str> {
        let mut listed_by: HashMap<&str, Vec<&'a Person>> = HashMap::new();
        for person in &self.people {
            for parent in &person.parent_ids {
                listed_by.entry(parent.as_str()).or_default().push(person);
            }
        }

        let mut hidden = HashSet::new();
        for origin in self.people.iter().filter(|p| collapsed.contains(&p.id)) {
            let mut seen: HashSet<&str> = HashSet::from([origin.id.as_str()]);
            let mut stack = vec![origin];
            while let Some(person) = stack.pop() {
                let listed = listed_by.get(person.id.as_str()).into_iter().flatten().copied();
                for child in self.children_of(person).chain(listed) {
                    if seen.insert(child.id.as_str()) {
                        hidden.insert(child.id.as_str());
                        stack.push(child);
                    }
                }
            }
        }
        hidden
    }

    /// Report every `parentIds` link that closes a loop in the ancestry
    fn parent_cycles(&self, sink: &mut Diagnostics) {
        // true while the person is on the current chain
        let mut on_chain: HashMap<&str, bool> = HashMap::with_capacity(self.people.len());
        for start in &self.people {
            if on_chain.contains_key(start.id.as_str()) {
                continue;
            }
            on_chain.insert(start.id.as_str(), true);
            let mut stack: Vec<(&Person, usize)> = vec![(start, 0)];
            while let Some(top) = stack.last_mut() {
                let person = top.0;
                let Some(parent_id) = person.parent_ids.get(top.1) else {
                    on_chain.insert(person.id.as_str(), false);
                    stack.pop();
                    continue;
                };
                top.1 += 1;
                let Some(parent) = self.get(parent_id) else {
                    continue;
                };
                match on_chain.get(parent.id.as_str()).copied() {
                    Some(true) => sink.report(Diagnostic::CyclicRelation {
                        person: person.id.clone(),
                        relation: RelationKind::Parent,
                        related: parent.id.clone(),
                    }),
                    Some(false) => {}
                    None => {
                        on_chain.insert(parent.id.as_str(), true);
                        stack.push((parent, 0));
                    }
                }
            }
        }
    }

    /// Scan for dangling references, duplicate ids and ancestry loops
    pub fn diagnostics(&self, policy: DiagnosticPolicy) -> Vec<Diagnostic> {
        let mut sink = Diagnostics::new(policy);
        for id in &self.duplicates {
            sink.report(Diagnostic::DuplicatePerson { id: id.clone() });
        }
        for person in &self.people {
            for kind in RelationKind::ALL {
                for missing in person.related(kind).iter().filter(|id| !self.contains(id)) {
                    sink.report(Diagnostic::DanglingReference {
                        person: person.id.clone(),
                        relation: kind,
                        missing: missing.clone(),
                    });
                }
            }
        }
        self.parent_cycles(&mut sink);
        sink.into_vec()
    }
}

impl Database for FamilyGraph {
    type Node = Person;
    type Edge = Relation;

    fn add_node(&mut self, node: Person) -> Result<()> {
        self.insert(node);
        Ok(())
    }

    /// Record `edge.to` on `edge.from`'s relation list; the reverse side is
    /// left untouched since relations need not be reciprocal.
    fn add_edge(&mut self, edge: Relation) -> Result<()> {
        let &i = self
            .index
            .get(&edge.from)
            .ok_or_else(|| anyhow::anyhow!("Person '{}' not found", edge.from))?;
        let person = &mut self.people[i];
        let list = match edge.kind {
            RelationKind::Parent => &mut person.parent_ids,
            RelationKind::Spouse => &mut person.spouse_ids,
            RelationKind::Child => &mut person.children_ids,
        };
        if !list.contains(&edge.to) {
            list.push(edge.to);
        }
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Person> {
        self.get(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    fn edges(&self) -> impl Iterator<Item = Relation> + '_ {
        self.people.iter().flat_map(|p| {
            RelationKind::ALL.into_iter().flat_map(move |kind| {
                p.related(kind)
                    .iter()
                    .map(move |to| Relation::new(p.id.clone(), to.clone(), kind))
            })
        })
    }

    fn clear(&mut self) {
        self.people.clear();
        self.index.clear();
        self.duplicates.clear();
    }

    fn node_count(&self) -> usize {
        self.people.len()
    }

    fn edge_count(&self) -> usize {
        self.people
            .iter()
            .map(|p| p.parent_ids.len() + p.spouse_ids.len() + p.children_ids.len())
            .sum()
    }
}
