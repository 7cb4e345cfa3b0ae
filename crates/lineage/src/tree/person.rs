//! Person records and relation kinds
//!
//! A [`Person`] is immutable for the duration of a layout pass. Relation
//! lists are kept exactly as supplied; nothing here checks that referenced
//! ids exist or that spouse lists are reciprocal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation-only gender category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    /// Parse a gender name, mapping anything unrecognized to `Other`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Gender::parse(&raw))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

/// A person in the family graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub parent_ids: Vec<String>,
    #[serde(default)]
    pub spouse_ids: Vec<String>,
    #[serde(default)]
    pub children_ids: Vec<String>,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            birth_date: None,
            death_date: None,
            bio: None,
            image_url: None,
            gender: Gender::Other,
            parent_ids: Vec::new(),
            spouse_ids: Vec::new(),
            children_ids: Vec::new(),
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_dates(mut self, birth: Option<&str>, death: Option<&str>) -> Self {
        self.birth_date = birth.map(str::to_string);
        self.death_date = death.map(str::to_string);
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_parents(mut self, ids: &[&str]) -> Self {
        self.parent_ids = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_spouses(mut self, ids: &[&str]) -> Self {
        self.spouse_ids = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_children(mut self, ids: &[&str]) -> Self {
        self.children_ids = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Ids referenced under the given relation
    pub fn related(&self, kind: RelationKind) -> &[String] {
        match kind {
            RelationKind::Parent => &self.parent_ids,
            RelationKind::Spouse => &self.spouse_ids,
            RelationKind::Child => &self.children_ids,
        }
    }

    pub fn lists_spouse(&self, id: &str) -> bool {
        self.spouse_ids.iter().any(|s| s == id)
    }

    pub fn lists_parent(&self, id: &str) -> bool {
        self.parent_ids.iter().any(|p| p == id)
    }
}

/// Kind of a directed relation as recorded on the `from` person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Parent,
    Spouse,
    Child,
}

impl RelationKind {
    pub const ALL: [RelationKind; 3] = [RelationKind::Parent, RelationKind::Spouse, RelationKind::Child];
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Parent => write!(f, "parent"),
            RelationKind::Spouse => write!(f, "spouse"),
            RelationKind::Child => write!(f, "child"),
        }
    }
}

/// A relation recorded on `from`: `to` is `from`'s parent, spouse or child
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
}

impl Relation {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let json = r#"{"id":"a","name":"Ada","parentIds":["p"],"birthDate":"1815-12-10"}"#;
        let person: Person = serde_json::from_str(json).unwrap();
        assert_eq!(person.parent_ids, vec!["p"]);
        assert_eq!(person.birth_date.as_deref(), Some("1815-12-10"));
        assert!(person.spouse_ids.is_empty());
        assert_eq!(person.gender, Gender::Other);
    }

    #[test]
    fn test_unknown_gender_is_other() {
        let person: Person = serde_json::from_str(r#"{"id":"a","name":"A","gender":"nonbinary"}"#).unwrap();
        assert_eq!(person.gender, Gender::Other);
        let person: Person = serde_json::from_str(r#"{"id":"b","name":"B","gender":"Female"}"#).unwrap();
        assert_eq!(person.gender, Gender::Female);
    }

    #[test]
    fn test_builder_and_related() {
        let p = Person::new("c", "Child").with_parents(&["a", "b"]).with_spouses(&["d"]);
        assert_eq!(p.related(RelationKind::Parent).len(), 2);
        assert!(p.lists_spouse("d"));
        assert!(p.lists_parent("b"));
        assert!(!p.lists_parent("d"));
    }
}
