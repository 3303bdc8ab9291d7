//! Headless form document: the ordered tree the controller reads and writes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::contact::{ContactGroup, ContactKind};
use super::field::Field;

/// One node of the form document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// A static field
    Field(Field),
    /// A dynamically added contact group
    Contact(ContactGroup),
    /// The "add contact" container; new groups of this kind go right before it
    Anchor { kind: ContactKind },
}

/// The form, as an ordered list of nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormDocument {
    nodes: Vec<Node>,
}

impl FormDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a static field (builder style).
    pub fn with_field(mut self, field: Field) -> Self {
        self.nodes.push(Node::Field(field));
        self
    }

    /// Append an anchor for `kind` (builder style).
    pub fn with_anchor(mut self, kind: ContactKind) -> Self {
        self.nodes.push(Node::Anchor { kind });
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All fields in document order, including those inside contact groups.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.nodes.iter().flat_map(|node| match node {
            Node::Field(field) => std::slice::from_ref(field),
            Node::Contact(group) => group.fields.as_slice(),
            Node::Anchor { .. } => Default::default(),
        })
    }

    fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.nodes.iter_mut().flat_map(|node| match node {
            Node::Field(field) => std::slice::from_mut(field),
            Node::Contact(group) => group.fields.as_mut_slice(),
            Node::Anchor { .. } => Default::default(),
        })
    }

    /// Look up a field by id.
    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields().find(|f| f.id == field_id)
    }

    /// Look up a field by id for writing.
    pub fn field_mut(&mut self, field_id: &str) -> Option<&mut Field> {
        self.fields_mut().find(|f| f.id == field_id)
    }

    pub fn contains_field(&self, field_id: &str) -> bool {
        self.field(field_id).is_some()
    }

    /// Reset every field value to empty. Structure is kept.
    pub fn clear_values(&mut self) {
        for field in self.fields_mut() {
            field.value.clear();
        }
    }

    pub fn has_anchor(&self, kind: ContactKind) -> bool {
        self.anchor_index(kind).is_some()
    }

    fn anchor_index(&self, kind: ContactKind) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| matches!(node, Node::Anchor { kind: k } if *k == kind))
    }

    /// Insert `group` immediately before its kind's anchor.
    ///
    /// Returns the group back if there is no anchor for its kind.
    pub fn insert_contact(&mut self, group: ContactGroup) -> Result<(), ContactGroup> {
        match self.anchor_index(group.kind) {
            Some(index) => {
                self.nodes.insert(index, Node::Contact(group));
                Ok(())
            }
            None => Err(group),
        }
    }

    /// Remove the contact group of `kind` numbered `id`.
    pub fn remove_contact(&mut self, kind: ContactKind, id: u32) -> Option<ContactGroup> {
        let index = self.nodes.iter().position(
            |node| matches!(node, Node::Contact(g) if g.kind == kind && g.id == id),
        )?;
        match self.nodes.remove(index) {
            Node::Contact(group) => Some(group),
            _ => None,
        }
    }

    /// Dynamic contact groups in document order.
    pub fn contacts(&self) -> impl Iterator<Item = &ContactGroup> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Contact(group) => Some(group),
            _ => None,
        })
    }

    /// First field id that appears more than once, if any.
    pub fn duplicate_field_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.fields()
            .map(|f| f.id.as_str())
            .find(|id| !seen.insert(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldKind;

    fn small_doc() -> FormDocument {
        FormDocument::new()
            .with_field(Field::new("hospitalName", "NAME", FieldKind::Text))
            .with_anchor(ContactKind::Hospital)
            .with_field(Field::new("notes", "Notes", FieldKind::Text))
            .with_anchor(ContactKind::Zoll)
    }

    #[test]
    fn test_insert_before_anchor() {
        let mut doc = small_doc();
        doc.insert_contact(ContactGroup::build(ContactKind::Hospital, 2))
            .unwrap();
        doc.insert_contact(ContactGroup::build(ContactKind::Hospital, 3))
            .unwrap();

        assert!(matches!(&doc.nodes()[1], Node::Contact(g) if g.id == 2));
        assert!(matches!(&doc.nodes()[2], Node::Contact(g) if g.id == 3));
        assert!(matches!(
            &doc.nodes()[3],
            Node::Anchor {
                kind: ContactKind::Hospital
            }
        ));
    }

    #[test]
    fn test_insert_without_anchor_fails() {
        let mut doc = FormDocument::new().with_anchor(ContactKind::Zoll);
        let group = ContactGroup::build(ContactKind::Hospital, 2);
        assert!(doc.insert_contact(group).is_err());
    }

    #[test]
    fn test_fields_flatten_groups_in_order() {
        let mut doc = small_doc();
        doc.insert_contact(ContactGroup::build(ContactKind::Hospital, 2))
            .unwrap();
        let ids: Vec<&str> = doc.fields().map(|f| f.id.as_str()).collect();
        assert_eq!(ids[0], "hospitalName");
        assert_eq!(ids[1], "hospitalName2");
        assert_eq!(ids.last(), Some(&"notes"));
    }

    #[test]
    fn test_remove_matches_kind_and_id() {
        let mut doc = small_doc();
        doc.insert_contact(ContactGroup::build(ContactKind::Hospital, 3))
            .unwrap();
        doc.insert_contact(ContactGroup::build(ContactKind::Zoll, 3))
            .unwrap();

        let removed = doc.remove_contact(ContactKind::Zoll, 3).unwrap();
        assert_eq!(removed.kind, ContactKind::Zoll);
        assert!(doc.contains_field("hospitalName3"));
        assert!(!doc.contains_field("zollName3"));
        assert!(doc.remove_contact(ContactKind::Zoll, 3).is_none());
    }

    #[test]
    fn test_clear_values_keeps_structure() {
        let mut doc = small_doc();
        doc.insert_contact(ContactGroup::build(ContactKind::Hospital, 2))
            .unwrap();
        doc.field_mut("hospitalName2").unwrap().value = "Ann".into();
        doc.field_mut("notes").unwrap().value = "x".into();

        doc.clear_values();

        assert!(doc.fields().all(|f| f.value.is_empty()));
        assert_eq!(doc.contacts().count(), 1);
    }

    #[test]
    fn test_duplicate_field_id() {
        let doc = small_doc().with_field(Field::new("notes", "Again", FieldKind::Text));
        assert_eq!(doc.duplicate_field_id(), Some("notes"));
        assert_eq!(small_doc().duplicate_field_id(), None);
    }
}
