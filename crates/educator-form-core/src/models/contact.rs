//! Repeatable contact groups.

use serde::{Deserialize, Serialize};

use super::field::{Field, FieldKind};

/// CSS class carried by every dynamically added contact group.
pub const DYNAMIC_CONTACT_CLASS: &str = "dynamic-contact";
/// Attribute holding the numeric contact id.
pub const CONTACT_ID_ATTR: &str = "data-contact-id";

/// The two independent contact group kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    /// Hospital contact: name, title, email, phone
    Hospital,
    /// ZOLL contact: title, name, email, phone
    Zoll,
}

impl ContactKind {
    /// Field id prefix for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            ContactKind::Hospital => "hospital",
            ContactKind::Zoll => "zoll",
        }
    }

    /// Field slots in presentation order.
    pub fn slots(&self) -> &'static [ContactSlot] {
        match self {
            ContactKind::Hospital => &[
                ContactSlot::Name,
                ContactSlot::Title,
                ContactSlot::Email,
                ContactSlot::Phone,
            ],
            ContactKind::Zoll => &[
                ContactSlot::Title,
                ContactSlot::Name,
                ContactSlot::Email,
                ContactSlot::Phone,
            ],
        }
    }

    /// Id of the field in `slot` for contact number `id`, e.g. `hospitalEmail3`.
    pub fn field_id(&self, slot: ContactSlot, id: u32) -> String {
        format!("{}{}{}", self.prefix(), slot.suffix(), id)
    }
}

/// One field position inside a contact group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSlot {
    Name,
    Title,
    Email,
    Phone,
}

impl ContactSlot {
    fn suffix(&self) -> &'static str {
        match self {
            ContactSlot::Name => "Name",
            ContactSlot::Title => "Title",
            ContactSlot::Email => "Email",
            ContactSlot::Phone => "Phone",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ContactSlot::Name => "NAME",
            ContactSlot::Title => "Title/Department",
            ContactSlot::Email => "EMAIL",
            ContactSlot::Phone => "PHONE #",
        }
    }

    /// Input kind.
    pub fn kind(&self) -> FieldKind {
        match self {
            ContactSlot::Name | ContactSlot::Title => FieldKind::Text,
            ContactSlot::Email => FieldKind::Email,
            ContactSlot::Phone => FieldKind::Tel,
        }
    }
}

/// A dynamically added contact group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactGroup {
    pub kind: ContactKind,
    pub id: u32,
    pub fields: Vec<Field>,
}

impl ContactGroup {
    /// Build an empty group of `kind` numbered `id`.
    ///
    /// Every field id carries the numeric suffix, so two groups of the same
    /// kind never share a field id as long as their numbers differ.
    pub fn build(kind: ContactKind, id: u32) -> Self {
        let fields = kind
            .slots()
            .iter()
            .map(|slot| Field::new(kind.field_id(*slot, id), slot.label(), slot.kind()))
            .collect();

        Self { kind, id, fields }
    }

    /// Check if `field_id` belongs to this group.
    pub fn contains(&self, field_id: &str) -> bool {
        self.fields.iter().any(|f| f.id == field_id)
    }
}

/// Per-kind contact counters. Only ever incremented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCounters {
    hospital: u32,
    zoll: u32,
}

impl ContactCounters {
    /// Seed counters with the number of contacts already present.
    pub fn new(hospital: u32, zoll: u32) -> Self {
        Self { hospital, zoll }
    }

    /// Pre-increment the counter for `kind` and return the fresh id.
    ///
    /// Returns `None` once every `u32` id has been issued; the counter then
    /// stays at `u32::MAX`.
    pub fn next(&mut self, kind: ContactKind) -> Option<u32> {
        let counter = match kind {
            ContactKind::Hospital => &mut self.hospital,
            ContactKind::Zoll => &mut self.zoll,
        };
        *counter = counter.checked_add(1)?;
        Some(*counter)
    }

    /// Highest id issued (or seeded) for `kind`.
    pub fn current(&self, kind: ContactKind) -> u32 {
        match kind {
            ContactKind::Hospital => self.hospital,
            ContactKind::Zoll => self.zoll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_hospital_group() {
        let group = ContactGroup::build(ContactKind::Hospital, 2);
        let ids: Vec<&str> = group.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["hospitalName2", "hospitalTitle2", "hospitalEmail2", "hospitalPhone2"]
        );
        assert_eq!(group.fields[2].kind, FieldKind::Email);
        assert_eq!(group.fields[3].kind, FieldKind::Tel);
        assert!(group.fields.iter().all(|f| f.value.is_empty()));
    }

    #[test]
    fn test_build_zoll_group_title_first() {
        let group = ContactGroup::build(ContactKind::Zoll, 3);
        assert_eq!(group.fields[0].id, "zollTitle3");
        assert_eq!(group.fields[0].label, "Title/Department");
        assert_eq!(group.fields[1].id, "zollName3");
        assert!(group.contains("zollPhone3"));
        assert!(!group.contains("zollPhone2"));
    }

    #[test]
    fn test_counters_are_independent() {
        let mut counters = ContactCounters::new(1, 2);
        assert_eq!(counters.next(ContactKind::Hospital), Some(2));
        assert_eq!(counters.next(ContactKind::Zoll), Some(3));
        assert_eq!(counters.next(ContactKind::Hospital), Some(3));
        assert_eq!(counters.current(ContactKind::Zoll), 3);
    }

    #[test]
    fn test_counter_exhaustion() {
        let mut counters = ContactCounters::new(u32::MAX - 1, 2);
        assert_eq!(counters.next(ContactKind::Hospital), Some(u32::MAX));
        assert_eq!(counters.next(ContactKind::Hospital), None);
        assert_eq!(counters.next(ContactKind::Hospital), None);
        assert_eq!(counters.current(ContactKind::Hospital), u32::MAX);
        assert_eq!(counters.next(ContactKind::Zoll), Some(3));
    }
}
