//! The stock educator form.

use crate::models::{ContactKind, Field, FieldKind, FormDocument};

/// Fields that identify the facility and its primary hospital contact.
pub const REQUIRED_FIELDS: &[&str] = &[
    "facilityAddress",
    "facilityPhone",
    "hospitalName",
    "hospitalEmail",
    "hospitalPhone",
];

/// Build the educator form with its static fields and contact anchors.
///
/// The hospital section starts with one unnumbered contact; the ZOLL section
/// starts with contacts 1 and 2. Counters in the default config are seeded
/// to match.
pub fn educator_form() -> FormDocument {
    let mut doc = FormDocument::new()
        // Facility
        .with_field(Field::new("facilityName", "Facility Name", FieldKind::Text))
        .with_field(Field::new("facilityAddress", "Address", FieldKind::Text))
        .with_field(Field::new("facilityPhone", "Main Phone #", FieldKind::Tel))
        // Hospital contact
        .with_field(Field::new("hospitalName", "NAME", FieldKind::Text))
        .with_field(Field::new("hospitalTitle", "Title/Department", FieldKind::Text))
        .with_field(Field::new("hospitalEmail", "EMAIL", FieldKind::Email))
        .with_field(Field::new("hospitalPhone", "PHONE #", FieldKind::Tel))
        .with_anchor(ContactKind::Hospital);

    // ZOLL contacts
    for n in 1..=2 {
        for slot in ContactKind::Zoll.slots() {
            doc = doc.with_field(Field::new(
                ContactKind::Zoll.field_id(*slot, n),
                slot.label(),
                slot.kind(),
            ));
        }
    }

    doc.with_anchor(ContactKind::Zoll)
        // Educator / training
        .with_field(Field::new("educatorName", "Educator Name", FieldKind::Text))
        .with_field(Field::new("educatorEmail", "Educator Email", FieldKind::Email))
        .with_field(Field::new("educatorPhone", "Educator Phone #", FieldKind::Tel))
        .with_field(Field::new("trainingDate", "Training Date", FieldKind::Text))
        .with_field(Field::new("trainingLocation", "Training Location", FieldKind::Text))
        .with_field(Field::new("notes", "Notes", FieldKind::Text))
}
