//! Field models.

use serde::{Deserialize, Serialize};

/// Input kind of a field, mirroring the HTML input `type` attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text (`type="text"`)
    Text,
    /// Email address (`type="email"`)
    Email,
    /// Phone number (`type="tel"`)
    Tel,
}

impl FieldKind {
    /// The HTML input type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Tel => "tel",
        }
    }
}

/// A named input field in the form document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    /// Unique field id (also used as the form `name`)
    pub id: String,
    /// Display label
    pub label: String,
    /// Input kind
    pub kind: FieldKind,
    /// Current value; empty by default
    pub value: String,
}

impl Field {
    /// Create an empty field.
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            value: String::new(),
        }
    }

    /// The form `name` attribute. Always equal to the id.
    pub fn name(&self) -> &str {
        &self.id
    }

    /// Value with leading/trailing whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    /// Ephemeral record of this field for validation and persistence.
    pub fn record(&self) -> FieldRecord<'_> {
        FieldRecord {
            field_id: &self.id,
            value: &self.value,
            kind: self.kind,
        }
    }
}

/// Borrowed (id, value, kind) triple derived from the document on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRecord<'a> {
    pub field_id: &'a str,
    pub value: &'a str,
    pub kind: FieldKind,
}
