//! Form validation.
//!
//! Three passes over the document, always in this order:
//!
//! 1. required fields (configured id list): trimmed value must be non-empty
//! 2. every `email` field with a non-empty trimmed value: address pattern
//! 3. every `tel` field with a non-empty trimmed value: phone characters only
//!
//! Passes write marks into one ordered list; a later mark on the same field
//! overrides an earlier one when applied. Empty optional email/tel fields are
//! not marked at all.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{FieldKind, FieldValidity, FormDocument, ValidationError};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s()+.\-]+$").expect("phone pattern compiles"));

/// Check an already-trimmed email value.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Check an already-trimmed phone value.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

/// Which pass produced a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Required,
    Email,
    Phone,
}

/// One decoration produced by a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    pub field_id: String,
    pub pass: Pass,
    pub validity: FieldValidity,
}

/// Outcome of a full validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Marks in application order
    pub marks: Vec<Mark>,
    /// First field that became invalid (pass order, then document order)
    pub first_invalid: Option<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.first_invalid.is_none()
    }

    /// Final validity of each marked field after later passes override earlier ones.
    pub fn final_marks(&self) -> Vec<(&str, &FieldValidity)> {
        let mut out: Vec<(&str, &FieldValidity)> = Vec::new();
        for mark in &self.marks {
            match out.iter_mut().find(|(id, _)| *id == mark.field_id) {
                Some(slot) => slot.1 = &mark.validity,
                None => out.push((mark.field_id.as_str(), &mark.validity)),
            }
        }
        out
    }

    /// Fields still invalid after all passes, one error per field.
    pub fn errors(&self) -> Vec<ValidationError> {
        self.final_marks()
            .into_iter()
            .filter_map(|(field_id, validity)| {
                validity.message().map(|message| ValidationError {
                    field_id: field_id.to_string(),
                    message: message.to_string(),
                })
            })
            .collect()
    }

    fn push(&mut self, field_id: &str, pass: Pass, validity: FieldValidity) {
        if validity.is_invalid() && self.first_invalid.is_none() {
            self.first_invalid = Some(field_id.to_string());
        }
        self.marks.push(Mark {
            field_id: field_id.to_string(),
            pass,
            validity,
        });
    }
}

fn invalid(message: &str) -> FieldValidity {
    FieldValidity::Invalid {
        message: message.to_string(),
    }
}

/// Validate `document` against the `required` id list. Pure; nothing is mutated.
///
/// Required ids missing from the document are skipped.
pub fn validate_document<S: AsRef<str>>(document: &FormDocument, required: &[S]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for field_id in required {
        let field_id = field_id.as_ref();
        let Some(field) = document.field(field_id) else {
            log::debug!("required field '{}' not in document", field_id);
            continue;
        };
        let validity = if field.trimmed().is_empty() {
            invalid(REQUIRED_MESSAGE)
        } else {
            FieldValidity::Valid
        };
        report.push(field_id, Pass::Required, validity);
    }

    format_pass(document, &mut report, FieldKind::Email, Pass::Email, is_valid_email, EMAIL_MESSAGE);
    format_pass(document, &mut report, FieldKind::Tel, Pass::Phone, is_valid_phone, PHONE_MESSAGE);

    report
}

fn format_pass(
    document: &FormDocument,
    report: &mut ValidationReport,
    kind: FieldKind,
    pass: Pass,
    check: fn(&str) -> bool,
    message: &str,
) {
    for record in document.fields().map(|f| f.record()).filter(|r| r.kind == kind) {
        let value = record.value.trim();
        if value.is_empty() {
            continue;
        }
        let validity = if check(value) {
            FieldValidity::Valid
        } else {
            invalid(message)
        };
        report.push(record.field_id, pass, validity);
    }
}
