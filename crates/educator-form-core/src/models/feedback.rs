//! Declarative UI feedback: field validity, focus and transient notifications.

use serde::{Deserialize, Serialize};

/// CSS class of an inline field error.
pub const ERROR_MESSAGE_CLASS: &str = "error-message";
/// CSS class of a transient notification.
pub const FORM_MESSAGE_CLASS: &str = "form-message";

/// Border colour of an invalid field.
pub const INVALID_COLOR: &str = "#e74c3c";
/// Border colour of a valid field.
pub const VALID_COLOR: &str = "#27ae60";

/// Validation decoration of a single field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FieldValidity {
    /// Never validated (or cleared by reset)
    #[default]
    Unmarked,
    /// Passed the last pass that looked at it
    Valid,
    /// Failed; carries the one inline error message
    Invalid { message: String },
}

impl FieldValidity {
    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldValidity::Invalid { .. })
    }

    /// Inline error message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            FieldValidity::Invalid { message } => Some(message),
            _ => None,
        }
    }

    /// Border colour to render, if decorated.
    pub fn border_color(&self) -> Option<&'static str> {
        match self {
            FieldValidity::Unmarked => None,
            FieldValidity::Valid => Some(VALID_COLOR),
            FieldValidity::Invalid { .. } => Some(INVALID_COLOR),
        }
    }
}

/// A (field id, message) pair for an invalid field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationError {
    pub field_id: String,
    pub message: String,
}

/// Request to focus a field and scroll it into view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FocusRequest {
    pub field_id: String,
    pub scroll: ScrollBehavior,
}

impl FocusRequest {
    /// Focus `field_id` with a smooth, vertically centered scroll.
    pub fn centered(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            scroll: ScrollBehavior {
                smooth: true,
                block: ScrollBlock::Center,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrollBehavior {
    pub smooth: bool,
    pub block: ScrollBlock,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

/// Notification kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// Fixed colour scheme of a notification kind.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

impl NotificationKind {
    pub fn palette(&self) -> Palette {
        match self {
            NotificationKind::Success => Palette {
                background: "#d4edda",
                text: "#155724",
                border: "#c3e6cb",
            },
            NotificationKind::Error => Palette {
                background: "#f8d7da",
                text: "#721c24",
                border: "#f5c6cb",
            },
            NotificationKind::Info => Palette {
                background: "#d1ecf1",
                text: "#0c5460",
                border: "#bee5eb",
            },
        }
    }

    /// CSS class list, e.g. `form-message success`.
    pub fn css_class(&self) -> String {
        let name = match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        };
        format!("{} {}", FORM_MESSAGE_CLASS, name)
    }
}

/// Identifies one displayed notification, so a stale dismiss cannot remove a newer one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

/// A visible transient notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    /// Clock time (ms) at which it dismisses itself
    pub expires_at: i64,
}
