//! Educator Form Core Library
//!
//! Headless controller for the educator data-entry form with repeatable
//! hospital and ZOLL contact groups.
//!
//! # Architecture
//!
//! ```text
//!   host events (input / submit / reset / add / remove / poll)
//!                          │
//!                ┌─────────▼──────────┐
//!                │   FormController   │── validation ──► FieldValidity + FocusRequest
//!                │                    │── debouncer  ──► autosave
//!                │  FormDocument      │── notices    ──► Notification (one at a time)
//!                └─────────┬──────────┘
//!                          │ JSON snapshot under one key
//!                ┌─────────▼──────────┐
//!                │   SnapshotStore    │  MemoryStore | SqliteStore
//!                └────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **Persistence is a convenience.** Store failures are logged and swallowed;
//! they never block a submit or surface to the user.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Field, ContactGroup, FormDocument, Snapshot, Notification)
//! - [`layout`]: The stock educator form
//! - [`validation`]: Required/email/phone validation passes
//! - [`store`]: Key-value snapshot stores (in-memory and SQLite)
//! - [`timer`]: Clocks and the autosave debouncer
//! - [`config`]: Controller settings
//! - [`controller`]: The form controller

pub mod config;
pub mod controller;
pub mod layout;
pub mod models;
pub mod store;
pub mod timer;
pub mod validation;

// Re-export commonly used types
pub use config::FormConfig;
pub use controller::{
    Answer, ConfirmPrompt, FormController, FormError, FormView, ResetOutcome, SubmitOutcome,
    TimerEvent,
};
pub use models::{
    ContactGroup, ContactKind, Field, FieldKind, FieldValidity, FormDocument, Notification,
    NotificationId, NotificationKind, Snapshot,
};
pub use store::{MemoryStore, SnapshotStore, SqliteStore};
pub use timer::{Clock, ManualClock, SystemClock};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

type SharedController = FormController<Box<dyn SnapshotStore + Send>, SystemClock>;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum EducatorFormError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<store::StoreError> for EducatorFormError {
    fn from(e: store::StoreError) -> Self {
        EducatorFormError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for EducatorFormError {
    fn from(e: serde_json::Error) -> Self {
        EducatorFormError::SerializationError(e.to_string())
    }
}

impl From<config::ConfigError> for EducatorFormError {
    fn from(e: config::ConfigError) -> Self {
        EducatorFormError::InvalidInput(e.to_string())
    }
}

impl From<FormError> for EducatorFormError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::UnknownField(_) => EducatorFormError::NotFound(e.to_string()),
            _ => EducatorFormError::InvalidInput(e.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for EducatorFormError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        EducatorFormError::Internal(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

fn start_shared(
    config: FormConfig,
    store: Box<dyn SnapshotStore + Send>,
) -> Result<Arc<EducatorFormCore>, EducatorFormError> {
    let controller = FormController::start(config, layout::educator_form(), store, SystemClock)?;
    Ok(Arc::new(EducatorFormCore {
        controller: Arc::new(Mutex::new(controller)),
    }))
}

/// Open the educator form backed by a SQLite store at the given path.
#[uniffi::export]
pub fn open_form(path: String) -> Result<Arc<EducatorFormCore>, EducatorFormError> {
    let store = SqliteStore::open(&path)?;
    start_shared(FormConfig::default(), Box::new(store))
}

/// Open the educator form with a JSON config (omitted keys take defaults).
#[uniffi::export]
pub fn open_form_with_config(
    path: String,
    config_json: String,
) -> Result<Arc<EducatorFormCore>, EducatorFormError> {
    let config = FormConfig::from_json_str(&config_json)?;
    let store = SqliteStore::open(&path)?;
    start_shared(config, Box::new(store))
}

/// Open the educator form with an in-memory store (for testing).
#[uniffi::export]
pub fn open_form_in_memory() -> Result<Arc<EducatorFormCore>, EducatorFormError> {
    start_shared(FormConfig::default(), Box::new(MemoryStore::new()))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe controller wrapper for FFI.
#[derive(uniffi::Object)]
pub struct EducatorFormCore {
    controller: Arc<Mutex<SharedController>>,
}

#[uniffi::export]
impl EducatorFormCore {
    // =========================================================================
    // Field Events
    // =========================================================================

    /// Record a user edit and restart the autosave timer.
    pub fn input(&self, field_id: String, value: String) -> Result<(), EducatorFormError> {
        let mut controller = self.controller.lock()?;
        controller.input(&field_id, value)?;
        Ok(())
    }

    /// Current value of a field.
    pub fn field_value(&self, field_id: String) -> Result<Option<String>, EducatorFormError> {
        let controller = self.controller.lock()?;
        Ok(controller.field_value(&field_id).map(str::to_string))
    }

    /// Validate and save.
    pub fn submit(&self) -> Result<FfiSubmitResult, EducatorFormError> {
        let mut controller = self.controller.lock()?;
        let outcome = controller.submit();
        let focus_field = controller.focus().map(|f| f.field_id.clone());
        Ok(match outcome {
            SubmitOutcome::Saved(_) => FfiSubmitResult {
                saved: true,
                errors: Vec::new(),
                focus_field: None,
            },
            SubmitOutcome::Invalid(report) => FfiSubmitResult {
                saved: false,
                errors: report.errors().into_iter().map(|e| e.into()).collect(),
                focus_field,
            },
        })
    }

    /// Reset after the host asked the user. Returns true if the form was cleared.
    pub fn reset(&self, confirmed: bool) -> Result<bool, EducatorFormError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.reset(&mut Answer(confirmed)) == ResetOutcome::Cleared)
    }

    // =========================================================================
    // Contact Operations
    // =========================================================================

    /// Add a contact group; returns its number.
    pub fn add_contact(&self, kind: FfiContactKind) -> Result<u32, EducatorFormError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.add_contact(kind.into())?)
    }

    /// Remove a contact group; returns false if it was already gone.
    pub fn remove_contact(&self, kind: FfiContactKind, id: u32) -> Result<bool, EducatorFormError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.remove_contact(kind.into(), id))
    }

    // =========================================================================
    // Notifications & Timers
    // =========================================================================

    /// Show a transient notification; returns its id.
    pub fn show_message(
        &self,
        message: String,
        kind: FfiNotificationKind,
    ) -> Result<u64, EducatorFormError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.show_message(message, kind.into()).0)
    }

    /// Dismiss a notification if it is still visible.
    pub fn dismiss_message(&self, id: u64) -> Result<bool, EducatorFormError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.dismiss_message(NotificationId(id)))
    }

    /// Fire due timers.
    pub fn poll_timers(&self) -> Result<FfiTimerResult, EducatorFormError> {
        let mut controller = self.controller.lock()?;
        let mut result = FfiTimerResult {
            autosaved: false,
            expired_notification: None,
        };
        for event in controller.poll_timers() {
            match event {
                TimerEvent::Autosaved { persisted } => result.autosaved = persisted,
                TimerEvent::NotificationExpired(id) => result.expired_notification = Some(id.0),
            }
        }
        Ok(result)
    }

    /// Milliseconds timestamp of the next pending timer.
    pub fn next_deadline(&self) -> Result<Option<i64>, EducatorFormError> {
        let controller = self.controller.lock()?;
        Ok(controller.next_deadline())
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Full UI state as JSON.
    pub fn view_json(&self) -> Result<String, EducatorFormError> {
        let controller = self.controller.lock()?;
        Ok(serde_json::to_string(&controller.view())?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe contact kind.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiContactKind {
    Hospital,
    Zoll,
}

impl From<FfiContactKind> for ContactKind {
    fn from(kind: FfiContactKind) -> Self {
        match kind {
            FfiContactKind::Hospital => ContactKind::Hospital,
            FfiContactKind::Zoll => ContactKind::Zoll,
        }
    }
}

/// FFI-safe notification kind.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiNotificationKind {
    Success,
    Error,
    Info,
}

impl From<FfiNotificationKind> for NotificationKind {
    fn from(kind: FfiNotificationKind) -> Self {
        match kind {
            FfiNotificationKind::Success => NotificationKind::Success,
            FfiNotificationKind::Error => NotificationKind::Error,
            FfiNotificationKind::Info => NotificationKind::Info,
        }
    }
}

/// FFI-safe validation error.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiValidationError {
    pub field_id: String,
    pub message: String,
}

impl From<models::ValidationError> for FfiValidationError {
    fn from(e: models::ValidationError) -> Self {
        Self {
            field_id: e.field_id,
            message: e.message,
        }
    }
}

/// FFI-safe submit result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSubmitResult {
    pub saved: bool,
    pub errors: Vec<FfiValidationError>,
    pub focus_field: Option<String>,
}

/// FFI-safe timer poll result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTimerResult {
    pub autosaved: bool,
    pub expired_notification: Option<u64>,
}
