//! Form controller.
//!
//! Owns submit/reset handling, validation decoration, transient
//! notifications, debounced autosave, dynamic contact groups and the
//! restore-on-start step. Every method is a synchronous event handler; timers
//! only advance when the host calls [`FormController::poll_timers`].

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, FormConfig};
use crate::models::{
    ContactCounters, ContactGroup, ContactKind, FieldKind, FieldValidity, FocusRequest,
    FormDocument, Notification, NotificationId, NotificationKind, Snapshot,
};
use crate::store::SnapshotStore;
use crate::timer::{Clock, Debouncer, SystemClock};
use crate::validation::{validate_document, ValidationReport};

pub const SAVED_MESSAGE: &str = "Form saved successfully!";
pub const RESET_MESSAGE: &str = "Form reset successfully.";
pub const RESET_PROMPT: &str = "Are you sure you want to reset the form? All data will be lost.";

static UNMARKED: FieldValidity = FieldValidity::Unmarked;

/// Controller errors.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Required field missing from document: {0}")]
    MissingField(String),

    #[error("No add-contact anchor for {0:?} contacts")]
    MissingAnchor(ContactKind),

    #[error("Duplicate field id: {0}")]
    DuplicateField(String),

    #[error("No {0:?} contact ids left")]
    ContactIdsExhausted(ContactKind),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type FormResult<T> = Result<T, FormError>;

/// Synchronous yes/no question asked before a reset.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Prompt with a fixed answer, for hosts that asked the user themselves.
#[derive(Debug, Clone, Copy)]
pub struct Answer(pub bool);

impl ConfirmPrompt for Answer {
    fn confirm(&mut self, _message: &str) -> bool {
        self.0
    }
}

/// Result of a submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Valid; this snapshot was handed to the store
    Saved(Snapshot),
    /// Invalid; nothing was persisted
    Invalid(ValidationReport),
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

/// Result of a reset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Prompt declined; nothing changed
    Cancelled,
    /// Values cleared and stored snapshot deleted
    Cleared,
}

/// Something a timer did during [`FormController::poll_timers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The autosave debounce fired
    Autosaved { persisted: bool },
    /// A notification reached its lifetime and was removed
    NotificationExpired(NotificationId),
}

/// Render-ready state of one field.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
    pub validity: FieldValidity,
    /// Owning dynamic contact group, if any
    pub contact: Option<(ContactKind, u32)>,
}

/// Render-ready state of a dynamic contact group.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactView {
    pub kind: ContactKind,
    pub id: u32,
    pub field_ids: Vec<String>,
}

/// Everything a rendering layer needs, in document order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub contacts: Vec<ContactView>,
    pub notification: Option<Notification>,
    pub focus: Option<FocusRequest>,
}

/// The form controller. Construct once per page session.
pub struct FormController<S, C = SystemClock> {
    config: FormConfig,
    document: FormDocument,
    store: S,
    clock: C,
    counters: ContactCounters,
    autosave: Debouncer,
    validity: HashMap<String, FieldValidity>,
    focus: Option<FocusRequest>,
    notification: Option<Notification>,
    next_notification: u64,
}

impl<S: SnapshotStore, C: Clock> FormController<S, C> {
    /// Check the document against the config, then restore any saved snapshot.
    pub fn start(config: FormConfig, document: FormDocument, store: S, clock: C) -> FormResult<Self> {
        config.validate()?;

        if let Some(id) = document.duplicate_field_id() {
            return Err(FormError::DuplicateField(id.to_string()));
        }
        if let Some(id) = config
            .required_fields
            .iter()
            .find(|id| !document.contains_field(id))
        {
            return Err(FormError::MissingField(id.clone()));
        }
        for kind in [ContactKind::Hospital, ContactKind::Zoll] {
            if !document.has_anchor(kind) {
                return Err(FormError::MissingAnchor(kind));
            }
        }

        let mut controller = Self {
            counters: ContactCounters::new(config.hospital_contact_seed, config.zoll_contact_seed),
            autosave: Debouncer::new(config.autosave_delay_ms),
            config,
            document,
            store,
            clock,
            validity: HashMap::new(),
            focus: None,
            notification: None,
            next_notification: 1,
        };
        let restored = controller.restore();
        log::debug!("form controller started, {} field(s) restored", restored);
        Ok(controller)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Apply the stored snapshot to matching fields. Returns how many were set.
    ///
    /// Keys without a matching field are skipped; fields without a key keep
    /// their value. A missing, unreadable or malformed blob changes nothing.
    pub fn restore(&mut self) -> usize {
        let Some(snapshot) = self.stored_snapshot() else {
            return 0;
        };

        let mut applied = 0;
        for (field_id, value) in snapshot.iter() {
            match self.document.field_mut(field_id) {
                Some(field) => {
                    field.value = value.to_string();
                    applied += 1;
                }
                None => log::debug!("skipping saved value for unknown field '{}'", field_id),
            }
        }
        applied
    }

    /// Read and parse the stored snapshot, swallowing failures.
    pub fn stored_snapshot(&self) -> Option<Snapshot> {
        let blob = match self.store.get(&self.config.storage_key) {
            Ok(blob) => blob?,
            Err(e) => {
                log::warn!("Could not load saved form data: {}", e);
                return None;
            }
        };
        match Snapshot::from_json(&blob) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("Could not load saved form data: {}", e);
                None
            }
        }
    }

    /// Current id → value pairs of every field, static and dynamic.
    pub fn collect_snapshot(&self) -> Snapshot {
        self.document
            .fields()
            .map(|f| (f.id.as_str(), f.value.as_str()))
            .collect()
    }

    fn persist(&mut self, snapshot: &Snapshot) -> bool {
        let result = snapshot
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|blob| {
                self.store
                    .set(&self.config.storage_key, &blob)
                    .map_err(|e| e.to_string())
            });
        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not save form data: {}", e);
                false
            }
        }
    }

    fn clear_stored(&mut self) {
        if let Err(e) = self.store.remove(&self.config.storage_key) {
            log::warn!("Could not clear saved form data: {}", e);
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// User edited `field_id`. Sets the value and restarts the autosave timer.
    pub fn input(&mut self, field_id: &str, value: impl Into<String>) -> FormResult<()> {
        let field = self
            .document
            .field_mut(field_id)
            .ok_or_else(|| FormError::UnknownField(field_id.to_string()))?;
        field.value = value.into();
        self.notify_input();
        Ok(())
    }

    /// An input event fired somewhere in the form.
    pub fn notify_input(&mut self) {
        self.autosave.trigger(self.clock.now_ms());
    }

    /// Validate and, if valid, save and confirm with a success notification.
    pub fn submit(&mut self) -> SubmitOutcome {
        let report = self.validate();
        if !report.is_valid() {
            log::debug!("submit rejected: {} invalid field(s)", report.errors().len());
            return SubmitOutcome::Invalid(report);
        }

        let snapshot = self.collect_snapshot();
        log::debug!("form data: {:?}", snapshot);
        self.show_message(SAVED_MESSAGE, NotificationKind::Success);
        self.persist(&snapshot);
        SubmitOutcome::Saved(snapshot)
    }

    /// Run all validation passes and apply their decorations.
    ///
    /// On failure the first invalid field gets a centered focus request; a
    /// passing run withdraws any earlier request.
    pub fn validate(&mut self) -> ValidationReport {
        let report = validate_document(&self.document, &self.config.required_fields);
        for mark in &report.marks {
            self.validity
                .insert(mark.field_id.clone(), mark.validity.clone());
        }
        self.focus = report.first_invalid.clone().map(FocusRequest::centered);
        report
    }

    /// Ask `prompt`; if confirmed clear every value and the stored snapshot.
    pub fn reset<P: ConfirmPrompt + ?Sized>(&mut self, prompt: &mut P) -> ResetOutcome {
        if !prompt.confirm(RESET_PROMPT) {
            return ResetOutcome::Cancelled;
        }

        self.document.clear_values();
        self.autosave.cancel();
        self.validity.clear();
        self.focus = None;
        self.clear_stored();
        self.show_message(RESET_MESSAGE, NotificationKind::Info);
        ResetOutcome::Cleared
    }

    // =========================================================================
    // Contact groups
    // =========================================================================

    /// Append a new empty contact group of `kind` and return its number.
    pub fn add_contact(&mut self, kind: ContactKind) -> FormResult<u32> {
        if !self.document.has_anchor(kind) {
            return Err(FormError::MissingAnchor(kind));
        }

        let id = self
            .counters
            .next(kind)
            .ok_or(FormError::ContactIdsExhausted(kind))?;
        let group = ContactGroup::build(kind, id);
        if let Some(taken) = group.fields.iter().find(|f| self.document.contains_field(&f.id)) {
            return Err(FormError::DuplicateField(taken.id.clone()));
        }
        self.document
            .insert_contact(group)
            .map_err(|g| FormError::MissingAnchor(g.kind))?;

        log::debug!("added {:?} contact {}", kind, id);
        Ok(id)
    }

    /// Remove contact group `id` of `kind`. Returns false if it does not exist.
    ///
    /// The counter is left alone, so the number is never issued again.
    pub fn remove_contact(&mut self, kind: ContactKind, id: u32) -> bool {
        let Some(group) = self.document.remove_contact(kind, id) else {
            return false;
        };

        for field in &group.fields {
            self.validity.remove(&field.id);
        }
        if self
            .focus
            .as_ref()
            .is_some_and(|focus| group.contains(&focus.field_id))
        {
            self.focus = None;
        }

        log::debug!("removed {:?} contact {}", kind, id);
        true
    }

    // =========================================================================
    // Notifications & timers
    // =========================================================================

    /// Show `message`, replacing any visible notification.
    pub fn show_message(&mut self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let id = NotificationId(self.next_notification);
        self.next_notification += 1;

        let ttl = i64::try_from(self.config.notification_ttl_ms).unwrap_or(i64::MAX);
        self.notification = Some(Notification {
            id,
            kind,
            message: message.into(),
            expires_at: self.clock.now_ms().saturating_add(ttl),
        });
        id
    }

    /// Remove notification `id` if it is still the visible one.
    pub fn dismiss_message(&mut self, id: NotificationId) -> bool {
        if self.notification.as_ref().is_some_and(|n| n.id == id) {
            self.notification = None;
            return true;
        }
        false
    }

    /// Fire every timer whose deadline has passed.
    pub fn poll_timers(&mut self) -> Vec<TimerEvent> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();

        if self.autosave.fire_if_due(now) {
            let snapshot = self.collect_snapshot();
            let persisted = self.persist(&snapshot);
            log::debug!("autosaved {} field(s)", snapshot.len());
            events.push(TimerEvent::Autosaved { persisted });
        }

        if let Some(expired) = self
            .notification
            .as_ref()
            .filter(|n| now >= n.expires_at)
            .map(|n| n.id)
        {
            self.notification = None;
            events.push(TimerEvent::NotificationExpired(expired));
        }

        events
    }

    /// Earliest pending timer deadline, for hosts that schedule one wake-up.
    pub fn next_deadline(&self) -> Option<i64> {
        let notification = self.notification.as_ref().map(|n| n.expires_at);
        match (self.autosave.deadline(), notification) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    // =========================================================================
    // Observation
    // =========================================================================

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn counters(&self) -> &ContactCounters {
        &self.counters
    }

    pub fn field_value(&self, field_id: &str) -> Option<&str> {
        self.document.field(field_id).map(|f| f.value.as_str())
    }

    /// Decoration of `field_id`; unknown or never-validated fields are unmarked.
    pub fn validity(&self, field_id: &str) -> &FieldValidity {
        self.validity.get(field_id).unwrap_or(&UNMARKED)
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn focus(&self) -> Option<&FocusRequest> {
        self.focus.as_ref()
    }

    /// Hand the pending focus request to the host.
    pub fn take_focus(&mut self) -> Option<FocusRequest> {
        self.focus.take()
    }

    /// Snapshot of the whole UI state.
    pub fn view(&self) -> FormView {
        let owner = |field_id: &str| {
            self.document
                .contacts()
                .find(|g| g.contains(field_id))
                .map(|g| (g.kind, g.id))
        };

        let fields = self
            .document
            .fields()
            .map(|f| FieldView {
                id: f.id.clone(),
                label: f.label.clone(),
                kind: f.kind,
                value: f.value.clone(),
                validity: self.validity(&f.id).clone(),
                contact: owner(&f.id),
            })
            .collect();

        let contacts = self
            .document
            .contacts()
            .map(|g| ContactView {
                kind: g.kind,
                id: g.id,
                field_ids: g.fields.iter().map(|f| f.id.clone()).collect(),
            })
            .collect();

        FormView {
            fields,
            contacts,
            notification: self.notification.clone(),
            focus: self.focus.clone(),
        }
    }
}
