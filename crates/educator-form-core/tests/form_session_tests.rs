//! End-to-end form session tests.

use educator_form_core::controller::{Answer, FormController, ResetOutcome};
use educator_form_core::layout::{educator_form, REQUIRED_FIELDS};
use educator_form_core::models::{ContactKind, FieldKind, FieldValidity, NotificationKind};
use educator_form_core::store::{MemoryStore, SnapshotStore, SqliteStore};
use educator_form_core::timer::ManualClock;
use educator_form_core::validation::{EMAIL_MESSAGE, PHONE_MESSAGE, REQUIRED_MESSAGE};
use educator_form_core::FormConfig;

use proptest::prelude::*;

fn start<S: SnapshotStore>(store: S) -> (FormController<S, ManualClock>, ManualClock) {
    let clock = ManualClock::new(1_000);
    let controller =
        FormController::start(FormConfig::default(), educator_form(), store, clock.clone())
            .unwrap();
    (controller, clock)
}

fn fill_required<S: SnapshotStore>(controller: &mut FormController<S, ManualClock>) {
    controller.input("facilityAddress", "1 Main St").unwrap();
    controller.input("facilityPhone", "555 0100").unwrap();
    controller.input("hospitalName", "Jane").unwrap();
    controller.input("hospitalEmail", "jane@hospital.org").unwrap();
    controller.input("hospitalPhone", "+1 (555) 123-4567").unwrap();
}

fn fields_of_kind<S: SnapshotStore>(
    controller: &FormController<S, ManualClock>,
    kind: FieldKind,
) -> Vec<String> {
    controller
        .document()
        .fields()
        .filter(|f| f.kind == kind)
        .map(|f| f.id.clone())
        .collect()
}

#[test]
fn test_every_email_field_checks_format() {
    let (mut controller, _) = start(MemoryStore::new());
    controller.add_contact(ContactKind::Hospital).unwrap();
    fill_required(&mut controller);

    for id in fields_of_kind(&controller, FieldKind::Email) {
        controller.input(&id, "a@b").unwrap();
        controller.submit();
        assert_eq!(controller.validity(&id).message(), Some(EMAIL_MESSAGE), "{}", id);

        controller.input(&id, "a@b.com").unwrap();
        controller.submit();
        assert_eq!(controller.validity(&id), &FieldValidity::Valid, "{}", id);
    }
}

#[test]
fn test_every_phone_field_checks_format() {
    let (mut controller, _) = start(MemoryStore::new());
    controller.add_contact(ContactKind::Zoll).unwrap();
    fill_required(&mut controller);

    for id in fields_of_kind(&controller, FieldKind::Tel) {
        controller.input(&id, "abc").unwrap();
        assert!(!controller.submit().is_saved());
        assert_eq!(controller.validity(&id).message(), Some(PHONE_MESSAGE), "{}", id);

        controller.input(&id, "(555) 123-4567").unwrap();
        assert!(controller.submit().is_saved(), "{}", id);
    }
}

#[test]
fn test_empty_optional_email_is_not_an_error() {
    let (mut controller, _) = start(MemoryStore::new());
    fill_required(&mut controller);

    assert!(controller.submit().is_saved());
    assert_eq!(controller.validity("zollEmail1"), &FieldValidity::Unmarked);
    assert_eq!(controller.validity("educatorEmail"), &FieldValidity::Unmarked);
}

#[test]
fn test_required_message_for_each_required_field() {
    let (mut controller, _) = start(MemoryStore::new());
    assert!(!controller.submit().is_saved());
    for id in REQUIRED_FIELDS {
        assert_eq!(controller.validity(id).message(), Some(REQUIRED_MESSAGE));
    }
}

#[test]
fn test_persist_then_reload_round_trip() {
    let mut store = MemoryStore::new();
    store
        .set("educatorFormData", r#"{"hospitalName":"Jane"}"#)
        .unwrap();

    let (controller, _) = start(store);

    assert_eq!(controller.field_value("hospitalName"), Some("Jane"));
    for field in controller.document().fields().filter(|f| f.id != "hospitalName") {
        assert_eq!(field.value, "", "{} should stay empty", field.id);
    }
}

#[test]
fn test_sqlite_session_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("educator.db");

    {
        let (mut controller, _) = start(SqliteStore::open(&path).unwrap());
        fill_required(&mut controller);
        controller.input("notes", "bring manikins").unwrap();
        assert!(controller.submit().is_saved());
    }

    let (controller, _) = start(SqliteStore::open(&path).unwrap());
    assert_eq!(controller.field_value("hospitalName"), Some("Jane"));
    assert_eq!(controller.field_value("notes"), Some("bring manikins"));
}

#[test]
fn test_autosave_survives_reload_without_submit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("educator.db");

    {
        let (mut controller, clock) = start(SqliteStore::open(&path).unwrap());
        controller.input("trainingLocation", "Room 4").unwrap();
        clock.advance(1_000);
        controller.poll_timers();
    }

    let (controller, _) = start(SqliteStore::open(&path).unwrap());
    assert_eq!(controller.field_value("trainingLocation"), Some("Room 4"));
}

#[test]
fn test_stale_dynamic_contact_values_are_skipped() {
    let (mut controller, clock) = start(MemoryStore::new());
    controller.add_contact(ContactKind::Hospital).unwrap();
    controller.input("hospitalName2", "Temp").unwrap();
    clock.advance(1_000);
    controller.poll_timers();

    // A fresh page only has the static fields.
    let store = controller.store().clone();
    let (reloaded, _) = start(store);

    assert!(reloaded.field_value("hospitalName2").is_none());
    assert!(!reloaded.collect_snapshot().contains("hospitalName2"));
    assert_eq!(reloaded.counters().current(ContactKind::Hospital), 1);
}

#[test]
fn test_notification_twice_leaves_one() {
    let (mut controller, _) = start(MemoryStore::new());
    controller.show_message("first", NotificationKind::Success);
    let second = controller.show_message("second", NotificationKind::Error);

    let view = controller.view();
    let notification = view.notification.unwrap();
    assert_eq!(notification.id, second);
    assert_eq!(notification.message, "second");
}

#[test]
fn test_contact_churn_never_reuses_ids() {
    let (mut controller, _) = start(MemoryStore::new());

    let first = controller.add_contact(ContactKind::Hospital).unwrap();
    assert_eq!(first, 2);
    controller.input("hospitalEmail2", "old@x.org").unwrap();
    assert!(controller.remove_contact(ContactKind::Hospital, first));
    let second = controller.add_contact(ContactKind::Hospital).unwrap();
    assert_eq!(second, 3);

    fill_required(&mut controller);
    let snapshot = match controller.submit() {
        educator_form_core::SubmitOutcome::Saved(snapshot) => snapshot,
        other => panic!("expected save, got {:?}", other),
    };
    for id in ["hospitalName2", "hospitalTitle2", "hospitalEmail2", "hospitalPhone2"] {
        assert!(!snapshot.contains(id), "{} should be gone", id);
    }
    assert!(snapshot.contains("hospitalName3"));
    assert_eq!(snapshot.get("hospitalEmail3"), Some(""));
}

#[test]
fn test_reset_confirmation_paths() {
    let (mut controller, _) = start(MemoryStore::new());
    fill_required(&mut controller);
    controller.submit();
    let saved = controller.stored_snapshot().unwrap();

    assert_eq!(controller.reset(&mut Answer(false)), ResetOutcome::Cancelled);
    assert_eq!(controller.field_value("facilityAddress"), Some("1 Main St"));
    assert_eq!(controller.stored_snapshot(), Some(saved));

    assert_eq!(controller.reset(&mut Answer(true)), ResetOutcome::Cleared);
    assert!(controller.document().fields().all(|f| f.value.is_empty()));
    assert!(controller.stored_snapshot().is_none());
}

#[test]
fn test_reset_does_not_resurrect_snapshot_via_autosave() {
    let (mut controller, clock) = start(MemoryStore::new());
    controller.input("notes", "draft").unwrap();
    controller.reset(&mut Answer(true));

    clock.advance(5_000);
    controller.poll_timers();
    assert!(controller.stored_snapshot().is_none());
}

#[derive(Debug, Clone)]
enum Op {
    Add(ContactKind),
    Remove(ContactKind, u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let kind = prop_oneof![Just(ContactKind::Hospital), Just(ContactKind::Zoll)];
    prop_oneof![
        kind.clone().prop_map(Op::Add),
        (kind, 1u32..12).prop_map(|(k, id)| Op::Remove(k, id)),
    ]
}

proptest! {
    #[test]
    fn prop_contact_ids_strictly_increase(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let (mut controller, _) = start(MemoryStore::new());
        let mut last_hospital = 1;
        let mut last_zoll = 2;

        for op in ops {
            match op {
                Op::Add(kind) => {
                    let id = controller.add_contact(kind).unwrap();
                    let last = match kind {
                        ContactKind::Hospital => &mut last_hospital,
                        ContactKind::Zoll => &mut last_zoll,
                    };
                    prop_assert!(id > *last);
                    *last = id;
                }
                Op::Remove(kind, id) => {
                    controller.remove_contact(kind, id);
                }
            }
            prop_assert_eq!(controller.document().duplicate_field_id(), None);
        }
    }
}
