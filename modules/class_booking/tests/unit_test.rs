//! Contract-level tests: error mapping, config parsing, model basics.
//! These run without a database.

use uuid::Uuid;

use class_booking::config::ClassBookingConfig;
use class_booking::contract::error::ClassBookingError;
use class_booking::contract::model::Slot;
use class_booking::domain::error::DomainError;

fn slot(day_of_week: u8, start_min: u16, end_min: u16) -> Slot {
    Slot::new(day_of_week, start_min, end_min).expect("valid test slot")
}

#[test]
fn domain_errors_map_onto_contract_errors() {
    let id = Uuid::new_v4();
    let professor = Uuid::new_v4();
    let student = Uuid::new_v4();
    let s = slot(3, 600, 660);

    let err: ClassBookingError = DomainError::not_found("enrollment", id).into();
    assert!(matches!(err, ClassBookingError::NotFound { what: "enrollment", id: got } if got == id));

    let err: ClassBookingError = DomainError::validation("day_of_week", "must be 0..=6").into();
    match err {
        ClassBookingError::Validation { message } => {
            assert!(message.contains("day_of_week"));
            assert!(message.contains("must be 0..=6"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }

    let err: ClassBookingError = DomainError::slot_full(professor, s, 10).into();
    assert!(matches!(err, ClassBookingError::SlotFull { capacity: 10, .. }));

    let err: ClassBookingError =
        DomainError::duplicate_active_enrollment(student, professor, 2025, 9).into();
    assert!(matches!(
        err,
        ClassBookingError::DuplicateActiveEnrollment {
            year: 2025,
            month: 9,
            ..
        }
    ));
}

#[test]
fn storage_errors_are_opaque_to_callers() {
    let err: ClassBookingError = DomainError::storage("connection reset by peer").into();
    assert!(matches!(err, ClassBookingError::Internal));
    // Nothing from the storage layer leaks through Display.
    assert!(!err.to_string().contains("connection reset"));
}

#[test]
fn error_messages_name_the_offender() {
    let professor = Uuid::new_v4();
    let err = ClassBookingError::from(DomainError::slot_not_in_schedule(
        professor,
        slot(5, 540, 600),
    ));
    assert!(err.to_string().contains(&professor.to_string()));
}

#[test]
fn config_defaults() {
    let config = ClassBookingConfig::default();
    assert_eq!(config.default_capacity, 10);
    assert!(config.enforce_reschedule_capacity);
}

#[test]
fn config_parses_with_partial_input() {
    let config: ClassBookingConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.default_capacity, 10);
    assert!(config.enforce_reschedule_capacity);

    let config: ClassBookingConfig =
        serde_json::from_str(r#"{"default_capacity": 4, "enforce_reschedule_capacity": false}"#)
            .unwrap();
    assert_eq!(config.default_capacity, 4);
    assert!(!config.enforce_reschedule_capacity);
}

#[test]
fn config_rejects_unknown_fields() {
    let result = serde_json::from_str::<ClassBookingConfig>(r#"{"max_capacity": 4}"#);
    assert!(result.is_err());
}

#[test]
fn slot_json_shape_is_stable() {
    let s = slot(3, 600, 660);
    let json = serde_json::to_value(s).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"day_of_week": 3, "start_min": 600, "end_min": 660})
    );
    let back: Slot = serde_json::from_value(json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn slot_ordering_is_day_then_start() {
    let mut slots = vec![slot(3, 600, 660), slot(1, 540, 600), slot(1, 480, 540)];
    slots.sort();
    assert_eq!(
        slots,
        vec![slot(1, 480, 540), slot(1, 540, 600), slot(3, 600, 660)]
    );
}
