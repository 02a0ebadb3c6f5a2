//! Integration-style tests for the class_booking module.
//!
//! Each test runs on a fresh in-memory SQLite DB with migrations applied;
//! the service is constructed with the SeaORM-backed repository.

mod common;

use anyhow::Result;
use chrono::NaiveDate;
use uuid::Uuid;

use class_booking::contract::model::{
    AttendanceStatus, NewAdhocClass, NewEnrollment, OccurrenceOrigin, ReschedulePlan,
};
use class_booking::domain::error::DomainError;
use class_booking::domain::repo::ClassBookingRepository;

use common::{create_test_context, slot, TestContext};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Professor with a September 2025 schedule: Monday 09:00-10:00 and
/// Wednesday 10:00-11:00.
async fn professor_with_schedule(ctx: &TestContext, capacity: Option<u32>) -> Uuid {
    let professor = ctx.add_professor(capacity);
    ctx.service
        .revise_schedule(
            professor,
            "centro".into(),
            vec![slot(1, 540, 600), slot(3, 600, 660)],
            date(2025, 9, 1),
        )
        .await
        .expect("schedule revision");
    professor
}

fn new_enrollment(student: Uuid, professor: Uuid, slots: Vec<class_booking::contract::model::Slot>, assign_now: bool) -> NewEnrollment {
    NewEnrollment {
        student,
        professor,
        branch: "centro".into(),
        year: 2025,
        month: 9,
        chosen_slots: slots,
        assign_now,
        payment_note: None,
    }
}

#[tokio::test]
async fn enrollment_crud_flow() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let student = Uuid::new_v4();

    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(student, professor, vec![slot(3, 600, 660)], true))
        .await?;
    assert!(enrollment.assigned);
    assert_eq!(enrollment.chosen_slots.len(), 1);

    let fetched = ctx.service.get_enrollment(enrollment.id).await?;
    assert_eq!(fetched, enrollment);

    let changed = ctx
        .service
        .change_slots(enrollment.id, vec![slot(1, 540, 600)], false, None)
        .await?;
    assert_eq!(changed.chosen_slots, vec![slot(1, 540, 600)]);
    assert!(changed.assigned, "assigned survives a slot change");

    let cancelled = ctx.service.cancel_enrollment(enrollment.id).await?;
    assert!(!cancelled.assigned);

    // Terminal state: further transitions are rejected.
    let result = ctx.service.set_assigned(enrollment.id, true).await;
    assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));

    ctx.service.delete_enrollment(enrollment.id).await?;
    let result = ctx.service.get_enrollment(enrollment.id).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn create_rejects_slot_outside_schedule() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let student = Uuid::new_v4();

    // Friday is not in the schedule.
    let result = ctx
        .service
        .create_enrollment(new_enrollment(student, professor, vec![slot(5, 540, 600)], false))
        .await;
    assert!(matches!(result, Err(DomainError::SlotNotInSchedule { .. })));

    // Same weekday, different span: membership is structural.
    let result = ctx
        .service
        .create_enrollment(new_enrollment(student, professor, vec![slot(3, 600, 720)], false))
        .await;
    assert!(matches!(result, Err(DomainError::SlotNotInSchedule { .. })));

    Ok(())
}

#[tokio::test]
async fn create_rejects_duplicate_active_enrollment() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let student = Uuid::new_v4();

    ctx.service
        .create_enrollment(new_enrollment(student, professor, vec![slot(3, 600, 660)], false))
        .await?;
    let result = ctx
        .service
        .create_enrollment(new_enrollment(student, professor, vec![slot(1, 540, 600)], false))
        .await;
    assert!(matches!(
        result,
        Err(DomainError::DuplicateActiveEnrollment { .. })
    ));

    Ok(())
}

#[tokio::test]
async fn capacity_ceiling_is_enforced() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, Some(1)).await;
    let wednesday = slot(3, 600, 660);

    ctx.service
        .create_enrollment(new_enrollment(Uuid::new_v4(), professor, vec![wednesday], true))
        .await?;

    assert_eq!(
        ctx.service
            .remaining_capacity(professor, wednesday, 2025, 9)
            .await?,
        0
    );

    let result = ctx
        .service
        .create_enrollment(new_enrollment(Uuid::new_v4(), professor, vec![wednesday], true))
        .await;
    assert!(matches!(result, Err(DomainError::SlotFull { .. })));

    // Unassigned bookings do not consume capacity.
    ctx.service
        .create_enrollment(new_enrollment(Uuid::new_v4(), professor, vec![wednesday], false))
        .await?;

    // The other slot is unaffected.
    assert_eq!(
        ctx.service
            .remaining_capacity(professor, slot(1, 540, 600), 2025, 9)
            .await?,
        1
    );

    Ok(())
}

#[tokio::test]
async fn create_is_all_or_nothing_across_two_slots() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, Some(1)).await;
    let monday = slot(1, 540, 600);
    let wednesday = slot(3, 600, 660);

    // Fill Wednesday.
    ctx.service
        .create_enrollment(new_enrollment(Uuid::new_v4(), professor, vec![wednesday], true))
        .await?;

    // Two-slot booking touching the full slot fails entirely.
    let result = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            professor,
            vec![monday, wednesday],
            true,
        ))
        .await;
    assert!(matches!(result, Err(DomainError::SlotFull { .. })));

    // Monday was not consumed by the failed attempt.
    assert_eq!(
        ctx.service
            .remaining_capacity(professor, monday, 2025, 9)
            .await?,
        1
    );

    Ok(())
}

#[tokio::test]
async fn concurrent_bookings_for_last_seat_yield_one_winner() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, Some(1)).await;
    let monday = slot(1, 540, 600);

    let first = ctx
        .service
        .create_enrollment(new_enrollment(Uuid::new_v4(), professor, vec![monday], true));
    let second = ctx
        .service
        .create_enrollment(new_enrollment(Uuid::new_v4(), professor, vec![monday], true));

    let (a, b) = tokio::join!(first, second);
    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one booking may win the last seat");
    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser, Err(DomainError::SlotFull { .. })));

    Ok(())
}

#[tokio::test]
async fn assign_unassign_is_idempotent_and_never_double_counts() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, Some(2)).await;
    let wednesday = slot(3, 600, 660);
    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(Uuid::new_v4(), professor, vec![wednesday], false))
        .await?;

    let e = ctx.service.set_assigned(enrollment.id, true).await?;
    assert!(e.assigned);
    // Repeated assignment is a no-op, not a second seat.
    let e = ctx.service.set_assigned(enrollment.id, true).await?;
    assert!(e.assigned);
    assert_eq!(
        ctx.service
            .remaining_capacity(professor, wednesday, 2025, 9)
            .await?,
        1
    );

    let e = ctx.service.set_assigned(enrollment.id, false).await?;
    assert!(!e.assigned);
    assert_eq!(
        ctx.service
            .remaining_capacity(professor, wednesday, 2025, 9)
            .await?,
        2
    );

    let e = ctx.service.set_assigned(enrollment.id, true).await?;
    assert!(e.assigned);
    assert_eq!(
        ctx.service
            .remaining_capacity(professor, wednesday, 2025, 9)
            .await?,
        1
    );

    Ok(())
}

#[tokio::test]
async fn change_slots_can_switch_professor() -> Result<()> {
    let ctx = create_test_context().await;
    let professor_a = professor_with_schedule(&ctx, Some(1)).await;
    let professor_b = ctx.add_professor(Some(1));
    ctx.service
        .revise_schedule(
            professor_b,
            "centro".into(),
            vec![slot(5, 540, 600)],
            date(2025, 9, 1),
        )
        .await?;

    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            professor_a,
            vec![slot(3, 600, 660)],
            true,
        ))
        .await?;

    // The new professor's schedule applies, not the old one's.
    let result = ctx
        .service
        .change_slots(enrollment.id, vec![slot(3, 600, 660)], true, Some(professor_b))
        .await;
    assert!(matches!(result, Err(DomainError::SlotNotInSchedule { .. })));

    let moved = ctx
        .service
        .change_slots(enrollment.id, vec![slot(5, 540, 600)], true, Some(professor_b))
        .await?;
    assert_eq!(moved.professor, professor_b);
    assert!(moved.assigned);

    // Capacity transferred: the old professor's slot is free again.
    assert_eq!(
        ctx.service
            .remaining_capacity(professor_a, slot(3, 600, 660), 2025, 9)
            .await?,
        1
    );
    assert_eq!(
        ctx.service
            .remaining_capacity(professor_b, slot(5, 540, 600), 2025, 9)
            .await?,
        0
    );

    Ok(())
}

#[tokio::test]
async fn month_occurrences_expand_the_calendar() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            professor,
            vec![slot(3, 600, 660)],
            false,
        ))
        .await?;

    // September 2025 has four Wednesdays.
    let views = ctx
        .service
        .month_occurrences(enrollment.id, 2025, 9)
        .await?;
    assert_eq!(views.len(), 4);
    let days: Vec<u32> = views.iter().map(|v| chrono::Datelike::day(&v.date)).collect();
    assert_eq!(days, vec![3, 10, 17, 24]);
    assert!(views.iter().all(|v| v.live && v.status.is_none()));

    Ok(())
}

#[tokio::test]
async fn reschedule_then_revert_restores_the_origin() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            professor,
            vec![slot(3, 600, 660)],
            true,
        ))
        .await?;

    // Move Wednesday Sep 10 to Monday Sep 15.
    let record = ctx
        .service
        .reschedule_occurrence(ReschedulePlan {
            enrollment_id: enrollment.id,
            from_date: date(2025, 9, 10),
            from_slot: slot(3, 600, 660),
            to_date: date(2025, 9, 15),
            to_professor: professor,
            to_slot: slot(1, 540, 600),
        })
        .await?;

    let views = ctx
        .service
        .month_occurrences(enrollment.id, 2025, 9)
        .await?;
    assert_eq!(views.len(), 5, "four regular plus one destination");
    let origin = views
        .iter()
        .find(|v| v.date == date(2025, 9, 10) && v.origin == OccurrenceOrigin::Regular)
        .expect("origin view");
    assert!(!origin.live);
    assert_eq!(origin.status, Some(AttendanceStatus::Reprogramado));
    let destination = views
        .iter()
        .find(|v| v.origin == OccurrenceOrigin::Adhoc)
        .expect("destination view");
    assert_eq!(destination.date, date(2025, 9, 15));
    assert!(destination.live);
    assert_eq!(destination.status, Some(AttendanceStatus::Ausente));

    ctx.service.revert_reschedule(record.id).await?;

    let views = ctx
        .service
        .month_occurrences(enrollment.id, 2025, 9)
        .await?;
    assert_eq!(views.len(), 4, "destination is gone");
    assert!(
        views.iter().all(|v| v.live),
        "origin must not stay stuck in reprogramado"
    );

    Ok(())
}

#[tokio::test]
async fn reschedule_rejects_attended_origin_without_writes() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            professor,
            vec![slot(3, 600, 660)],
            true,
        ))
        .await?;

    ctx.service
        .set_attendance(enrollment.id, date(2025, 9, 10), AttendanceStatus::Presente)
        .await?;

    let result = ctx
        .service
        .reschedule_occurrence(ReschedulePlan {
            enrollment_id: enrollment.id,
            from_date: date(2025, 9, 10),
            from_slot: slot(3, 600, 660),
            to_date: date(2025, 9, 15),
            to_professor: professor,
            to_slot: slot(1, 540, 600),
        })
        .await;
    assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));

    // No attendance or reschedule writes happened.
    let views = ctx
        .service
        .month_occurrences(enrollment.id, 2025, 9)
        .await?;
    assert_eq!(views.len(), 4);
    let attended = views
        .iter()
        .find(|v| v.date == date(2025, 9, 10))
        .expect("attended view");
    assert!(attended.live);
    assert_eq!(attended.status, Some(AttendanceStatus::Presente));

    Ok(())
}

#[tokio::test]
async fn reschedule_rejects_destination_outside_schedule() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            professor,
            vec![slot(3, 600, 660)],
            true,
        ))
        .await?;

    // Friday Sep 12 is not in the schedule.
    let result = ctx
        .service
        .reschedule_occurrence(ReschedulePlan {
            enrollment_id: enrollment.id,
            from_date: date(2025, 9, 10),
            from_slot: slot(3, 600, 660),
            to_date: date(2025, 9, 12),
            to_professor: professor,
            to_slot: slot(5, 540, 600),
        })
        .await;
    assert!(matches!(result, Err(DomainError::SlotNotInSchedule { .. })));

    Ok(())
}

#[tokio::test]
async fn delete_enrollment_cascades_to_reschedules() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            professor,
            vec![slot(3, 600, 660)],
            true,
        ))
        .await?;
    let record = ctx
        .service
        .reschedule_occurrence(ReschedulePlan {
            enrollment_id: enrollment.id,
            from_date: date(2025, 9, 10),
            from_slot: slot(3, 600, 660),
            to_date: date(2025, 9, 15),
            to_professor: professor,
            to_slot: slot(1, 540, 600),
        })
        .await?;

    ctx.service.delete_enrollment(enrollment.id).await?;

    // The reschedule went with it; reverting it now is a NotFound.
    let result = ctx.service.revert_reschedule(record.id).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn delete_enrollment_leaves_no_ledger_rows_behind() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let student = Uuid::new_v4();
    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(student, professor, vec![slot(3, 600, 660)], true))
        .await?;

    ctx.service
        .set_attendance(enrollment.id, date(2025, 9, 3), AttendanceStatus::Presente)
        .await?;
    // The destination row is keyed by reschedule, not by enrollment.
    ctx.service
        .reschedule_occurrence(ReschedulePlan {
            enrollment_id: enrollment.id,
            from_date: date(2025, 9, 10),
            from_slot: slot(3, 600, 660),
            to_date: date(2025, 9, 15),
            to_professor: professor,
            to_slot: slot(1, 540, 600),
        })
        .await?;

    ctx.service.delete_enrollment(enrollment.id).await?;

    let ledger = ctx.repo.month_attendance(student, 2025, 9).await?;
    assert!(
        ledger.is_empty(),
        "no orphaned ledger rows may survive: {ledger:?}"
    );

    Ok(())
}

#[tokio::test]
async fn attendance_outside_the_enrollment_month_is_rejected() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            professor,
            vec![slot(3, 600, 660)],
            true,
        ))
        .await?;

    // A Wednesday, but in October: not an occurrence of this enrollment.
    let result = ctx
        .service
        .set_attendance(enrollment.id, date(2025, 10, 8), AttendanceStatus::Presente)
        .await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));

    let result = ctx
        .service
        .reschedule_occurrence(ReschedulePlan {
            enrollment_id: enrollment.id,
            from_date: date(2025, 10, 8),
            from_slot: slot(3, 600, 660),
            to_date: date(2025, 10, 13),
            to_professor: professor,
            to_slot: slot(1, 540, 600),
        })
        .await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));

    Ok(())
}

#[tokio::test]
async fn reschedule_rejects_destination_weekday_mismatch() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            professor,
            vec![slot(3, 600, 660)],
            true,
        ))
        .await?;

    // Sep 16 2025 is a Tuesday; the destination slot is a Monday slot.
    let result = ctx
        .service
        .reschedule_occurrence(ReschedulePlan {
            enrollment_id: enrollment.id,
            from_date: date(2025, 9, 10),
            from_slot: slot(3, 600, 660),
            to_date: date(2025, 9, 16),
            to_professor: professor,
            to_slot: slot(1, 540, 600),
        })
        .await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));

    Ok(())
}

#[tokio::test]
async fn professor_switch_keeps_earlier_attendance_visible() -> Result<()> {
    let ctx = create_test_context().await;
    let professor_a = professor_with_schedule(&ctx, None).await;
    let professor_b = ctx.add_professor(None);
    ctx.service
        .revise_schedule(
            professor_b,
            "centro".into(),
            vec![slot(3, 600, 660)],
            date(2025, 9, 1),
        )
        .await?;

    let enrollment = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            professor_a,
            vec![slot(3, 600, 660)],
            true,
        ))
        .await?;
    ctx.service
        .set_attendance(enrollment.id, date(2025, 9, 3), AttendanceStatus::Presente)
        .await?;

    ctx.service
        .change_slots(enrollment.id, vec![slot(3, 600, 660)], true, Some(professor_b))
        .await?;

    let views = ctx
        .service
        .month_occurrences(enrollment.id, 2025, 9)
        .await?;
    let attended = views
        .iter()
        .find(|v| v.date == date(2025, 9, 3))
        .expect("attended view");
    assert_eq!(
        attended.status,
        Some(AttendanceStatus::Presente),
        "attendance recorded before the switch stays visible"
    );

    Ok(())
}

#[tokio::test]
async fn revision_unassigns_enrollments_whose_slot_vanished() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;
    let student = Uuid::new_v4();

    // Assigned October booking on the Monday slot.
    let enrollment = ctx
        .service
        .create_enrollment(NewEnrollment {
            student,
            professor,
            branch: "centro".into(),
            year: 2025,
            month: 10,
            chosen_slots: vec![slot(1, 540, 600)],
            assign_now: true,
            payment_note: None,
        })
        .await?;

    // Empty revision from October: nothing to reassign onto.
    let revision = ctx
        .service
        .revise_schedule(professor, "centro".into(), vec![], date(2025, 10, 1))
        .await?;
    assert_eq!(revision.reassigned, 1);

    let updated = ctx.service.get_enrollment(enrollment.id).await?;
    assert!(
        !updated.assigned,
        "never silently assigned against a nonexistent slot"
    );

    Ok(())
}

#[tokio::test]
async fn revision_reassigns_to_an_equivalent_free_slot() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;

    let enrollment = ctx
        .service
        .create_enrollment(NewEnrollment {
            student: Uuid::new_v4(),
            professor,
            branch: "centro".into(),
            year: 2025,
            month: 10,
            chosen_slots: vec![slot(1, 540, 600)],
            assign_now: true,
            payment_note: None,
        })
        .await?;

    // Monday disappears, Thursday opens.
    let revision = ctx
        .service
        .revise_schedule(
            professor,
            "centro".into(),
            vec![slot(3, 600, 660), slot(4, 540, 600)],
            date(2025, 10, 1),
        )
        .await?;
    assert_eq!(revision.reassigned, 1);

    let updated = ctx.service.get_enrollment(enrollment.id).await?;
    assert!(updated.assigned, "reassignment kept the booking assigned");
    assert!(!updated.chosen_slots.contains(&slot(1, 540, 600)));
    assert_eq!(updated.chosen_slots.len(), 1);

    // September bookings predate the revision and are untouched.
    let september = ctx
        .service
        .active_schedule(professor, date(2025, 9, 15))
        .await?
        .expect("september version");
    assert_eq!(september.effective_to, Some(date(2025, 9, 30)));

    Ok(())
}

#[tokio::test]
async fn revision_keeps_exactly_one_open_version() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;

    ctx.service
        .revise_schedule(professor, "centro".into(), vec![slot(2, 540, 600)], date(2025, 11, 1))
        .await?;

    let october = ctx
        .service
        .active_schedule(professor, date(2025, 10, 15))
        .await?
        .expect("october resolves to the first version");
    assert_eq!(october.effective_to, Some(date(2025, 10, 31)));

    let december = ctx
        .service
        .active_schedule(professor, date(2025, 12, 1))
        .await?
        .expect("open version");
    assert_eq!(december.effective_to, None);
    assert_eq!(december.slots, vec![slot(2, 540, 600)]);

    // Dates before the first version have no schedule.
    assert!(ctx
        .service
        .active_schedule(professor, date(2025, 8, 31))
        .await?
        .is_none());

    Ok(())
}

#[tokio::test]
async fn adhoc_classes_have_their_own_capacity_and_roster() -> Result<()> {
    let ctx = create_test_context().await;
    let professor = professor_with_schedule(&ctx, None).await;

    let class = ctx
        .service
        .create_adhoc_class(NewAdhocClass {
            professor,
            branch: "centro".into(),
            date: date(2025, 9, 13),
            slot: slot(6, 600, 660),
            capacity: 1,
        })
        .await?;

    // Duplicate one-off at the same date+slot is rejected.
    let result = ctx
        .service
        .create_adhoc_class(NewAdhocClass {
            professor,
            branch: "centro".into(),
            date: date(2025, 9, 13),
            slot: slot(6, 600, 660),
            capacity: 5,
        })
        .await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));

    let student = Uuid::new_v4();
    let joined = ctx.service.join_adhoc_class(class.id, student).await?;
    assert_eq!(joined.adhoc_class_id, Some(class.id));

    // Joining again is idempotent, not a second seat.
    let again = ctx.service.join_adhoc_class(class.id, student).await?;
    assert_eq!(again.id, joined.id);

    let result = ctx.service.join_adhoc_class(class.id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::SlotFull { .. })));

    ctx.service.remove_adhoc_class(class.id).await?;
    let result = ctx.service.join_adhoc_class(class.id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn unknown_professor_is_rejected() -> Result<()> {
    let ctx = create_test_context().await;
    let result = ctx
        .service
        .create_enrollment(new_enrollment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            vec![slot(3, 600, 660)],
            false,
        ))
        .await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    Ok(())
}
