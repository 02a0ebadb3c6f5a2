//! Conversions between storage entities and contract models.
//!
//! Slot lists and snapshots live in JSON columns; a row that fails to
//! decode is a storage-level fault, not a caller error.

use sea_orm::JsonValue;

use crate::contract::model::{
    AdhocClass, AttendanceRecord, AttendanceStatus, Enrollment, EnrollmentState,
    OccurrenceLiveness, OccurrenceOrigin, RescheduleRecord, ScheduleVersion, Slot,
};
use crate::domain::error::DomainError;
use crate::infra::storage::entities::{
    adhoc_class, attendance_record, enrollment, reschedule, schedule_version,
};

pub fn slots_to_json(slots: &[Slot]) -> Result<JsonValue, DomainError> {
    serde_json::to_value(slots).map_err(|e| DomainError::storage(e.to_string()))
}

pub fn slot_to_json(slot: &Slot) -> Result<JsonValue, DomainError> {
    serde_json::to_value(slot).map_err(|e| DomainError::storage(e.to_string()))
}

pub fn slots_from_json(value: &JsonValue) -> Result<Vec<Slot>, DomainError> {
    serde_json::from_value(value.clone())
        .map_err(|e| DomainError::storage(format!("bad slot list in row: {e}")))
}

pub fn slot_from_json(value: &JsonValue) -> Result<Slot, DomainError> {
    serde_json::from_value(value.clone())
        .map_err(|e| DomainError::storage(format!("bad slot in row: {e}")))
}

pub fn state_from_str(state: &str) -> Result<EnrollmentState, DomainError> {
    match state {
        enrollment::STATE_ACTIVA => Ok(EnrollmentState::Activa),
        enrollment::STATE_CANCELADA => Ok(EnrollmentState::Cancelada),
        other => Err(DomainError::storage(format!("unknown enrollment state '{other}'"))),
    }
}

pub fn state_to_str(state: EnrollmentState) -> &'static str {
    match state {
        EnrollmentState::Activa => enrollment::STATE_ACTIVA,
        EnrollmentState::Cancelada => enrollment::STATE_CANCELADA,
    }
}

pub fn origin_from_str(origin: &str) -> Result<OccurrenceOrigin, DomainError> {
    match origin {
        attendance_record::ORIGIN_REGULAR => Ok(OccurrenceOrigin::Regular),
        attendance_record::ORIGIN_ADHOC => Ok(OccurrenceOrigin::Adhoc),
        other => Err(DomainError::storage(format!("unknown origin '{other}'"))),
    }
}

pub fn origin_to_str(origin: OccurrenceOrigin) -> &'static str {
    match origin {
        OccurrenceOrigin::Regular => attendance_record::ORIGIN_REGULAR,
        OccurrenceOrigin::Adhoc => attendance_record::ORIGIN_ADHOC,
    }
}

pub fn status_from_str(status: &str) -> Result<AttendanceStatus, DomainError> {
    match status {
        attendance_record::STATUS_PRESENTE => Ok(AttendanceStatus::Presente),
        attendance_record::STATUS_AUSENTE => Ok(AttendanceStatus::Ausente),
        attendance_record::STATUS_REPROGRAMADO => Ok(AttendanceStatus::Reprogramado),
        other => Err(DomainError::storage(format!("unknown status '{other}'"))),
    }
}

pub fn status_to_str(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Presente => attendance_record::STATUS_PRESENTE,
        AttendanceStatus::Ausente => attendance_record::STATUS_AUSENTE,
        AttendanceStatus::Reprogramado => attendance_record::STATUS_REPROGRAMADO,
    }
}

pub fn liveness_from_str(liveness: &str) -> Result<OccurrenceLiveness, DomainError> {
    match liveness {
        attendance_record::LIVENESS_LIVE => Ok(OccurrenceLiveness::Live),
        attendance_record::LIVENESS_MOVED => Ok(OccurrenceLiveness::Moved),
        attendance_record::LIVENESS_REMOVED => Ok(OccurrenceLiveness::Removed),
        other => Err(DomainError::storage(format!("unknown liveness '{other}'"))),
    }
}

pub fn liveness_to_str(liveness: OccurrenceLiveness) -> &'static str {
    match liveness {
        OccurrenceLiveness::Live => attendance_record::LIVENESS_LIVE,
        OccurrenceLiveness::Moved => attendance_record::LIVENESS_MOVED,
        OccurrenceLiveness::Removed => attendance_record::LIVENESS_REMOVED,
    }
}

pub fn version_to_contract(entity: schedule_version::Model) -> Result<ScheduleVersion, DomainError> {
    Ok(ScheduleVersion {
        id: entity.id,
        professor: entity.professor,
        branch: entity.branch,
        effective_from: entity.effective_from,
        effective_to: entity.effective_to,
        slots: slots_from_json(&entity.slots)?,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

pub fn enrollment_to_contract(entity: enrollment::Model) -> Result<Enrollment, DomainError> {
    Ok(Enrollment {
        id: entity.id,
        student: entity.student,
        professor: entity.professor,
        branch: entity.branch,
        year: entity.year,
        month: entity.month as u32,
        chosen_slots: slots_from_json(&entity.chosen_slots)?,
        assigned: entity.assigned,
        state: state_from_str(&entity.state)?,
        payment_note: entity.payment_note,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

pub fn attendance_to_contract(
    entity: attendance_record::Model,
) -> Result<AttendanceRecord, DomainError> {
    Ok(AttendanceRecord {
        id: entity.id,
        student: entity.student,
        professor: entity.professor,
        branch: entity.branch,
        date: entity.date,
        origin: origin_from_str(&entity.origin)?,
        status: status_from_str(&entity.status)?,
        liveness: liveness_from_str(&entity.liveness)?,
        enrollment_id: entity.enrollment_id,
        slot_snapshot: entity
            .slot_snapshot
            .as_ref()
            .map(slot_from_json)
            .transpose()?,
        reschedule_id: entity.reschedule_id,
        adhoc_class_id: entity.adhoc_class_id,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

pub fn reschedule_to_contract(entity: reschedule::Model) -> Result<RescheduleRecord, DomainError> {
    Ok(RescheduleRecord {
        id: entity.id,
        enrollment_id: entity.enrollment_id,
        from_date: entity.from_date,
        to_date: entity.to_date,
        from_slot: slot_from_json(&entity.from_slot)?,
        to_slot: slot_from_json(&entity.to_slot)?,
        from_professor: entity.from_professor,
        to_professor: entity.to_professor,
        created_at: entity.created_at,
    })
}

pub fn adhoc_to_contract(entity: adhoc_class::Model) -> Result<AdhocClass, DomainError> {
    Ok(AdhocClass {
        id: entity.id,
        professor: entity.professor,
        branch: entity.branch,
        date: entity.date,
        slot: slot_from_json(&entity.slot)?,
        capacity: entity.capacity.max(0) as u32,
        removed: entity.removed,
        created_at: entity.created_at,
    })
}
