//! SeaORM-backed repository implementation for the domain port.
//!
//! Every mutating method runs inside a single database transaction so the
//! capacity read and the capacity-consuming write form one serialized unit;
//! two concurrent requests for the last open seat resolve as one success
//! and one `SlotFull`. Reserving paths run at serializable isolation:
//! SQLite's single writer gives that for free, while on Postgres the
//! default READ COMMITTED would let two transactions count the same free
//! seat. A serialization failure surfaces as a storage error, which the
//! contract maps to the retryable `Internal`. Read helpers are generic
//! over `ConnectionTrait` so the same code serves both the pool and a
//! transaction connection.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, IsolationLevel, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionError, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{
    AdhocClass, AttendanceRecord, AttendanceStatus, Enrollment, NewAdhocClass, NewEnrollment,
    ReschedulePlan, RescheduleRecord, ScheduleRevision, ScheduleVersion, Slot,
};
use crate::domain::error::DomainError;
use crate::domain::occurrence::{month_end, month_start, weekday_index};
use crate::domain::repo::ClassBookingRepository;
use crate::domain::slot::{contains_slot, slot_key_string};
use crate::infra::storage::entities::{
    adhoc_class, attendance_record, enrollment, reschedule, schedule_version,
};
use crate::infra::storage::mapper;

/// SeaORM repository impl over a pooled connection.
pub struct SeaOrmClassBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmClassBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::storage(e.to_string())
}

fn txn_err(e: TransactionError<DomainError>) -> DomainError {
    match e {
        TransactionError::Connection(e) => db_err(e),
        TransactionError::Transaction(e) => e,
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// --- shared query helpers (work on pool and transaction connections) ---

async fn active_version_on<C: ConnectionTrait>(
    conn: &C,
    professor: Uuid,
    as_of: NaiveDate,
) -> Result<Option<schedule_version::Model>, DomainError> {
    schedule_version::Entity::find()
        .filter(schedule_version::Column::Professor.eq(professor))
        .filter(schedule_version::Column::EffectiveFrom.lte(as_of))
        .filter(
            Condition::any()
                .add(schedule_version::Column::EffectiveTo.is_null())
                .add(schedule_version::Column::EffectiveTo.gte(as_of)),
        )
        // Defensive tie-break: on overlap the most recently started wins.
        .order_by_desc(schedule_version::Column::EffectiveFrom)
        .one(conn)
        .await
        .map_err(db_err)
}

async fn load_enrollment_on<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<enrollment::Model, DomainError> {
    enrollment::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("enrollment", id))
}

/// Assigned active enrollments occupying `slot` in the month. Chosen slots
/// live in a JSON column, so candidates are filtered structurally here
/// rather than in SQL; per-professor-month row counts are small.
async fn assigned_count_on<C: ConnectionTrait>(
    conn: &C,
    professor: Uuid,
    slot: &Slot,
    year: i32,
    month: u32,
    exclude: Option<Uuid>,
) -> Result<u64, DomainError> {
    let rows = enrollment::Entity::find()
        .filter(enrollment::Column::Professor.eq(professor))
        .filter(enrollment::Column::Year.eq(year))
        .filter(enrollment::Column::Month.eq(month as i32))
        .filter(enrollment::Column::Assigned.eq(true))
        .filter(enrollment::Column::State.eq(enrollment::STATE_ACTIVA))
        .all(conn)
        .await
        .map_err(db_err)?;

    let mut count = 0u64;
    for row in rows {
        if exclude == Some(row.id) {
            continue;
        }
        if contains_slot(&mapper::slots_from_json(&row.chosen_slots)?, slot) {
            count += 1;
        }
    }
    Ok(count)
}

/// Live ad-hoc ledger rows pinned to exactly this date and slot snapshot
/// (reschedule destinations and one-off class joins).
async fn adhoc_occupancy_on<C: ConnectionTrait>(
    conn: &C,
    professor: Uuid,
    date: NaiveDate,
    slot: &Slot,
) -> Result<u64, DomainError> {
    let rows = attendance_record::Entity::find()
        .filter(attendance_record::Column::Professor.eq(professor))
        .filter(attendance_record::Column::Date.eq(date))
        .filter(attendance_record::Column::Origin.eq(attendance_record::ORIGIN_ADHOC))
        .filter(attendance_record::Column::Liveness.eq(attendance_record::LIVENESS_LIVE))
        .all(conn)
        .await
        .map_err(db_err)?;

    let mut count = 0u64;
    for row in rows {
        if let Some(snapshot) = row.slot_snapshot.as_ref() {
            if mapper::slot_from_json(snapshot)? == *slot {
                count += 1;
            }
        }
    }
    Ok(count)
}

/// Resolve the schedule active on `as_of` and check each slot's membership.
async fn ensure_slots_in_schedule<C: ConnectionTrait>(
    conn: &C,
    professor: Uuid,
    as_of: NaiveDate,
    slots: &[Slot],
) -> Result<(), DomainError> {
    let version = active_version_on(conn, professor, as_of)
        .await?
        .ok_or_else(|| DomainError::not_found("schedule", professor))?;
    let schedule_slots = mapper::slots_from_json(&version.slots)?;
    for slot in slots {
        if !contains_slot(&schedule_slots, slot) {
            return Err(DomainError::slot_not_in_schedule(professor, *slot));
        }
    }
    Ok(())
}

async fn ensure_no_duplicate_active<C: ConnectionTrait>(
    conn: &C,
    student: Uuid,
    professor: Uuid,
    year: i32,
    month: u32,
    exclude: Option<Uuid>,
) -> Result<(), DomainError> {
    let rows = enrollment::Entity::find()
        .filter(enrollment::Column::Student.eq(student))
        .filter(enrollment::Column::Professor.eq(professor))
        .filter(enrollment::Column::Year.eq(year))
        .filter(enrollment::Column::Month.eq(month as i32))
        .filter(enrollment::Column::State.eq(enrollment::STATE_ACTIVA))
        .all(conn)
        .await
        .map_err(db_err)?;
    if rows.iter().any(|r| exclude != Some(r.id)) {
        return Err(DomainError::duplicate_active_enrollment(
            student, professor, year, month,
        ));
    }
    Ok(())
}

#[async_trait]
impl ClassBookingRepository for SeaOrmClassBookingRepository {
    async fn find_active_version(
        &self,
        professor: Uuid,
        as_of: NaiveDate,
    ) -> Result<Option<ScheduleVersion>, DomainError> {
        active_version_on(&self.db, professor, as_of)
            .await?
            .map(mapper::version_to_contract)
            .transpose()
    }

    async fn revise_schedule(
        &self,
        professor: Uuid,
        branch: &str,
        slots: Vec<Slot>,
        effective_from: NaiveDate,
        capacity: u32,
    ) -> Result<ScheduleRevision, DomainError> {
        let branch = branch.to_owned();
        self.db
            .transaction_with_config::<_, ScheduleRevision, DomainError>(move |txn| {
                Box::pin(async move {
                    // Canonical order + dedup via the slot's total ordering.
                    let slots: Vec<Slot> = slots.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

                    let open = schedule_version::Entity::find()
                        .filter(schedule_version::Column::Professor.eq(professor))
                        .filter(schedule_version::Column::EffectiveTo.is_null())
                        .order_by_desc(schedule_version::Column::EffectiveFrom)
                        .one(txn)
                        .await
                        .map_err(db_err)?;

                    let now = Utc::now();
                    if let Some(open) = open {
                        if open.effective_from >= effective_from {
                            return Err(DomainError::validation(
                                "effective_from",
                                "revision must start after the open version's start",
                            ));
                        }
                        let closed_on = effective_from.pred_opt().ok_or_else(|| {
                            DomainError::validation("effective_from", "date out of range")
                        })?;
                        let mut am = open.into_active_model();
                        am.effective_to = Set(Some(closed_on));
                        am.updated_at = Set(now);
                        am.update(txn).await.map_err(db_err)?;
                    }

                    let version_model = schedule_version::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        professor: Set(professor),
                        branch: Set(branch),
                        effective_from: Set(effective_from),
                        effective_to: Set(None),
                        slots: Set(mapper::slots_to_json(&slots)?),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(db_err)?;

                    // Best-effort reassignment of assigned enrollments for
                    // months the new version covers.
                    let mut reassigned = 0u32;
                    let candidates = enrollment::Entity::find()
                        .filter(enrollment::Column::Professor.eq(professor))
                        .filter(enrollment::Column::State.eq(enrollment::STATE_ACTIVA))
                        .filter(enrollment::Column::Assigned.eq(true))
                        .all(txn)
                        .await
                        .map_err(db_err)?;

                    for row in candidates {
                        let anchor = month_start(row.year, row.month as u32)?;
                        if anchor < effective_from {
                            continue;
                        }
                        let chosen = mapper::slots_from_json(&row.chosen_slots)?;
                        let missing: Vec<Slot> = chosen
                            .iter()
                            .copied()
                            .filter(|s| !contains_slot(&slots, s))
                            .collect();
                        if missing.is_empty() {
                            continue;
                        }

                        let mut replacement_plan = chosen.clone();
                        let mut fully_reassigned = true;
                        for gone in &missing {
                            let mut replaced = false;
                            for candidate in &slots {
                                if contains_slot(&replacement_plan, candidate) {
                                    continue;
                                }
                                let occupied = assigned_count_on(
                                    txn,
                                    professor,
                                    candidate,
                                    row.year,
                                    row.month as u32,
                                    Some(row.id),
                                )
                                .await?;
                                if occupied < u64::from(capacity) {
                                    replacement_plan.retain(|s| s != gone);
                                    replacement_plan.push(*candidate);
                                    replaced = true;
                                    break;
                                }
                            }
                            if !replaced {
                                fully_reassigned = false;
                                break;
                            }
                        }

                        let mut am = row.into_active_model();
                        if fully_reassigned {
                            replacement_plan.sort();
                            am.chosen_slots = Set(mapper::slots_to_json(&replacement_plan)?);
                        } else {
                            am.assigned = Set(false);
                        }
                        am.updated_at = Set(Utc::now());
                        am.update(txn).await.map_err(db_err)?;
                        reassigned += 1;
                    }

                    Ok(ScheduleRevision {
                        version: mapper::version_to_contract(version_model)?,
                        reassigned,
                    })
                })
            }, Some(IsolationLevel::Serializable), None)
            .await
            .map_err(txn_err)
    }

    async fn find_enrollment(&self, id: Uuid) -> Result<Option<Enrollment>, DomainError> {
        enrollment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(mapper::enrollment_to_contract)
            .transpose()
    }

    async fn assigned_count(
        &self,
        professor: Uuid,
        slot: &Slot,
        year: i32,
        month: u32,
        exclude: Option<Uuid>,
    ) -> Result<u64, DomainError> {
        assigned_count_on(&self.db, professor, slot, year, month, exclude).await
    }

    async fn create_enrollment(
        &self,
        new_enrollment: NewEnrollment,
        capacity: u32,
    ) -> Result<Enrollment, DomainError> {
        self.db
            .transaction_with_config::<_, Enrollment, DomainError>(move |txn| {
                Box::pin(async move {
                    let NewEnrollment {
                        student,
                        professor,
                        branch,
                        year,
                        month,
                        chosen_slots,
                        assign_now,
                        payment_note,
                    } = new_enrollment;

                    ensure_no_duplicate_active(txn, student, professor, year, month, None).await?;

                    let anchor = month_start(year, month)?;
                    ensure_slots_in_schedule(txn, professor, anchor, &chosen_slots).await?;

                    // All-or-nothing across the 1..=2 slots.
                    if assign_now {
                        for slot in &chosen_slots {
                            let occupied =
                                assigned_count_on(txn, professor, slot, year, month, None).await?;
                            if occupied >= u64::from(capacity) {
                                return Err(DomainError::slot_full(professor, *slot, capacity));
                            }
                        }
                    }

                    let now = Utc::now();
                    let model = enrollment::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        student: Set(student),
                        professor: Set(professor),
                        branch: Set(branch),
                        year: Set(year),
                        month: Set(month as i32),
                        chosen_slots: Set(mapper::slots_to_json(&chosen_slots)?),
                        assigned: Set(assign_now),
                        state: Set(enrollment::STATE_ACTIVA.to_owned()),
                        payment_note: Set(payment_note),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(|e| {
                        if is_unique_violation(&e) {
                            DomainError::duplicate_active_enrollment(student, professor, year, month)
                        } else {
                            db_err(e)
                        }
                    })?;

                    mapper::enrollment_to_contract(model)
                })
            }, Some(IsolationLevel::Serializable), None)
            .await
            .map_err(txn_err)
    }

    async fn change_slots(
        &self,
        id: Uuid,
        new_slots: Vec<Slot>,
        assign_now: bool,
        target_professor: Option<Uuid>,
        capacity: u32,
    ) -> Result<Enrollment, DomainError> {
        self.db
            .transaction_with_config::<_, Enrollment, DomainError>(move |txn| {
                Box::pin(async move {
                    let current = load_enrollment_on(txn, id).await?;
                    if current.state != enrollment::STATE_ACTIVA {
                        return Err(DomainError::invalid_transition(
                            "cannot change slots of a cancelled enrollment",
                        ));
                    }

                    let professor = target_professor.unwrap_or(current.professor);
                    let year = current.year;
                    let month = current.month as u32;

                    if professor != current.professor {
                        ensure_no_duplicate_active(
                            txn,
                            current.student,
                            professor,
                            year,
                            month,
                            None,
                        )
                        .await?;
                    }

                    let anchor = month_start(year, month)?;
                    ensure_slots_in_schedule(txn, professor, anchor, &new_slots).await?;

                    // Release-old/acquire-new inside one transaction: the
                    // enrollment's prior occupancy never counts against it.
                    let will_assign = current.assigned || assign_now;
                    if will_assign {
                        for slot in &new_slots {
                            let occupied =
                                assigned_count_on(txn, professor, slot, year, month, Some(id))
                                    .await?;
                            if occupied >= u64::from(capacity) {
                                return Err(DomainError::slot_full(professor, *slot, capacity));
                            }
                        }
                    }

                    let mut am = current.into_active_model();
                    am.professor = Set(professor);
                    am.chosen_slots = Set(mapper::slots_to_json(&new_slots)?);
                    am.assigned = Set(will_assign);
                    am.updated_at = Set(Utc::now());
                    let updated = am.update(txn).await.map_err(db_err)?;

                    mapper::enrollment_to_contract(updated)
                })
            }, Some(IsolationLevel::Serializable), None)
            .await
            .map_err(txn_err)
    }

    async fn set_assigned(
        &self,
        id: Uuid,
        assigned: bool,
        capacity: u32,
    ) -> Result<Enrollment, DomainError> {
        self.db
            .transaction_with_config::<_, Enrollment, DomainError>(move |txn| {
                Box::pin(async move {
                    let current = load_enrollment_on(txn, id).await?;
                    if current.state != enrollment::STATE_ACTIVA {
                        return Err(DomainError::invalid_transition(
                            "cannot (un)assign a cancelled enrollment",
                        ));
                    }
                    if current.assigned == assigned {
                        return mapper::enrollment_to_contract(current);
                    }

                    if assigned {
                        // State may have drifted since creation: re-validate
                        // membership and capacity before flipping.
                        let year = current.year;
                        let month = current.month as u32;
                        let chosen = mapper::slots_from_json(&current.chosen_slots)?;
                        let anchor = month_start(year, month)?;
                        ensure_slots_in_schedule(txn, current.professor, anchor, &chosen).await?;
                        for slot in &chosen {
                            let occupied = assigned_count_on(
                                txn,
                                current.professor,
                                slot,
                                year,
                                month,
                                Some(id),
                            )
                            .await?;
                            if occupied >= u64::from(capacity) {
                                return Err(DomainError::slot_full(
                                    current.professor,
                                    *slot,
                                    capacity,
                                ));
                            }
                        }
                    }

                    let mut am = current.into_active_model();
                    am.assigned = Set(assigned);
                    am.updated_at = Set(Utc::now());
                    let updated = am.update(txn).await.map_err(db_err)?;
                    mapper::enrollment_to_contract(updated)
                })
            }, Some(IsolationLevel::Serializable), None)
            .await
            .map_err(txn_err)
    }

    async fn cancel_enrollment(&self, id: Uuid) -> Result<Enrollment, DomainError> {
        self.db
            .transaction::<_, Enrollment, DomainError>(move |txn| {
                Box::pin(async move {
                    let current = load_enrollment_on(txn, id).await?;
                    if current.state == enrollment::STATE_CANCELADA {
                        return Err(DomainError::invalid_transition(
                            "enrollment is already cancelled",
                        ));
                    }
                    let mut am = current.into_active_model();
                    am.state = Set(enrollment::STATE_CANCELADA.to_owned());
                    am.assigned = Set(false);
                    am.updated_at = Set(Utc::now());
                    let updated = am.update(txn).await.map_err(db_err)?;
                    mapper::enrollment_to_contract(updated)
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn delete_enrollment(&self, id: Uuid) -> Result<(), DomainError> {
        self.db
            .transaction::<_, (), DomainError>(move |txn| {
                Box::pin(async move {
                    load_enrollment_on(txn, id).await?;
                    // The enrollment and its dependents disappear together
                    // or not at all. Reschedule-destination ledger rows hang
                    // off the reschedule, not the enrollment, so they are
                    // collected by key first.
                    let reschedule_ids: Vec<Uuid> = reschedule::Entity::find()
                        .filter(reschedule::Column::EnrollmentId.eq(id))
                        .all(txn)
                        .await
                        .map_err(db_err)?
                        .into_iter()
                        .map(|r| r.id)
                        .collect();
                    if !reschedule_ids.is_empty() {
                        attendance_record::Entity::delete_many()
                            .filter(attendance_record::Column::RescheduleId.is_in(reschedule_ids))
                            .exec(txn)
                            .await
                            .map_err(db_err)?;
                    }
                    reschedule::Entity::delete_many()
                        .filter(reschedule::Column::EnrollmentId.eq(id))
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    attendance_record::Entity::delete_many()
                        .filter(attendance_record::Column::EnrollmentId.eq(id))
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    enrollment::Entity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn month_attendance(
        &self,
        student: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<AttendanceRecord>, DomainError> {
        let rows = attendance_record::Entity::find()
            .filter(attendance_record::Column::Student.eq(student))
            .filter(attendance_record::Column::Date.gte(month_start(year, month)?))
            .filter(attendance_record::Column::Date.lte(month_end(year, month)?))
            .order_by_asc(attendance_record::Column::Date)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(mapper::attendance_to_contract).collect()
    }

    async fn set_attendance(
        &self,
        enrollment_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, DomainError> {
        self.db
            .transaction::<_, AttendanceRecord, DomainError>(move |txn| {
                Box::pin(async move {
                    let owner = load_enrollment_on(txn, enrollment_id).await?;
                    if owner.state != enrollment::STATE_ACTIVA {
                        return Err(DomainError::invalid_transition(
                            "cannot record attendance on a cancelled enrollment",
                        ));
                    }
                    // The date must be an occurrence the enrollment has:
                    // inside its month and on a chosen weekday.
                    if date < month_start(owner.year, owner.month as u32)?
                        || date > month_end(owner.year, owner.month as u32)?
                    {
                        return Err(DomainError::validation(
                            "date",
                            "date is outside the enrollment's month",
                        ));
                    }
                    let chosen = mapper::slots_from_json(&owner.chosen_slots)?;
                    let slot = chosen
                        .iter()
                        .find(|s| s.day_of_week == weekday_index(date))
                        .copied()
                        .ok_or_else(|| {
                            DomainError::validation(
                                "date",
                                "enrollment has no chosen slot on that weekday",
                            )
                        })?;

                    let existing = attendance_record::Entity::find()
                        .filter(attendance_record::Column::Student.eq(owner.student))
                        .filter(attendance_record::Column::Professor.eq(owner.professor))
                        .filter(attendance_record::Column::Date.eq(date))
                        .filter(
                            attendance_record::Column::Origin
                                .eq(attendance_record::ORIGIN_REGULAR),
                        )
                        .one(txn)
                        .await
                        .map_err(db_err)?;

                    let model = match existing {
                        Some(row) => {
                            if row.liveness == attendance_record::LIVENESS_MOVED {
                                return Err(DomainError::invalid_transition(
                                    "occurrence was rescheduled away",
                                ));
                            }
                            let mut am = row.into_active_model();
                            am.status = Set(mapper::status_to_str(status).to_owned());
                            am.updated_at = Set(Utc::now());
                            am.update(txn).await.map_err(db_err)?
                        }
                        None => {
                            let now = Utc::now();
                            attendance_record::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                student: Set(owner.student),
                                professor: Set(owner.professor),
                                branch: Set(owner.branch.clone()),
                                date: Set(date),
                                origin: Set(attendance_record::ORIGIN_REGULAR.to_owned()),
                                status: Set(mapper::status_to_str(status).to_owned()),
                                liveness: Set(attendance_record::LIVENESS_LIVE.to_owned()),
                                enrollment_id: Set(Some(enrollment_id)),
                                slot_snapshot: Set(Some(mapper::slot_to_json(&slot)?)),
                                reschedule_id: Set(None),
                                adhoc_class_id: Set(None),
                                created_at: Set(now),
                                updated_at: Set(now),
                            }
                            .insert(txn)
                            .await
                            .map_err(db_err)?
                        }
                    };

                    mapper::attendance_to_contract(model)
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn reschedule(
        &self,
        plan: ReschedulePlan,
        destination_capacity: Option<u32>,
    ) -> Result<RescheduleRecord, DomainError> {
        self.db
            .transaction_with_config::<_, RescheduleRecord, DomainError>(move |txn| {
                Box::pin(async move {
                    let owner = load_enrollment_on(txn, plan.enrollment_id).await?;
                    if owner.state != enrollment::STATE_ACTIVA {
                        return Err(DomainError::invalid_transition(
                            "cannot reschedule a cancelled enrollment",
                        ));
                    }

                    // Origin must be a real occurrence of this enrollment:
                    // inside its month, on the origin slot's weekday, and
                    // the slot must be one of the chosen slots.
                    if plan.from_date < month_start(owner.year, owner.month as u32)?
                        || plan.from_date > month_end(owner.year, owner.month as u32)?
                    {
                        return Err(DomainError::validation(
                            "from_date",
                            "origin date is outside the enrollment's month",
                        ));
                    }
                    if weekday_index(plan.from_date) != plan.from_slot.day_of_week {
                        return Err(DomainError::validation(
                            "from_date",
                            "origin date does not fall on the origin slot's weekday",
                        ));
                    }
                    let chosen = mapper::slots_from_json(&owner.chosen_slots)?;
                    if !contains_slot(&chosen, &plan.from_slot) {
                        return Err(DomainError::slot_not_in_schedule(
                            owner.professor,
                            plan.from_slot,
                        ));
                    }

                    // Destination checks happen before any write.
                    ensure_slots_in_schedule(
                        txn,
                        plan.to_professor,
                        plan.to_date,
                        std::slice::from_ref(&plan.to_slot),
                    )
                    .await?;

                    let origin_row = attendance_record::Entity::find()
                        .filter(attendance_record::Column::Student.eq(owner.student))
                        .filter(attendance_record::Column::Professor.eq(owner.professor))
                        .filter(attendance_record::Column::Date.eq(plan.from_date))
                        .filter(
                            attendance_record::Column::Origin
                                .eq(attendance_record::ORIGIN_REGULAR),
                        )
                        .one(txn)
                        .await
                        .map_err(db_err)?;
                    if let Some(row) = &origin_row {
                        if row.status == attendance_record::STATUS_PRESENTE {
                            return Err(DomainError::invalid_transition(
                                "a completed class cannot be rescheduled",
                            ));
                        }
                        if row.liveness == attendance_record::LIVENESS_MOVED {
                            return Err(DomainError::invalid_transition(
                                "occurrence was already rescheduled",
                            ));
                        }
                    }

                    if let Some(capacity) = destination_capacity {
                        let to_year = plan.to_date.year();
                        let to_month = plan.to_date.month();
                        let occupied = assigned_count_on(
                            txn,
                            plan.to_professor,
                            &plan.to_slot,
                            to_year,
                            to_month,
                            None,
                        )
                        .await?
                            + adhoc_occupancy_on(txn, plan.to_professor, plan.to_date, &plan.to_slot)
                                .await?;
                        if occupied >= u64::from(capacity) {
                            return Err(DomainError::slot_full(
                                plan.to_professor,
                                plan.to_slot,
                                capacity,
                            ));
                        }
                    }

                    let now = Utc::now();

                    // 1. Mark the origin occurrence moved.
                    match origin_row {
                        Some(row) => {
                            let mut am = row.into_active_model();
                            am.status =
                                Set(attendance_record::STATUS_REPROGRAMADO.to_owned());
                            am.liveness = Set(attendance_record::LIVENESS_MOVED.to_owned());
                            am.updated_at = Set(now);
                            am.update(txn).await.map_err(db_err)?;
                        }
                        None => {
                            attendance_record::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                student: Set(owner.student),
                                professor: Set(owner.professor),
                                branch: Set(owner.branch.clone()),
                                date: Set(plan.from_date),
                                origin: Set(attendance_record::ORIGIN_REGULAR.to_owned()),
                                status: Set(attendance_record::STATUS_REPROGRAMADO.to_owned()),
                                liveness: Set(attendance_record::LIVENESS_MOVED.to_owned()),
                                enrollment_id: Set(Some(plan.enrollment_id)),
                                slot_snapshot: Set(Some(mapper::slot_to_json(&plan.from_slot)?)),
                                reschedule_id: Set(None),
                                adhoc_class_id: Set(None),
                                created_at: Set(now),
                                updated_at: Set(now),
                            }
                            .insert(txn)
                            .await
                            .map_err(db_err)?;
                        }
                    }

                    // Defensive: the origin may itself have been a prior
                    // reschedule target; soft-remove any ad-hoc row at the
                    // exact same date+slot.
                    let stale_adhoc = attendance_record::Entity::find()
                        .filter(attendance_record::Column::Student.eq(owner.student))
                        .filter(attendance_record::Column::Professor.eq(owner.professor))
                        .filter(attendance_record::Column::Date.eq(plan.from_date))
                        .filter(
                            attendance_record::Column::Origin.eq(attendance_record::ORIGIN_ADHOC),
                        )
                        .filter(
                            attendance_record::Column::Liveness
                                .eq(attendance_record::LIVENESS_LIVE),
                        )
                        .all(txn)
                        .await
                        .map_err(db_err)?;
                    for row in stale_adhoc {
                        let matches = match row.slot_snapshot.as_ref() {
                            Some(snapshot) => mapper::slot_from_json(snapshot)? == plan.from_slot,
                            None => false,
                        };
                        if matches {
                            let mut am = row.into_active_model();
                            am.liveness = Set(attendance_record::LIVENESS_REMOVED.to_owned());
                            am.updated_at = Set(now);
                            am.update(txn).await.map_err(db_err)?;
                        }
                    }

                    // 2. Persist the reschedule link.
                    let record = reschedule::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        enrollment_id: Set(plan.enrollment_id),
                        from_date: Set(plan.from_date),
                        to_date: Set(plan.to_date),
                        from_slot: Set(mapper::slot_to_json(&plan.from_slot)?),
                        to_slot: Set(mapper::slot_to_json(&plan.to_slot)?),
                        from_professor: Set(owner.professor),
                        to_professor: Set(plan.to_professor),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(db_err)?;

                    // 3. Realize the destination as an ad-hoc occurrence,
                    // tracked by snapshot and detached from the enrollment.
                    attendance_record::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        student: Set(owner.student),
                        professor: Set(plan.to_professor),
                        branch: Set(owner.branch.clone()),
                        date: Set(plan.to_date),
                        origin: Set(attendance_record::ORIGIN_ADHOC.to_owned()),
                        status: Set(attendance_record::STATUS_AUSENTE.to_owned()),
                        liveness: Set(attendance_record::LIVENESS_LIVE.to_owned()),
                        enrollment_id: Set(None),
                        slot_snapshot: Set(Some(mapper::slot_to_json(&plan.to_slot)?)),
                        reschedule_id: Set(Some(record.id)),
                        adhoc_class_id: Set(None),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(db_err)?;

                    mapper::reschedule_to_contract(record)
                })
            }, Some(IsolationLevel::Serializable), None)
            .await
            .map_err(txn_err)
    }

    async fn find_reschedule(&self, id: Uuid) -> Result<Option<RescheduleRecord>, DomainError> {
        reschedule::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(mapper::reschedule_to_contract)
            .transpose()
    }

    async fn revert_reschedule(&self, id: Uuid) -> Result<(), DomainError> {
        self.db
            .transaction::<_, (), DomainError>(move |txn| {
                Box::pin(async move {
                    let record = reschedule::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(db_err)?
                        .ok_or_else(|| DomainError::not_found("reschedule", id))?;

                    // Destination rows disappear outright.
                    attendance_record::Entity::delete_many()
                        .filter(attendance_record::Column::RescheduleId.eq(id))
                        .exec(txn)
                        .await
                        .map_err(db_err)?;

                    // The origin must not stay stuck in reprogramado with no
                    // reschedule to justify it: drop the marker row so the
                    // occurrence reads as live again.
                    let origin_rows = attendance_record::Entity::find()
                        .filter(
                            attendance_record::Column::EnrollmentId.eq(record.enrollment_id),
                        )
                        .filter(attendance_record::Column::Date.eq(record.from_date))
                        .filter(
                            attendance_record::Column::Origin
                                .eq(attendance_record::ORIGIN_REGULAR),
                        )
                        .filter(
                            attendance_record::Column::Status
                                .eq(attendance_record::STATUS_REPROGRAMADO),
                        )
                        .all(txn)
                        .await
                        .map_err(db_err)?;
                    for row in origin_rows {
                        attendance_record::Entity::delete_by_id(row.id)
                            .exec(txn)
                            .await
                            .map_err(db_err)?;
                    }

                    reschedule::Entity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn create_adhoc_class(
        &self,
        new_class: NewAdhocClass,
    ) -> Result<AdhocClass, DomainError> {
        self.db
            .transaction::<_, AdhocClass, DomainError>(move |txn| {
                Box::pin(async move {
                    let key = slot_key_string(new_class.professor, &new_class.slot);
                    let existing = adhoc_class::Entity::find()
                        .filter(adhoc_class::Column::Branch.eq(new_class.branch.clone()))
                        .filter(adhoc_class::Column::Date.eq(new_class.date))
                        .filter(adhoc_class::Column::SlotKey.eq(key.clone()))
                        .filter(adhoc_class::Column::Removed.eq(false))
                        .one(txn)
                        .await
                        .map_err(db_err)?;
                    if existing.is_some() {
                        return Err(DomainError::validation(
                            "adhoc_class",
                            "an ad-hoc class already exists at that date and slot",
                        ));
                    }

                    let model = adhoc_class::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        professor: Set(new_class.professor),
                        branch: Set(new_class.branch),
                        date: Set(new_class.date),
                        slot: Set(mapper::slot_to_json(&new_class.slot)?),
                        slot_key: Set(key),
                        capacity: Set(new_class.capacity.max(1) as i32),
                        removed: Set(false),
                        created_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await
                    .map_err(|e| {
                        if is_unique_violation(&e) {
                            DomainError::validation(
                                "adhoc_class",
                                "an ad-hoc class already exists at that date and slot",
                            )
                        } else {
                            db_err(e)
                        }
                    })?;

                    mapper::adhoc_to_contract(model)
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn remove_adhoc_class(&self, id: Uuid) -> Result<(), DomainError> {
        self.db
            .transaction::<_, (), DomainError>(move |txn| {
                Box::pin(async move {
                    let class = adhoc_class::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(db_err)?
                        .ok_or_else(|| DomainError::not_found("adhoc_class", id))?;
                    if class.removed {
                        return Ok(());
                    }

                    let now = Utc::now();
                    let mut am = class.into_active_model();
                    am.removed = Set(true);
                    am.update(txn).await.map_err(db_err)?;

                    let roster = attendance_record::Entity::find()
                        .filter(attendance_record::Column::AdhocClassId.eq(id))
                        .filter(
                            attendance_record::Column::Liveness
                                .eq(attendance_record::LIVENESS_LIVE),
                        )
                        .all(txn)
                        .await
                        .map_err(db_err)?;
                    for row in roster {
                        let mut am = row.into_active_model();
                        am.liveness = Set(attendance_record::LIVENESS_REMOVED.to_owned());
                        am.updated_at = Set(now);
                        am.update(txn).await.map_err(db_err)?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn join_adhoc_class(
        &self,
        id: Uuid,
        student: Uuid,
    ) -> Result<AttendanceRecord, DomainError> {
        self.db
            .transaction_with_config::<_, AttendanceRecord, DomainError>(move |txn| {
                Box::pin(async move {
                    let class = adhoc_class::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(db_err)?
                        .filter(|c| !c.removed)
                        .ok_or_else(|| DomainError::not_found("adhoc_class", id))?;
                    let slot = mapper::slot_from_json(&class.slot)?;

                    let roster = attendance_record::Entity::find()
                        .filter(attendance_record::Column::AdhocClassId.eq(id))
                        .filter(
                            attendance_record::Column::Liveness
                                .eq(attendance_record::LIVENESS_LIVE),
                        )
                        .all(txn)
                        .await
                        .map_err(db_err)?;
                    if let Some(existing) = roster.iter().find(|r| r.student == student) {
                        return mapper::attendance_to_contract(existing.clone());
                    }

                    let capacity = class.capacity.max(1) as u64;
                    if roster.len() as u64 >= capacity {
                        return Err(DomainError::slot_full(
                            class.professor,
                            slot,
                            capacity as u32,
                        ));
                    }

                    let now = Utc::now();
                    let model = attendance_record::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        student: Set(student),
                        professor: Set(class.professor),
                        branch: Set(class.branch.clone()),
                        date: Set(class.date),
                        origin: Set(attendance_record::ORIGIN_ADHOC.to_owned()),
                        status: Set(attendance_record::STATUS_AUSENTE.to_owned()),
                        liveness: Set(attendance_record::LIVENESS_LIVE.to_owned()),
                        enrollment_id: Set(None),
                        slot_snapshot: Set(Some(mapper::slot_to_json(&slot)?)),
                        reschedule_id: Set(None),
                        adhoc_class_id: Set(Some(id)),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(db_err)?;

                    mapper::attendance_to_contract(model)
                })
            }, Some(IsolationLevel::Serializable), None)
            .await
            .map_err(txn_err)
    }
}
