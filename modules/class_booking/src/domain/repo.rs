use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::contract::model::{
    AdhocClass, AttendanceRecord, AttendanceStatus, Enrollment, NewAdhocClass, NewEnrollment,
    ReschedulePlan, RescheduleRecord, ScheduleRevision, ScheduleVersion, Slot,
};
use crate::domain::error::DomainError;

/// Port for the domain layer: persistence operations the booking core needs.
///
/// Every mutating method is a single atomic unit: schedule-membership and
/// capacity checks run inside the same transaction as the write they guard,
/// so two concurrent requests for the last seat cannot both succeed. The
/// `capacity` parameters carry the already-resolved ceiling for the
/// professor the operation targets; the service computes them from the
/// directory and the configured default.
#[async_trait]
pub trait ClassBookingRepository: Send + Sync {
    // --- schedule store ---

    /// Version where `effective_from <= as_of` and `effective_to` is unset
    /// or `>= as_of`. On (invariant-violating) overlap the most recently
    /// started version wins.
    async fn find_active_version(
        &self,
        professor: Uuid,
        as_of: NaiveDate,
    ) -> Result<Option<ScheduleVersion>, DomainError>;

    /// Close the open version at `effective_from - 1 day`, open a new one,
    /// and best-effort reassign assigned enrollments for months the new
    /// version covers whose slots vanished (else unassign them). Atomic: a
    /// reader never observes zero or two open versions.
    async fn revise_schedule(
        &self,
        professor: Uuid,
        branch: &str,
        slots: Vec<Slot>,
        effective_from: NaiveDate,
        capacity: u32,
    ) -> Result<ScheduleRevision, DomainError>;

    // --- enrollments ---

    async fn find_enrollment(&self, id: Uuid) -> Result<Option<Enrollment>, DomainError>;

    /// Assigned active enrollments occupying `slot` in the month,
    /// optionally excluding one enrollment (its own prior occupancy).
    async fn assigned_count(
        &self,
        professor: Uuid,
        slot: &Slot,
        year: i32,
        month: u32,
        exclude: Option<Uuid>,
    ) -> Result<u64, DomainError>;

    async fn create_enrollment(
        &self,
        new_enrollment: NewEnrollment,
        capacity: u32,
    ) -> Result<Enrollment, DomainError>;

    async fn change_slots(
        &self,
        id: Uuid,
        new_slots: Vec<Slot>,
        assign_now: bool,
        target_professor: Option<Uuid>,
        capacity: u32,
    ) -> Result<Enrollment, DomainError>;

    async fn set_assigned(
        &self,
        id: Uuid,
        assigned: bool,
        capacity: u32,
    ) -> Result<Enrollment, DomainError>;

    async fn cancel_enrollment(&self, id: Uuid) -> Result<Enrollment, DomainError>;

    /// Hard delete; dependent reschedules and ledger rows go in the same
    /// transaction.
    async fn delete_enrollment(&self, id: Uuid) -> Result<(), DomainError>;

    // --- attendance ledger ---

    /// All ledger rows for the student falling inside the month, across
    /// professors (reschedule destinations may live elsewhere).
    async fn month_attendance(
        &self,
        student: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<AttendanceRecord>, DomainError>;

    /// Lazy upsert of the regular-origin row at `date` with `status`.
    async fn set_attendance(
        &self,
        enrollment_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, DomainError>;

    // --- reschedules ---

    /// The three compensating writes of a reschedule in one transaction.
    /// `destination_capacity` of `None` skips the destination capacity
    /// check.
    async fn reschedule(
        &self,
        plan: ReschedulePlan,
        destination_capacity: Option<u32>,
    ) -> Result<RescheduleRecord, DomainError>;

    async fn find_reschedule(&self, id: Uuid) -> Result<Option<RescheduleRecord>, DomainError>;

    async fn revert_reschedule(&self, id: Uuid) -> Result<(), DomainError>;

    // --- ad-hoc classes ---

    async fn create_adhoc_class(
        &self,
        new_class: NewAdhocClass,
    ) -> Result<AdhocClass, DomainError>;

    async fn remove_adhoc_class(&self, id: Uuid) -> Result<(), DomainError>;

    async fn join_adhoc_class(
        &self,
        id: Uuid,
        student: Uuid,
    ) -> Result<AttendanceRecord, DomainError>;
}
