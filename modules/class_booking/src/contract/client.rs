use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::contract::{
    error::ClassBookingError,
    model::{
        AdhocClass, AttendanceRecord, AttendanceStatus, Enrollment, NewAdhocClass, NewEnrollment,
        OccurrenceView, ReschedulePlan, RescheduleRecord, ScheduleRevision, ScheduleVersion, Slot,
    },
};

/// Public API trait for the class_booking module that other modules can use.
///
/// All dates are UTC, day-truncated; `year`/`month` are Gregorian with month
/// in 1..=12. Every mutating call is atomic: on error nothing was written.
#[async_trait]
pub trait ClassBookingApi: Send + Sync {
    // --- schedule store ---

    /// Resolve the schedule version active for `professor` on `as_of`.
    async fn active_schedule(
        &self,
        professor: Uuid,
        as_of: NaiveDate,
    ) -> Result<Option<ScheduleVersion>, ClassBookingError>;

    /// Close the open schedule version and open a new one starting at
    /// `effective_from`. Returns the new version and how many assigned
    /// enrollments were reassigned or unassigned because their slot vanished.
    async fn revise_schedule(
        &self,
        professor: Uuid,
        branch: String,
        new_slots: Vec<Slot>,
        effective_from: NaiveDate,
    ) -> Result<ScheduleRevision, ClassBookingError>;

    // --- capacity ---

    /// Seats still open for `slot` of `professor` in the given month.
    async fn remaining_capacity(
        &self,
        professor: Uuid,
        slot: Slot,
        year: i32,
        month: u32,
    ) -> Result<u32, ClassBookingError>;

    // --- enrollments ---

    async fn create_enrollment(
        &self,
        new_enrollment: NewEnrollment,
    ) -> Result<Enrollment, ClassBookingError>;

    async fn get_enrollment(&self, id: Uuid) -> Result<Enrollment, ClassBookingError>;

    /// Replace the enrollment's chosen slots, optionally moving it to
    /// another professor. Capacity is re-checked when the enrollment is
    /// already assigned or `assign_now` is set.
    async fn change_slots(
        &self,
        id: Uuid,
        new_slots: Vec<Slot>,
        assign_now: bool,
        target_professor: Option<Uuid>,
    ) -> Result<Enrollment, ClassBookingError>;

    /// Flip the assigned flag. Assigning re-validates schedule membership
    /// and capacity; unassigning always succeeds for active enrollments.
    async fn set_assigned(&self, id: Uuid, assigned: bool)
        -> Result<Enrollment, ClassBookingError>;

    /// `Activa -> Cancelada`, terminal. Frees capacity.
    async fn cancel_enrollment(&self, id: Uuid) -> Result<Enrollment, ClassBookingError>;

    /// Hard delete, cascading to dependent reschedule records.
    async fn delete_enrollment(&self, id: Uuid) -> Result<(), ClassBookingError>;

    // --- occurrences & attendance ---

    /// Expand the enrollment's slots over the month and overlay the
    /// attendance ledger, including ad-hoc rows landing in the month.
    async fn month_occurrences(
        &self,
        enrollment_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<OccurrenceView>, ClassBookingError>;

    /// Lazily upsert the regular-origin attendance record for one
    /// occurrence and set its status (check-in).
    async fn set_attendance(
        &self,
        enrollment_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, ClassBookingError>;

    // --- reschedules ---

    /// Move a single occurrence to a new date/professor/slot.
    async fn reschedule_occurrence(
        &self,
        plan: ReschedulePlan,
    ) -> Result<RescheduleRecord, ClassBookingError>;

    /// Undo a reschedule: the origin occurrence becomes live again and the
    /// destination occurrence disappears.
    async fn revert_reschedule(&self, reschedule_id: Uuid) -> Result<(), ClassBookingError>;

    // --- ad-hoc classes ---

    async fn create_adhoc_class(
        &self,
        new_class: NewAdhocClass,
    ) -> Result<AdhocClass, ClassBookingError>;

    async fn remove_adhoc_class(&self, id: Uuid) -> Result<(), ClassBookingError>;

    async fn join_adhoc_class(
        &self,
        id: Uuid,
        student: Uuid,
    ) -> Result<AttendanceRecord, ClassBookingError>;
}
