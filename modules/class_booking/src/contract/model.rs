use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring weekly time window inside a professor's schedule.
///
/// `day_of_week` is 0..=6 with 0 = Sunday (the origin calendar convention).
/// Minutes are minute-of-day; `start_min < end_min` always holds for values
/// built through [`Slot::new`]. Serde derives exist because slots are also
/// persisted as JSON snapshots; equality is structural across all three
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub day_of_week: u8,
    pub start_min: u16,
    pub end_min: u16,
}

/// A time-bounded set of weekly slots valid for one professor.
///
/// `effective_to = None` means open-ended (the currently active version).
/// Versions for a professor never overlap in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleVersion {
    pub id: Uuid,
    pub professor: Uuid,
    pub branch: String,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub slots: Vec<Slot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a schedule revision: the newly opened version plus the number
/// of assigned enrollments that had to be reassigned or unassigned because
/// a slot they depended on disappeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRevision {
    pub version: ScheduleVersion,
    pub reassigned: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentState {
    Activa,
    Cancelada,
}

/// A student's monthly booking of 1..=2 weekly slots with one professor.
/// Only `assigned = true` enrollments count against slot capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub id: Uuid,
    pub student: Uuid,
    pub professor: Uuid,
    pub branch: String,
    pub year: i32,
    pub month: u32,
    pub chosen_slots: Vec<Slot>,
    pub assigned: bool,
    pub state: EnrollmentState,
    pub payment_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
    pub student: Uuid,
    pub professor: Uuid,
    pub branch: String,
    pub year: i32,
    pub month: u32,
    pub chosen_slots: Vec<Slot>,
    pub assign_now: bool,
    pub payment_note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceOrigin {
    Regular,
    Adhoc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Presente,
    Ausente,
    Reprogramado,
}

/// Single-lookup liveness state for an occurrence record. `Moved` covers an
/// origin occurrence hidden by a reschedule; `Removed` is the soft-delete
/// state kept for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceLiveness {
    Live,
    Moved,
    Removed,
}

/// One row of the attendance ledger, shared by regular and ad-hoc sources
/// and partitioned by `origin` so the two never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student: Uuid,
    pub professor: Uuid,
    pub branch: String,
    pub date: NaiveDate,
    pub origin: OccurrenceOrigin,
    pub status: AttendanceStatus,
    pub liveness: OccurrenceLiveness,
    /// Backing enrollment for `Regular` rows; `Adhoc` rows stay detached.
    pub enrollment_id: Option<Uuid>,
    /// Slot at the time the record was created; `Adhoc` rows are tracked by
    /// snapshot rather than by live schedule membership.
    pub slot_snapshot: Option<Slot>,
    pub reschedule_id: Option<Uuid>,
    pub adhoc_class_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single approved move of one occurrence. Its existence is what makes the
/// destination occurrence real and the origin occurrence absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescheduleRecord {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub from_slot: Slot,
    pub to_slot: Slot,
    pub from_professor: Uuid,
    pub to_professor: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request to move one occurrence of an enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReschedulePlan {
    pub enrollment_id: Uuid,
    pub from_date: NaiveDate,
    pub from_slot: Slot,
    pub to_date: NaiveDate,
    pub to_professor: Uuid,
    pub to_slot: Slot,
}

/// A professor-initiated one-off class with its own capacity and roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdhocClass {
    pub id: Uuid,
    pub professor: Uuid,
    pub branch: String,
    pub date: NaiveDate,
    pub slot: Slot,
    pub capacity: u32,
    pub removed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdhocClass {
    pub professor: Uuid,
    pub branch: String,
    pub date: NaiveDate,
    pub slot: Slot,
    pub capacity: u32,
}

/// One concrete calendar instance of a recurring slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub starts_at: DateTime<Utc>,
    pub slot: Slot,
}

/// Month view of an enrollment's occurrences with the attendance ledger
/// overlaid: recurring expansions plus any ad-hoc rows (reschedule
/// destinations) landing in the same month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceView {
    pub date: NaiveDate,
    pub starts_at: DateTime<Utc>,
    pub slot: Slot,
    pub origin: OccurrenceOrigin,
    pub professor: Uuid,
    pub status: Option<AttendanceStatus>,
    pub live: bool,
}
