use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Transport-agnostic domain event.
#[derive(Debug, Clone)]
pub enum BookingEvent {
    EnrollmentCreated { id: Uuid, at: DateTime<Utc> },
    SlotsChanged { id: Uuid, at: DateTime<Utc> },
    Assigned { id: Uuid, at: DateTime<Utc> },
    Unassigned { id: Uuid, at: DateTime<Utc> },
    Cancelled { id: Uuid, at: DateTime<Utc> },
    Deleted { id: Uuid, at: DateTime<Utc> },
    ScheduleRevised {
        professor: Uuid,
        reassigned: u32,
        at: DateTime<Utc>,
    },
    Rescheduled {
        id: Uuid,
        enrollment_id: Uuid,
        at: DateTime<Utc>,
    },
    RescheduleReverted { id: Uuid, at: DateTime<Utc> },
}
