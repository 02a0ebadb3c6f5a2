use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::Slot;

/// Errors that are safe to expose to other modules.
///
/// Each variant maps one-to-one onto a retry decision for the caller:
/// `SlotFull` is retryable with a different slot, `Internal` is retryable
/// as-is, the rest require fixing the request.
#[derive(Error, Debug, Clone)]
pub enum ClassBookingError {
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: Uuid },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Slot {slot:?} is not part of professor {professor}'s active schedule")]
    SlotNotInSchedule { professor: Uuid, slot: Slot },

    #[error("Slot {slot:?} of professor {professor} is full (capacity {capacity})")]
    SlotFull {
        professor: Uuid,
        slot: Slot,
        capacity: u32,
    },

    #[error("Student {student} already has an active enrollment with professor {professor} for {year}-{month:02}")]
    DuplicateActiveEnrollment {
        student: Uuid,
        professor: Uuid,
        year: i32,
        month: u32,
    },

    #[error("Invalid transition: {message}")]
    InvalidTransition { message: String },

    #[error("Internal error")]
    Internal,
}

impl ClassBookingError {
    pub fn not_found(what: &'static str, id: Uuid) -> Self {
        Self::NotFound { what, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for ClassBookingError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError as E;
        match domain_error {
            E::NotFound { what, id } => Self::NotFound { what, id },
            E::Validation { field, message } => {
                Self::validation(format!("{}: {}", field, message))
            }
            E::SlotNotInSchedule { professor, slot } => {
                Self::SlotNotInSchedule { professor, slot }
            }
            E::SlotFull {
                professor,
                slot,
                capacity,
            } => Self::SlotFull {
                professor,
                slot,
                capacity,
            },
            E::DuplicateActiveEnrollment {
                student,
                professor,
                year,
                month,
            } => Self::DuplicateActiveEnrollment {
                student,
                professor,
                year,
                month,
            },
            E::InvalidTransition { message } => Self::InvalidTransition { message },
            E::Storage { .. } => Self::internal(),
        }
    }
}
