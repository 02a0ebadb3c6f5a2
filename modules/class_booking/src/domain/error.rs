use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::Slot;

/// Domain-specific errors using thiserror.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: Uuid },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

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

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn not_found(what: &'static str, id: Uuid) -> Self {
        Self::NotFound { what, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn slot_not_in_schedule(professor: Uuid, slot: Slot) -> Self {
        Self::SlotNotInSchedule { professor, slot }
    }

    pub fn slot_full(professor: Uuid, slot: Slot, capacity: u32) -> Self {
        Self::SlotFull {
            professor,
            slot,
            capacity,
        }
    }

    pub fn duplicate_active_enrollment(
        student: Uuid,
        professor: Uuid,
        year: i32,
        month: u32,
    ) -> Self {
        Self::DuplicateActiveEnrollment {
            student,
            professor,
            year,
            month,
        }
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
