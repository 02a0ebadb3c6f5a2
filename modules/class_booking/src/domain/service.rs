use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::ClassBookingConfig;
use crate::contract::model::{
    AdhocClass, AttendanceRecord, AttendanceStatus, Enrollment, NewAdhocClass, NewEnrollment,
    OccurrenceLiveness, OccurrenceOrigin, OccurrenceView, ReschedulePlan, RescheduleRecord,
    ScheduleRevision, ScheduleVersion, Slot,
};
use crate::domain::error::DomainError;
use crate::domain::events::BookingEvent;
use crate::domain::occurrence::{self, weekday_index};
use crate::domain::ports::{EventPublisher, Notifier, ProfessorDirectory};
use crate::domain::repo::ClassBookingRepository;
use crate::domain::slot::validate_chosen_slots;

/// Domain service with the booking business rules.
/// Depends only on the repository and collaborator ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ClassBookingRepository>,
    directory: Arc<dyn ProfessorDirectory>,
    notifier: Arc<dyn Notifier>,
    events: Arc<dyn EventPublisher<BookingEvent>>,
    config: ClassBookingConfig,
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        repo: Arc<dyn ClassBookingRepository>,
        directory: Arc<dyn ProfessorDirectory>,
        notifier: Arc<dyn Notifier>,
        events: Arc<dyn EventPublisher<BookingEvent>>,
        config: ClassBookingConfig,
    ) -> Self {
        Self {
            repo,
            directory,
            notifier,
            events,
            config,
        }
    }

    // --- schedule store ---

    #[instrument(name = "class_booking.service.active_schedule", skip(self), fields(professor = %professor))]
    pub async fn active_schedule(
        &self,
        professor: Uuid,
        as_of: NaiveDate,
    ) -> Result<Option<ScheduleVersion>, DomainError> {
        debug!("Resolving active schedule version");
        self.repo.find_active_version(professor, as_of).await
    }

    #[instrument(
        name = "class_booking.service.revise_schedule",
        skip(self, new_slots),
        fields(professor = %professor, slot_count = new_slots.len())
    )]
    pub async fn revise_schedule(
        &self,
        professor: Uuid,
        branch: String,
        new_slots: Vec<Slot>,
        effective_from: NaiveDate,
    ) -> Result<ScheduleRevision, DomainError> {
        info!("Revising schedule");

        for slot in &new_slots {
            slot.validate()?;
        }
        let capacity = self.professor_capacity(professor).await?;

        let revision = self
            .repo
            .revise_schedule(professor, &branch, new_slots, effective_from, capacity)
            .await?;

        if revision.reassigned > 0 {
            warn!(
                reassigned = revision.reassigned,
                "Revision touched assigned enrollments"
            );
        }
        self.events.publish(&BookingEvent::ScheduleRevised {
            professor,
            reassigned: revision.reassigned,
            at: Utc::now(),
        });

        info!("Successfully revised schedule");
        Ok(revision)
    }

    // --- capacity ---

    #[instrument(name = "class_booking.service.remaining_capacity", skip(self), fields(professor = %professor))]
    pub async fn remaining_capacity(
        &self,
        professor: Uuid,
        slot: Slot,
        year: i32,
        month: u32,
    ) -> Result<u32, DomainError> {
        slot.validate()?;
        occurrence::month_start(year, month)?;
        let capacity = self.professor_capacity(professor).await?;
        let occupied = self
            .repo
            .assigned_count(professor, &slot, year, month, None)
            .await?;
        Ok(capacity.saturating_sub(occupied.min(u64::from(u32::MAX)) as u32))
    }

    // --- enrollments ---

    #[instrument(
        name = "class_booking.service.create_enrollment",
        skip(self, new_enrollment),
        fields(student = %new_enrollment.student, professor = %new_enrollment.professor)
    )]
    pub async fn create_enrollment(
        &self,
        new_enrollment: NewEnrollment,
    ) -> Result<Enrollment, DomainError> {
        info!("Creating enrollment");

        validate_chosen_slots(&new_enrollment.chosen_slots)?;
        occurrence::month_start(new_enrollment.year, new_enrollment.month)?;
        let capacity = self.professor_capacity(new_enrollment.professor).await?;

        let enrollment = self.repo.create_enrollment(new_enrollment, capacity).await?;

        // Usage counter bump is a collaborator concern; never fails the booking.
        if let Err(e) = self.notifier.increment_usage(enrollment.student).await {
            debug!("Usage notification failed (continuing): {}", e);
        }
        self.events.publish(&BookingEvent::EnrollmentCreated {
            id: enrollment.id,
            at: enrollment.created_at,
        });

        info!("Successfully created enrollment with id={}", enrollment.id);
        Ok(enrollment)
    }

    #[instrument(name = "class_booking.service.get_enrollment", skip(self), fields(enrollment_id = %id))]
    pub async fn get_enrollment(&self, id: Uuid) -> Result<Enrollment, DomainError> {
        self.repo
            .find_enrollment(id)
            .await?
            .ok_or_else(|| DomainError::not_found("enrollment", id))
    }

    #[instrument(
        name = "class_booking.service.change_slots",
        skip(self, new_slots),
        fields(enrollment_id = %id)
    )]
    pub async fn change_slots(
        &self,
        id: Uuid,
        new_slots: Vec<Slot>,
        assign_now: bool,
        target_professor: Option<Uuid>,
    ) -> Result<Enrollment, DomainError> {
        info!("Changing enrollment slots");

        validate_chosen_slots(&new_slots)?;

        // Capacity belongs to whichever professor the enrollment lands on.
        let current = self.get_enrollment(id).await?;
        let professor = target_professor.unwrap_or(current.professor);
        let capacity = self.professor_capacity(professor).await?;

        let enrollment = self
            .repo
            .change_slots(id, new_slots, assign_now, target_professor, capacity)
            .await?;

        if let Err(e) = self.notifier.booking_changed(enrollment.student).await {
            debug!("Change notification failed (continuing): {}", e);
        }
        self.events.publish(&BookingEvent::SlotsChanged {
            id: enrollment.id,
            at: enrollment.updated_at,
        });

        info!("Successfully changed slots");
        Ok(enrollment)
    }

    #[instrument(name = "class_booking.service.set_assigned", skip(self), fields(enrollment_id = %id))]
    pub async fn set_assigned(
        &self,
        id: Uuid,
        assigned: bool,
    ) -> Result<Enrollment, DomainError> {
        info!("Setting assigned={}", assigned);

        let current = self.get_enrollment(id).await?;
        let capacity = self.professor_capacity(current.professor).await?;
        let enrollment = self.repo.set_assigned(id, assigned, capacity).await?;

        let event = if assigned {
            BookingEvent::Assigned {
                id,
                at: enrollment.updated_at,
            }
        } else {
            BookingEvent::Unassigned {
                id,
                at: enrollment.updated_at,
            }
        };
        self.events.publish(&event);
        Ok(enrollment)
    }

    #[instrument(name = "class_booking.service.cancel_enrollment", skip(self), fields(enrollment_id = %id))]
    pub async fn cancel_enrollment(&self, id: Uuid) -> Result<Enrollment, DomainError> {
        info!("Cancelling enrollment");
        let enrollment = self.repo.cancel_enrollment(id).await?;
        self.events.publish(&BookingEvent::Cancelled {
            id,
            at: enrollment.updated_at,
        });
        Ok(enrollment)
    }

    #[instrument(name = "class_booking.service.delete_enrollment", skip(self), fields(enrollment_id = %id))]
    pub async fn delete_enrollment(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting enrollment");
        self.repo.delete_enrollment(id).await?;
        self.events
            .publish(&BookingEvent::Deleted { id, at: Utc::now() });
        info!("Successfully deleted enrollment");
        Ok(())
    }

    // --- occurrences & attendance ---

    /// Expansion with the ledger overlaid. Regular occurrences covered by a
    /// moved or removed ledger row lose their `live` flag; ad-hoc rows
    /// (reschedule destinations, one-off classes) are appended from their
    /// slot snapshots.
    #[instrument(name = "class_booking.service.month_occurrences", skip(self), fields(enrollment_id = %enrollment_id))]
    pub async fn month_occurrences(
        &self,
        enrollment_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<OccurrenceView>, DomainError> {
        debug!("Resolving month occurrences");

        let enrollment = self.get_enrollment(enrollment_id).await?;
        let expanded = occurrence::expand(&enrollment.chosen_slots, year, month)?;
        let ledger = self
            .repo
            .month_attendance(enrollment.student, year, month)
            .await?;

        let mut views: Vec<OccurrenceView> = expanded
            .into_iter()
            .map(|occ| {
                // Matched by enrollment, not professor: attendance recorded
                // before a professor switch stays visible.
                let record = ledger.iter().find(|r| {
                    r.origin == OccurrenceOrigin::Regular
                        && r.enrollment_id == Some(enrollment.id)
                        && r.date == occ.date
                });
                OccurrenceView {
                    date: occ.date,
                    starts_at: occ.starts_at,
                    slot: occ.slot,
                    origin: OccurrenceOrigin::Regular,
                    professor: enrollment.professor,
                    status: record.map(|r| r.status),
                    live: record.map_or(true, |r| r.liveness == OccurrenceLiveness::Live),
                }
            })
            .collect();

        for record in &ledger {
            if record.origin != OccurrenceOrigin::Adhoc {
                continue;
            }
            let Some(slot) = record.slot_snapshot else {
                continue;
            };
            views.push(OccurrenceView {
                date: record.date,
                starts_at: occurrence::starts_at(record.date, &slot),
                slot,
                origin: OccurrenceOrigin::Adhoc,
                professor: record.professor,
                status: Some(record.status),
                live: record.liveness == OccurrenceLiveness::Live,
            });
        }

        views.sort_by_key(|v| (v.date, v.slot.start_min));
        Ok(views)
    }

    #[instrument(
        name = "class_booking.service.set_attendance",
        skip(self),
        fields(enrollment_id = %enrollment_id, date = %date)
    )]
    pub async fn set_attendance(
        &self,
        enrollment_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, DomainError> {
        info!("Setting attendance");
        self.repo.set_attendance(enrollment_id, date, status).await
    }

    // --- reschedules ---

    #[instrument(
        name = "class_booking.service.reschedule_occurrence",
        skip(self, plan),
        fields(enrollment_id = %plan.enrollment_id, to_professor = %plan.to_professor)
    )]
    pub async fn reschedule_occurrence(
        &self,
        plan: ReschedulePlan,
    ) -> Result<RescheduleRecord, DomainError> {
        info!("Rescheduling occurrence");

        plan.from_slot.validate()?;
        plan.to_slot.validate()?;
        if weekday_index(plan.to_date) != plan.to_slot.day_of_week {
            return Err(DomainError::validation(
                "to_date",
                "destination date does not fall on the destination slot's weekday",
            ));
        }

        let destination_capacity = if self.config.enforce_reschedule_capacity {
            Some(self.professor_capacity(plan.to_professor).await?)
        } else {
            None
        };

        let record = self.repo.reschedule(plan, destination_capacity).await?;

        self.events.publish(&BookingEvent::Rescheduled {
            id: record.id,
            enrollment_id: record.enrollment_id,
            at: record.created_at,
        });

        info!("Successfully rescheduled occurrence, id={}", record.id);
        Ok(record)
    }

    #[instrument(name = "class_booking.service.revert_reschedule", skip(self), fields(reschedule_id = %id))]
    pub async fn revert_reschedule(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Reverting reschedule");
        self.repo.revert_reschedule(id).await?;
        self.events
            .publish(&BookingEvent::RescheduleReverted { id, at: Utc::now() });
        info!("Successfully reverted reschedule");
        Ok(())
    }

    // --- ad-hoc classes ---

    #[instrument(
        name = "class_booking.service.create_adhoc_class",
        skip(self, new_class),
        fields(professor = %new_class.professor, date = %new_class.date)
    )]
    pub async fn create_adhoc_class(
        &self,
        new_class: NewAdhocClass,
    ) -> Result<AdhocClass, DomainError> {
        info!("Creating ad-hoc class");
        new_class.slot.validate()?;
        if weekday_index(new_class.date) != new_class.slot.day_of_week {
            return Err(DomainError::validation(
                "date",
                "date does not fall on the slot's weekday",
            ));
        }
        // Professor must exist and be active, mirroring enrollment creation.
        self.professor_capacity(new_class.professor).await?;
        self.repo.create_adhoc_class(new_class).await
    }

    #[instrument(name = "class_booking.service.remove_adhoc_class", skip(self), fields(adhoc_class_id = %id))]
    pub async fn remove_adhoc_class(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Removing ad-hoc class");
        self.repo.remove_adhoc_class(id).await
    }

    #[instrument(
        name = "class_booking.service.join_adhoc_class",
        skip(self),
        fields(adhoc_class_id = %id, student = %student)
    )]
    pub async fn join_adhoc_class(
        &self,
        id: Uuid,
        student: Uuid,
    ) -> Result<AttendanceRecord, DomainError> {
        info!("Joining ad-hoc class");
        self.repo.join_adhoc_class(id, student).await
    }

    // --- helpers ---

    /// Resolve the professor's capacity ceiling: directory value when set,
    /// else the configured default, floored at 1. Inactive professors
    /// reject all booking traffic.
    async fn professor_capacity(&self, professor: Uuid) -> Result<u32, DomainError> {
        let profile = self
            .directory
            .find_professor(professor)
            .await?
            .ok_or_else(|| DomainError::not_found("professor", professor))?;
        if !profile.active {
            return Err(DomainError::validation(
                "professor",
                format!("professor {professor} is inactive"),
            ));
        }
        Ok(profile
            .capacity
            .unwrap_or(self.config.default_capacity)
            .max(1))
    }
}
