use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::contract::{
    client::ClassBookingApi,
    error::ClassBookingError,
    model::{
        AdhocClass, AttendanceRecord, AttendanceStatus, Enrollment, NewAdhocClass, NewEnrollment,
        OccurrenceView, ReschedulePlan, RescheduleRecord, ScheduleRevision, ScheduleVersion, Slot,
    },
};
use crate::domain::service::Service;

/// Local implementation of the ClassBookingApi trait that delegates to the
/// domain service.
pub struct ClassBookingLocalClient {
    service: Arc<Service>,
}

impl ClassBookingLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ClassBookingApi for ClassBookingLocalClient {
    async fn active_schedule(
        &self,
        professor: Uuid,
        as_of: NaiveDate,
    ) -> Result<Option<ScheduleVersion>, ClassBookingError> {
        self.service
            .active_schedule(professor, as_of)
            .await
            .map_err(Into::into)
    }

    async fn revise_schedule(
        &self,
        professor: Uuid,
        branch: String,
        new_slots: Vec<Slot>,
        effective_from: NaiveDate,
    ) -> Result<ScheduleRevision, ClassBookingError> {
        self.service
            .revise_schedule(professor, branch, new_slots, effective_from)
            .await
            .map_err(Into::into)
    }

    async fn remaining_capacity(
        &self,
        professor: Uuid,
        slot: Slot,
        year: i32,
        month: u32,
    ) -> Result<u32, ClassBookingError> {
        self.service
            .remaining_capacity(professor, slot, year, month)
            .await
            .map_err(Into::into)
    }

    async fn create_enrollment(
        &self,
        new_enrollment: NewEnrollment,
    ) -> Result<Enrollment, ClassBookingError> {
        self.service
            .create_enrollment(new_enrollment)
            .await
            .map_err(Into::into)
    }

    async fn get_enrollment(&self, id: Uuid) -> Result<Enrollment, ClassBookingError> {
        self.service.get_enrollment(id).await.map_err(Into::into)
    }

    async fn change_slots(
        &self,
        id: Uuid,
        new_slots: Vec<Slot>,
        assign_now: bool,
        target_professor: Option<Uuid>,
    ) -> Result<Enrollment, ClassBookingError> {
        self.service
            .change_slots(id, new_slots, assign_now, target_professor)
            .await
            .map_err(Into::into)
    }

    async fn set_assigned(
        &self,
        id: Uuid,
        assigned: bool,
    ) -> Result<Enrollment, ClassBookingError> {
        self.service
            .set_assigned(id, assigned)
            .await
            .map_err(Into::into)
    }

    async fn cancel_enrollment(&self, id: Uuid) -> Result<Enrollment, ClassBookingError> {
        self.service.cancel_enrollment(id).await.map_err(Into::into)
    }

    async fn delete_enrollment(&self, id: Uuid) -> Result<(), ClassBookingError> {
        self.service.delete_enrollment(id).await.map_err(Into::into)
    }

    async fn month_occurrences(
        &self,
        enrollment_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<OccurrenceView>, ClassBookingError> {
        self.service
            .month_occurrences(enrollment_id, year, month)
            .await
            .map_err(Into::into)
    }

    async fn set_attendance(
        &self,
        enrollment_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, ClassBookingError> {
        self.service
            .set_attendance(enrollment_id, date, status)
            .await
            .map_err(Into::into)
    }

    async fn reschedule_occurrence(
        &self,
        plan: ReschedulePlan,
    ) -> Result<RescheduleRecord, ClassBookingError> {
        self.service
            .reschedule_occurrence(plan)
            .await
            .map_err(Into::into)
    }

    async fn revert_reschedule(&self, reschedule_id: Uuid) -> Result<(), ClassBookingError> {
        self.service
            .revert_reschedule(reschedule_id)
            .await
            .map_err(Into::into)
    }

    async fn create_adhoc_class(
        &self,
        new_class: NewAdhocClass,
    ) -> Result<AdhocClass, ClassBookingError> {
        self.service
            .create_adhoc_class(new_class)
            .await
            .map_err(Into::into)
    }

    async fn remove_adhoc_class(&self, id: Uuid) -> Result<(), ClassBookingError> {
        self.service.remove_adhoc_class(id).await.map_err(Into::into)
    }

    async fn join_adhoc_class(
        &self,
        id: Uuid,
        student: Uuid,
    ) -> Result<AttendanceRecord, ClassBookingError> {
        self.service
            .join_adhoc_class(id, student)
            .await
            .map_err(Into::into)
    }
}
