pub mod adhoc_class;
pub mod attendance_record;
pub mod enrollment;
pub mod reschedule;
pub mod schedule_version;
