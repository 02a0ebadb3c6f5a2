use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduleVersions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ScheduleVersions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ScheduleVersions::Professor).uuid().not_null())
                    .col(ColumnDef::new(ScheduleVersions::Branch).string().not_null())
                    .col(ColumnDef::new(ScheduleVersions::EffectiveFrom).date().not_null())
                    .col(ColumnDef::new(ScheduleVersions::EffectiveTo).date())
                    .col(ColumnDef::new(ScheduleVersions::Slots).json().not_null())
                    .col(
                        ColumnDef::new(ScheduleVersions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleVersions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_schedule_versions_professor_from")
                    .table(ScheduleVersions::Table)
                    .col(ScheduleVersions::Professor)
                    .col(ScheduleVersions::EffectiveFrom)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Enrollments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Enrollments::Student).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::Professor).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::Branch).string().not_null())
                    .col(ColumnDef::new(Enrollments::Year).integer().not_null())
                    .col(ColumnDef::new(Enrollments::Month).integer().not_null())
                    .col(ColumnDef::new(Enrollments::ChosenSlots).json().not_null())
                    .col(ColumnDef::new(Enrollments::Assigned).boolean().not_null())
                    .col(ColumnDef::new(Enrollments::State).string().not_null())
                    .col(ColumnDef::new(Enrollments::PaymentNote).string())
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_enrollments_professor_month")
                    .table(Enrollments::Table)
                    .col(Enrollments::Professor)
                    .col(Enrollments::Year)
                    .col(Enrollments::Month)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AttendanceRecords::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AttendanceRecords::Student).uuid().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Professor).uuid().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Branch).string().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Date).date().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Origin).string().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Status).string().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Liveness).string().not_null())
                    .col(ColumnDef::new(AttendanceRecords::EnrollmentId).uuid())
                    .col(ColumnDef::new(AttendanceRecords::SlotSnapshot).json())
                    .col(ColumnDef::new(AttendanceRecords::RescheduleId).uuid())
                    .col(ColumnDef::new(AttendanceRecords::AdhocClassId).uuid())
                    .col(
                        ColumnDef::new(AttendanceRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_attendance_student_date")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::Student)
                    .col(AttendanceRecords::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reschedules::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reschedules::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Reschedules::EnrollmentId).uuid().not_null())
                    .col(ColumnDef::new(Reschedules::FromDate).date().not_null())
                    .col(ColumnDef::new(Reschedules::ToDate).date().not_null())
                    .col(ColumnDef::new(Reschedules::FromSlot).json().not_null())
                    .col(ColumnDef::new(Reschedules::ToSlot).json().not_null())
                    .col(ColumnDef::new(Reschedules::FromProfessor).uuid().not_null())
                    .col(ColumnDef::new(Reschedules::ToProfessor).uuid().not_null())
                    .col(
                        ColumnDef::new(Reschedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_reschedules_enrollment")
                    .table(Reschedules::Table)
                    .col(Reschedules::EnrollmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdhocClasses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdhocClasses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AdhocClasses::Professor).uuid().not_null())
                    .col(ColumnDef::new(AdhocClasses::Branch).string().not_null())
                    .col(ColumnDef::new(AdhocClasses::Date).date().not_null())
                    .col(ColumnDef::new(AdhocClasses::Slot).json().not_null())
                    .col(ColumnDef::new(AdhocClasses::SlotKey).string().not_null())
                    .col(ColumnDef::new(AdhocClasses::Capacity).integer().not_null())
                    .col(ColumnDef::new(AdhocClasses::Removed).boolean().not_null())
                    .col(
                        ColumnDef::new(AdhocClasses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Partial unique indexes: one active enrollment per (student,
        // professor, year, month), one non-removed ad-hoc class per
        // (branch, date, slot key). sea_query's index builder has no WHERE
        // clause, so these go in as raw SQL (valid on SQLite and Postgres).
        let conn = manager.get_connection();
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS ux_enrollments_active \
             ON enrollments (student, professor, year, month) \
             WHERE state = 'activa'",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS ux_adhoc_classes_live \
             ON adhoc_classes (branch, date, slot_key) \
             WHERE removed = FALSE",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdhocClasses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reschedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScheduleVersions::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ScheduleVersions {
    Table,
    Id,
    Professor,
    Branch,
    EffectiveFrom,
    EffectiveTo,
    Slots,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    Table,
    Id,
    Student,
    Professor,
    Branch,
    Year,
    Month,
    ChosenSlots,
    Assigned,
    State,
    PaymentNote,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AttendanceRecords {
    Table,
    Id,
    Student,
    Professor,
    Branch,
    Date,
    Origin,
    Status,
    Liveness,
    EnrollmentId,
    SlotSnapshot,
    RescheduleId,
    AdhocClassId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Reschedules {
    Table,
    Id,
    EnrollmentId,
    FromDate,
    ToDate,
    FromSlot,
    ToSlot,
    FromProfessor,
    ToProfessor,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AdhocClasses {
    Table,
    Id,
    Professor,
    Branch,
    Date,
    Slot,
    SlotKey,
    Capacity,
    Removed,
    CreatedAt,
}
