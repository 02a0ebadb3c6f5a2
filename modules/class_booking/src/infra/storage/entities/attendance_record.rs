use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student: Uuid,
    pub professor: Uuid,
    pub branch: String,
    pub date: NaiveDate,
    /// "regular" | "adhoc"
    pub origin: String,
    /// "presente" | "ausente" | "reprogramado"
    pub status: String,
    /// "live" | "moved" | "removed" — single-lookup occurrence state.
    pub liveness: String,
    pub enrollment_id: Option<Uuid>,
    /// JSON slot object captured when the record was created.
    pub slot_snapshot: Option<Json>,
    pub reschedule_id: Option<Uuid>,
    pub adhoc_class_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const ORIGIN_REGULAR: &str = "regular";
pub const ORIGIN_ADHOC: &str = "adhoc";

pub const STATUS_PRESENTE: &str = "presente";
pub const STATUS_AUSENTE: &str = "ausente";
pub const STATUS_REPROGRAMADO: &str = "reprogramado";

pub const LIVENESS_LIVE: &str = "live";
pub const LIVENESS_MOVED: &str = "moved";
pub const LIVENESS_REMOVED: &str = "removed";
