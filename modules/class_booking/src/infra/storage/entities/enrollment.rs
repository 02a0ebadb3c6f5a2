use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student: Uuid,
    pub professor: Uuid,
    pub branch: String,
    pub year: i32,
    pub month: i32,
    /// JSON array of 1..=2 slot objects.
    pub chosen_slots: Json,
    pub assigned: bool,
    /// "activa" | "cancelada"
    pub state: String,
    pub payment_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const STATE_ACTIVA: &str = "activa";
pub const STATE_CANCELADA: &str = "cancelada";
