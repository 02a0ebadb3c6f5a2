use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "adhoc_classes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub professor: Uuid,
    pub branch: String,
    pub date: NaiveDate,
    /// JSON slot object.
    pub slot: Json,
    /// Canonical `professor:dow:start-end` key backing the partial unique
    /// index over non-removed rows.
    pub slot_key: String,
    pub capacity: i32,
    pub removed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
