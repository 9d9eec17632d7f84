//! `SeaORM` Entity for the workers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::UserRole;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "workers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub branch: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sales_entries::Entity")]
    SalesEntries,
    #[sea_orm(has_many = "super::trucks::Entity")]
    Trucks,
}

impl Related<super::sales_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesEntries.def()
    }
}

impl Related<super::trucks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trucks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
