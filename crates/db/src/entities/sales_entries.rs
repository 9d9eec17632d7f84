//! `SeaORM` Entity for the daily_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub branch: String,
    pub date: DateTimeWithTimeZone,
    pub opening_meter_reading_ago: Decimal,
    pub closing_meter_reading_ago: Decimal,
    pub opening_meter_reading_pms: Decimal,
    pub closing_meter_reading_pms: Decimal,
    pub opening_tank_reading_ago: Decimal,
    pub closing_tank_reading_ago: Decimal,
    pub opening_tank_reading_pms: Decimal,
    pub closing_tank_reading_pms: Decimal,
    pub pump_test_ago: Decimal,
    pub pump_test_pms: Decimal,
    pub total_pump_test: Decimal,
    pub received_ago: Decimal,
    pub received_pms: Decimal,
    pub total_received: Decimal,
    pub actuals_ago: Decimal,
    pub actuals_pms: Decimal,
    pub total_actuals: Decimal,
    pub sales_ago: Decimal,
    pub sales_pms: Decimal,
    pub total_sales: Decimal,
    pub variation_ago: Decimal,
    pub variation_pms: Decimal,
    pub total_variation: Decimal,
    pub unit_price_ago: Decimal,
    pub unit_price_pms: Decimal,
    pub sales_in_cedis_ago: Decimal,
    pub sales_in_cedis_pms: Decimal,
    pub total_sales_in_cedis: Decimal,
    pub actuals_in_cedis_ago: Decimal,
    pub actuals_in_cedis_pms: Decimal,
    pub total_actuals_in_cedis: Decimal,
    pub variation_in_cedis_ago: Decimal,
    pub variation_in_cedis_pms: Decimal,
    pub total_variation_in_cedis: Decimal,
    pub credit_ago: Decimal,
    pub credit_pms: Decimal,
    pub total_credit: Decimal,
    pub collections_cash: Decimal,
    pub collections_cheque: Decimal,
    pub total_collections: Decimal,
    pub expenditure: Decimal,
    #[sea_orm(nullable)]
    pub comment: Option<String>,
    pub net_sales: Decimal,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
