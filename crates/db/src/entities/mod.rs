//! `SeaORM` entity definitions.

pub mod sales_entries;
pub mod sea_orm_active_enums;
pub mod trucks;
pub mod users;
