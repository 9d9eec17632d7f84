//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a worker account.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full administrative access, including user management.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Branch oversight without user management.
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Records daily entries for an assigned station.
    #[sea_orm(string_value = "station_supervisor")]
    StationSupervisor,
}

impl UserRole {
    /// The role name as stored and exchanged over the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::StationSupervisor => "station_supervisor",
        }
    }

    /// Parses a role name from its API form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "station_supervisor" => Some(Self::StationSupervisor),
            _ => None,
        }
    }
}
