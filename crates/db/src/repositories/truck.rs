//! Truck delivery repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use forecourt_core::entry::Branch;

use crate::entities::trucks;

/// Error types for truck entry operations.
#[derive(Debug, thiserror::Error)]
pub enum TruckError {
    /// Truck entry not found.
    #[error("Truck entry not found: {0}")]
    NotFound(Uuid),

    /// Actor does not own the entry.
    #[error("Not authorized to modify this entry")]
    NotOwner,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or rewriting a truck delivery record.
#[derive(Debug, Clone)]
pub struct CreateTruckInput {
    /// Destination branch.
    pub branch: Branch,
    /// AGO volume carried.
    pub ago: Decimal,
    /// PMS volume carried.
    pub pms: Decimal,
    /// Delivery date.
    pub date: chrono::DateTime<chrono::Utc>,
    /// Driver name.
    pub driver: String,
    /// Destination description.
    pub destination: String,
    /// Truck registration number.
    pub truck_number: String,
}

/// Truck repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TruckRepository {
    db: DatabaseConnection,
}

impl TruckRepository {
    /// Creates a new truck repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a delivery, binding ownership to `created_by`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CreateTruckInput,
        created_by: Uuid,
    ) -> Result<trucks::Model, TruckError> {
        let now = chrono::Utc::now().fixed_offset();
        let truck = trucks::ActiveModel {
            id: Set(Uuid::new_v4()),
            branch: Set(input.branch.as_str().to_owned()),
            ago: Set(input.ago.round_dp(2)),
            pms: Set(input.pms.round_dp(2)),
            date: Set(input.date.fixed_offset()),
            driver: Set(input.driver),
            destination: Set(input.destination),
            truck_number: Set(input.truck_number),
            user_id: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(truck.insert(&self.db).await?)
    }

    /// Paginated listing of deliveries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<trucks::Model>, TruckError> {
        Ok(trucks::Entity::find()
            .order_by_asc(trucks::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    /// Rewrites a delivery record. Owner only.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing entry, `NotOwner` for a foreign
    /// actor, or a database error.
    pub async fn update(
        &self,
        truck_id: Uuid,
        input: CreateTruckInput,
        actor: Uuid,
    ) -> Result<trucks::Model, TruckError> {
        let existing = trucks::Entity::find_by_id(truck_id)
            .one(&self.db)
            .await?
            .ok_or(TruckError::NotFound(truck_id))?;

        if existing.user_id != actor {
            return Err(TruckError::NotOwner);
        }

        let mut truck: trucks::ActiveModel = existing.into();
        truck.branch = Set(input.branch.as_str().to_owned());
        truck.ago = Set(input.ago.round_dp(2));
        truck.pms = Set(input.pms.round_dp(2));
        truck.date = Set(input.date.fixed_offset());
        truck.driver = Set(input.driver);
        truck.destination = Set(input.destination);
        truck.truck_number = Set(input.truck_number);
        truck.updated_at = Set(chrono::Utc::now().fixed_offset());

        Ok(truck.update(&self.db).await?)
    }

    /// Permanently removes a delivery record. Owner only.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing entry, `NotOwner` for a foreign
    /// actor, or a database error.
    pub async fn delete(&self, truck_id: Uuid, actor: Uuid) -> Result<(), TruckError> {
        let existing = trucks::Entity::find_by_id(truck_id)
            .one(&self.db)
            .await?
            .ok_or(TruckError::NotFound(truck_id))?;

        if existing.user_id != actor {
            return Err(TruckError::NotOwner);
        }

        trucks::Entity::delete_by_id(truck_id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
