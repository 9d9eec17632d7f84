//! User repository for worker account operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found")]
    NotFound,

    /// Another account already uses this email.
    #[error("User with this email already exists")]
    EmailTaken,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a worker account.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Full name.
    pub full_name: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Assigned role.
    pub role: UserRole,
    /// Assigned branch.
    pub branch: String,
}

/// Input for updating a worker account. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New full name.
    pub full_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New password hash.
    pub password_hash: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
    /// New branch assignment.
    pub branch: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a worker account.
    ///
    /// # Errors
    ///
    /// Returns `EmailTaken` if the email is already registered, or a
    /// database error.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        if self.email_exists(&input.email).await? {
            return Err(UserError::EmailTaken);
        }

        let now = chrono::Utc::now().fixed_offset();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(input.full_name),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            role: Set(input.role),
            branch: Set(input.branch),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Paginated listing of worker accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<users::Model>, UserError> {
        Ok(users::Entity::find()
            .order_by_asc(users::Column::FullName)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    /// Updates a worker account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing user, `EmailTaken` if the new
    /// email belongs to someone else, or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateUserInput,
    ) -> Result<users::Model, UserError> {
        let existing = self.find_by_id(id).await?.ok_or(UserError::NotFound)?;

        if let Some(email) = &input.email {
            if email != &existing.email && self.email_exists(email).await? {
                return Err(UserError::EmailTaken);
            }
        }

        let mut user: users::ActiveModel = existing.into();
        if let Some(full_name) = input.full_name {
            user.full_name = Set(full_name);
        }
        if let Some(email) = input.email {
            user.email = Set(email);
        }
        if let Some(password_hash) = input.password_hash {
            user.password_hash = Set(password_hash);
        }
        if let Some(role) = input.role {
            user.role = Set(role);
        }
        if let Some(branch) = input.branch {
            user.branch = Set(branch);
        }
        user.updated_at = Set(chrono::Utc::now().fixed_offset());

        Ok(user.update(&self.db).await?)
    }

    /// Permanently removes a worker account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing user, or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        let result = users::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, UserError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
