//! Branch repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::clean;
use crate::entities::branches;

/// Error types for branch operations.
#[derive(Debug, thiserror::Error)]
pub enum BranchError {
    /// Branch name already exists.
    #[error("Branch '{0}' already exists")]
    DuplicateName(String),

    /// Branch not found.
    #[error("Branch not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a branch.
#[derive(Debug, Clone)]
pub struct CreateBranchInput {
    /// Branch name (unique).
    pub name: String,
    /// Location.
    pub location: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
}

/// Input for updating a branch.
#[derive(Debug, Clone, Default)]
pub struct UpdateBranchInput {
    /// Branch name.
    pub name: Option<String>,
    /// Location; `Some(None)` clears it.
    pub location: Option<Option<String>>,
    /// Phone; `Some(None)` clears it.
    pub phone: Option<Option<String>>,
}

/// Branch repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BranchRepository {
    db: DatabaseConnection,
}

impl BranchRepository {
    /// Creates a new branch repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all branches by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<branches::Model>, BranchError> {
        Ok(branches::Entity::find()
            .order_by_asc(branches::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Finds a branch by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find_by_id(&self, id: Uuid) -> Result<branches::Model, BranchError> {
        branches::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(BranchError::NotFound(id))
    }

    /// Creates a branch.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` or a database error.
    pub async fn create(&self, input: CreateBranchInput) -> Result<branches::Model, BranchError> {
        let name = input.name.trim().to_string();
        self.ensure_unique_name(&name, None).await?;

        let now = chrono::Utc::now().into();
        let branch = branches::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            location: Set(clean(input.location)),
            phone: Set(clean(input.phone)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let branch = branch.insert(&self.db).await?;
        tracing::info!(branch_id = %branch.id, "Branch created");
        Ok(branch)
    }

    /// Updates a branch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `DuplicateName` or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateBranchInput,
    ) -> Result<branches::Model, BranchError> {
        let branch = self.find_by_id(id).await?;
        let mut active: branches::ActiveModel = branch.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            self.ensure_unique_name(&name, Some(id)).await?;
            active.name = Set(name);
        }
        if let Some(location) = input.location {
            active.location = Set(clean(location));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(clean(phone));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a branch. Its vehicles keep existing without a branch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), BranchError> {
        let result = branches::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(BranchError::NotFound(id));
        }
        tracing::info!(branch_id = %id, "Branch deleted");
        Ok(())
    }

    async fn ensure_unique_name(&self, name: &str, except: Option<Uuid>) -> Result<(), BranchError> {
        let mut query = branches::Entity::find().filter(branches::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(branches::Column::Id.ne(id));
        }

        if query.one(&self.db).await?.is_some() {
            return Err(BranchError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}
