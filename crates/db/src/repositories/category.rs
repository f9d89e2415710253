//! Expense category repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::clean;
use crate::entities::categories;

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category name already exists.
    #[error("Category '{0}' already exists")]
    DuplicateName(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Category name (unique).
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

/// Input for updating a category.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// Category name.
    pub name: Option<String>,
    /// Description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all categories by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<categories::Model>, CategoryError> {
        Ok(categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Finds a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find_by_id(&self, id: Uuid) -> Result<categories::Model, CategoryError> {
        categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` or a database error.
    pub async fn create(&self, input: CreateCategoryInput) -> Result<categories::Model, CategoryError> {
        let name = input.name.trim().to_string();
        self.ensure_unique_name(&name, None).await?;

        let now = chrono::Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(clean(input.description)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let category = category.insert(&self.db).await?;
        tracing::info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    /// Updates a category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `DuplicateName` or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let category = self.find_by_id(id).await?;
        let mut active: categories::ActiveModel = category.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            self.ensure_unique_name(&name, Some(id)).await?;
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(clean(description));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a category. Its expenses become uncategorized.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), CategoryError> {
        let result = categories::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CategoryError::NotFound(id));
        }
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    async fn ensure_unique_name(&self, name: &str, except: Option<Uuid>) -> Result<(), CategoryError> {
        let mut query = categories::Entity::find().filter(categories::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(categories::Column::Id.ne(id));
        }

        if query.one(&self.db).await?.is_some() {
            return Err(CategoryError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}
