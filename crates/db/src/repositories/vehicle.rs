//! Vehicle repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::clean;
use crate::entities::{branches, purchase_sales, trips, vehicles};

/// Error types for vehicle operations.
#[derive(Debug, thiserror::Error)]
pub enum VehicleError {
    /// Vehicle number already exists.
    #[error("Vehicle number '{0}' already exists")]
    DuplicateNumber(String),

    /// Vehicle not found.
    #[error("Vehicle not found: {0}")]
    NotFound(Uuid),

    /// Referenced branch not found.
    #[error("Branch not found: {0}")]
    BranchNotFound(Uuid),

    /// Vehicle still has trips or ledgers.
    #[error("Vehicle is in use by {trips} trips and {ledgers} purchase & sale ledgers")]
    InUse {
        /// Number of trips.
        trips: u64,
        /// Number of ledgers.
        ledgers: u64,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a vehicle.
#[derive(Debug, Clone)]
pub struct CreateVehicleInput {
    /// Registration number (unique).
    pub vehicle_number: String,
    /// Display name.
    pub name: String,
    /// Free-form type (truck, tanker...).
    pub vehicle_type: Option<String>,
    /// Home branch.
    pub branch_id: Option<Uuid>,
    /// Whether the vehicle is in service.
    pub is_active: bool,
}

/// Input for updating a vehicle.
#[derive(Debug, Clone, Default)]
pub struct UpdateVehicleInput {
    /// Registration number.
    pub vehicle_number: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Vehicle type; `Some(None)` clears it.
    pub vehicle_type: Option<Option<String>>,
    /// Branch; `Some(None)` detaches the vehicle.
    pub branch_id: Option<Option<Uuid>>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Filter options for listing vehicles.
#[derive(Debug, Clone, Default)]
pub struct VehicleFilter {
    /// Only vehicles of this branch.
    pub branch_id: Option<Uuid>,
    /// Filter by active flag.
    pub is_active: Option<bool>,
}

/// Vehicle repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    db: DatabaseConnection,
}

impl VehicleRepository {
    /// Creates a new vehicle repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists vehicles ordered by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: VehicleFilter) -> Result<Vec<vehicles::Model>, VehicleError> {
        let mut query = vehicles::Entity::find().order_by_asc(vehicles::Column::VehicleNumber);

        if let Some(branch_id) = filter.branch_id {
            query = query.filter(vehicles::Column::BranchId.eq(branch_id));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(vehicles::Column::IsActive.eq(is_active));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds a vehicle by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find_by_id(&self, id: Uuid) -> Result<vehicles::Model, VehicleError> {
        vehicles::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(VehicleError::NotFound(id))
    }

    /// Creates a vehicle.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateNumber`, `BranchNotFound` or a database error.
    pub async fn create(&self, input: CreateVehicleInput) -> Result<vehicles::Model, VehicleError> {
        let vehicle_number = input.vehicle_number.trim().to_string();
        self.ensure_unique_number(&vehicle_number, None).await?;
        if let Some(branch_id) = input.branch_id {
            self.ensure_branch(branch_id).await?;
        }

        let now = chrono::Utc::now().into();
        let vehicle = vehicles::ActiveModel {
            id: Set(Uuid::new_v4()),
            vehicle_number: Set(vehicle_number),
            name: Set(input.name.trim().to_string()),
            vehicle_type: Set(clean(input.vehicle_type)),
            branch_id: Set(input.branch_id),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let vehicle = vehicle.insert(&self.db).await?;
        tracing::info!(vehicle_id = %vehicle.id, number = %vehicle.vehicle_number, "Vehicle created");
        Ok(vehicle)
    }

    /// Updates a vehicle.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `DuplicateNumber`, `BranchNotFound` or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateVehicleInput,
    ) -> Result<vehicles::Model, VehicleError> {
        let vehicle = self.find_by_id(id).await?;
        let mut active: vehicles::ActiveModel = vehicle.into();

        if let Some(number) = input.vehicle_number {
            let number = number.trim().to_string();
            self.ensure_unique_number(&number, Some(id)).await?;
            active.vehicle_number = Set(number);
        }
        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(vehicle_type) = input.vehicle_type {
            active.vehicle_type = Set(clean(vehicle_type));
        }
        if let Some(branch_id) = input.branch_id {
            if let Some(branch_id) = branch_id {
                self.ensure_branch(branch_id).await?;
            }
            active.branch_id = Set(branch_id);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a vehicle that has no trips and no ledgers.
    ///
    /// Expenses pointing at the vehicle are kept and lose the reference.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InUse` or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), VehicleError> {
        let vehicle = self.find_by_id(id).await?;

        let trips = trips::Entity::find()
            .filter(trips::Column::VehicleId.eq(id))
            .count(&self.db)
            .await?;
        let ledgers = purchase_sales::Entity::find()
            .filter(purchase_sales::Column::VehicleId.eq(id))
            .count(&self.db)
            .await?;

        if trips > 0 || ledgers > 0 {
            tracing::warn!(vehicle_id = %id, trips, ledgers, "Refusing to delete vehicle in use");
            return Err(VehicleError::InUse { trips, ledgers });
        }

        vehicles::Entity::delete_by_id(vehicle.id)
            .exec(&self.db)
            .await?;
        tracing::info!(vehicle_id = %id, "Vehicle deleted");
        Ok(())
    }

    async fn ensure_unique_number(
        &self,
        number: &str,
        except: Option<Uuid>,
    ) -> Result<(), VehicleError> {
        let mut query =
            vehicles::Entity::find().filter(vehicles::Column::VehicleNumber.eq(number));
        if let Some(id) = except {
            query = query.filter(vehicles::Column::Id.ne(id));
        }

        if query.one(&self.db).await?.is_some() {
            return Err(VehicleError::DuplicateNumber(number.to_string()));
        }
        Ok(())
    }

    async fn ensure_branch(&self, branch_id: Uuid) -> Result<(), VehicleError> {
        branches::Entity::find_by_id(branch_id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(VehicleError::BranchNotFound(branch_id))
    }
}
