//! Database seeder for Fleetbook development.
//!
//! Creates the admin user plus a few branches, vehicles and expense
//! categories. Rows that already exist are left alone, so the seeder can be
//! re-run against a live database.
//!
//! Usage: cargo run --bin seeder
//!
//! `SEED_ADMIN_USERNAME` / `SEED_ADMIN_PASSWORD` override the admin login.

use anyhow::Context;
use tracing::info;
use uuid::Uuid;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleetbook_core::auth::hash_password;
use fleetbook_db::{
    BranchRepository, CategoryRepository, UserRepository, VehicleRepository,
    repositories::{CreateBranchInput, CreateCategoryInput, CreateVehicleInput, VehicleFilter},
};
use fleetbook_shared::AppConfig;

const BRANCHES: [(&str, &str); 2] = [("Main Depot", "Industrial Area"), ("North Yard", "Ring Road")];

const VEHICLES: [(&str, &str, &str); 3] = [
    ("TRK-001", "Tanker One", "tanker"),
    ("TRK-002", "Tanker Two", "tanker"),
    ("PKP-101", "Service Pickup", "pickup"),
];

const CATEGORIES: [(&str, &str); 5] = [
    ("Fuel", "Diesel and petrol for the fleet"),
    ("Maintenance", "Repairs, tyres and servicing"),
    ("Salaries", "Drivers and helpers"),
    ("Tolls & Permits", "Road tolls, permits and fees"),
    ("Equipment", "Tins, pumps and tools"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seeder=info,fleetbook_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = fleetbook_db::connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    seed_admin(UserRepository::new(db.clone())).await?;
    let branch_id = seed_branches(BranchRepository::new(db.clone())).await?;
    seed_vehicles(VehicleRepository::new(db.clone()), branch_id).await?;
    seed_categories(CategoryRepository::new(db)).await?;

    info!("Seeding complete");
    Ok(())
}

async fn seed_admin(users: UserRepository) -> anyhow::Result<()> {
    let username = std::env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    if users.username_exists(&username).await? {
        info!(%username, "Admin user already exists, skipping");
        return Ok(());
    }

    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let hash = hash_password(&password)?;
    let user = users.create(&username, &hash, "Administrator").await?;
    info!(user_id = %user.id, %username, "Seeded admin user");
    Ok(())
}

/// Returns the ID of the first seeded branch.
async fn seed_branches(branches: BranchRepository) -> anyhow::Result<Option<Uuid>> {
    let existing = branches.list().await?;
    let mut first = None;

    for (name, location) in BRANCHES {
        let id = if let Some(branch) = existing.iter().find(|b| b.name == name) {
            branch.id
        } else {
            let branch = branches
                .create(CreateBranchInput {
                    name: name.to_string(),
                    location: Some(location.to_string()),
                    phone: None,
                })
                .await?;
            info!(branch_id = %branch.id, name, "Seeded branch");
            branch.id
        };
        first.get_or_insert(id);
    }
    Ok(first)
}

async fn seed_vehicles(
    vehicles: VehicleRepository,
    branch_id: Option<Uuid>,
) -> anyhow::Result<()> {
    let existing = vehicles.list(VehicleFilter::default()).await?;

    for (number, name, vehicle_type) in VEHICLES {
        if existing.iter().any(|v| v.vehicle_number == number) {
            continue;
        }
        let vehicle = vehicles
            .create(CreateVehicleInput {
                vehicle_number: number.to_string(),
                name: name.to_string(),
                vehicle_type: Some(vehicle_type.to_string()),
                branch_id,
                is_active: true,
            })
            .await?;
        info!(vehicle_id = %vehicle.id, number, "Seeded vehicle");
    }
    Ok(())
}

async fn seed_categories(categories: CategoryRepository) -> anyhow::Result<()> {
    let existing = categories.list().await?;

    for (name, description) in CATEGORIES {
        if existing.iter().any(|c| c.name == name) {
            continue;
        }
        let category = categories
            .create(CreateCategoryInput {
                name: name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;
        info!(category_id = %category.id, name, "Seeded category");
    }
    Ok(())
}
