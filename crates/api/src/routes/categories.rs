//! Expense category routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_with::rust::double_option;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiResult, AppState, extract::ValidatedJson};
use fleetbook_db::{
    CategoryRepository,
    entities::categories,
    repositories::{CreateCategoryInput, UpdateCategoryInput},
};

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).patch(update_category).delete(delete_category),
        )
}

/// Request body for creating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Category name, unique.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Free text.
    pub description: Option<String>,
}

/// Request body for updating a category.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    /// New name.
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// New description; `null` clears it.
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
}

async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<categories::Model>>> {
    Ok(Json(CategoryRepository::new(state.conn()).list().await?))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<categories::Model>> {
    Ok(Json(CategoryRepository::new(state.conn()).find_by_id(id).await?))
}

async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<categories::Model>)> {
    let category = CategoryRepository::new(state.conn())
        .create(CreateCategoryInput {
            name: payload.name,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<Json<categories::Model>> {
    let category = CategoryRepository::new(state.conn())
        .update(
            id,
            UpdateCategoryInput {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;
    Ok(Json(category))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    CategoryRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
