//! Branch routes.

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
    BranchRepository,
    entities::branches,
    repositories::{CreateBranchInput, UpdateBranchInput},
};

/// Creates the branch routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/branches", get(list_branches).post(create_branch))
        .route(
            "/branches/{id}",
            get(get_branch).patch(update_branch).delete(delete_branch),
        )
}

/// Request body for creating a branch.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBranchRequest {
    /// Branch name, unique.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Address or area.
    #[validate(length(max = 255))]
    pub location: Option<String>,
    /// Contact number.
    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

/// Request body for updating a branch. `null` clears optional fields.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBranchRequest {
    /// New name.
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// New location.
    #[serde(default, with = "double_option")]
    pub location: Option<Option<String>>,
    /// New phone.
    #[serde(default, with = "double_option")]
    pub phone: Option<Option<String>>,
}

async fn list_branches(State(state): State<AppState>) -> ApiResult<Json<Vec<branches::Model>>> {
    let branches = BranchRepository::new(state.conn()).list().await?;
    Ok(Json(branches))
}

async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<branches::Model>> {
    let branch = BranchRepository::new(state.conn()).find_by_id(id).await?;
    Ok(Json(branch))
}

async fn create_branch(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBranchRequest>,
) -> ApiResult<(StatusCode, Json<branches::Model>)> {
    let branch = BranchRepository::new(state.conn())
        .create(CreateBranchInput {
            name: payload.name,
            location: payload.location,
            phone: payload.phone,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(branch)))
}

async fn update_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateBranchRequest>,
) -> ApiResult<Json<branches::Model>> {
    let branch = BranchRepository::new(state.conn())
        .update(
            id,
            UpdateBranchInput {
                name: payload.name,
                location: payload.location,
                phone: payload.phone,
            },
        )
        .await?;
    Ok(Json(branch))
}

async fn delete_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    BranchRepository::new(state.conn()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
