//! Authentication routes: login and current user.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tracing::info;

use crate::{ApiError, ApiResult, AppState, middleware::AuthUser};
use fleetbook_core::auth::verify_password;
use fleetbook_db::UserRepository;
use fleetbook_shared::auth::{LoginRequest, LoginResponse, UserInfo};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Auth routes that need a token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// POST /auth/login - Authenticate and issue an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user_repo = UserRepository::new(state.conn());

    let Some(user) = user_repo.find_by_username(&payload.username).await? else {
        info!(username = %payload.username, "Login attempt for unknown user");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS).with_code("invalid_credentials"));
    };

    if !user.is_active {
        return Err(ApiError::unauthorized("This account has been disabled")
            .with_code("account_disabled"));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS).with_code("invalid_credentials"));
    }

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.username)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user: UserInfo {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
        },
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}

/// GET /auth/me - The user behind the token.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let user = UserRepository::new(state.conn())
        .find_by_id(auth.user_id())
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;

    Ok(Json(UserInfo {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
    }))
}
