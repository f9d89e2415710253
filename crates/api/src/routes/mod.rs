//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod auth;
pub mod branches;
pub mod categories;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod purchase_sales;
pub mod purchases;
pub mod reports;
pub mod trips;
pub mod vehicles;

/// Creates the API router: public routes plus everything behind the bearer
/// token middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(branches::routes())
        .merge(vehicles::routes())
        .merge(categories::routes())
        .merge(expenses::routes())
        .merge(trips::routes())
        .merge(purchases::routes())
        .merge(purchase_sales::routes())
        .merge(dashboard::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
