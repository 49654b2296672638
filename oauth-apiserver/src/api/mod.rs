mod authn_middleware;
mod authz_middleware;
pub(crate) mod health;
pub(crate) mod oauth;
pub(crate) mod users;

use crate::api::authn_middleware::authentication_middleware;
use crate::api::authz_middleware::authorization_middleware;
use crate::state::AppState;
use axum::{middleware, Router};

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(protected_routes(state))
}

/// Routes that require an authenticated and authorized caller
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(oauth::router())
        .merge(users::router())
        // The last layer added runs first
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authorization_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ))
}
