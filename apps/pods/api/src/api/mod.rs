use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod pod;
pub mod root;

/// Creates the API routes.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .merge(root::router())
        .merge(pod::router(state))
        .merge(domain_pods::handlers::router(state.pods.clone()))
}

/// Creates a router with the /ready endpoint that checks the vector store.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
