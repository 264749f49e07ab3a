//! REST route registration for the environment provider.

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};
use environment_provider_sdk::EnvironmentProviderClient;

use super::handlers;

/// Register the config-server routes on `router`.
///
/// - `GET /health`
/// - `GET /instances`
/// - `GET /{application}/{profile}`
/// - `GET /{application}/{profile}/{label}`
pub fn register_routes(router: Router, client: Arc<dyn EnvironmentProviderClient>) -> Router {
    router
        .route("/health", get(handlers::health))
        .route("/instances", get(handlers::list_instances))
        .route("/{application}/{profile}", get(handlers::get_environment))
        .route(
            "/{application}/{profile}/{label}",
            get(handlers::get_labelled_environment),
        )
        .layer(Extension(client))
}
