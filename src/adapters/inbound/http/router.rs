use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    // Admin handlers
    create_entry,
    delete_entry,
    get_entry,
    // Public handlers
    get_media,
    get_published,
    list_entries,
    list_latest,
    list_published,
    // Job handlers
    messaging_webhook,
    run_delivery,
    run_generation,
    update_entry,
};
use crate::{
    adapters::outbound::storage::LocalUrlSigner,
    ports::{
        services::{
            DeliveryService, EntryLifecycleService, GenerationService, ListingService,
            WebhookService,
        },
        storage::ObjectStore,
    },
};

/// Admin submissions carry several key-visual images
const MAX_SUBMISSION_BYTES: usize = 25 * 1024 * 1024;

/// Application state containing all services
#[derive(Clone)]
pub struct AppState {
    pub lifecycle_service: Arc<dyn EntryLifecycleService>,
    pub listing_service: Arc<dyn ListingService>,
    pub delivery_service: Arc<dyn DeliveryService>,
    pub generation_service: Arc<dyn GenerationService>,
    pub webhook_service: Arc<dyn WebhookService>,
    pub store: Arc<dyn ObjectStore>,
    /// Set when media URLs are signed and served by this server
    pub media_signer: Option<LocalUrlSigner>,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(create_admin_router())
        .merge(create_public_router())
        .merge(create_job_router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        // Add state for dependency injection
        .with_state(state)
}

/// Create a router with just the admin entry operations
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin/entries", get(list_entries).post(create_entry))
        .route(
            "/admin/entries/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES))
}

/// Create a router with the public reads and locally signed media
pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .route("/copy", get(list_published))
        .route("/copy/latest", get(list_latest))
        .route("/copy/{id}", get(get_published))
        .route("/media/{*path}", get(get_media))
}

/// Create a router with the job triggers and the messaging webhook
pub fn create_job_router() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/jobs/deliver", post(run_delivery))
        .route("/jobs/generate", post(run_generation))
        .route("/webhooks/line", post(messaging_webhook))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_in_memory_app;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_health() {
        let app = create_in_memory_app().await.unwrap();
        let server = TestServer::new(create_router(app.state())).unwrap();

        let response = server.get("/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_job_routes_allow_cross_origin_calls() {
        let app = create_in_memory_app().await.unwrap();
        let server = TestServer::new(create_router(app.state())).unwrap();

        let response = server
            .post("/webhooks/line")
            .add_header("origin", "https://example.com")
            .json(&json!({ "events": [] }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("access-control-allow-origin"),
            "*"
        );
    }
}
