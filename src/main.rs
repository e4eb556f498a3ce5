//! Ouvrage Server - Field Service Management System
//!
//! A Rust REST API server for field service management.

use axum::{
    routing::{get, post, put, delete},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ouvrage_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::storage::FsObjectStorage,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("ouvrage_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ouvrage Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Initialize attachment storage
    let storage = Arc::new(FsObjectStorage::new(&config.storage.root));

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, storage);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Activities
        .route("/activities", get(api::activities::list_activities))
        .route("/activities", post(api::activities::create_activity))
        .route("/activities/:id", get(api::activities::get_activity))
        .route("/activities/:id", put(api::activities::update_activity))
        .route("/activities/:id", delete(api::activities::delete_activity))
        .route("/activities/:id/transition", post(api::activities::request_transition))
        .route("/activities/:id/transitions", get(api::activities::list_allowed_transitions))
        .route("/activities/:id/equipment", get(api::activities::list_linked_equipment))
        .route("/activities/:id/equipment", post(api::activities::link_equipment))
        .route("/activities/:id/equipment/:equipment_id", delete(api::activities::unlink_equipment))
        .route("/activities/:id/spare-parts", get(api::activities::list_spare_part_usages))
        .route("/activities/:id/spare-parts", post(api::activities::add_spare_part_usage))
        .route("/activities/:id/spare-parts/:usage_id", delete(api::activities::remove_spare_part_usage))
        .route("/activities/:id/interventions", get(api::activities::list_interventions))
        .route("/activities/:id/interventions", post(api::activities::add_intervention))
        .route("/activities/:id/interventions/:intervention_id", delete(api::activities::delete_intervention))
        .route("/activities/:id/attachments", get(api::attachments::list_activity_attachments))
        .route("/activities/:id/attachments", post(api::attachments::upload_activity_attachment))
        // Clients
        .route("/clients", get(api::clients::list_clients))
        .route("/clients", post(api::clients::create_client))
        .route("/clients/:id", get(api::clients::get_client))
        .route("/clients/:id", put(api::clients::update_client))
        .route("/clients/:id", delete(api::clients::delete_client))
        // Equipment
        .route("/equipment", get(api::equipment::list_equipment))
        .route("/equipment", post(api::equipment::create_equipment))
        .route("/equipment/:id", get(api::equipment::get_equipment))
        .route("/equipment/:id", put(api::equipment::update_equipment))
        .route("/equipment/:id", delete(api::equipment::delete_equipment))
        .route("/equipment/:id/attachments", get(api::attachments::list_equipment_attachments))
        .route("/equipment/:id/attachments", post(api::attachments::upload_equipment_attachment))
        // Catalog
        .route("/models", get(api::catalog::list_models))
        .route("/models", post(api::catalog::create_model))
        .route("/models/:id", get(api::catalog::get_model))
        .route("/models/:id", put(api::catalog::update_model))
        .route("/models/:id", delete(api::catalog::delete_model))
        .route("/spare-parts", get(api::catalog::list_spare_parts))
        .route("/spare-parts", post(api::catalog::create_spare_part))
        .route("/spare-parts/:id", get(api::catalog::get_spare_part))
        .route("/spare-parts/:id", delete(api::catalog::delete_spare_part))
        // Hierarchy
        .route("/hierarchy", get(api::hierarchy::get_hierarchy))
        // Attachments
        .route("/attachments/:id/download", get(api::attachments::download_attachment))
        .route("/attachments/:id", delete(api::attachments::delete_attachment))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
