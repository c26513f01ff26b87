//! BroRent Server - Peer-to-peer Item Rental
//!
//! A Rust REST API server for a hostel community rental marketplace.

use axum::{
    routing::{get, post, put, delete},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brorent_server::{
    api,
    config::AppConfig,
    repository::Repository,
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
        .unwrap_or_else(|_| format!("brorent_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BroRent Server v{}", env!("CARGO_PKG_VERSION"));

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

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), config.email.clone());

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

    let media_root = state.config.media.root.clone();

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication & account
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .route("/auth/profile", put(api::auth::update_profile))
        .route("/auth/password", put(api::auth::change_password))
        .route("/auth/avatar", post(api::auth::upload_avatar))
        // Items (listings)
        .route("/items", get(api::items::list_items))
        .route("/items", post(api::items::create_item))
        .route("/items/:id", get(api::items::get_item))
        .route("/items/:id", put(api::items::update_item))
        .route("/items/:id", delete(api::items::delete_item))
        .route("/items/:id/image", post(api::items::upload_item_image))
        // Rentals
        .route("/items/:id/rent", post(api::rentals::request_rental))
        .route("/rentals/:id/accept", post(api::rentals::accept_rental))
        .route("/rentals/:id/reject", post(api::rentals::reject_rental))
        .route("/rentals/:id/pickup", post(api::rentals::pickup_rental))
        .route("/rentals/:id/return", post(api::rentals::return_rental))
        .route("/rentals/:id/cancel", post(api::rentals::cancel_rental))
        .route("/rentals/borrowed", get(api::rentals::my_borrowed))
        .route("/rentals/lent", get(api::rentals::my_lent))
        // Notifications
        .route("/notifications", get(api::notifications::list_notifications))
        .route("/notifications/:id/read", post(api::notifications::mark_read))
        // Staff reports
        .route("/reports/dashboard", get(api::reports::dashboard))
        .route("/reports/items/pdf", get(api::reports::items_pdf))
        .route("/reports/items/excel", get(api::reports::items_excel))
        .route("/reports/rentals/pdf", get(api::reports::rentals_pdf))
        .route("/reports/rentals/excel", get(api::reports::rentals_excel))
        .route("/reports/users/pdf", get(api::reports::users_pdf))
        .route("/reports/users/excel", get(api::reports::users_excel))
        .route("/reports/reminders", post(api::reports::send_reminders))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        // Uploaded media, served when no dedicated asset host is configured
        .nest_service("/media", ServeDir::new(media_root))
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
