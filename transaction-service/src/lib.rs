pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Router,
};
use service_core::middleware::{metrics::metrics_middleware, tracing::with_request_tracing};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use config::Config;
use services::{GatewayClient, TransactionRepository};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repository: TransactionRepository,
    pub gateway: GatewayClient,
}

/// Build the HTTP router: API routes, HTML views, and static pages.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let router: Router<AppState> = Router::new()
        .route("/", get(handlers::pages::landing_page))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/test-db", get(handlers::test_db))
        .route("/metrics", get(handlers::metrics))
        // Gateway proxy
        .route(
            "/check-transaction",
            post(handlers::gateway::check_transaction),
        )
        // Transaction records
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions),
        )
        .route(
            "/all-transactions",
            get(handlers::pages::all_transactions),
        )
        .route(
            "/add-transaction",
            post(handlers::transactions::add_transaction),
        )
        .route(
            "/create-unpaid-transaction",
            post(handlers::transactions::create_unpaid_transaction),
        )
        .route(
            "/store-payment-details",
            post(handlers::transactions::store_payment_details),
        )
        .route(
            "/update-payment-status",
            post(handlers::transactions::update_payment_status),
        )
        .route(
            "/capture-payment",
            post(handlers::transactions::capture_payment),
        )
        // Payment result pages
        .route_service("/success", ServeFile::new(static_dir.join("success.html")))
        .route_service("/error", ServeFile::new(static_dir.join("error.html")))
        .route_service("/cancel", ServeFile::new(static_dir.join("cancel.html")))
        .fallback_service(ServeDir::new(&static_dir))
        .layer(from_fn(metrics_middleware));

    with_request_tracing(router)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
