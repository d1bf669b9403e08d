//! HTTP API - axum router, shared state, and error mapping.
//!
//! Handlers stay thin: extract path/body inputs, call into [`crate::core`],
//! serialize the result. The error enum maps onto status codes here, in one
//! place.

pub mod products;

use crate::errors::{Error, Result};
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool to the underlying store
    pub db: DatabaseConnection,
}

/// Response for the health check endpoint
#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

/// Simple health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Constructs the full API router over the given database connection.
pub fn router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/products", post(products::create))
        .route("/products/popular", get(products::popular))
        .route(
            "/products/:product_id",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route(
            "/products/:product_id/promote",
            patch(products::toggle_promote),
        )
        .route(
            "/restaurants/:restaurant_id/products",
            get(products::index_restaurant),
        )
        .route(
            "/restaurants/:restaurant_id/products/discount",
            patch(products::apply_discount),
        )
        .route(
            "/restaurants/:restaurant_id/products/:product_id",
            get(products::show_with_discount),
        )
        .layer(CorsLayer::permissive())
        .with_state(AppState { db })
}

/// Starts the HTTP server on the given address.
///
/// # Errors
/// Returns an error if the listener cannot bind or the server loop fails.
pub async fn start_server(bind_address: SocketAddr, db: DatabaseConnection) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("listening for requests on {}", listener.local_addr()?);

    axum::serve(listener, router(db)).await?;
    Ok(())
}
