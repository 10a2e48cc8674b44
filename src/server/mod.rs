//! HTTP server for the ebook mirror listener.
//!
//! # Endpoints
//!
//! - `POST /webhook` - Accepts GitHub webhook deliveries (other methods are
//!   answered by the dispatcher with a 400)
//! - `GET /health` - Returns 200 if server is running

use std::sync::Arc;

use tower_http::trace::TraceLayer;

use crate::dispatch::Dispatcher;

pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::webhook_handler;

/// Largest payload GitHub will deliver. Larger bodies are rejected by the
/// dispatcher with a 400.
pub const MAX_PAYLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        AppState {
            inner: Arc::new(dispatcher),
        }
    }

    /// Returns a handle to the dispatcher that can move into a blocking task.
    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.inner)
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{any, get};

    axum::Router::new()
        .route("/webhook", any(webhook_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
