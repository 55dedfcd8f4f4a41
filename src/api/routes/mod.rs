//! API routes module

pub mod support;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined JSON API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Support session routes
        .nest("/support", support::api_router())
}
