use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/profile",
        get(handlers::profile::get_profile).put(handlers::profile::upsert_profile),
    )
}
