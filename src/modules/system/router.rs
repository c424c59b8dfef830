use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::service_info;

pub fn init_system_router() -> Router<AppState> {
    Router::new().route("/service", get(service_info))
}
