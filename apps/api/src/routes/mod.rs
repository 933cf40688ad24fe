pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/process-jd/", post(handlers::handle_process_jd))
        .route("/process-cvs/:jd_id", post(handlers::handle_process_cvs))
        .route("/jd/:jd_id", get(handlers::handle_get_jd))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
