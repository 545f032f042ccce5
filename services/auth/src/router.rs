use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use portfolio_core::health::healthz;
use portfolio_core::middleware::{cors_layer, propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    code::{send_code, verify_code},
    health::readyz,
    session::{delete_session, get_session},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.cors_origins.clone());

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // One-time code login
        .route("/api/send-code", post(send_code))
        .route("/api/verify-code", post(verify_code))
        // Admin session
        .route("/api/admin/session", get(get_session).delete(delete_session))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(propagate_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
