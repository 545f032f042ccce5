use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// Handler for `GET /readyz`: ready once the code store answers.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.code_store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = ?e, store = state.codes.name(), "code store not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
