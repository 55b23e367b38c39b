use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use super::state::AppState;
use crate::telemetry::exposition::render_prometheus;

pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let body = render_prometheus(&state.metrics);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}
