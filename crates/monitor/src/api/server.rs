use axum::routing::get;
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;

use super::state::AppState;
use super::{alerts, health, metrics, stats};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/metrics", get(metrics::metrics))
        .route("/alerts", get(alerts::alerts))
        .route("/stats", get(stats::stats))
        .with_state(state)
}

pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::PipelineMetrics;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hostpulse_common::MemoryStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(app: Router, uri: &str) -> (StatusCode, String) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn routes_respond() {
        let metrics = PipelineMetrics::new();
        metrics.inc_collect_cycles_ok();
        let app = router(AppState {
            store: Arc::new(MemoryStore::new()),
            metrics,
        });

        let (status, body) = send(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"message":"Monitoring API is running"}"#);

        let (status, body) = send(app.clone(), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"cpu":[],"memory":[],"containers":[]}"#);

        let (status, body) = send(app.clone(), "/alerts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");

        let (status, body) = send(app.clone(), "/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("hostpulse_collect_cycles_ok_total 1"));

        let (status, _) = send(app, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
