use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use helpdesk_api::config::{NotifyConfig, ServerConfig};
use helpdesk_api::router::build_app_router;
use helpdesk_api::state::AppState;
use helpdesk_events::delivery::http_client;
use helpdesk_events::{
    BackgroundRunner, ChannelSenders, GatewaySender, MailSender, NotificationDispatcher,
    PgDirectory, PgSettings, PushSender, RunnerConfig,
};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        notify: NotifyConfig {
            runner: RunnerConfig {
                workers: 2,
                queue_capacity: 16,
            },
            public_base_url: None,
        },
    }
}

/// Build the full application router with the production middleware stack
/// and real senders, using the given database pool.
///
/// Must be called from within a Tokio runtime: it starts the background
/// runner.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let (runner, _handle) = BackgroundRunner::start(config.notify.runner);

    let settings = Arc::new(PgSettings::new(pool.clone()));
    let client = http_client().unwrap();
    let push = PushSender::new(client.clone());
    let senders = ChannelSenders::new(
        Arc::new(MailSender::new(settings.clone())),
        Arc::new(push.clone()),
        Arc::new(GatewaySender::new(client, push)),
    );
    let dispatcher =
        NotificationDispatcher::new(Arc::new(PgDirectory::new(pool.clone())), senders, runner);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        dispatcher: Arc::new(dispatcher),
        settings,
    };

    build_app_router(state, &config)
}

/// An app whose pool never connects. Only for requests rejected before any
/// query runs.
pub fn build_offline_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://helpdesk@127.0.0.1:1/unused")
        .unwrap();
    build_test_app(pool)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
