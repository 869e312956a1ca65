mod config;
mod db;
mod error;
mod forms;
mod models;
mod pages;
mod rate_limit;
mod schema;
mod seed;
mod uploads;
mod views;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, MatchedPath};
use axum::http::Request;
use axum::middleware;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub struct App {
    pub pool: db::DbPool,
    pub config: config::Config,
}

/// Application state shared across all handlers
pub type AppState = Arc<App>;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = config::Config::load();
    error::init(!config.production);

    let pool = db::create_pool(&config.database_url);

    if env::args().any(|arg| arg == "--seed") {
        let mut conn = pool.get().expect("database connection for seeding");
        seed::run(&mut conn).expect("seeding failed");
        tracing::info!("database seeded");
        return;
    }

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("upload directory");

    let limiter = Arc::new(rate_limit::RateLimiter::per_minute(
        config.rate_limit_per_minute,
    ));
    let bind_addr = config.bind_addr.clone();
    let upload_dir = config.upload_dir.clone();
    let state: AppState = Arc::new(App { pool, config });

    let app = pages::router()
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .fallback(pages::not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(limiter, rate_limit::limit))
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(uploads::MAX_IMAGE_SIZE + 64 * 1024))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        );

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("bind address");
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
