pub mod config;
pub mod error;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use config::ServerConfig;
pub use error::{Error, Result};
use futures::FutureExt as _;
use hondana_app::state::AppState;
use tracing::info;

pub fn build_state(config: &ServerConfig) -> Result<AppState> {
    AppState::from_args(&config.catalog)
}

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args)?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(&args, state))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Complete application with layers configured by `args`
pub fn app(args: &ServerConfig, state: AppState) -> Router<()> {
    let mut app = main_router(state);
    if !args.no_cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }
    app
}

fn main_router(state: AppState) -> Router<()> {
    Router::new()
        .nest("/api/books", hondana_app::rest_api::books::router())
        .with_state(state)
        .route("/health", get(health))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
