use tracing::info;

use portfolio_auth::config::AuthConfig;
use portfolio_auth::router::build_router;
use portfolio_auth::state::AppState;
use portfolio_core::config::Config;
use portfolio_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();
    let state = AppState::from_config(&config).expect("failed to build application state");
    info!(
        store = state.codes.name(),
        mailer = state.mailer.name(),
        "auth service configured"
    );

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
