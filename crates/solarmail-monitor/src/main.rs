use std::{env, net::SocketAddr, sync::Arc};

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use solarmail_core::{
    ApiGateway, Config, DashboardApi, UpstreamSnapshot, UpstreamState, init_telemetry,
    run_monitor,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    upstream: UpstreamState,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(&config_path)?;

    let _guard = init_telemetry(&config.app, &config.telemetry)?;

    let gateway = ApiGateway::from_config(&config.api)?;
    info!(base_url = gateway.base_url(), timeout_ms = config.api.timeout_ms, "gateway configured");
    let api: Arc<dyn DashboardApi> = Arc::new(gateway);

    let upstream = UpstreamState::new();
    let shutdown = CancellationToken::new();
    let monitor_handle = tokio::spawn(run_monitor(
        api,
        config.monitor.clone(),
        upstream.clone(),
        shutdown.child_token(),
    ));

    let app = router(AppState { upstream });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.monitor.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("SolarMail monitor listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    let _ = monitor_handle.await;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/upstream", get(upstream))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn upstream(State(state): State<AppState>) -> (StatusCode, Json<UpstreamSnapshot>) {
    let snapshot = state.upstream.snapshot().await;
    let status = match snapshot.online {
        Some(true) => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(snapshot))
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("received ctrl+c, shutting down");
        }
        _ = terminate => {
            warn!("received terminate signal, shutting down");
        }
    }

    shutdown.cancel();
}
