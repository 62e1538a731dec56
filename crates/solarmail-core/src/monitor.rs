//! Background liveness tracking for the SolarMail service.
//!
//! The monitor probes the service on a fixed interval and keeps the latest
//! outcome in an [`UpstreamState`] that HTTP handlers can read without
//! touching the network.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::{DashboardApi, ErrorKind};
use crate::config::MonitorConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpstreamSnapshot {
    /// `None` until the first probe completes.
    pub online: Option<bool>,
    pub checked_at: Option<DateTime<Utc>>,
    pub version: Option<String>,
    pub failure_kind: Option<ErrorKind>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpstreamState {
    inner: Arc<RwLock<UpstreamSnapshot>>,
}

impl UpstreamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> UpstreamSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn record(&self, snapshot: UpstreamSnapshot) {
        *self.inner.write().await = snapshot;
    }
}

/// Runs one health check and turns the outcome into a snapshot.
pub async fn probe<A: DashboardApi + ?Sized>(api: &A) -> UpstreamSnapshot {
    let checked_at = Some(Utc::now());
    match api.health_check().await {
        Ok(health) => UpstreamSnapshot {
            online: Some(true),
            checked_at,
            version: Some(health.version),
            failure_kind: None,
            message: None,
        },
        Err(err) => UpstreamSnapshot {
            online: Some(false),
            checked_at,
            version: None,
            failure_kind: err.kind(),
            message: Some(err.message()),
        },
    }
}

/// Probes immediately, then every `poll_interval`, until `shutdown` fires.
pub async fn run_monitor<A: DashboardApi + ?Sized>(
    api: Arc<A>,
    config: MonitorConfig,
    state: UpstreamState,
    shutdown: CancellationToken,
) {
    // `interval` panics on a zero period.
    let mut ticker = interval(config.poll_interval().max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let previous = state.snapshot().await.online;
        let snapshot = tokio::select! {
            _ = shutdown.cancelled() => break,
            snapshot = probe(api.as_ref()) => snapshot,
        };

        if previous != snapshot.online {
            match snapshot.online {
                Some(true) => info!(version = ?snapshot.version, "upstream is online"),
                _ => warn!(
                    kind = ?snapshot.failure_kind,
                    message = ?snapshot.message,
                    "upstream is offline"
                ),
            }
        }
        state.record(snapshot).await;
    }
}
