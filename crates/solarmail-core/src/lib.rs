pub mod api;
pub mod config;
pub mod monitor;
pub mod telemetry;

pub use api::{
    AnalysisResult, ApiError, ApiGateway, DashboardApi, EmailSummary, ErrorKind,
    ExtractedEntities, ExtractedKeywords, GatewayBuildError, HealthStatus, SyncAck, SyncStatus,
};
pub use config::Config;
pub use monitor::{UpstreamSnapshot, UpstreamState, probe, run_monitor};
pub use telemetry::{TelemetryError, TelemetryGuard, init_logging, init_telemetry};
