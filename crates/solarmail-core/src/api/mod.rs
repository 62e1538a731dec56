pub mod client;
pub mod dashboard;
pub mod error;
pub mod types;

pub use client::{
    API_VERSION_PREFIX, ApiGateway, DEFAULT_EMAIL_LIMIT, DEFAULT_TIMEOUT, GatewayBuildError,
    MAX_EMAIL_LIMIT,
};
pub use dashboard::DashboardApi;
pub use error::{ApiError, ErrorKind};
pub use types::*;
