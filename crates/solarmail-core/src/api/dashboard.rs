use async_trait::async_trait;

use crate::api::client::ApiGateway;
use crate::api::error::ApiError;
use crate::api::types::{AnalysisResult, EmailSummary, HealthStatus, SyncAck, SyncStatus};

/// The operations the dashboard consumes, so views and the monitor can be
/// driven by a test double instead of a live service.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn health_check(&self) -> Result<HealthStatus, ApiError>;

    async fn get_emails(&self, limit: u32) -> Result<Vec<EmailSummary>, ApiError>;

    async fn get_email(&self, id: i64) -> Result<EmailSummary, ApiError>;

    async fn analyze_email(&self, subject: &str, body: &str) -> Result<AnalysisResult, ApiError>;

    async fn get_sync_status(&self, address: &str) -> Result<SyncStatus, ApiError>;

    async fn trigger_sync(&self) -> Result<SyncAck, ApiError>;

    /// Never fails: any error from `health_check` reads as offline.
    async fn ping(&self) -> bool {
        self.health_check().await.is_ok()
    }
}

#[async_trait]
impl DashboardApi for ApiGateway {
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        ApiGateway::health_check(self).await
    }

    async fn get_emails(&self, limit: u32) -> Result<Vec<EmailSummary>, ApiError> {
        ApiGateway::get_emails(self, limit).await
    }

    async fn get_email(&self, id: i64) -> Result<EmailSummary, ApiError> {
        ApiGateway::get_email(self, id).await
    }

    async fn analyze_email(&self, subject: &str, body: &str) -> Result<AnalysisResult, ApiError> {
        ApiGateway::analyze_email(self, subject, body).await
    }

    async fn get_sync_status(&self, address: &str) -> Result<SyncStatus, ApiError> {
        ApiGateway::get_sync_status(self, address).await
    }

    async fn trigger_sync(&self) -> Result<SyncAck, ApiError> {
        ApiGateway::trigger_sync(self).await
    }

    async fn ping(&self) -> bool {
        ApiGateway::ping(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn gateway_is_usable_through_trait_object() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "version": "0.3.2",
            })))
            .expect(2)
            .mount(&server)
            .await;

        let gateway = ApiGateway::new(reqwest::Client::new(), server.uri(), Duration::from_secs(2))
            .expect("gateway builds");
        let api: Arc<dyn DashboardApi> = Arc::new(gateway);

        assert!(api.ping().await);
        let health = api.health_check().await.expect("health loads");
        assert_eq!(health.version, "0.3.2");

        let err = api.get_email(0).await.expect_err("validation happens before I/O");
        assert!(err.is_validation());
    }
}
