//! Suggestions and artifact generation.

use super::error::TransportError;
use super::transport::Transport;
use super::types::{GeneratedArtifact, GenerationRequest, MonitoringFlavor, Suggestion, TestFlavor};

#[derive(Debug, Clone)]
pub struct SuggestionClient {
    transport: Transport,
}

impl SuggestionClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn get_suggestions(&self) -> Result<Vec<Suggestion>, TransportError> {
        self.transport.get("/suggestions").await
    }

    /// Raw generated test script text
    pub async fn generate_test_scripts(&self, flavor: TestFlavor) -> Result<String, TransportError> {
        Ok(self.generate_test_artifact(flavor).await?.content)
    }

    /// Raw generated monitoring configuration text
    pub async fn generate_monitoring_config(
        &self,
        flavor: MonitoringFlavor,
    ) -> Result<String, TransportError> {
        Ok(self.generate_monitoring_artifact(flavor).await?.content)
    }

    pub async fn generate_test_artifact(
        &self,
        flavor: TestFlavor,
    ) -> Result<GeneratedArtifact, TransportError> {
        self.transport
            .post(
                "/suggestions/generate-tests",
                &GenerationRequest { kind: flavor },
            )
            .await
    }

    pub async fn generate_monitoring_artifact(
        &self,
        flavor: MonitoringFlavor,
    ) -> Result<GeneratedArtifact, TransportError> {
        self.transport
            .post(
                "/suggestions/generate-monitoring",
                &GenerationRequest { kind: flavor },
            )
            .await
    }
}
