//! Typed clients for the DevOps GPT service.
//!
//! [`ApiClient`] bundles the chat, repository and suggestion clients over one
//! shared [`Transport`]. The runtime talks to it through the [`Backend`]
//! trait so the session machinery can be driven by an in-memory fake.

pub mod chat;
pub mod error;
pub mod repository;
pub mod suggestions;
pub mod transport;
pub mod types;

pub use chat::ChatClient;
pub use error::TransportError;
pub use repository::RepositoryClient;
pub use suggestions::SuggestionClient;
pub use transport::Transport;
pub use types::*;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;

/// Every remote operation the session can ask for.
pub trait Backend: Send + Sync {
    fn send_message<'a>(&'a self, text: &'a str) -> BackendFuture<'a, ChatMessage>;

    fn get_history(&self) -> BackendFuture<'_, Vec<ChatMessage>>;

    fn clear_history(&self) -> BackendFuture<'_, ()>;

    fn analyze_repository<'a>(&'a self, url: &'a str) -> BackendFuture<'a, RepositoryAnalysis>;

    fn upload_files(&self, files: Vec<UploadFile>) -> BackendFuture<'_, RepositoryAnalysis>;

    /// `None` when the service holds no analysis yet.
    fn current_analysis(&self) -> BackendFuture<'_, Option<RepositoryAnalysis>>;

    fn get_suggestions(&self) -> BackendFuture<'_, Vec<Suggestion>>;

    fn generate_test_scripts(&self, flavor: TestFlavor) -> BackendFuture<'_, GeneratedArtifact>;

    fn generate_monitoring_config(
        &self,
        flavor: MonitoringFlavor,
    ) -> BackendFuture<'_, GeneratedArtifact>;

    fn health(&self) -> BackendFuture<'_, HealthStatus>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub chat: ChatClient,
    pub repository: RepositoryClient,
    pub suggestions: SuggestionClient,
    transport: Transport,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let transport = Transport::new(base_url, timeout)?;
        Ok(Self {
            chat: ChatClient::new(transport.clone()),
            repository: RepositoryClient::new(transport.clone()),
            suggestions: SuggestionClient::new(transport.clone()),
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        self.transport.get("/health").await
    }
}

impl Backend for ApiClient {
    fn send_message<'a>(&'a self, text: &'a str) -> BackendFuture<'a, ChatMessage> {
        Box::pin(self.chat.send_message(text))
    }

    fn get_history(&self) -> BackendFuture<'_, Vec<ChatMessage>> {
        Box::pin(self.chat.get_history())
    }

    fn clear_history(&self) -> BackendFuture<'_, ()> {
        Box::pin(self.chat.clear_history())
    }

    fn analyze_repository<'a>(&'a self, url: &'a str) -> BackendFuture<'a, RepositoryAnalysis> {
        Box::pin(self.repository.analyze_repository(url))
    }

    fn upload_files(&self, files: Vec<UploadFile>) -> BackendFuture<'_, RepositoryAnalysis> {
        Box::pin(self.repository.upload_files(files))
    }

    fn current_analysis(&self) -> BackendFuture<'_, Option<RepositoryAnalysis>> {
        Box::pin(self.repository.current_analysis())
    }

    fn get_suggestions(&self) -> BackendFuture<'_, Vec<Suggestion>> {
        Box::pin(self.suggestions.get_suggestions())
    }

    fn generate_test_scripts(&self, flavor: TestFlavor) -> BackendFuture<'_, GeneratedArtifact> {
        Box::pin(self.suggestions.generate_test_artifact(flavor))
    }

    fn generate_monitoring_config(
        &self,
        flavor: MonitoringFlavor,
    ) -> BackendFuture<'_, GeneratedArtifact> {
        Box::pin(self.suggestions.generate_monitoring_artifact(flavor))
    }

    fn health(&self) -> BackendFuture<'_, HealthStatus> {
        Box::pin(ApiClient::health(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_clients_share_base_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "healthy",
                "service": "devops-gpt-api"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(&mock_server.uri(), None).unwrap();
        assert_eq!(api.base_url(), mock_server.uri());

        let backend: &dyn Backend = &api;
        let health = backend.health().await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.service.as_deref(), Some("devops-gpt-api"));
    }

    #[tokio::test]
    async fn test_backend_restores_current_analysis() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repository/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "repository_url": "https://github.com/org/kept",
                "analysis": { "dockerfile_suggestions": ["pin base image"] }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(&mock_server.uri(), None).unwrap();
        let backend: &dyn Backend = &api;
        let current = backend.current_analysis().await.unwrap().unwrap();
        assert_eq!(current.repository_url, "https://github.com/org/kept");
        assert_eq!(current.analysis.dockerfile_suggestions, vec!["pin base image"]);
    }
}
