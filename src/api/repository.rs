//! Repository ingestion: by URL or by multipart file upload.

use super::error::TransportError;
use super::transport::Transport;
use super::types::{AnalyzeRequest, RepositoryAnalysis, UploadFile};
use reqwest::multipart::{Form, Part};

/// Multipart field every uploaded file is attached under
pub const UPLOAD_FIELD: &str = "files";

#[derive(Debug, Clone)]
pub struct RepositoryClient {
    transport: Transport,
}

impl RepositoryClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// The URL is opaque here; only blankness is checked.
    pub async fn analyze_repository(&self, url: &str) -> Result<RepositoryAnalysis, TransportError> {
        let url = url.trim();
        if url.is_empty() {
            tracing::debug!("blank repository URL rejected before send");
            return Err(TransportError::new(None, "repository URL is blank"));
        }
        self.transport
            .post(
                "/repository/analyze",
                &AnalyzeRequest {
                    repository_url: url,
                },
            )
            .await
    }

    /// Upload files for analysis. Parts keep the input order.
    pub async fn upload_files(
        &self,
        files: Vec<UploadFile>,
    ) -> Result<RepositoryAnalysis, TransportError> {
        if files.is_empty() {
            tracing::debug!("empty upload rejected before send");
            return Err(TransportError::new(None, "no files selected for upload"));
        }
        self.transport
            .upload("/repository/upload", build_upload_form(files))
            .await
    }

    /// Analysis the service currently holds, if any (404 means none).
    pub async fn current_analysis(&self) -> Result<Option<RepositoryAnalysis>, TransportError> {
        match self.transport.get("/repository/current").await {
            Ok(analysis) => Ok(Some(analysis)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn build_upload_form(files: Vec<UploadFile>) -> Form {
    files.into_iter().fold(Form::new(), |form, file| {
        let part = Part::bytes(file.bytes).file_name(file.file_name);
        form.part(UPLOAD_FIELD, part)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn client(server: &MockServer) -> RepositoryClient {
        RepositoryClient::new(Transport::new(&server.uri(), None).unwrap())
    }

    fn analysis_body(url: &str) -> serde_json::Value {
        json!({
            "repository_url": url,
            "files_analyzed": ["Dockerfile", "k8s/deploy.yaml"],
            "analysis": {
                "dockerfile_suggestions": [
                    "Add HEALTHCHECK instruction to Dockerfile",
                    "Run container as non-root user for security"
                ],
                "kubernetes_suggestions": ["Add resource limits and requests"],
                "cicd_suggestions": [],
                "monitoring_suggestions": ["Add health check endpoints"]
            },
            "summary": "2 files analyzed"
        })
    }

    #[tokio::test]
    async fn test_analyze_repository_posts_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repository/analyze"))
            .and(body_json(json!({ "repository_url": "https://github.com/org/repo" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(analysis_body("https://github.com/org/repo")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let analysis = client(&mock_server)
            .analyze_repository("https://github.com/org/repo")
            .await
            .unwrap();
        assert_eq!(analysis.repository_url, "https://github.com/org/repo");
        assert_eq!(
            analysis.analysis.dockerfile_suggestions[0],
            "Add HEALTHCHECK instruction to Dockerfile"
        );
        assert_eq!(analysis.files_analyzed.len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_does_not_validate_url_shape() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repository/analyze"))
            .and(body_json(json!({ "repository_url": "not a url" })))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "detail": "invalid url" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .analyze_repository("not a url")
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(422));
    }

    #[tokio::test]
    async fn test_upload_attaches_files_in_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repository/upload"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(analysis_body("uploaded_files_2_files")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let analysis = client(&mock_server)
            .upload_files(vec![
                UploadFile::new("first.zip", b"one".to_vec()),
                UploadFile::new("second.tar.gz", b"two".to_vec()),
            ])
            .await
            .unwrap();
        assert_eq!(analysis.repository_url, "uploaded_files_2_files");

        let requests: Vec<Request> = mock_server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));

        let body = String::from_utf8_lossy(&requests[0].body);
        let first = body.find("filename=\"first.zip\"").unwrap();
        let second = body.find("filename=\"second.tar.gz\"").unwrap();
        assert!(first < second);
        assert_eq!(body.matches("name=\"files\"").count(), 2);
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_selection() {
        let mock_server = MockServer::start().await;
        let err = client(&mock_server).upload_files(Vec::new()).await.unwrap_err();
        assert_eq!(err.status, None);
        assert!(err.message.contains("no files"));
    }

    #[tokio::test]
    async fn test_blank_url_never_hits_the_wire() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repository/analyze"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .analyze_repository("  ")
            .await
            .unwrap_err();
        assert_eq!(err.status, None);
        assert_eq!(err.to_string(), "repository URL is blank");
    }

    #[tokio::test]
    async fn test_current_analysis_maps_404_to_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repository/current"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "detail": "No repository analysis available"
            })))
            .mount(&mock_server)
            .await;

        let current = client(&mock_server).current_analysis().await.unwrap();
        assert!(current.is_none());
    }
}
