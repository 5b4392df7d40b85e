//! Wire types shared by the chat, repository and suggestion clients.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════
//  CHAT
// ═══════════════════════════════════════════════════════════════════════════

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "you",
            Sender::Bot => "devops-gpt",
        }
    }
}

/// One entry in the transcript. Immutable once created; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a locally authored message with a fresh id.
    pub fn local(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
}

/// The service stamps messages with a naive local `datetime`; accept that
/// alongside RFC 3339 and treat naive values as UTC.
mod timestamp {
    use super::*;

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  REPOSITORY ANALYSIS
// ═══════════════════════════════════════════════════════════════════════════

/// Per-category suggestion text, in the order the service produced it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisBreakdown {
    #[serde(default)]
    pub dockerfile_suggestions: Vec<String>,
    #[serde(default)]
    pub kubernetes_suggestions: Vec<String>,
    #[serde(default)]
    pub cicd_suggestions: Vec<String>,
    #[serde(default)]
    pub monitoring_suggestions: Vec<String>,
}

impl AnalysisBreakdown {
    /// Categories in display order, each with its label
    pub fn categories(&self) -> [(&'static str, &[String]); 4] {
        [
            ("Dockerfile", self.dockerfile_suggestions.as_slice()),
            ("Kubernetes", self.kubernetes_suggestions.as_slice()),
            ("CI/CD", self.cicd_suggestions.as_slice()),
            ("Monitoring", self.monitoring_suggestions.as_slice()),
        ]
    }

    pub fn total(&self) -> usize {
        self.categories().iter().map(|(_, items)| items.len()).sum()
    }
}

/// Per-file findings, when the service reports them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub filename: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryAnalysis {
    pub repository_url: String,
    pub analysis: AnalysisBreakdown,
    #[serde(default)]
    pub files_analyzed: Vec<String>,
    #[serde(default)]
    pub files_details: Vec<FileAnalysis>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub repository_url: &'a str,
}

/// A file picked for upload, already read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Extensions the upload prompt advertises. Advisory only.
    pub const SUGGESTED_EXTENSIONS: [&'static str; 2] = [".zip", ".tar.gz"];

    pub fn has_suggested_extension(name: &str) -> bool {
        let lowered = name.to_ascii_lowercase();
        Self::SUGGESTED_EXTENSIONS
            .iter()
            .any(|ext| lowered.ends_with(ext))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SUGGESTIONS
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Dockerfile,
    Kubernetes,
    Cicd,
    Monitoring,
    Testing,
}

impl SuggestionType {
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionType::Dockerfile => "Dockerfile",
            SuggestionType::Kubernetes => "Kubernetes",
            SuggestionType::Cicd => "CI/CD",
            SuggestionType::Monitoring => "Monitoring",
            SuggestionType::Testing => "Testing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Read-only from the client's side; generated by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub code: Option<String>,
    pub priority: Priority,
    #[serde(default)]
    pub file_path: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════
//  GENERATION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFlavor {
    Selenium,
    Pytest,
    Testng,
}

impl TestFlavor {
    pub const ALL: [TestFlavor; 3] = [TestFlavor::Selenium, TestFlavor::Pytest, TestFlavor::Testng];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestFlavor::Selenium => "selenium",
            TestFlavor::Pytest => "pytest",
            TestFlavor::Testng => "testng",
        }
    }

    fn default_file_name(&self) -> &'static str {
        match self {
            TestFlavor::Selenium => "test_ui_selenium.py",
            TestFlavor::Pytest => "test_api_pytest.py",
            TestFlavor::Testng => "DevOpsGPTApiTests.java",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringFlavor {
    Prometheus,
    Grafana,
}

impl MonitoringFlavor {
    pub const ALL: [MonitoringFlavor; 2] = [MonitoringFlavor::Prometheus, MonitoringFlavor::Grafana];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonitoringFlavor::Prometheus => "prometheus",
            MonitoringFlavor::Grafana => "grafana",
        }
    }

    fn default_file_name(&self) -> &'static str {
        match self {
            MonitoringFlavor::Prometheus => "prometheus.yml",
            MonitoringFlavor::Grafana => "devops_gpt_dashboard.json",
        }
    }
}

/// Which artifact a generation call produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Test(TestFlavor),
    Monitoring(MonitoringFlavor),
}

impl Flavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Test(f) => f.as_str(),
            Flavor::Monitoring(f) => f.as_str(),
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            Flavor::Test(f) => f.default_file_name(),
            Flavor::Monitoring(f) => f.default_file_name(),
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerationRequest<T: Serialize> {
    #[serde(rename = "type")]
    pub kind: T,
}

/// Generated script or config. The service answers with `script`, `config`
/// or `content` depending on version; all three land in `content`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    #[serde(alias = "script", alias = "config")]
    pub content: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
