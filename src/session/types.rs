//! Session vocabulary: tabs, outgoing requests, and their outcomes.

use crate::api::{
    ChatMessage, Flavor, GeneratedArtifact, HealthStatus, MonitoringFlavor, RepositoryAnalysis,
    Suggestion, TestFlavor, TransportError,
};
use std::collections::HashSet;
use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════
//  TABS
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chat,
    Suggestions,
    Monitoring,
    Testing,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Chat,
        Tab::Suggestions,
        Tab::Monitoring,
        Tab::Testing,
        Tab::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Chat => "Chat",
            Tab::Suggestions => "Suggestions",
            Tab::Monitoring => "Monitoring",
            Tab::Testing => "Testing",
            Tab::Settings => "Settings",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Chat => 0,
            Tab::Suggestions => 1,
            Tab::Monitoring => 2,
            Tab::Testing => 3,
            Tab::Settings => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Tab> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  REQUESTS IN FLIGHT
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Chat,
    Ingestion,
    AnalysisRestore,
    TestGeneration,
    MonitoringGeneration,
    Suggestions,
    History,
    ClearHistory,
    Health,
}

impl RequestKind {
    /// Kinds that make the session "pending" and lock chat submission
    pub fn counts_as_pending(&self) -> bool {
        matches!(
            self,
            RequestKind::Chat
                | RequestKind::Ingestion
                | RequestKind::TestGeneration
                | RequestKind::MonitoringGeneration
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Chat => "Chat",
            RequestKind::Ingestion => "Repository analysis",
            RequestKind::AnalysisRestore => "Analysis restore",
            RequestKind::TestGeneration => "Test script generation",
            RequestKind::MonitoringGeneration => "Monitoring config generation",
            RequestKind::Suggestions => "Suggestion refresh",
            RequestKind::History => "History load",
            RequestKind::ClearHistory => "History clear",
            RequestKind::Health => "Health check",
        }
    }

    pub fn for_flavor(flavor: Flavor) -> RequestKind {
        match flavor {
            Flavor::Test(_) => RequestKind::TestGeneration,
            Flavor::Monitoring(_) => RequestKind::MonitoringGeneration,
        }
    }
}

/// At most one outstanding request per kind
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    kinds: HashSet<RequestKind>,
}

impl InFlight {
    pub fn contains(&self, kind: RequestKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Returns false if that kind is already outstanding.
    pub fn begin(&mut self, kind: RequestKind) -> bool {
        self.kinds.insert(kind)
    }

    pub fn finish(&mut self, kind: RequestKind) {
        self.kinds.remove(&kind);
    }

    pub fn pending(&self) -> bool {
        self.kinds.iter().any(|k| k.counts_as_pending())
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// A remote call the runtime should issue on the session's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    SendChat { text: String },
    FetchHistory,
    ClearHistory,
    AnalyzeRepository { url: String },
    UploadFiles { paths: Vec<PathBuf> },
    FetchCurrentAnalysis,
    FetchSuggestions,
    GenerateTests(TestFlavor),
    GenerateMonitoring(MonitoringFlavor),
    HealthCheck,
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::SendChat { .. } => RequestKind::Chat,
            Request::FetchHistory => RequestKind::History,
            Request::ClearHistory => RequestKind::ClearHistory,
            Request::AnalyzeRepository { .. } | Request::UploadFiles { .. } => {
                RequestKind::Ingestion
            }
            Request::FetchCurrentAnalysis => RequestKind::AnalysisRestore,
            Request::FetchSuggestions => RequestKind::Suggestions,
            Request::GenerateTests(_) => RequestKind::TestGeneration,
            Request::GenerateMonitoring(_) => RequestKind::MonitoringGeneration,
            Request::HealthCheck => RequestKind::Health,
        }
    }
}

/// Result of one remote call, delivered back to the event loop
#[derive(Debug, Clone)]
pub enum Outcome {
    ChatReply(Result<ChatMessage, TransportError>),
    History(Result<Vec<ChatMessage>, TransportError>),
    HistoryCleared(Result<(), TransportError>),
    Analysis(Result<RepositoryAnalysis, TransportError>),
    CurrentAnalysis(Result<Option<RepositoryAnalysis>, TransportError>),
    Suggestions(Result<Vec<Suggestion>, TransportError>),
    Generated {
        flavor: Flavor,
        result: Result<GeneratedArtifact, TransportError>,
    },
    Health(Result<HealthStatus, TransportError>),
    /// The background task panicked before producing a result
    TaskCrashed { kind: RequestKind, detail: String },
}

impl Outcome {
    pub fn kind(&self) -> RequestKind {
        match self {
            Outcome::ChatReply(_) => RequestKind::Chat,
            Outcome::History(_) => RequestKind::History,
            Outcome::HistoryCleared(_) => RequestKind::ClearHistory,
            Outcome::Analysis(_) => RequestKind::Ingestion,
            Outcome::CurrentAnalysis(_) => RequestKind::AnalysisRestore,
            Outcome::Suggestions(_) => RequestKind::Suggestions,
            Outcome::Generated { flavor, .. } => RequestKind::for_flavor(*flavor),
            Outcome::Health(_) => RequestKind::Health,
            Outcome::TaskCrashed { kind, .. } => *kind,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  NOTICES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Something the UI should flash at the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// The latest artifact produced for one generation kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedView {
    pub flavor: Flavor,
    pub artifact: GeneratedArtifact,
}

impl GeneratedView {
    pub fn file_name(&self) -> &str {
        self.artifact
            .filename
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.flavor.default_file_name())
    }
}
