//! The session state machine.
//!
//! [`Session`] owns the transcript, the drafts, the active tab and the set of
//! requests in flight. Every user action is a synchronous transition that
//! either does nothing (guard failed) or mutates state and hands back the
//! [`Request`] the runtime must issue. When that request finishes, its
//! [`Outcome`] is fed to [`Session::apply`] in a single step.
//!
//! The user's own chat message is appended before the request leaves, so
//! the transcript never waits on the network.

mod types;


pub use types::{
    GeneratedView, InFlight, Notice, NoticeLevel, Outcome, Request, RequestKind, Tab,
};

use crate::api::{
    ChatMessage, Flavor, GeneratedArtifact, HealthStatus, MonitoringFlavor, RepositoryAnalysis,
    Sender, Suggestion, TestFlavor, TransportError, UploadFile,
};
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

pub const GREETING: &str = "Hello! I'm DevOps GPT. Share a repository URL or upload your \
project files and I'll suggest improvements for your Dockerfiles, Kubernetes manifests, \
CI/CD pipelines and monitoring. You can also just ask me a question.";

/// Notices kept for the UI before the oldest are dropped
const MAX_QUEUED_NOTICES: usize = 16;

pub struct Session {
    transcript: Vec<ChatMessage>,
    active_tab: Tab,
    in_flight: InFlight,
    /// Ids of user messages appended locally that the service has not yet
    /// echoed back under its own id
    unconfirmed: HashSet<String>,

    /// Chat input line
    pub chat_input: String,
    /// Repository URL being typed
    pub repo_url_draft: String,
    /// Whitespace separated paths being typed for upload
    pub upload_draft: String,

    analysis: Option<RepositoryAnalysis>,
    suggestions: Vec<Suggestion>,
    test_script: Option<GeneratedView>,
    monitoring_config: Option<GeneratedView>,
    health: Option<Result<HealthStatus, TransportError>>,
    last_error: Option<String>,
    notices: VecDeque<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            transcript: vec![ChatMessage::local(Sender::Bot, GREETING)],
            active_tab: Tab::default(),
            in_flight: InFlight::default(),
            unconfirmed: HashSet::new(),
            chat_input: String::new(),
            repo_url_draft: String::new(),
            upload_draft: String::new(),
            analysis: None,
            suggestions: Vec::new(),
            test_script: None,
            monitoring_config: None,
            health: None,
            last_error: None,
            notices: VecDeque::new(),
        }
    }

    // ───────────────────────────────────────────────────────────────────────
    //  Read access
    // ───────────────────────────────────────────────────────────────────────

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// True while a chat send, ingestion or generation is outstanding.
    pub fn pending_request(&self) -> bool {
        self.in_flight.pending()
    }

    pub fn is_in_flight(&self, kind: RequestKind) -> bool {
        self.in_flight.contains(kind)
    }

    /// True while any request at all is outstanding
    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn analysis(&self) -> Option<&RepositoryAnalysis> {
        self.analysis.as_ref()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn test_script(&self) -> Option<&GeneratedView> {
        self.test_script.as_ref()
    }

    pub fn monitoring_config(&self) -> Option<&GeneratedView> {
        self.monitoring_config.as_ref()
    }

    pub fn health(&self) -> Option<&Result<HealthStatus, TransportError>> {
        self.health.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    // ───────────────────────────────────────────────────────────────────────
    //  Transitions
    // ───────────────────────────────────────────────────────────────────────

    /// Always allowed; touches nothing but the tab.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.active_tab = self.active_tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.active_tab = self.active_tab.prev();
    }

    pub fn submit_chat(&mut self) -> Option<Request> {
        let text = self.chat_input.trim().to_string();
        if text.is_empty() || self.pending_request() {
            return None;
        }
        if !self.in_flight.begin(RequestKind::Chat) {
            return None;
        }
        let message = ChatMessage::local(Sender::User, text.clone());
        self.unconfirmed.insert(message.id.clone());
        self.transcript.push(message);
        self.chat_input.clear();
        tracing::info!(chars = text.len(), "chat message submitted");
        Some(Request::SendChat { text })
    }

    pub fn submit_repository_url(&mut self) -> Option<Request> {
        let url = self.repo_url_draft.trim().to_string();
        if url.is_empty() || !self.in_flight.begin(RequestKind::Ingestion) {
            return None;
        }
        self.transcript.push(ChatMessage::local(
            Sender::Bot,
            format!("Analyzing repository: {}. This may take a moment...", url),
        ));
        self.repo_url_draft.clear();
        tracing::info!(%url, "repository analysis requested");
        Some(Request::AnalyzeRepository { url })
    }

    /// Fires as soon as a selection is made; there is no confirmation step.
    pub fn upload_files(&mut self, paths: Vec<PathBuf>) -> Option<Request> {
        if paths.is_empty() || !self.in_flight.begin(RequestKind::Ingestion) {
            return None;
        }
        let names: Vec<String> = paths.iter().map(|p| display_name(p)).collect();
        let unusual: Vec<&String> = names
            .iter()
            .filter(|name| !UploadFile::has_suggested_extension(name))
            .collect();
        if !unusual.is_empty() {
            self.push_notice(Notice::info(format!(
                "Expected {} archives; sending anyway: {}",
                UploadFile::SUGGESTED_EXTENSIONS.join(" or "),
                unusual
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        self.transcript.push(ChatMessage::local(
            Sender::Bot,
            format!(
                "Uploading {} file(s) for analysis: {}",
                names.len(),
                names.join(", ")
            ),
        ));
        tracing::info!(files = names.len(), "file upload requested");
        Some(Request::UploadFiles { paths })
    }

    /// Split the upload draft on whitespace and upload those paths.
    pub fn submit_upload_draft(&mut self) -> Option<Request> {
        let paths: Vec<PathBuf> = self
            .upload_draft
            .split_whitespace()
            .map(PathBuf::from)
            .collect();
        let request = self.upload_files(paths)?;
        self.upload_draft.clear();
        Some(request)
    }

    pub fn request_suggestions(&mut self) -> Option<Request> {
        self.begin_simple(RequestKind::Suggestions, Request::FetchSuggestions)
    }

    pub fn request_test_script(&mut self, flavor: TestFlavor) -> Option<Request> {
        self.begin_simple(RequestKind::TestGeneration, Request::GenerateTests(flavor))
    }

    pub fn request_monitoring_config(&mut self, flavor: MonitoringFlavor) -> Option<Request> {
        self.begin_simple(
            RequestKind::MonitoringGeneration,
            Request::GenerateMonitoring(flavor),
        )
    }

    /// Restore whatever analysis the service already holds.
    pub fn request_current_analysis(&mut self) -> Option<Request> {
        self.begin_simple(RequestKind::AnalysisRestore, Request::FetchCurrentAnalysis)
    }

    pub fn request_history(&mut self) -> Option<Request> {
        self.begin_simple(RequestKind::History, Request::FetchHistory)
    }

    pub fn request_health(&mut self) -> Option<Request> {
        self.begin_simple(RequestKind::Health, Request::HealthCheck)
    }

    /// Clearing remote history ends in a local reset, so nothing may be in
    /// flight, background refreshes included.
    pub fn request_clear_history(&mut self) -> Option<Request> {
        if self.is_busy() {
            self.push_notice(Notice::info("Wait for the current request to finish"));
            return None;
        }
        self.begin_simple(RequestKind::ClearHistory, Request::ClearHistory)
    }

    /// Full local reset back to the seeded greeting. Refused while busy.
    pub fn reset(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.reseed();
        true
    }

    fn begin_simple(&mut self, kind: RequestKind, request: Request) -> Option<Request> {
        if !self.in_flight.begin(kind) {
            return None;
        }
        tracing::debug!(request = kind.label(), "request issued");
        Some(request)
    }

    fn reseed(&mut self) {
        self.transcript = vec![ChatMessage::local(Sender::Bot, GREETING)];
        self.unconfirmed.clear();
        self.analysis = None;
        self.suggestions.clear();
        self.test_script = None;
        self.monitoring_config = None;
        self.last_error = None;
    }

    // ───────────────────────────────────────────────────────────────────────
    //  Completions
    // ───────────────────────────────────────────────────────────────────────

    /// Apply a finished request. May return a follow-up request to issue.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Request> {
        let kind = outcome.kind();
        self.in_flight.finish(kind);

        match outcome {
            Outcome::ChatReply(Ok(reply)) => {
                self.transcript.push(reply);
                None
            }
            Outcome::History(Ok(history)) => {
                let added = self.merge_history(history);
                self.push_notice(Notice::info(format!(
                    "Loaded {} message(s) from history",
                    added
                )));
                None
            }
            Outcome::HistoryCleared(Ok(())) => {
                if self.reset() {
                    self.push_notice(Notice::success("Chat history cleared"));
                } else {
                    self.push_notice(Notice::info(
                        "Remote history cleared; local session kept while requests finish",
                    ));
                }
                None
            }
            Outcome::Analysis(Ok(analysis)) => {
                self.transcript
                    .push(ChatMessage::local(Sender::Bot, analysis_summary(&analysis)));
                self.push_notice(Notice::success(format!(
                    "Analysis complete: {} suggestion(s)",
                    analysis.analysis.total()
                )));
                tracing::info!(
                    repository = %analysis.repository_url,
                    suggestions = analysis.analysis.total(),
                    "repository analysis completed"
                );
                // Replace, never merge
                self.analysis = Some(analysis);
                self.request_suggestions()
            }
            Outcome::CurrentAnalysis(Ok(Some(analysis))) => {
                self.push_notice(Notice::info(format!(
                    "Restored analysis of {}",
                    analysis.repository_url
                )));
                self.analysis = Some(analysis);
                self.request_suggestions()
            }
            Outcome::CurrentAnalysis(Ok(None)) => None,
            Outcome::Suggestions(Ok(suggestions)) => {
                self.suggestions = suggestions;
                None
            }
            Outcome::Generated {
                flavor,
                result: Ok(artifact),
            } => {
                self.store_artifact(flavor, artifact);
                self.push_notice(Notice::success(format!("Generated {} output", flavor)));
                None
            }
            Outcome::Health(result) => {
                match &result {
                    Ok(status) if status.is_healthy() => {
                        self.push_notice(Notice::success("Service is healthy"))
                    }
                    Ok(status) => {
                        self.push_notice(Notice::error(format!("Service reports: {}", status.status)))
                    }
                    Err(err) => self.push_notice(Notice::error(format!(
                        "Health check failed: {}",
                        err
                    ))),
                }
                self.health = Some(result);
                None
            }
            Outcome::ChatReply(Err(err))
            | Outcome::History(Err(err))
            | Outcome::HistoryCleared(Err(err))
            | Outcome::Analysis(Err(err))
            | Outcome::CurrentAnalysis(Err(err))
            | Outcome::Suggestions(Err(err))
            | Outcome::Generated { result: Err(err), .. } => {
                self.record_failure(kind, &err.to_string());
                None
            }
            Outcome::TaskCrashed { detail, .. } => {
                self.record_failure(kind, &detail);
                None
            }
        }
    }

    /// Fold the remote transcript into the local one, oldest first. A remote
    /// message is skipped when its id is already present, or when it is the
    /// service's copy of a user message sent from here (same text, in order).
    /// Everything else is inserted after the last message it follows remotely.
    /// Returns how many messages were added.
    fn merge_history(&mut self, history: Vec<ChatMessage>) -> usize {
        // Insert after the greeting by default
        let mut anchor = self.transcript.len().min(1);
        let mut added = 0;
        for remote in history {
            if let Some(pos) = self.transcript.iter().position(|m| m.id == remote.id) {
                anchor = anchor.max(pos + 1);
                continue;
            }
            if remote.sender == Sender::User {
                let echoed = self.transcript[anchor..].iter().position(|m| {
                    m.sender == Sender::User
                        && m.text == remote.text
                        && self.unconfirmed.contains(&m.id)
                });
                if let Some(offset) = echoed {
                    let pos = anchor + offset;
                    self.unconfirmed.remove(&self.transcript[pos].id);
                    self.transcript[pos].id = remote.id;
                    anchor = pos + 1;
                    continue;
                }
            }
            self.transcript.insert(anchor, remote);
            anchor += 1;
            added += 1;
        }
        added
    }

    fn store_artifact(&mut self, flavor: Flavor, artifact: GeneratedArtifact) {
        let view = Some(GeneratedView { flavor, artifact });
        match flavor {
            Flavor::Test(_) => self.test_script = view,
            Flavor::Monitoring(_) => self.monitoring_config = view,
        }
    }

    fn record_failure(&mut self, kind: RequestKind, detail: &str) {
        let message = format!("{} failed: {}", kind.label(), detail);
        tracing::warn!(request = kind.label(), error = detail, "request failed");
        self.last_error = Some(message.clone());
        self.push_notice(Notice::error(message));
    }

    fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() >= MAX_QUEUED_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn analysis_summary(analysis: &RepositoryAnalysis) -> String {
    let counts: Vec<String> = analysis
        .analysis
        .categories()
        .iter()
        .map(|(label, items)| format!("{} {}", items.len(), label))
        .collect();
    let mut text = format!(
        "Analysis of {} complete: {} suggestion(s).",
        analysis.repository_url,
        counts.join(", ")
    );
    if !analysis.summary.trim().is_empty() {
        text.push(' ');
        text.push_str(analysis.summary.trim());
    }
    text.push_str(" See the Suggestions tab for details.");
    text
}
