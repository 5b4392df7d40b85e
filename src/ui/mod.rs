//! DevOps GPT terminal UI
//!
//! Layout:
//! ╔══════════════════════════════════════════════════════════════╗
//! ║  DEVOPS GPT   Chat · Suggestions · Monitoring · Testing · …  ║
//! ╠══════════════════════════════════════════════════════════════╣
//! ║  devops-gpt  Hello! Share a repository URL or upload ...     ║
//! ║  you         how do I add a healthcheck?                     ║
//! ║                                                              ║
//! ╠══════════════════════════════════════════════════════════════╣
//! ║  › type a message_                       ⠋ waiting for reply ║
//! ╚══════════════════════════════════════════════════════════════╝

pub mod render;
pub mod theme;

pub use render::render;

use crate::session::{GeneratedView, NoticeLevel, Session, Tab};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Which line the keyboard is typing into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Chat input on the Chat tab, single-key commands elsewhere
    #[default]
    Normal,
    RepoUrl,
    Upload,
}

impl InputMode {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputMode::Normal => "›",
            InputMode::RepoUrl => "repo url ›",
            InputMode::Upload => "files ›",
        }
    }
}

/// Spinner animation frames (braille pattern)
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// Duration in seconds before toast expires
    pub fn duration_secs(&self) -> u64 {
        match self {
            ToastKind::Info => 3,
            ToastKind::Success => 3,
            ToastKind::Error => 10, // Errors stay longer
        }
    }
}

impl From<NoticeLevel> for ToastKind {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => ToastKind::Info,
            NoticeLevel::Success => ToastKind::Success,
            NoticeLevel::Error => ToastKind::Error,
        }
    }
}

/// Toast notification
pub struct Toast {
    pub message: String,
    pub created_at: Instant,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(message: &str, kind: ToastKind) -> Self {
        Self {
            message: message.to_string(),
            created_at: Instant::now(),
            kind,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= self.kind.duration_secs()
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

/// Effective settings, shown on the Settings tab
#[derive(Debug, Clone, Default)]
pub struct SettingsView {
    pub api_base_url: String,
    pub request_timeout: Option<Duration>,
    pub config_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
}

pub struct App {
    pub session: Session,
    pub input_mode: InputMode,
    pub toast: Option<Toast>,
    pub loading_frame: usize,
    pub suggestion_selected: usize,
    /// Transcript lines scrolled up from the bottom
    pub chat_scroll: usize,
    pub artifact_scroll: usize,
    pub settings: SettingsView,
    pub should_quit: bool,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(session: Session, settings: SettingsView) -> Self {
        Self {
            session,
            input_mode: InputMode::Normal,
            toast: None,
            loading_frame: 0,
            suggestion_selected: 0,
            chat_scroll: 0,
            artifact_scroll: 0,
            settings,
            should_quit: false,
            needs_redraw: true,
        }
    }

    /// True while any request is outstanding, including background refreshes
    pub fn is_loading(&self) -> bool {
        self.session.is_busy()
    }

    pub fn tick_loading(&mut self) {
        if self.is_loading() {
            self.loading_frame = self.loading_frame.wrapping_add(1);
            self.needs_redraw = true;
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.loading_frame % SPINNER_FRAMES.len()]
    }

    // ═══════════════════════════════════════════════════════════════════════
    //  TOASTS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn clear_expired_toast(&mut self) {
        if let Some(ref toast) = self.toast {
            if toast.is_expired() {
                self.toast = None;
                self.needs_redraw = true;
            }
        }
    }

    /// An error toast is never replaced by a lesser one until it expires.
    pub fn show_toast(&mut self, message: &str, kind: ToastKind) {
        if let Some(current) = &self.toast {
            if current.is_error() && kind != ToastKind::Error && !current.is_expired() {
                return;
            }
        }
        self.toast = Some(Toast::new(message, kind));
        self.needs_redraw = true;
    }

    /// Move queued session notices onto the toast line.
    pub fn flush_notices(&mut self) {
        for notice in self.session.take_notices() {
            self.show_toast(&notice.message, notice.level.into());
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    //  NAVIGATION
    // ═══════════════════════════════════════════════════════════════════════

    pub fn switch_tab(&mut self, tab: Tab) {
        self.session.switch_tab(tab);
        self.artifact_scroll = 0;
    }

    pub fn select_next_suggestion(&mut self) {
        let len = self.session.suggestions().len();
        if len > 0 && self.suggestion_selected + 1 < len {
            self.suggestion_selected += 1;
        }
    }

    pub fn select_prev_suggestion(&mut self) {
        self.suggestion_selected = self.suggestion_selected.saturating_sub(1);
    }

    /// Keep the selection inside the suggestion list after it changes.
    pub fn clamp_selection(&mut self) {
        let len = self.session.suggestions().len();
        if self.suggestion_selected >= len {
            self.suggestion_selected = len.saturating_sub(1);
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        match self.session.active_tab() {
            Tab::Chat => self.chat_scroll = self.chat_scroll.saturating_add(lines),
            _ => self.artifact_scroll = self.artifact_scroll.saturating_sub(lines),
        }
    }

    pub fn scroll_down(&mut self, lines: usize) {
        match self.session.active_tab() {
            Tab::Chat => self.chat_scroll = self.chat_scroll.saturating_sub(lines),
            _ => self.artifact_scroll = self.artifact_scroll.saturating_add(lines),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    //  ARTIFACTS
    // ═══════════════════════════════════════════════════════════════════════

    /// Artifact shown on the active tab, if that tab shows one
    pub fn current_artifact(&self) -> Option<&GeneratedView> {
        match self.session.active_tab() {
            Tab::Testing => self.session.test_script(),
            Tab::Monitoring => self.session.monitoring_config(),
            _ => None,
        }
    }

    /// Write the active tab's artifact into `dir` under its suggested name.
    pub fn save_artifact(&self, dir: &Path) -> Result<PathBuf> {
        let view = self
            .current_artifact()
            .context("Nothing generated yet on this tab")?;
        let path = dir.join(sanitize_file_name(view.file_name()));
        std::fs::write(&path, &view.artifact.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "artifact saved");
        Ok(path)
    }
}

/// Keep only the final path component of a service-provided name.
fn sanitize_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "generated.txt".to_string())
}
