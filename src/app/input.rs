//! Key handling
//!
//! Keys map to session transitions. A transition that fires hands back a
//! [`Request`], which [`handle_key_event`] dispatches; everything else is a
//! local state change. [`handle_key`] does no I/O so it can be tested
//! without a runtime.

use crate::api::{MonitoringFlavor, TestFlavor};
use crate::app::{background, RuntimeContext};
use crate::session::{Request, Tab};
use crate::ui::{App, InputMode, ToastKind};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const PAGE: usize = 10;

// ═══════════════════════════════════════════════════════════════════════════
//  MAIN INPUT DISPATCHER
// ═══════════════════════════════════════════════════════════════════════════

pub fn handle_key_event(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) -> Result<()> {
    if let Some(request) = handle_key(app, key) {
        background::dispatch(request, ctx);
    }
    app.flush_notices();
    app.needs_redraw = true;
    Ok(())
}

/// Apply one key press. Returns the request to issue, if one fired.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Request> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }

    match app.input_mode {
        InputMode::RepoUrl | InputMode::Upload => return handle_draft_input(app, key),
        InputMode::Normal => {}
    }

    match key.code {
        KeyCode::Tab => {
            app.switch_tab(app.session.active_tab().next());
            return None;
        }
        KeyCode::BackTab => {
            app.switch_tab(app.session.active_tab().prev());
            return None;
        }
        KeyCode::F(n) if (1..=5).contains(&n) => {
            if let Some(tab) = Tab::from_index(usize::from(n - 1)) {
                app.switch_tab(tab);
            }
            return None;
        }
        KeyCode::PageUp => {
            app.scroll_up(PAGE);
            return None;
        }
        KeyCode::PageDown => {
            app.scroll_down(PAGE);
            return None;
        }
        _ => {}
    }

    match app.session.active_tab() {
        Tab::Chat => handle_chat_tab(app, key, ctrl),
        Tab::Suggestions => handle_suggestions_tab(app, key),
        Tab::Testing => handle_testing_tab(app, key),
        Tab::Monitoring => handle_monitoring_tab(app, key),
        Tab::Settings => handle_settings_tab(app, key),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  TEXT ENTRY
// ═══════════════════════════════════════════════════════════════════════════

fn handle_chat_tab(app: &mut App, key: KeyEvent, ctrl: bool) -> Option<Request> {
    if ctrl {
        return match key.code {
            KeyCode::Char('r') => {
                app.input_mode = InputMode::RepoUrl;
                None
            }
            KeyCode::Char('u') => {
                app.input_mode = InputMode::Upload;
                None
            }
            KeyCode::Char('h') => app.session.request_history(),
            KeyCode::Char('l') => app.session.request_clear_history(),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter => {
            if app.session.pending_request() {
                return None;
            }
            let request = app.session.submit_chat();
            if request.is_some() {
                app.chat_scroll = 0;
            }
            request
        }
        KeyCode::Char(c) => {
            app.session.chat_input.push(c);
            None
        }
        KeyCode::Backspace => {
            app.session.chat_input.pop();
            None
        }
        KeyCode::Esc => {
            app.session.chat_input.clear();
            None
        }
        KeyCode::Up => {
            app.scroll_up(1);
            None
        }
        KeyCode::Down => {
            app.scroll_down(1);
            None
        }
        _ => None,
    }
}

/// Repository URL and upload path entry share the same editing keys.
fn handle_draft_input(app: &mut App, key: KeyEvent) -> Option<Request> {
    let mode = app.input_mode;
    let draft = match mode {
        InputMode::RepoUrl => &mut app.session.repo_url_draft,
        InputMode::Upload => &mut app.session.upload_draft,
        InputMode::Normal => return None,
    };

    match key.code {
        KeyCode::Esc => {
            draft.clear();
            app.input_mode = InputMode::Normal;
            None
        }
        KeyCode::Backspace => {
            draft.pop();
            None
        }
        KeyCode::Char(c) => {
            draft.push(c);
            None
        }
        KeyCode::Enter => {
            let request = match mode {
                InputMode::RepoUrl => app.session.submit_repository_url(),
                _ => app.session.submit_upload_draft(),
            };
            if request.is_some() {
                app.input_mode = InputMode::Normal;
                app.chat_scroll = 0;
            } else if draft_is_blank(app, mode) {
                app.input_mode = InputMode::Normal;
            } else {
                app.show_toast("Analysis already in progress", ToastKind::Info);
            }
            request
        }
        _ => None,
    }
}

fn draft_is_blank(app: &App, mode: InputMode) -> bool {
    match mode {
        InputMode::RepoUrl => app.session.repo_url_draft.trim().is_empty(),
        _ => app.session.upload_draft.trim().is_empty(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  COMMAND TABS
// ═══════════════════════════════════════════════════════════════════════════

fn handle_suggestions_tab(app: &mut App, key: KeyEvent) -> Option<Request> {
    match key.code {
        KeyCode::Char('r') => app.session.request_suggestions(),
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_suggestion();
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_prev_suggestion();
            None
        }
        KeyCode::Char('q') => quit(app),
        _ => None,
    }
}

fn handle_testing_tab(app: &mut App, key: KeyEvent) -> Option<Request> {
    let flavor = match key.code {
        KeyCode::Char('s') => TestFlavor::Selenium,
        KeyCode::Char('p') => TestFlavor::Pytest,
        KeyCode::Char('n') => TestFlavor::Testng,
        _ => return handle_artifact_keys(app, key),
    };
    let request = app.session.request_test_script(flavor);
    if request.is_none() {
        app.show_toast("Test generation already running", ToastKind::Info);
    }
    request
}

fn handle_monitoring_tab(app: &mut App, key: KeyEvent) -> Option<Request> {
    let flavor = match key.code {
        KeyCode::Char('p') => MonitoringFlavor::Prometheus,
        KeyCode::Char('g') => MonitoringFlavor::Grafana,
        _ => return handle_artifact_keys(app, key),
    };
    let request = app.session.request_monitoring_config(flavor);
    if request.is_none() {
        app.show_toast("Monitoring generation already running", ToastKind::Info);
    }
    request
}

fn handle_artifact_keys(app: &mut App, key: KeyEvent) -> Option<Request> {
    match key.code {
        KeyCode::Char('w') => {
            match std::env::current_dir()
                .map_err(anyhow::Error::from)
                .and_then(|dir| app.save_artifact(&dir))
            {
                Ok(path) => app.show_toast(&format!("Saved {}", path.display()), ToastKind::Success),
                Err(e) => app.show_toast(&format!("Save failed: {}", e), ToastKind::Error),
            }
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_down(1);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_up(1);
            None
        }
        KeyCode::Char('q') => quit(app),
        _ => None,
    }
}

fn handle_settings_tab(app: &mut App, key: KeyEvent) -> Option<Request> {
    match key.code {
        KeyCode::Char('h') => app.session.request_health(),
        KeyCode::Char('q') => quit(app),
        _ => None,
    }
}

fn quit(app: &mut App) -> Option<Request> {
    app.should_quit = true;
    None
}
