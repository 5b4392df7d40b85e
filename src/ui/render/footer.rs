use crate::session::{RequestKind, Tab};
use crate::ui::theme::Theme;
use crate::ui::{App, InputMode};
use crate::util::{tail_to_width, truncate};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Kinds shown in the status line while outstanding, in display order
const STATUS_KINDS: [(RequestKind, &str); 9] = [
    (RequestKind::Chat, "waiting for reply"),
    (RequestKind::Ingestion, "analyzing"),
    (RequestKind::AnalysisRestore, "restoring analysis"),
    (RequestKind::TestGeneration, "generating tests"),
    (RequestKind::MonitoringGeneration, "generating config"),
    (RequestKind::Suggestions, "fetching suggestions"),
    (RequestKind::History, "loading history"),
    (RequestKind::ClearHistory, "clearing history"),
    (RequestKind::Health, "checking health"),
];

pub(super) fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Theme::border())
        .style(Theme::bg());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let width = inner.width as usize;
    let status = status_spans(app);
    let status_width: usize = status.iter().map(|s| s.content.width()).sum();
    let left_width = width.saturating_sub(status_width + 2);

    let mut spans = vec![Span::raw("  ")];
    spans.extend(left_spans(app, left_width.saturating_sub(2)));

    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    let spacer = width.saturating_sub(used + status_width);
    spans.push(Span::raw(" ".repeat(spacer)));
    spans.extend(status);

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Input line on the Chat tab (or a draft), key hints elsewhere
fn left_spans(app: &App, width: usize) -> Vec<Span<'static>> {
    let draft = match app.input_mode {
        InputMode::RepoUrl => Some(&app.session.repo_url_draft),
        InputMode::Upload => Some(&app.session.upload_draft),
        InputMode::Normal if app.session.active_tab() == Tab::Chat => {
            Some(&app.session.chat_input)
        }
        InputMode::Normal => None,
    };

    let Some(text) = draft else {
        return hint_spans(app.session.active_tab());
    };

    let prompt = format!("{} ", app.input_mode.prompt());
    let available = width.saturating_sub(prompt.width() + 1);

    // Submit is disabled while a chat send is outstanding
    let locked = app.input_mode == InputMode::Normal && app.session.pending_request();
    let text_style = if locked {
        Theme::text_dim()
    } else {
        Theme::text()
    };

    let mut spans = vec![Span::styled(prompt, Style::default().fg(Theme::GREY_300))];
    if text.is_empty() {
        let placeholder = match app.input_mode {
            InputMode::RepoUrl => "https://github.com/org/repo  (Enter submit, Esc cancel)",
            InputMode::Upload => "paths to .zip / .tar.gz, space separated  (Enter upload, Esc cancel)",
            InputMode::Normal => "ask a question  (Ctrl+R repo url, Ctrl+U upload, Ctrl+H history, Ctrl+L clear)",
        };
        spans.push(Span::styled(truncate(placeholder, available), Theme::text_dim()));
    } else {
        spans.push(Span::styled(
            tail_to_width(text, available).to_string(),
            text_style,
        ));
        if !locked {
            spans.push(Span::styled("_", Style::default().fg(Theme::GREY_300)));
        }
    }
    spans
}

fn hint_spans(tab: Tab) -> Vec<Span<'static>> {
    let keys: &[(&str, &str)] = match tab {
        Tab::Chat => &[],
        Tab::Suggestions => &[("r", "refresh"), ("↑↓", "select")],
        Tab::Testing => &[("s/p/n", "generate"), ("w", "save")],
        Tab::Monitoring => &[("p/g", "generate"), ("w", "save")],
        Tab::Settings => &[("h", "health check")],
    };

    let mut spans = Vec::new();
    for (key, label) in keys.iter().chain([("Tab", "switch"), ("q", "quit")].iter()) {
        spans.push(Span::styled(format!(" {} ", key), Theme::key()));
        spans.push(Span::styled(format!(" {}  ", label), Theme::text_muted()));
    }
    spans
}

/// Spinner plus what is outstanding, or the last error
fn status_spans(app: &App) -> Vec<Span<'static>> {
    let active: Vec<&str> = STATUS_KINDS
        .iter()
        .filter(|(kind, _)| app.session.is_in_flight(*kind))
        .map(|(_, label)| *label)
        .collect();

    if !active.is_empty() {
        return vec![
            Span::styled(app.spinner().to_string(), Theme::selected()),
            Span::styled(format!(" {}  ", active.join(", ")), Theme::text_muted()),
        ];
    }

    if let Some(error) = app.session.last_error() {
        return vec![Span::styled(
            format!("{}  ", truncate(error, 60)),
            Style::default().fg(Theme::RED),
        )];
    }

    vec![Span::styled("ready  ", Theme::text_dim())]
}
