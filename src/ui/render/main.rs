use crate::api::{RepositoryAnalysis, Sender};
use crate::session::{GeneratedView, RequestKind, Tab};
use crate::ui::theme::Theme;
use crate::ui::App;
use crate::util::wrap_to_width;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

pub(super) fn render_main(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Theme::border())
        .padding(Padding::horizontal(2))
        .style(Theme::bg());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    match app.session.active_tab() {
        Tab::Chat => render_chat(frame, inner, app),
        Tab::Suggestions => render_suggestions(frame, inner, app),
        Tab::Testing => render_generated(
            frame,
            inner,
            app,
            app.session.test_script(),
            RequestKind::TestGeneration,
            "s selenium  p pytest  n testng",
        ),
        Tab::Monitoring => render_generated(
            frame,
            inner,
            app,
            app.session.monitoring_config(),
            RequestKind::MonitoringGeneration,
            "p prometheus  g grafana",
        ),
        Tab::Settings => render_settings(frame, inner, app),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CHAT
// ═══════════════════════════════════════════════════════════════════════════

fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    for message in app.session.transcript() {
        let (label_style, text_style) = match message.sender {
            Sender::User => (Theme::selected(), Theme::text()),
            Sender::Bot => (
                Style::default()
                    .fg(Theme::GREEN)
                    .add_modifier(Modifier::BOLD),
                Theme::text_muted(),
            ),
        };
        lines.push(Line::from(vec![
            Span::styled(message.sender.label(), label_style),
            Span::styled(
                format!("  {}", message.timestamp.format("%H:%M")),
                Theme::text_dim(),
            ),
        ]));
        for wrapped in wrap_to_width(&message.text, width.saturating_sub(2)) {
            lines.push(Line::from(Span::styled(format!("  {}", wrapped), text_style)));
        }
        lines.push(Line::from(""));
    }

    if app.session.is_in_flight(RequestKind::Chat) {
        lines.push(Line::from(Span::styled(
            format!("{} thinking...", app.spinner()),
            Theme::text_dim(),
        )));
    }

    // Bottom-anchored; chat_scroll counts lines up from the end
    let height = area.height as usize;
    let max_start = lines.len().saturating_sub(height);
    let start = max_start.saturating_sub(app.chat_scroll);
    let visible: Vec<Line> = lines.into_iter().skip(start).take(height).collect();

    frame.render_widget(Paragraph::new(visible), area);
}

// ═══════════════════════════════════════════════════════════════════════════
//  SUGGESTIONS
// ═══════════════════════════════════════════════════════════════════════════

fn render_suggestions(frame: &mut Frame, area: Rect, app: &App) {
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    match app.session.analysis() {
        Some(analysis) => push_analysis(&mut lines, analysis, width),
        None if app.session.is_in_flight(RequestKind::Ingestion) => {
            lines.push(Line::from(Span::styled(
                format!("{} analyzing repository...", app.spinner()),
                Theme::text_dim(),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "No repository analyzed yet. Press Ctrl+R on the Chat tab to submit a URL, or Ctrl+U to upload files.",
                Theme::text_dim(),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("SUGGESTIONS", Theme::title())));

    let suggestions = app.session.suggestions();
    if suggestions.is_empty() {
        let hint = if app.session.is_in_flight(RequestKind::Suggestions) {
            format!("{} fetching...", app.spinner())
        } else {
            "None yet. Press r to refresh.".to_string()
        };
        lines.push(Line::from(Span::styled(hint, Theme::text_dim())));
    }

    for (i, suggestion) in suggestions.iter().enumerate() {
        let selected = i == app.suggestion_selected;
        let (marker, marker_style) = Theme::priority_marker(suggestion.priority);
        let title_style = if selected {
            Theme::selected()
        } else {
            Theme::text()
        };
        let mut spans = vec![
            Span::styled(
                if selected { Theme::ARROW_RIGHT } else { ' ' }.to_string(),
                Theme::selected(),
            ),
            Span::styled(format!(" {} ", marker), marker_style),
            Span::styled(format!("[{}] ", suggestion.kind.label()), Theme::text_muted()),
            Span::styled(suggestion.title.clone(), title_style),
        ];
        if let Some(path) = &suggestion.file_path {
            spans.push(Span::styled(format!("  {}", path), Theme::text_dim()));
        }
        lines.push(Line::from(spans));

        if selected {
            for wrapped in wrap_to_width(&suggestion.description, width.saturating_sub(5)) {
                lines.push(Line::from(Span::styled(
                    format!("     {}", wrapped),
                    Theme::text_muted(),
                )));
            }
            if let Some(code) = &suggestion.code {
                lines.push(Line::from(""));
                for code_line in code.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("     {}", code_line),
                        Style::default().fg(Theme::GREY_200),
                    )));
                }
            }
        }
    }

    let paragraph = Paragraph::new(lines).scroll((clamp_u16(app.artifact_scroll), 0));
    frame.render_widget(paragraph, area);
}

/// Categories in service order, items in service order.
fn push_analysis(lines: &mut Vec<Line<'static>>, analysis: &RepositoryAnalysis, width: usize) {
    lines.push(Line::from(vec![
        Span::styled("ANALYSIS  ", Theme::title()),
        Span::styled(analysis.repository_url.clone(), Theme::text()),
    ]));
    if !analysis.files_analyzed.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("{} file(s) analyzed", analysis.files_analyzed.len()),
            Theme::text_dim(),
        )));
    }
    if !analysis.summary.trim().is_empty() {
        for wrapped in wrap_to_width(analysis.summary.trim(), width) {
            lines.push(Line::from(Span::styled(wrapped, Theme::text_muted())));
        }
    }

    for (label, items) in analysis.analysis.categories() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(label, Theme::selected()),
            Span::styled(format!("  ({})", items.len()), Theme::text_dim()),
        ]));
        for item in items {
            let wrapped = wrap_to_width(item, width.saturating_sub(4));
            for (i, part) in wrapped.into_iter().enumerate() {
                let lead = if i == 0 {
                    format!("  {} ", Theme::ARROW_RIGHT)
                } else {
                    "    ".to_string()
                };
                lines.push(Line::from(vec![
                    Span::styled(lead, Theme::text_dim()),
                    Span::styled(part, Theme::text()),
                ]));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  GENERATED ARTIFACTS
// ═══════════════════════════════════════════════════════════════════════════

fn render_generated(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    view: Option<&GeneratedView>,
    kind: RequestKind,
    keys: &str,
) {
    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled("Generate: ", Theme::text_muted()),
        Span::styled(keys.to_string(), Theme::text()),
        Span::styled("   w save to current directory", Theme::text_dim()),
    ])];

    if app.session.is_in_flight(kind) {
        lines.push(Line::from(Span::styled(
            format!("{} generating...", app.spinner()),
            Theme::text_dim(),
        )));
    }
    lines.push(Line::from(""));

    match view {
        Some(view) => {
            lines.push(Line::from(vec![
                Span::styled(view.file_name().to_string(), Theme::title()),
                Span::styled(format!("  ({})", view.flavor), Theme::text_dim()),
            ]));
            if let Some(description) = &view.artifact.description {
                lines.push(Line::from(Span::styled(
                    description.clone(),
                    Theme::text_muted(),
                )));
            }
            lines.push(Line::from(""));
            for code_line in view.artifact.content.lines() {
                lines.push(Line::from(Span::styled(
                    code_line.to_string(),
                    Style::default().fg(Theme::GREY_200),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Nothing generated yet.",
            Theme::text_dim(),
        ))),
    }

    let paragraph = Paragraph::new(lines).scroll((clamp_u16(app.artifact_scroll), 0));
    frame.render_widget(paragraph, area);
}

// ═══════════════════════════════════════════════════════════════════════════
//  SETTINGS
// ═══════════════════════════════════════════════════════════════════════════

fn render_settings(frame: &mut Frame, area: Rect, app: &App) {
    let settings = &app.settings;
    let timeout = settings
        .request_timeout
        .map(|t| format!("{}s", t.as_secs()))
        .unwrap_or_else(|| "none (wait indefinitely)".to_string());
    let path_or_dash = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<14}", label), Theme::text_muted()),
            Span::styled(value, Theme::text()),
        ])
    };

    let health = match app.session.health() {
        _ if app.session.is_in_flight(RequestKind::Health) => {
            Span::styled(format!("{} checking...", app.spinner()), Theme::text_dim())
        }
        Some(Ok(status)) if status.is_healthy() => Span::styled(
            format!(
                "{} {}{}",
                Theme::CHECK_MARK,
                status.status,
                status
                    .service
                    .as_deref()
                    .map(|s| format!(" ({})", s))
                    .unwrap_or_default()
            ),
            Style::default().fg(Theme::GREEN),
        ),
        Some(Ok(status)) => Span::styled(
            format!("{} {}", Theme::CROSS_MARK, status.status),
            Style::default().fg(Theme::YELLOW),
        ),
        Some(Err(err)) => Span::styled(
            format!("{} {}", Theme::CROSS_MARK, err),
            Style::default().fg(Theme::RED),
        ),
        None => Span::styled("not checked (press h)", Theme::text_dim()),
    };

    let lines = vec![
        Line::from(Span::styled("SETTINGS", Theme::title())),
        Line::from(""),
        row("API URL", settings.api_base_url.clone()),
        row("Timeout", timeout),
        row("Config file", path_or_dash(&settings.config_path)),
        row("Log file", path_or_dash(&settings.log_path)),
        Line::from(vec![
            Span::styled(format!("{:<14}", "Health"), Theme::text_muted()),
            health,
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Edit the config file or pass --api-url / --timeout to change these.",
            Theme::text_dim(),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
