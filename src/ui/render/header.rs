use crate::session::Tab;
use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub(super) fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let active = app.session.active_tab();

    let mut spans = vec![Span::styled(
        format!("   {}   ", Theme::LOGO),
        Style::default()
            .fg(Theme::WHITE)
            .add_modifier(Modifier::BOLD),
    )];

    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                format!(" {} ", Theme::DOT_SEPARATOR),
                Style::default().fg(Theme::GREY_500),
            ));
        }
        let style = if *tab == active {
            Theme::selected().add_modifier(Modifier::UNDERLINED)
        } else {
            Theme::text_dim()
        };
        spans.push(Span::styled(format!("F{} ", i + 1), Style::default().fg(Theme::GREY_500)));
        spans.push(Span::styled(tab.title(), style));
    }

    let lines = vec![Line::from(""), Line::from(spans)];

    let header = Paragraph::new(lines).style(Style::default().bg(Theme::BG));
    frame.render_widget(header, area);
}
