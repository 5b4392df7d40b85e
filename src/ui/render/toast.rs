use crate::ui::theme::Theme;
use crate::ui::{Toast, ToastKind};
use crate::util::truncate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub(super) fn render_toast(frame: &mut Frame, toast: &Toast) {
    let area = frame.area();

    let (prefix, bg, text_style) = match toast.kind {
        ToastKind::Success => (
            "  + ",
            Theme::GREEN,
            Style::default()
                .fg(Theme::WHITE)
                .add_modifier(Modifier::BOLD),
        ),
        ToastKind::Error => ("  x ", Theme::RED, Style::default().fg(Theme::WHITE)),
        ToastKind::Info => (
            "  › ",
            Theme::GREY_700,
            Style::default()
                .fg(Theme::GREY_100)
                .add_modifier(Modifier::ITALIC),
        ),
    };

    let suffix = "  ";
    let max_message = (area.width as usize).saturating_sub(prefix.width() + suffix.len());
    let message = truncate(&toast.message, max_message);

    let width = (prefix.width() + message.width() + suffix.len()) as u16;
    let toast_area = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: area.height.saturating_sub(5),
        width: width.min(area.width),
        height: 1u16.min(area.height),
    };

    frame.render_widget(Clear, toast_area);

    let content = Paragraph::new(Line::from(vec![
        Span::styled(prefix, Style::default().fg(Theme::WHITE)),
        Span::styled(message, text_style),
        Span::styled(suffix, Style::default().fg(Theme::GREY_900)),
    ]))
    .style(Style::default().bg(bg));
    frame.render_widget(content, toast_area);
}
