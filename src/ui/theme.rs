//! Greyscale theme for the DevOps GPT terminal
//! A high-contrast monochrome palette with a few accents for status

use crate::api::Priority;
use ratatui::style::{Color, Modifier, Style};

/// The greyscale color palette
pub struct Theme;

impl Theme {
    // ─────────────────────────────────────────────────────────────────────
    // Core greyscale palette - from brightest to darkest
    // ─────────────────────────────────────────────────────────────────────

    /// Pure white - maximum emphasis
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Near white - headers, selected items
    pub const GREY_50: Color = Color::Rgb(250, 250, 250);

    /// Bright grey - primary text
    pub const GREY_100: Color = Color::Rgb(220, 220, 220);

    /// Light grey - secondary text
    pub const GREY_200: Color = Color::Rgb(180, 180, 180);

    /// Medium grey - muted text
    pub const GREY_300: Color = Color::Rgb(140, 140, 140);

    /// Dark grey - inactive tabs
    pub const GREY_400: Color = Color::Rgb(100, 100, 100);

    /// Darker grey - borders, separators
    pub const GREY_500: Color = Color::Rgb(70, 70, 70);

    /// Dark grey - toast backgrounds
    pub const GREY_700: Color = Color::Rgb(35, 35, 35);

    /// True black - deepest background
    pub const GREY_900: Color = Color::Rgb(18, 18, 18);

    /// Background color alias
    pub const BG: Color = Self::GREY_900;

    // ─────────────────────────────────────────────────────────────────────
    // Accents
    // ─────────────────────────────────────────────────────────────────────

    pub const GREEN: Color = Color::Rgb(100, 200, 100);
    pub const RED: Color = Color::Rgb(200, 100, 100);
    pub const YELLOW: Color = Color::Rgb(220, 190, 90);

    pub const LOGO: &'static str = "D E V O P S   G P T";

    pub const BULLET_FILLED: char = '●';
    pub const BULLET_EMPTY: char = '○';
    pub const BULLET_HALF: char = '◐';
    pub const ARROW_RIGHT: char = '▸';
    pub const DOT_SEPARATOR: char = '·';
    pub const CHECK_MARK: char = '✓';
    pub const CROSS_MARK: char = '✗';

    // ─────────────────────────────────────────────────────────────────────
    // Pre-built styles for common UI elements
    // ─────────────────────────────────────────────────────────────────────

    pub fn bg() -> Style {
        Style::default().bg(Self::GREY_900)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::GREY_100)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::GREY_500)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::GREY_50)
            .add_modifier(Modifier::BOLD)
    }

    /// Keybinding highlight
    pub fn key() -> Style {
        Style::default()
            .fg(Self::GREY_900)
            .bg(Self::GREY_300)
    }

    /// Bullet glyph for a suggestion priority, brighter when more urgent
    pub fn priority_marker(priority: Priority) -> (char, Style) {
        match priority {
            Priority::High => (
                Self::BULLET_FILLED,
                Style::default()
                    .fg(Self::WHITE)
                    .add_modifier(Modifier::BOLD),
            ),
            Priority::Medium => (Self::BULLET_HALF, Style::default().fg(Self::GREY_200)),
            Priority::Low => (Self::BULLET_EMPTY, Style::default().fg(Self::GREY_400)),
        }
    }
}
