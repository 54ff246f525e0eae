//! UI theme definition.

use ratatui::style::{Color, Modifier, Style};

/// Theme for the application UI.
#[derive(Debug, Clone)]
pub struct Theme {
    // Basic styles
    pub normal_text: Style,
    pub block_style: Style,
    pub header_style: Style,
    pub label_style: Style,
    pub value_style: Style,
    pub help_style: Style,
    pub key_style: Style,

    // Tab styles
    pub tab_style: Style,
    pub selected_tab_style: Style,
    pub pinned_tab_style: Style,
    pub favicon_style: Style,
    pub close_glyph_style: Style,
    pub scroll_hint_style: Style,

    // Page activity styles
    pub dormant_style: Style,
    pub loading_style: Style,
    pub active_style: Style,

    // Status line
    pub status_style: Style,
    pub error_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            normal_text: Style::default().fg(Color::White),
            block_style: Style::default(),
            header_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            label_style: Style::default().fg(Color::Gray),
            value_style: Style::default().fg(Color::White),
            help_style: Style::default().fg(Color::Gray),
            key_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),

            tab_style: Style::default().fg(Color::Gray).bg(Color::Rgb(40, 40, 48)),
            selected_tab_style: Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
            pinned_tab_style: Style::default()
                .fg(Color::Black)
                .bg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
            favicon_style: Style::default().fg(Color::Yellow),
            close_glyph_style: Style::default().fg(Color::DarkGray),
            scroll_hint_style: Style::default().fg(Color::Cyan),

            dormant_style: Style::default().fg(Color::DarkGray),
            loading_style: Style::default().fg(Color::Yellow),
            active_style: Style::default().fg(Color::Green),

            status_style: Style::default().fg(Color::Black).bg(Color::Gray),
            error_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}
