//! Help overlay showing keyboard shortcuts.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::ui::Theme;

/// Key bindings shown in the overlay, grouped by section.
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Tabs",
        &[
            ("t", "Open a tab"),
            ("b", "Open a tab in the background"),
            ("w", "Close the selected tab"),
            ("→ / l", "Next tab"),
            ("← / h", "Previous tab"),
            ("1-9", "Jump to tab"),
            ("s", "Suspend the selected page"),
        ],
    ),
    (
        "Strip",
        &[
            ("[ / ]", "Scroll the strip"),
            ("wheel", "Scroll the strip"),
            ("click", "Select the tab under the pointer"),
            ("g", "Switch workspace"),
        ],
    ),
    (
        "General",
        &[("?", "Toggle this help screen"), ("q / Esc", "Quit")],
    ),
];

/// Help overlay showing keyboard shortcuts and usage information.
pub struct HelpView;

impl HelpView {
    /// Render the help overlay
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = Self::centered_rect(60, 70, area);
        frame.render_widget(Clear, popup_area);

        let help_block = Block::default()
            .title("Tab Strip Help")
            .borders(Borders::ALL)
            .style(theme.block_style);

        let mut help_text = Vec::new();
        for (section, keys) in SECTIONS {
            if !help_text.is_empty() {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(Span::styled(
                *section,
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for (key, action) in keys.iter() {
                help_text.push(Line::from(vec![
                    Span::styled(format!("{key:>8}"), theme.key_style),
                    Span::raw(format!("  {action}")),
                ]));
            }
        }

        let help_widget = Paragraph::new(help_text)
            .block(help_block)
            .style(theme.normal_text)
            .alignment(Alignment::Left);

        frame.render_widget(help_widget, popup_area);
    }

    /// Helper function to create a centered rect using percentages
    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_width = r.width * percent_x / 100;
        let popup_height = r.height * percent_y / 100;

        Rect {
            x: r.x + (r.width - popup_width) / 2,
            y: r.y + (r.height - popup_height) / 2,
            width: popup_width,
            height: popup_height,
        }
    }
}
