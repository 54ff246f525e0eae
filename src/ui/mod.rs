//! UI components for the tab strip TUI.
//!
//! The screen is split into the tab strip on top, the selected page below
//! it and a status line at the bottom. [`Ui`] turns terminal input into
//! [`UpdateKind`] intents; the app applies them to the strip controller.

pub mod help;
pub mod tab_strip;
pub mod theme;
pub mod widgets;

pub use help::HelpView;
pub use tab_strip::{tab_at, TabStripWidget};
pub use theme::Theme;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use eyre::Result;
use itertools::Itertools;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::resource::PageResources;
use crate::state::{Tab, TabActivity};
use crate::sticky::StickyPosition;
use crate::strip::TabStripController;
use widgets::{ButtonFactory, ButtonVariant};

/// Strip controller as the terminal front end drives it.
pub type TerminalStrip<R> = TabStripController<ButtonFactory, R>;

/// The result of updating the UI in response to user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateKind {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Open a tab and switch to it
    OpenTab,
    /// Open a tab without switching to it
    OpenInBackground,
    /// Close the selected tab
    CloseSelected,
    /// Close the tab at an index
    Close(usize),
    /// Switch to the tab at an index
    Select(usize),
    SelectNext,
    SelectPrevious,
    /// Scroll the strip by a number of tab widths
    ScrollTabs(i32),
    /// Suspend the selected tab's page
    SuspendSelected,
    /// Switch to the next workspace
    NextWorkspace,
    /// Other update (no action needed)
    Other,
}

/// What the status line shows besides strip state.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    pub workspace: usize,
    pub workspaces: usize,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Main UI controller.
pub struct Ui {
    /// Whether to show help overlay
    show_help: bool,
    /// UI theme
    theme: Theme,
    /// Rows used by the strip, border included
    strip_height: u16,
    terminal_width: u16,
    /// Current animation frame (for loading spinners)
    animation_frame: usize,
}

impl Ui {
    /// Create a UI for the given button variant.
    pub fn new(variant: ButtonVariant) -> Self {
        let button_rows = match variant {
            ButtonVariant::Compact => 1,
            ButtonVariant::Horizontal => 2,
        };
        Self {
            show_help: false,
            theme: Theme::default(),
            strip_height: button_rows + 1,
            terminal_width: 80,
            animation_frame: 0,
        }
    }

    /// Toggle help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Handle terminal resize events
    pub fn handle_resize(&mut self, width: u16, _height: u16) {
        self.terminal_width = width;
    }

    /// Width in cells available to the strip.
    pub fn strip_width(&self) -> u16 {
        self.terminal_width
    }

    /// Update animation frames for UI elements
    pub fn update_animations(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 4;
    }

    /// Handle keyboard input.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<UpdateKind> {
        if self.show_help {
            // Any key dismisses the overlay.
            return Ok(match key.code {
                KeyCode::Char('q') => UpdateKind::Quit,
                _ => UpdateKind::ToggleHelp,
            });
        }

        let update = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => UpdateKind::Quit,
            KeyCode::Char('q') | KeyCode::Esc => UpdateKind::Quit,
            KeyCode::F(1) | KeyCode::Char('?') => UpdateKind::ToggleHelp,
            KeyCode::Char('t') => UpdateKind::OpenTab,
            KeyCode::Char('b') => UpdateKind::OpenInBackground,
            KeyCode::Char('w') => UpdateKind::CloseSelected,
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => UpdateKind::SelectNext,
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => UpdateKind::SelectPrevious,
            KeyCode::Char(c @ '1'..='9') => UpdateKind::Select(c as usize - '1' as usize),
            KeyCode::Char('[') => UpdateKind::ScrollTabs(-1),
            KeyCode::Char(']') => UpdateKind::ScrollTabs(1),
            KeyCode::Char('s') => UpdateKind::SuspendSelected,
            KeyCode::Char('g') => UpdateKind::NextWorkspace,
            _ => UpdateKind::Other,
        };
        Ok(update)
    }

    /// Handle mouse input over the strip.
    pub fn handle_mouse_event<R: PageResources>(
        &self,
        mouse: MouseEvent,
        strip: &TerminalStrip<R>,
    ) -> UpdateKind {
        if self.show_help || mouse.row >= self.strip_height.saturating_sub(1) {
            return UpdateKind::Other;
        }
        let hit = || tab_at(&strip.view(), strip.buttons(), mouse.column);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => hit().map_or(UpdateKind::Other, UpdateKind::Select),
            MouseEventKind::Down(MouseButton::Middle) => hit().map_or(UpdateKind::Other, UpdateKind::Close),
            MouseEventKind::ScrollUp => UpdateKind::ScrollTabs(-1),
            MouseEventKind::ScrollDown => UpdateKind::ScrollTabs(1),
            _ => UpdateKind::Other,
        }
    }

    /// Render the UI.
    pub fn render<R: PageResources>(&self, frame: &mut Frame, strip: &TerminalStrip<R>, status: &StatusLine) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.strip_height),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_strip(frame, chunks[0], strip);
        self.render_page(frame, chunks[1], strip.collection().selected_tab());
        self.render_status_line(frame, chunks[2], strip, status);

        if self.show_help {
            HelpView::render(frame, area, &self.theme);
        }
    }

    fn render_strip<R: PageResources>(&self, frame: &mut Frame, area: Rect, strip: &TerminalStrip<R>) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(self.theme.label_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let widget = TabStripWidget::new(strip.view(), strip.buttons(), &self.theme)
            .animation_frame(self.animation_frame);
        frame.render_widget(widget, inner);
    }

    fn render_page(&self, frame: &mut Frame, area: Rect, tab: Option<&Tab>) {
        let Some(tab) = tab else {
            let empty = Paragraph::new("No tabs open. Press t to open one.")
                .style(self.theme.help_style)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        };

        let (state, state_style) = match tab.activity() {
            TabActivity::Dormant => ("dormant", self.theme.dormant_style),
            TabActivity::Loading => ("loading", self.theme.loading_style),
            TabActivity::Active => ("live", self.theme.active_style),
        };
        let page = tab
            .page()
            .map_or_else(|| "none".to_string(), |handle| format!("{}", handle.0));
        let opened = tab
            .opened_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let rows = [
            ("Tab", tab.id().to_string(), self.theme.value_style),
            ("URL", tab.url.clone().unwrap_or_else(|| "about:blank".into()), self.theme.value_style),
            ("State", state.to_string(), state_style),
            ("Page", page, self.theme.value_style),
            ("Opened", opened, self.theme.value_style),
        ];
        let lines: Vec<Line> = rows
            .into_iter()
            .map(|(label, value, style)| {
                Line::from(vec![
                    Span::styled(format!("{label:<8}"), self.theme.label_style),
                    Span::styled(value, style),
                ])
            })
            .collect();

        let block = Block::default()
            .title(Span::styled(format!(" {} ", tab.title), self.theme.header_style))
            .borders(Borders::ALL)
            .style(self.theme.block_style);
        let body = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(body, area);
    }

    fn render_status_line<R: PageResources>(
        &self,
        frame: &mut Frame,
        area: Rect,
        strip: &TerminalStrip<R>,
        status: &StatusLine,
    ) {
        let view = strip.view();
        let mut parts = vec![
            format!("workspace {}/{}", status.workspace + 1, status.workspaces.max(1)),
            format!("{} tabs", view.tabs.len()),
            format!("{:.0} cols/tab", view.width_per_tab),
        ];
        if view.scrolling_enabled {
            parts.push(format!("scroll {:.0}", view.scroll_offset));
        }
        if view.sticky != StickyPosition::None {
            parts.push(format!("pinned {}", view.sticky));
        }
        if let Some(message) = &status.message {
            parts.push(message.clone());
        }
        parts.push("? for help".to_string());

        let (text, style) = match &status.error {
            Some(error) => (error.clone(), self.theme.error_style),
            None => (parts.iter().join(" | "), self.theme.status_style),
        };
        frame.render_widget(Paragraph::new(text).style(style), area);
    }
}
