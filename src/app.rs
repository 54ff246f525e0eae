//! Application state and logic.
//!
//! [`App`] owns the strip controller and wires it to the terminal: input
//! events become controller intents, controller notifications update the
//! status line, and scroll requests are applied as soon as they arrive.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use eyre::WrapErr;
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::event::{Event, EventHandler};
use crate::layout::LayoutConfig;
use crate::resource::demo::{title_for, SAMPLE_URLS};
use crate::resource::{DemoPageProvider, ResourceEvent, ResourceLoader};
use crate::state::{Tab, TabCollection, TabIdGenerator};
use crate::strip::{ChannelObserver, Notification, TabStripController};
use crate::ui::widgets::{ButtonFactory, ButtonVariant};
use crate::ui::{StatusLine, TerminalStrip, Ui, UpdateKind};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "TABSTRIP_CONFIG";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tick_rate_ms: u64,
    pub button_variant: ButtonVariant,
    pub layout: LayoutConfig,
    /// Number of demo workspaces to cycle through.
    pub workspaces: usize,
    /// Tabs each demo workspace starts with.
    pub tabs_per_workspace: usize,
    /// Average time the demo engine takes to load a page.
    pub page_latency_ms: u64,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::terminal()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults measured in terminal cells rather than points.
    pub fn terminal() -> Self {
        Self {
            tick_rate_ms: 100,
            button_variant: ButtonVariant::Compact,
            layout: LayoutConfig {
                min_width: 12.0,
                max_width: 28.0,
                reserved_chrome: 4.0,
                leading_inset: 1.0,
                trailing_inset: 1.0,
                spacing: 1.0,
            },
            workspaces: 3,
            tabs_per_workspace: 4,
            page_latency_ms: 600,
            log_file: PathBuf::from("tabstrip.log"),
        }
    }

    /// Load from the file named by `TABSTRIP_CONFIG`, or fall back to defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&raw).wrap_err_with(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Strip wired to the demo page engine.
pub type DemoStrip = TerminalStrip<ResourceLoader<DemoPageProvider>>;

/// Main application.
pub struct App {
    config: AppConfig,
    strip: DemoStrip,
    /// Controller notifications
    notifications: mpsc::UnboundedReceiver<Notification>,
    /// Completions and page updates from the demo engine
    resource_events: mpsc::UnboundedReceiver<ResourceEvent>,
    /// Parked collections; the active slot holds an empty placeholder
    workspaces: Vec<TabCollection>,
    workspace: usize,
    ids: TabIdGenerator,
    next_url: usize,
    ui: Ui,
    status: StatusLine,
    /// Should the application exit?
    should_quit: bool,
}

impl App {
    /// Creates a new application instance. Must run inside a tokio runtime.
    pub async fn new(config: AppConfig) -> Result<Self> {
        let (resource_tx, resource_events) = mpsc::unbounded_channel();
        let provider = Arc::new(DemoPageProvider::new(
            resource_tx.clone(),
            Duration::from_millis(config.page_latency_ms),
        ));
        let loader = ResourceLoader::new(provider, resource_tx);

        let mut strip = TabStripController::new(ButtonFactory::new(config.button_variant), loader, config.layout);
        let (observer, notifications) = ChannelObserver::channel();
        strip.subscribe(Box::new(observer));

        let mut app = Self {
            ui: Ui::new(config.button_variant),
            status: StatusLine {
                workspaces: config.workspaces.max(1),
                ..StatusLine::default()
            },
            config,
            strip,
            notifications,
            resource_events,
            workspaces: Vec::new(),
            workspace: 0,
            ids: TabIdGenerator::new(),
            next_url: 0,
            should_quit: false,
        };
        app.seed_workspaces()?;
        Ok(app)
    }

    /// Runs the application main loop.
    pub async fn run(&mut self, terminal: &mut Terminal<impl Backend>, events: &mut EventHandler) -> Result<()> {
        let size = terminal.size()?;
        self.resize(size.width, size.height);

        while !self.should_quit {
            self.drain_notifications();
            terminal.draw(|frame| self.ui.render(frame, &self.strip, &self.status))?;

            tokio::select! {
                event = events.next() => match event {
                    Some(event) => self.handle_event(event)?,
                    None => self.should_quit = true,
                },
                Some(event) = self.resource_events.recv() => {
                    self.strip.handle_resource_event(event);
                }
            }
        }

        self.strip.resources().shutdown();
        info!("shutting down");
        Ok(())
    }

    /// Runs the application main loop with Crossterm backend.
    pub async fn run_with_crossterm(&mut self, events: &mut EventHandler) -> Result<()> {
        use ratatui::backend::CrosstermBackend;

        let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
        self.run(&mut terminal, events).await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn strip(&self) -> &DemoStrip {
        &self.strip
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Handles input and other events.
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => {
                let update = self.ui.handle_key_event(key)?;
                self.apply(update);
            }
            Event::Mouse(mouse) => {
                let update = self.ui.handle_mouse_event(mouse, &self.strip);
                self.apply(update);
            }
            Event::Resize(width, height) => self.resize(width, height),
            Event::Tick => self.ui.update_animations(),
        }
        Ok(())
    }

    /// Apply a UI intent to the strip.
    ///
    /// Rejected operations are shown on the status line; none of them end
    /// the session.
    pub fn apply(&mut self, update: UpdateKind) {
        if update != UpdateKind::Other {
            self.status.error = None;
        }

        let result = match update {
            UpdateKind::Quit => {
                self.should_quit = true;
                Ok(())
            }
            UpdateKind::ToggleHelp => {
                self.ui.toggle_help();
                Ok(())
            }
            UpdateKind::OpenTab => {
                let tab = self.new_tab();
                self.strip.add_tab(tab).map(drop)
            }
            UpdateKind::OpenInBackground => {
                let tab = self.new_tab();
                self.strip.add_tab_in_background(tab).map(drop)
            }
            UpdateKind::CloseSelected => match self.strip.selected_index() {
                Some(index) => self.strip.remove_tab(index).map(drop),
                None => Ok(()),
            },
            UpdateKind::Close(index) => self.strip.remove_tab(index).map(drop),
            UpdateKind::Select(index) => self.strip.select_tab(index).map(drop),
            UpdateKind::SelectNext => self.strip.select_next().map(drop),
            UpdateKind::SelectPrevious => self.strip.select_previous().map(drop),
            UpdateKind::ScrollTabs(steps) => {
                let step = self.strip.layout().width_per_tab() + self.config.layout.spacing;
                self.strip.scroll_by(steps as f32 * step);
                Ok(())
            }
            UpdateKind::SuspendSelected => match self.strip.selected_index() {
                Some(index) => self.strip.deactivate_tab(index).map(drop),
                None => Ok(()),
            },
            UpdateKind::NextWorkspace => {
                self.switch_workspace();
                Ok(())
            }
            UpdateKind::Other => Ok(()),
        };

        if let Err(err) = result {
            warn!(%err, ?update, "tab strip rejected intent");
            self.status.error = Some(err.to_string());
        }
        self.drain_notifications();
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.ui.handle_resize(width, height);
        self.strip.viewport_resized(self.ui.strip_width() as f32);
    }

    /// React to everything the controller reported since the last call.
    fn drain_notifications(&mut self) {
        while let Ok(notification) = self.notifications.try_recv() {
            match notification {
                Notification::ScrollRequested { index, offset } => {
                    debug!(index, offset, "applying scroll request");
                    // May queue sticky changes, picked up by this loop.
                    self.strip.scrolled(offset);
                }
                Notification::ActiveTitleChanged { title } => {
                    self.status.message = Some(title);
                }
                Notification::SelectionChanged { to, .. } => {
                    self.status.message = to
                        .and_then(|index| self.strip.collection().get(index))
                        .map(|t| t.title.clone());
                }
                Notification::CollectionSwapped { .. } => {
                    self.status.message = self.strip.collection().selected_tab().map(|t| t.title.clone());
                }
                _ => {}
            }
        }
    }

    /// Next demo tab, cycling through the sample addresses.
    fn new_tab(&mut self) -> Tab {
        let url = SAMPLE_URLS[self.next_url % SAMPLE_URLS.len()];
        self.next_url += 1;
        Tab::new(self.ids.allocate()).with_url(url)
    }

    /// Build the demo workspaces and show the first one.
    fn seed_workspaces(&mut self) -> Result<()> {
        let count = self.config.workspaces.max(1);
        let mut workspaces = Vec::with_capacity(count);
        for _ in 0..count {
            // Restored tabs start dormant with the title they were saved with.
            let tabs: Vec<Tab> = (0..self.config.tabs_per_workspace)
                .map(|_| {
                    let tab = self.new_tab();
                    let title = title_for(tab.url.as_deref());
                    tab.with_title(title)
                })
                .collect();
            let selected = (!tabs.is_empty()).then_some(0);
            workspaces.push(TabCollection::from_parts(tabs, selected)?);
        }

        let first = std::mem::take(&mut workspaces[0]);
        self.workspaces = workspaces;
        self.strip.swap_collection(first);
        self.workspace = 0;
        info!(workspaces = count, "demo workspaces ready");
        Ok(())
    }

    /// Park the current collection and bring in the next workspace.
    fn switch_workspace(&mut self) {
        let count = self.workspaces.len();
        if count < 2 {
            return;
        }
        let next = (self.workspace + 1) % count;
        let incoming = std::mem::take(&mut self.workspaces[next]);
        let outgoing = self.strip.swap_collection(incoming);
        self.workspaces[self.workspace] = outgoing;

        info!(from = self.workspace, to = next, "switched workspace");
        self.workspace = next;
        self.status.workspace = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sticky::StickyPosition;
    use pretty_assertions::assert_eq;

    fn config() -> AppConfig {
        AppConfig {
            workspaces: 2,
            tabs_per_workspace: 3,
            page_latency_ms: 0,
            ..AppConfig::terminal()
        }
    }

    #[test]
    fn config_reads_partial_json() {
        let config = AppConfig::from_json(
            r#"{ "button_variant": "horizontal", "layout": { "min_width": 20.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.button_variant, ButtonVariant::Horizontal);
        assert_eq!(config.layout.min_width, 20.0);
        // Unset layout fields fall back to the point-sized defaults.
        assert_eq!(config.layout.max_width, LayoutConfig::default().max_width);
        assert_eq!(config.workspaces, AppConfig::terminal().workspaces);
    }

    #[test]
    fn config_rejects_unknown_variant() {
        assert!(AppConfig::from_json(r#"{ "button_variant": "vertical" }"#).is_err());
    }

    #[tokio::test]
    async fn starts_in_first_workspace() {
        let app = App::new(config()).await.unwrap();
        assert_eq!(app.strip().collection().len(), 3);
        assert_eq!(app.strip().selected_index(), Some(0));
        assert_eq!(app.workspaces.len(), 2);
        assert!(app.workspaces[0].is_empty());
        assert_eq!(app.workspaces[1].len(), 3);
    }

    #[tokio::test]
    async fn workspace_switch_parks_the_current_tabs() {
        let mut app = App::new(config()).await.unwrap();
        let first: Vec<_> = app.strip().collection().iter().map(|t| t.id()).collect();

        app.apply(UpdateKind::NextWorkspace);
        assert_eq!(app.status().workspace, 1);
        assert_eq!(app.workspaces[0].len(), 3);
        assert!(app.strip().collection().iter().all(|t| !first.contains(&t.id())));

        app.apply(UpdateKind::NextWorkspace);
        let back: Vec<_> = app.strip().collection().iter().map(|t| t.id()).collect();
        assert_eq!(back, first);
    }

    #[tokio::test]
    async fn scroll_requests_are_applied_immediately() {
        let mut app = App::new(config()).await.unwrap();
        app.resize(40, 20);
        for _ in 0..6 {
            app.apply(UpdateKind::OpenTab);
        }

        let strip = app.strip();
        assert!(strip.view().scrolling_enabled);
        let expected = strip.layout().scroll_target(8, 40.0, 9);
        assert_eq!(strip.selected_index(), Some(8));
        assert_eq!(strip.scroll_offset(), expected);
        assert_eq!(strip.sticky_position(), StickyPosition::None);
    }

    #[tokio::test]
    async fn rejected_intents_surface_on_the_status_line() {
        let mut app = App::new(AppConfig {
            tabs_per_workspace: 0,
            ..config()
        })
        .await
        .unwrap();

        app.apply(UpdateKind::Select(0));
        assert!(app.status().error.is_some());

        app.apply(UpdateKind::OpenTab);
        assert_eq!(app.status().error, None);
        assert_eq!(app.strip().collection().len(), 1);

        app.apply(UpdateKind::CloseSelected);
        assert!(app.strip().collection().is_empty());
    }
}
