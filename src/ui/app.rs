//! Main application state and UI loop
//!
//! Contains the App struct, key handling and the main render loop

use crate::consts::cli_consts::messages;
use crate::controller::{ConfirmedWipe, ControllerError, PollSettings, PollingController};
use crate::environment::Environment;
use crate::events::Event as ControllerEvent;
use crate::ui::dashboard::{DashboardState, Modal, render_dashboard};
use crate::ui::home::render_home;
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub settings: PollSettings,
}

impl UIConfig {
    pub fn new(with_background_color: bool, settings: PollSettings) -> Self {
        Self {
            with_background_color,
            settings,
        }
    }
}

/// The different screens in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Landing view with the backend summary.
    Home,
    /// Device list and wipe controls.
    Dashboard,
}

/// What the UI loop has to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// The operator confirmed a wipe; send it.
    Dispatch(ConfirmedWipe),
}

/// Application state
pub struct App {
    /// The current screen being displayed in the application.
    current_screen: Screen,

    controller: PollingController,

    /// Receives events from the controller and its poller.
    event_receiver: mpsc::Receiver<ControllerEvent>,

    dashboard: DashboardState,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        controller: PollingController,
        event_receiver: mpsc::Receiver<ControllerEvent>,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            current_screen: Screen::Splash,
            controller,
            event_receiver,
            dashboard: DashboardState::new(environment, Instant::now(), ui_config),
        }
    }

    pub fn screen(&self) -> Screen {
        self.current_screen
    }

    /// Apply finished polls and queued events, then refresh the dashboard snapshot.
    pub fn update(&mut self) {
        self.controller.process_pending();
        while let Ok(event) = self.event_receiver.try_recv() {
            self.dashboard.add_event(event);
        }
        self.dashboard.update(&self.controller);
    }

    fn switch_screen(&mut self, screen: Screen) {
        // Polling only runs while the dashboard is visible
        if self.current_screen == Screen::Dashboard && screen != Screen::Dashboard {
            self.controller.disconnect();
            self.dashboard.modal = None;
        }
        self.current_screen = screen;
        self.dashboard.sync_with(&self.controller);
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        match self.dashboard.modal.take() {
            Some(Modal::Alert { .. }) => return Action::None,
            Some(Modal::ConfirmWipe(pending)) => {
                return match code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                        Action::Dispatch(pending.confirm())
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        log::debug!("Wipe of {} cancelled by operator", pending.machine_id());
                        Action::None
                    }
                    _ => {
                        self.dashboard.modal = Some(Modal::ConfirmWipe(pending));
                        Action::None
                    }
                };
            }
            None => {}
        }

        if matches!(code, KeyCode::Esc | KeyCode::Char('q')) {
            return Action::Quit;
        }

        match self.current_screen {
            // Any key skips the splash screen
            Screen::Splash => self.switch_screen(Screen::Home),
            Screen::Home => {
                if matches!(code, KeyCode::Tab | KeyCode::Enter) {
                    self.switch_screen(Screen::Dashboard);
                }
            }
            Screen::Dashboard => self.handle_dashboard_key(code),
        }
        Action::None
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab => self.switch_screen(Screen::Home),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                if let Err(e) = self.controller.toggle() {
                    self.dashboard.show_alert(e.to_string(), true);
                }
                self.dashboard.sync_with(&self.controller);
            }
            KeyCode::Down | KeyCode::Char('j') => self.dashboard.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.dashboard.select_previous(),
            KeyCode::Char('w') | KeyCode::Char('W') => self.request_wipe(),
            _ => {}
        }
    }

    fn request_wipe(&mut self) {
        let target = self
            .dashboard
            .selected_card()
            .map(|card| card.machine_id.clone());
        let result = match target {
            Some(machine_id) => self.controller.request_wipe(&machine_id),
            None if self.controller.is_connected() => return,
            None => Err(ControllerError::NotConnected),
        };
        match result {
            Ok(pending) => self.dashboard.modal = Some(Modal::ConfirmWipe(pending)),
            Err(e) => self.dashboard.show_alert(e.to_string(), true),
        }
    }

    /// Send a confirmed wipe and report the result in an alert.
    pub async fn dispatch(&mut self, wipe: ConfirmedWipe) {
        let result = self.controller.dispatch_wipe(wipe).await;
        match result {
            Ok(()) => self.dashboard.show_alert(messages::WIPE_ISSUED, false),
            Err(ControllerError::CommandDispatch(_)) => {
                self.dashboard.show_alert(messages::WIPE_FAILED, true)
            }
            Err(e) => self.dashboard.show_alert(e.to_string(), true),
        }
        self.dashboard.sync_with(&self.controller);
    }

    pub fn shutdown(&mut self) {
        self.controller.disconnect();
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        app.update();
        terminal.draw(|f| render(f, &app))?;

        // Handle splash-to-home transition
        if app.current_screen == Screen::Splash && splash_start.elapsed() >= splash_duration {
            app.switch_screen(Screen::Home);
            continue;
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                match app.handle_key(key.code) {
                    Action::None => {}
                    Action::Quit => {
                        app.shutdown();
                        return Ok(());
                    }
                    Action::Dispatch(wipe) => {
                        app.dashboard.show_alert(
                            format!("Issuing wipe command to {}...", wipe.machine_id()),
                            false,
                        );
                        terminal.draw(|f| render(f, &app))?;
                        app.dispatch(wipe).await;
                    }
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, app: &App) {
    match app.screen() {
        Screen::Splash => render_splash(f),
        Screen::Home => render_home(f, &app.dashboard),
        Screen::Dashboard => render_dashboard(f, &app.dashboard),
    }
}
