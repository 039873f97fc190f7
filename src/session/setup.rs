//! Session setup and initialization

use crate::backend::{Backend, BackendClient};
use crate::config::{Config, Overrides};
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::controller::{PollSettings, PollingController};
use crate::environment::Environment;
use crate::events::{Event, EventSender};
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Disconnected controller, ready for `connect()`
    pub controller: PollingController,
    /// Activity events from the controller and its poller
    pub event_receiver: mpsc::Receiver<Event>,
    /// Backend the session talks to
    pub environment: Environment,
    pub settings: PollSettings,
}

/// Build the backend client for the resolved environment.
pub fn build_backend(environment: Environment) -> Result<Arc<dyn Backend>, Box<dyn Error>> {
    let client = BackendClient::new(environment)?;
    Ok(Arc::new(client))
}

/// Sets up a polling session
///
/// Resolves the environment and polling settings (flags over config file over
/// defaults), creates the backend client and the activity event channel, and
/// returns a controller that has not connected yet.
pub fn setup_session(config: &Config, overrides: &Overrides) -> Result<SessionData, Box<dyn Error>> {
    let environment = config.resolve_environment(overrides);
    let settings = config.resolve_poll_settings(overrides);
    log::debug!(
        "Session for {} polling every {:?}, tolerating {} failure(s)",
        environment,
        settings.interval,
        settings.failure_tolerance
    );

    let backend = build_backend(environment.clone())?;
    let (event_sender, event_receiver) = mpsc::channel(EVENT_QUEUE_SIZE);
    let controller = PollingController::new(backend, settings, EventSender::new(event_sender));

    Ok(SessionData {
        controller,
        event_receiver,
        environment,
        settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ConnectionState;

    #[test]
    fn session_starts_disconnected_against_resolved_backend() {
        let config = Config {
            server_url: Some("http://10.0.0.2:5000/".to_string()),
            poll_interval_ms: Some(1000),
            failure_tolerance: None,
        };
        let overrides = Overrides {
            failure_tolerance: Some(3),
            ..Overrides::default()
        };

        let session = setup_session(&config, &overrides).unwrap();

        assert_eq!(session.environment.backend_url(), "http://10.0.0.2:5000");
        assert_eq!(session.settings.interval.as_millis(), 1000);
        assert_eq!(session.settings.failure_tolerance, 3);
        assert_eq!(session.controller.state(), ConnectionState::Disconnected);
    }
}
