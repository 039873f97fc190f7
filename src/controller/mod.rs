//! Device status polling controller
//!
//! Owns the connect/disconnect state machine around the periodic device
//! fetch, the device list the operator sees, and wipe command dispatch.
//!
//! Fetches run in a spawned [`Poller`] task. Its results come back over an
//! mpsc channel and are applied on the controller's side with
//! [`PollingController::process_pending`] or [`PollingController::next_outcome`].
//! Each connect starts a new session. Outcomes from an older session, or
//! ones that arrive after a disconnect, are dropped.

pub mod dispatch;
pub mod poller;
pub mod state;

pub use dispatch::{ConfirmedWipe, PendingWipe};
pub use poller::PollOutcome;
pub use state::{ConnectionState, DeviceCard, DeviceListView};

use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::consts::cli_consts::{OUTCOME_QUEUE_SIZE, messages, polling};
use crate::error_classifier::ErrorClassifier;
use crate::events::{Event, EventSender, EventType};
use crate::logging::LogLevel;
use poller::Poller;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Polling cadence and failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// Consecutive failed fetches that end the session. Never below 1.
    pub failure_tolerance: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: polling::polling_interval(),
            failure_tolerance: polling::DEFAULT_FAILURE_TOLERANCE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    /// connect() is only valid from Disconnected.
    #[error("Already connected to the backend")]
    AlreadyConnected,

    #[error("You must be connected to the server to issue a wipe command.")]
    NotConnected,

    #[error("Error: Could not issue wipe command. ({0})")]
    CommandDispatch(#[source] BackendError),

    /// The session ended while the request was in flight.
    #[error("Request cancelled by disconnect")]
    Cancelled,
}

struct PollingTask {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct PollingController {
    backend: Arc<dyn Backend>,
    settings: PollSettings,
    state: ConnectionState,
    /// Present iff the controller is connected (Connecting or Connected).
    polling: Option<PollingTask>,
    view: DeviceListView,
    session: u64,
    outcome_sender: mpsc::Sender<PollOutcome>,
    outcome_receiver: mpsc::Receiver<PollOutcome>,
    events: EventSender,
    classifier: ErrorClassifier,
}

impl PollingController {
    pub fn new(backend: Arc<dyn Backend>, settings: PollSettings, events: EventSender) -> Self {
        let (outcome_sender, outcome_receiver) = mpsc::channel(OUTCOME_QUEUE_SIZE);
        Self {
            backend,
            settings,
            state: ConnectionState::Disconnected,
            polling: None,
            view: DeviceListView::Idle,
            session: 0,
            outcome_sender,
            outcome_receiver,
            events,
            classifier: ErrorClassifier::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.polling.is_some()
    }

    pub fn view(&self) -> &DeviceListView {
        &self.view
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Connection status text.
    pub fn status_label(&self) -> &'static str {
        match self.state {
            ConnectionState::Disconnected => messages::DISCONNECTED,
            ConnectionState::Connecting => messages::CONNECTING,
            ConnectionState::Connected => messages::CONNECTED,
        }
    }

    /// Label of the connect/disconnect action.
    pub fn action_label(&self) -> &'static str {
        if self.is_connected() {
            "Disconnect"
        } else {
            "Connect"
        }
    }

    /// Start a polling session. Must be called from within a tokio runtime.
    pub fn connect(&mut self) -> Result<(), ControllerError> {
        if self.state != ConnectionState::Disconnected {
            return Err(ControllerError::AlreadyConnected);
        }

        self.session += 1;
        let cancel_token = CancellationToken::new();
        let poller = Poller::new(
            self.backend.clone(),
            self.session,
            self.settings,
            self.outcome_sender.clone(),
            self.events.clone(),
            cancel_token.clone(),
        );
        let handle = tokio::spawn(poller.run());
        self.polling = Some(PollingTask {
            cancel_token,
            handle,
        });
        self.set_state(ConnectionState::Connecting);
        Ok(())
    }

    /// End the polling session, if any. Safe to call at any time.
    pub fn disconnect(&mut self) {
        self.teardown(DeviceListView::Idle);
    }

    pub fn toggle(&mut self) -> Result<(), ControllerError> {
        if self.is_connected() {
            self.disconnect();
            Ok(())
        } else {
            self.connect()
        }
    }

    fn teardown(&mut self, view: DeviceListView) {
        if let Some(task) = self.polling.take() {
            task.cancel_token.cancel();
        }
        self.view = view;
        self.set_state(ConnectionState::Disconnected);
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state == state {
            return;
        }
        self.state = state;
        let label = self.status_label().to_string();
        self.events.notify(Event::state_change(state, label));
    }

    fn is_current(&self, session: u64) -> bool {
        session == self.session && self.polling.is_some()
    }

    /// Apply one poll outcome. Returns whether the view or state changed.
    pub fn apply_outcome(&mut self, outcome: PollOutcome) -> bool {
        if !self.is_current(outcome.session()) {
            log::debug!(
                "Ignoring stale poll outcome from session {}",
                outcome.session()
            );
            return false;
        }

        match outcome {
            PollOutcome::Devices { devices, .. } => {
                self.view = DeviceListView::from_devices(&devices);
                self.set_state(ConnectionState::Connected);
                true
            }
            PollOutcome::Failed {
                fatal: true, error, ..
            } => {
                log::warn!("Could not fetch devices: {}", error);
                self.teardown(DeviceListView::ConnectionFailed);
                true
            }
            PollOutcome::Failed { fatal: false, .. } => false,
        }
    }

    /// Apply every outcome that has already arrived. Returns how many changed the view.
    pub fn process_pending(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            if self.apply_outcome(outcome) {
                changed += 1;
            }
        }

        // A poller only exits on its own after a fatal failure, whose outcome
        // was drained above. Anything else means the task died.
        if self
            .polling
            .as_ref()
            .is_some_and(|task| task.handle.is_finished())
        {
            log::warn!("Poller for session {} exited unexpectedly", self.session);
            self.teardown(DeviceListView::ConnectionFailed);
            changed += 1;
        }
        changed
    }

    /// Wait for the next outcome and apply it.
    pub async fn next_outcome(&mut self) -> bool {
        match self.outcome_receiver.recv().await {
            Some(outcome) => self.apply_outcome(outcome),
            None => false,
        }
    }

    /// First half of a wipe: checks the connection and returns the pending
    /// request the operator has to confirm.
    pub fn request_wipe(&self, machine_id: &str) -> Result<PendingWipe, ControllerError> {
        if !self.is_connected() {
            self.events.notify(Event::dispatcher_with_level(
                messages::NOT_CONNECTED.to_string(),
                EventType::Error,
                LogLevel::Warn,
            ));
            return Err(ControllerError::NotConnected);
        }
        Ok(PendingWipe::new(machine_id))
    }

    /// Send a confirmed wipe. On success the device list is refreshed once.
    pub async fn dispatch_wipe(&mut self, wipe: ConfirmedWipe) -> Result<(), ControllerError> {
        let Some(task) = &self.polling else {
            self.events.notify(Event::dispatcher_with_level(
                messages::NOT_CONNECTED.to_string(),
                EventType::Error,
                LogLevel::Warn,
            ));
            return Err(ControllerError::NotConnected);
        };
        let cancel_token = task.cancel_token.clone();
        let session = self.session;

        let result = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => return Err(ControllerError::Cancelled),
            result = self.backend.issue_wipe(wipe.machine_id()) => result,
        };

        match result {
            Ok(()) => {
                self.events.notify(Event::dispatcher_with_level(
                    format!("{} Target: {}", messages::WIPE_ISSUED, wipe.machine_id()),
                    EventType::Success,
                    LogLevel::Info,
                ));
                self.refresh(session, &cancel_token).await;
                Ok(())
            }
            Err(e) => {
                self.events.notify(Event::dispatcher_with_level(
                    format!(
                        "Could not issue wipe command to {}: {}",
                        wipe.machine_id(),
                        e
                    ),
                    EventType::Error,
                    self.classifier.classify_dispatch_error(&e),
                ));
                Err(ControllerError::CommandDispatch(e))
            }
        }
    }

    async fn refresh(&mut self, session: u64, cancel_token: &CancellationToken) {
        let Some(result) = poller::fetch_devices(self.backend.as_ref(), cancel_token).await else {
            return;
        };
        let outcome = match result {
            Ok(devices) => PollOutcome::Devices { session, devices },
            Err(e) => {
                self.events.notify(Event::poller_with_level(
                    format!("Could not fetch devices: {}", e),
                    EventType::Error,
                    self.classifier.classify_fetch_error(&e),
                ));
                PollOutcome::Failed {
                    session,
                    error: e.to_string(),
                    fatal: self.settings.failure_tolerance <= 1,
                }
            }
        };
        self.apply_outcome(outcome);
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        if let Some(task) = self.polling.take() {
            task.cancel_token.cancel();
        }
    }
}
