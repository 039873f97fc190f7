//! Dashboard state management
//!
//! Contains the main dashboard state struct and the modal overlay enum

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::controller::{ConnectionState, DeviceCard, DeviceListView, PendingWipe, PollSettings};
use crate::environment::Environment;
use crate::events::Event as ControllerEvent;
use crate::ui::app::UIConfig;

use std::collections::VecDeque;
use std::time::Instant;

/// Overlay drawn above the dashboard. At most one is open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Waiting for the operator to answer the wipe prompt.
    ConfirmWipe(PendingWipe),
    /// Informational or error message, dismissed by any key.
    Alert { message: String, is_error: bool },
}

/// Snapshot of the controller plus everything the dashboard owns itself.
#[derive(Debug)]
pub struct DashboardState {
    /// The environment in which the application is running.
    pub environment: Environment,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    pub settings: PollSettings,
    /// Whether to enable background colors
    pub with_background_color: bool,

    pub connection: ConnectionState,
    pub status_label: &'static str,
    pub action_label: &'static str,
    pub device_view: DeviceListView,
    /// Index into the device cards
    pub selected: usize,
    pub modal: Option<Modal>,

    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<ControllerEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<ControllerEvent>,
    /// When the poller last delivered a device list
    pub last_refresh: Option<Instant>,
    pub last_refresh_timestamp: Option<String>,
    pub wipes_issued: usize,
    /// Animation tick counter
    pub tick: usize,
}

impl DashboardState {
    pub fn new(environment: Environment, start_time: Instant, ui_config: UIConfig) -> Self {
        Self {
            environment,
            start_time,
            settings: ui_config.settings,
            with_background_color: ui_config.with_background_color,
            connection: ConnectionState::Disconnected,
            status_label: crate::consts::cli_consts::messages::DISCONNECTED,
            action_label: "Connect",
            device_view: DeviceListView::Idle,
            selected: 0,
            modal: None,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            last_refresh: None,
            last_refresh_timestamp: None,
            wipes_issued: 0,
            tick: 0,
        }
    }

    pub fn selected_card(&self) -> Option<&DeviceCard> {
        self.device_view.cards().get(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.device_view.cards().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn show_alert(&mut self, message: impl Into<String>, is_error: bool) {
        self.modal = Some(Modal::Alert {
            message: message.into(),
            is_error,
        });
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: ControllerEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: ControllerEvent) {
        self.pending_events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;
    use crate::events::EventType;
    use crate::logging::LogLevel;

    fn state() -> DashboardState {
        DashboardState::new(
            Environment::Local,
            Instant::now(),
            UIConfig::new(false, PollSettings::default()),
        )
    }

    #[test]
    fn selection_stays_within_the_card_list() {
        let mut state = state();
        state.select_next();
        assert_eq!(state.selected, 0);
        assert!(state.selected_card().is_none());

        state.device_view = DeviceListView::from_devices(&[
            Device::new("M1", Some("idle")),
            Device::new("M2", Some("idle")),
        ]);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_card().unwrap().machine_id, "M2");
        state.select_previous();
        state.select_previous();
        assert_eq!(state.selected_card().unwrap().machine_id, "M1");
    }

    #[test]
    fn activity_log_is_bounded() {
        let mut state = state();
        for i in 0..MAX_ACTIVITY_LOGS + 5 {
            state.add_to_activity_log(ControllerEvent::poller_with_level(
                format!("event {}", i),
                EventType::Refresh,
                LogLevel::Info,
            ));
        }
        assert_eq!(state.activity_logs.len(), MAX_ACTIVITY_LOGS);
        assert_eq!(state.activity_logs.front().unwrap().msg, "event 5");
    }
}
