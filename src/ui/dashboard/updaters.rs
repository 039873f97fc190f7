//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from events and the controller

use super::state::DashboardState;

use crate::controller::PollingController;
use crate::events::{Event as ControllerEvent, EventType, Source};

use std::time::Instant;

impl DashboardState {
    /// Advance one frame: drain queued events, then copy the controller's state.
    pub fn update(&mut self, controller: &PollingController) {
        self.tick += 1;

        while let Some(event) = self.pending_events.pop_front() {
            self.process_event(&event);
            self.add_to_activity_log(event);
        }

        self.sync_with(controller);
    }

    /// Copy the controller's state and view, keeping the selection in range.
    pub fn sync_with(&mut self, controller: &PollingController) {
        self.connection = controller.state();
        self.status_label = controller.status_label();
        self.action_label = controller.action_label();
        if &self.device_view != controller.view() {
            self.device_view = controller.view().clone();
        }

        let len = self.device_view.cards().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        if !controller.is_connected() {
            self.last_refresh = None;
        }
    }

    fn process_event(&mut self, event: &ControllerEvent) {
        match (event.source, event.event_type) {
            (Source::Poller, EventType::Refresh | EventType::Waiting) => {
                self.last_refresh = Some(Instant::now());
                self.last_refresh_timestamp = Some(event.timestamp.clone());
            }
            (Source::Dispatcher, EventType::Success) => {
                self.wipes_issued += 1;
            }
            _ => {}
        }
    }
}
