//! Event System
//!
//! Activity events emitted by the polling controller and its tasks.

use crate::controller::ConnectionState;
use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Source {
    /// The periodic device status fetch.
    Poller,
    /// Wipe command dispatch.
    Dispatcher,
    /// Connection state machine.
    Controller,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Waiting,
    StateChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    /// Set on state change events only
    pub connection: Option<ConnectionState>,
}

impl Event {
    fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            connection: None,
        }
    }

    pub fn state_change(state: ConnectionState, msg: String) -> Self {
        Self {
            connection: Some(state),
            ..Self::new(Source::Controller, msg, EventType::StateChange, LogLevel::Info)
        }
    }

    pub fn poller_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Poller, msg, event_type, log_level)
    }

    pub fn dispatcher_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Dispatcher, msg, event_type, log_level)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

/// Cloneable handle for publishing activity events.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send an event, waiting for queue space.
    pub async fn send_event(&self, event: Event) {
        let _ = self.sender.send(event).await;
    }

    /// Send an event without waiting. Dropped if the queue is full or closed.
    pub fn notify(&self, event: Event) {
        if let Err(e) = self.sender.try_send(event) {
            log::debug!("Dropped activity event: {}", e);
        }
    }

    pub async fn send_poller_event(&self, message: String, event_type: EventType, log_level: LogLevel) {
        self.send_event(Event::poller_with_level(message, event_type, log_level))
            .await;
    }
}
