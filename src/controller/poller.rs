//! Periodic device status fetching
//!
//! One poller task runs per connected session. Every fetch races the
//! session's cancellation token, so disconnecting aborts a request that is
//! still in flight instead of letting it land after the fact.

use super::PollSettings;
use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::device::Device;
use crate::error_classifier::ErrorClassifier;
use crate::events::{EventSender, EventType};
use crate::logging::LogLevel;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Result of one fetch, tagged with the session that issued it.
#[derive(Debug)]
pub enum PollOutcome {
    Devices {
        session: u64,
        devices: Vec<Device>,
    },
    Failed {
        session: u64,
        error: String,
        /// The failure ends the session.
        fatal: bool,
    },
}

impl PollOutcome {
    pub fn session(&self) -> u64 {
        match self {
            PollOutcome::Devices { session, .. } | PollOutcome::Failed { session, .. } => *session,
        }
    }
}

/// Fetch the device set once. Returns `None` if the token fires first.
pub async fn fetch_devices(
    backend: &dyn Backend,
    cancel_token: &CancellationToken,
) -> Option<Result<Vec<Device>, BackendError>> {
    tokio::select! {
        biased;
        _ = cancel_token.cancelled() => None,
        result = backend.list_devices() => Some(result),
    }
}

/// Background task that fetches immediately, then once per interval.
pub struct Poller {
    backend: Arc<dyn Backend>,
    session: u64,
    settings: PollSettings,
    outcomes: mpsc::Sender<PollOutcome>,
    events: EventSender,
    cancel_token: CancellationToken,
    classifier: ErrorClassifier,
}

impl Poller {
    pub fn new(
        backend: Arc<dyn Backend>,
        session: u64,
        settings: PollSettings,
        outcomes: mpsc::Sender<PollOutcome>,
        events: EventSender,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            backend,
            session,
            settings,
            outcomes,
            events,
            cancel_token,
            classifier: ErrorClassifier::new(),
        }
    }

    pub async fn run(self) {
        let mut ticker = interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut consecutive_failures = 0u32;

        loop {
            // The first tick completes immediately.
            tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let Some(result) = fetch_devices(self.backend.as_ref(), &self.cancel_token).await
            else {
                break;
            };

            let outcome = match result {
                Ok(devices) => {
                    consecutive_failures = 0;
                    let (message, event_type) = if devices.is_empty() {
                        ("No agents registered yet".to_string(), EventType::Waiting)
                    } else {
                        (format!("Fetched {} devices", devices.len()), EventType::Refresh)
                    };
                    if !self.report(message, event_type, LogLevel::Debug).await {
                        break;
                    }
                    PollOutcome::Devices {
                        session: self.session,
                        devices,
                    }
                }
                Err(e) => {
                    consecutive_failures += 1;
                    let fatal = consecutive_failures >= self.settings.failure_tolerance;
                    let message = if fatal {
                        format!("Could not fetch devices: {}", e)
                    } else {
                        format!(
                            "Could not fetch devices ({} of {} tolerated failures): {}",
                            consecutive_failures, self.settings.failure_tolerance, e
                        )
                    };
                    let level = self.classifier.classify_fetch_error(&e);
                    if !self.report(message, EventType::Error, level).await {
                        break;
                    }
                    PollOutcome::Failed {
                        session: self.session,
                        error: e.to_string(),
                        fatal,
                    }
                }
            };

            let stop = matches!(outcome, PollOutcome::Failed { fatal: true, .. });
            let delivered = tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => false,
                sent = self.outcomes.send(outcome) => sent.is_ok(),
            };
            if !delivered || stop {
                break;
            }
        }
        log::debug!("Poller for session {} stopped", self.session);
    }

    /// Queue an activity event. Returns false if the session was cancelled
    /// while waiting for room in the queue.
    async fn report(&self, message: String, event_type: EventType, level: LogLevel) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel_token.cancelled() => false,
            _ = self.events.send_poller_event(message, event_type, level) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn settings(failure_tolerance: u32) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(3000),
            failure_tolerance,
        }
    }

    struct Spawned {
        outcomes: mpsc::Receiver<PollOutcome>,
        _events: mpsc::Receiver<crate::events::Event>,
        token: CancellationToken,
        handle: tokio::task::JoinHandle<()>,
    }

    fn spawn_poller(backend: MockBackend, settings: PollSettings) -> Spawned {
        let (outcome_sender, outcome_receiver) = mpsc::channel(16);
        let (event_sender, event_receiver) = mpsc::channel(100);
        let token = CancellationToken::new();
        let poller = Poller::new(
            Arc::new(backend),
            7,
            settings,
            outcome_sender,
            EventSender::new(event_sender),
            token.clone(),
        );
        Spawned {
            outcomes: outcome_receiver,
            _events: event_receiver,
            token,
            handle: tokio::spawn(poller.run()),
        }
    }

    #[tokio::test(start_paused = true)]
    // Should fetch immediately and then once per interval.
    async fn fetches_immediately_then_every_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut backend = MockBackend::new();
        backend.expect_list_devices().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Device::new("M1", Some("idle"))])
        });

        let Spawned {
            mut outcomes,
            token,
            handle,
            _events,
        } = spawn_poller(backend, settings(1));

        let first = outcomes.recv().await.unwrap();
        assert_eq!(first.session(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(3000 * 2 + 100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    // With the default tolerance a single failure ends the task.
    async fn first_failure_is_fatal_and_stops_ticking() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut backend = MockBackend::new();
        backend.expect_list_devices().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(BackendError::Http {
                status: 502,
                message: "Bad Gateway".to_string(),
            })
        });

        let Spawned {
            mut outcomes,
            handle,
            _events,
            ..
        } = spawn_poller(backend, settings(1));

        match outcomes.recv().await.unwrap() {
            PollOutcome::Failed { fatal, error, .. } => {
                assert!(fatal);
                assert!(error.contains("502"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        handle.await.unwrap();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    // A higher tolerance keeps polling until the failures are consecutive enough.
    async fn tolerated_failures_keep_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut backend = MockBackend::new();
        backend.expect_list_devices().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(BackendError::Http {
                status: 500,
                message: String::new(),
            })
        });

        let Spawned {
            mut outcomes,
            handle,
            _events,
            ..
        } = spawn_poller(backend, settings(3));

        let fatal_flags: Vec<bool> = [
            outcomes.recv().await.unwrap(),
            outcomes.recv().await.unwrap(),
            outcomes.recv().await.unwrap(),
        ]
        .into_iter()
        .map(|outcome| matches!(outcome, PollOutcome::Failed { fatal: true, .. }))
        .collect();

        assert_eq!(fatal_flags, [false, false, true]);
        handle.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_stops_the_task_before_next_tick() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut backend = MockBackend::new();
        backend.expect_list_devices().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        });

        let Spawned {
            mut outcomes,
            token,
            handle,
            _events,
        } = spawn_poller(backend, settings(1));
        outcomes.recv().await.unwrap();

        token.cancel();
        handle.await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(outcomes.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    // Nobody drains the activity queue here; cancelling must still end the task.
    async fn cancel_unblocks_poller_waiting_on_full_event_queue() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_devices()
            .returning(|| Ok(vec![Device::new("M1", Some("idle"))]));
        let (outcome_sender, mut outcome_receiver) = mpsc::channel(16);
        let (event_sender, _event_receiver) = mpsc::channel(1);
        let token = CancellationToken::new();
        let handle = tokio::spawn(
            Poller::new(
                Arc::new(backend),
                1,
                settings(1),
                outcome_sender,
                EventSender::new(event_sender),
                token.clone(),
            )
            .run(),
        );

        // The first event fills the queue; the second fetch parks on it.
        outcome_receiver.recv().await.unwrap();
        tokio::time::sleep(Duration::from_millis(3000 * 3)).await;
        assert!(outcome_receiver.try_recv().is_err());
        assert!(!handle.is_finished());

        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("poller did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn fetch_devices_yields_none_once_cancelled() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_devices()
            .times(0..=1)
            .returning(|| Ok(Vec::new()));
        let token = CancellationToken::new();
        token.cancel();

        assert!(fetch_devices(&backend, &token).await.is_none());
    }
}
