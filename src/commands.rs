//! One-shot commands
//!
//! `devices` fetches the device list once and prints it. `wipe` runs a short
//! polling session so the confirmation gate and the post-wipe refresh behave
//! exactly as they do in the dashboard.

use crate::backend::Backend;
use crate::controller::{
    ConnectionState, ControllerError, DeviceListView, PendingWipe, PollSettings, PollingController,
};
use crate::consts::cli_consts::{EVENT_QUEUE_SIZE, messages};
use crate::events::EventSender;
use crate::{print_cmd_error, print_cmd_info, print_cmd_success, print_cmd_warn};
use std::error::Error;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::sync::mpsc;

const MACHINE_ID_HEADER: &str = "MACHINE ID";
const STATUS_HEADER: &str = "STATUS";
const LAST_SEEN_HEADER: &str = "LAST SEEN";

/// Render a device list view as a plain-text table, or its placeholder line.
pub fn render_device_table(view: &DeviceListView) -> String {
    if let Some(placeholder) = view.placeholder() {
        return placeholder.to_string();
    }

    let cards = view.cards();
    let id_width = cards
        .iter()
        .map(|card| card.machine_id.chars().count())
        .chain([MACHINE_ID_HEADER.len()])
        .max()
        .unwrap_or_default();
    let status_width = cards
        .iter()
        .map(|card| card.status_text.chars().count())
        .chain([STATUS_HEADER.len()])
        .max()
        .unwrap_or_default();

    let mut table = format!(
        "{:<id_width$}  {:<status_width$}  {}",
        MACHINE_ID_HEADER, STATUS_HEADER, LAST_SEEN_HEADER
    );
    for card in cards {
        table.push('\n');
        table.push_str(&format!(
            "{:<id_width$}  {:<status_width$}  {}",
            card.machine_id, card.status_text, card.last_seen
        ));
    }
    table
}

/// Fetch the device list once and print it.
pub async fn run_devices(backend: Arc<dyn Backend>) -> Result<(), Box<dyn Error>> {
    print_cmd_info!("Fetching devices", "from {}", backend.environment().backend_url());
    match backend.list_devices().await {
        Ok(devices) => {
            println!("{}", render_device_table(&DeviceListView::from_devices(&devices)));
            Ok(())
        }
        Err(e) => {
            print_cmd_error!(messages::CONNECTION_FAILED, &e.to_string());
            Err(e.into())
        }
    }
}

/// Result of a wipe request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeOutcome {
    Issued,
    /// The operator answered no. Nothing was sent.
    Declined,
}

/// Connect, wait for the first fetch, ask `confirm`, then dispatch.
///
/// `confirm` sees the pending request and the device list from the first fetch.
///
/// The controller is left connected; callers disconnect when done.
pub async fn wipe_device<F>(
    controller: &mut PollingController,
    machine_id: &str,
    confirm: F,
) -> Result<WipeOutcome, ControllerError>
where
    F: FnOnce(&PendingWipe, &DeviceListView) -> bool,
{
    if !controller.is_connected() {
        controller.connect()?;
    }
    while controller.state() == ConnectionState::Connecting {
        controller.next_outcome().await;
    }

    let pending = controller.request_wipe(machine_id)?;
    if !confirm(&pending, controller.view()) {
        return Ok(WipeOutcome::Declined);
    }
    controller.dispatch_wipe(pending.confirm()).await?;
    Ok(WipeOutcome::Issued)
}

/// Print the prompt and read a yes/no answer. Anything but `y`/`yes` declines.
pub fn confirm_from<R: BufRead, W: Write>(
    pending: &PendingWipe,
    input: &mut R,
    output: &mut W,
) -> bool {
    if writeln!(output, "{}\n", pending.prompt()).is_err() {
        return false;
    }
    if write!(output, "Type 'yes' to continue: ").is_err() || output.flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// The `wipe` command.
pub async fn run_wipe(
    backend: Arc<dyn Backend>,
    settings: PollSettings,
    machine_id: &str,
    assume_yes: bool,
) -> Result<(), Box<dyn Error>> {
    // No activity log in one-shot mode. The receiver is dropped so event
    // sends fail fast instead of filling the queue while the prompt waits.
    let (event_sender, _) = mpsc::channel(EVENT_QUEUE_SIZE);
    let mut controller = PollingController::new(backend, settings, EventSender::new(event_sender));

    print_cmd_info!(
        "Connecting",
        "to {}",
        controller.backend().environment().backend_url()
    );

    let result = wipe_device(&mut controller, machine_id, |pending, view| {
        if !view
            .cards()
            .iter()
            .any(|card| card.machine_id == pending.machine_id())
        {
            print_cmd_warn!(
                "Unknown device",
                "{} is not in the current device list",
                pending.machine_id()
            );
        }
        assume_yes || confirm_from(pending, &mut std::io::stdin().lock(), &mut std::io::stdout())
    })
    .await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            let title = if controller.view().is_error() {
                messages::CONNECTION_FAILED
            } else {
                "Wipe not issued"
            };
            controller.disconnect();
            print_cmd_error!(title, &e.to_string());
            return Err(e.into());
        }
    };

    match outcome {
        WipeOutcome::Declined => {
            print_cmd_warn!("Wipe cancelled", "No command was sent to {}", machine_id)
        }
        WipeOutcome::Issued => {
            print_cmd_success!(messages::WIPE_ISSUED, "Target: {}", machine_id);
            println!("{}", render_device_table(controller.view()));
        }
    }
    controller.disconnect();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::backend::error::BackendError;
    use crate::device::Device;
    use crate::events::Event;
    use std::io::Cursor;

    fn controller_with(backend: MockBackend) -> (PollingController, mpsc::Receiver<Event>) {
        let (event_sender, event_receiver) = mpsc::channel(100);
        let controller = PollingController::new(
            Arc::new(backend),
            PollSettings::default(),
            EventSender::new(event_sender),
        );
        (controller, event_receiver)
    }

    fn backend_listing(ids: &'static [&'static str]) -> MockBackend {
        let mut backend = MockBackend::new();
        backend.expect_list_devices().returning(move || {
            Ok(ids
                .iter()
                .map(|id| Device::new(*id, Some("idle")))
                .collect())
        });
        backend
    }

    #[test]
    fn table_has_header_and_one_row_per_device() {
        let view = DeviceListView::from_devices(&[
            Device::new("a1:b2:c3", Some("wiping:42%")),
            Device::new("M2", None),
        ]);
        let table = render_device_table(&view);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("MACHINE ID  STATUS"));
        assert!(lines[1].starts_with("a1:b2:c3    wiping:42%"));
        assert!(lines[2].starts_with("M2          Unknown"));
        assert!(lines[2].ends_with("Invalid Date"));
    }

    #[test]
    fn table_falls_back_to_placeholder() {
        assert_eq!(
            render_device_table(&DeviceListView::WaitingForAgents),
            "Connected. Waiting for agents to register..."
        );
    }

    #[test]
    fn confirmation_accepts_only_yes() {
        let pending = PendingWipe::new("M1");
        for (answer, expected) in [("yes\n", true), ("Y\n", true), ("no\n", false), ("\n", false)] {
            let mut output = Vec::new();
            let confirmed = confirm_from(&pending, &mut Cursor::new(answer), &mut output);
            assert_eq!(confirmed, expected, "answer {:?}", answer);
            assert!(String::from_utf8(output).unwrap().contains("ARE YOU ABSOLUTELY SURE?"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn declined_wipe_sends_nothing() {
        let mut backend = backend_listing(&["M1"]);
        backend.expect_issue_wipe().never();
        let (mut controller, _events) = controller_with(backend);

        let outcome = wipe_device(&mut controller, "M1", |_, view| {
            assert_eq!(view.cards().len(), 1);
            false
        })
        .await
        .unwrap();

        assert_eq!(outcome, WipeOutcome::Declined);
        assert_eq!(controller.state(), ConnectionState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn confirmed_wipe_is_dispatched() {
        let mut backend = backend_listing(&["M1", "M2"]);
        backend
            .expect_issue_wipe()
            .withf(|machine_id| machine_id == "M2")
            .times(1)
            .returning(|_| Ok(()));
        let (mut controller, _events) = controller_with(backend);

        let outcome = wipe_device(&mut controller, "M2", |pending, _| {
            pending.machine_id() == "M2"
        })
        .await
        .unwrap();

        assert_eq!(outcome, WipeOutcome::Issued);
        controller.disconnect();
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_backend_means_no_prompt_and_no_wipe() {
        let mut backend = MockBackend::new();
        backend.expect_list_devices().returning(|| {
            Err(BackendError::Http {
                status: 502,
                message: "Bad Gateway".to_string(),
            })
        });
        backend.expect_issue_wipe().never();
        let (mut controller, _events) = controller_with(backend);

        let result = wipe_device(&mut controller, "M1", |_, _| {
            panic!("prompted without a connection")
        })
        .await;

        assert!(matches!(result, Err(ControllerError::NotConnected)));
        assert!(controller.view().is_error());
    }
}
