//! Headless mode execution

use super::{
    SessionData,
    messages::{
        print_session_exit_success, print_session_failed, print_session_shutdown,
        print_session_starting,
    },
};
use crate::commands::render_device_table;
use crate::consts::cli_consts::messages;
use crate::controller::ConnectionState;
use crate::events::Event;
use std::error::Error;
use tokio::sync::mpsc;

fn drain_events(event_receiver: &mut mpsc::Receiver<Event>) {
    while let Ok(event) = event_receiver.try_recv() {
        if event.should_display() {
            println!("{}", event);
        }
    }
}

/// Runs the controller without a terminal UI
///
/// Connects immediately, prints activity events and the device table whenever
/// it changes, and stops on Ctrl+C. A session torn down by a fetch failure
/// ends the command with an error.
///
/// # Arguments
/// * `session` - Session data from setup
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting("watch", &session.environment);
    session.controller.connect()?;

    let mut last_table = String::new();
    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),
            Some(event) = session.event_receiver.recv() => {
                if event.should_display() {
                    println!("{}", event);
                }
            }
            changed = session.controller.next_outcome() => {
                if !changed {
                    continue;
                }
                if session.controller.state() == ConnectionState::Disconnected {
                    break Err(messages::CONNECTION_FAILED);
                }
                let table = render_device_table(session.controller.view());
                if table != last_table {
                    println!("{}", table);
                    last_table = table;
                }
            }
        }
    };

    print_session_shutdown();
    session.controller.disconnect();
    drain_events(&mut session.event_receiver);

    match result {
        Ok(()) => {
            print_session_exit_success();
            Ok(())
        }
        Err(reason) => {
            print_session_failed(reason);
            Err(reason.into())
        }
    }
}
