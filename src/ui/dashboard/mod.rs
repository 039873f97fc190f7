//! Device dashboard
//!
//! Device list, connection gauge, activity log and the wipe confirmation overlay

pub mod components;
pub mod renderer;
pub mod state;
pub mod updaters;
pub mod utils;

pub use renderer::render_dashboard;
pub use state::{DashboardState, Modal};
