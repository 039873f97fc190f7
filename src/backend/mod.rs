use crate::backend::error::BackendError;
use crate::device::Device;
use crate::environment::Environment;

pub(crate) mod client;
pub use client::BackendClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// The two backend endpoints the console consumes.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    fn environment(&self) -> &Environment;

    /// Fetch the current device set, in the backend's key order.
    async fn list_devices(&self) -> Result<Vec<Device>, BackendError>;

    /// Ask the backend to queue a wipe for the given machine.
    async fn issue_wipe(&self, machine_id: &str) -> Result<(), BackendError>;
}
