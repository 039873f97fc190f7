//! Connection state and the rendered device list

use crate::consts::cli_consts::messages;
use crate::device::Device;

/// Where the controller sits in its connect/disconnect cycle.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, strum::Display)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Entered on connect, left when the first fetch resolves.
    Connecting,
    Connected,
}

/// One rendered device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCard {
    pub machine_id: String,
    /// Full status string as reported.
    pub status_text: String,
    /// Lower-cased phase used for styling.
    pub status_class: String,
    pub status_detail: Option<String>,
    pub last_seen: String,
}

impl From<&Device> for DeviceCard {
    fn from(device: &Device) -> Self {
        Self {
            machine_id: device.machine_id.clone(),
            status_text: device.status.text().to_string(),
            status_class: device.status.phase().to_string(),
            status_detail: device.status.detail().map(str::to_string),
            last_seen: device.last_seen_display(),
        }
    }
}

/// What the device list area currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeviceListView {
    /// Not connected; prompt the operator to connect.
    #[default]
    Idle,
    /// Connected, but the backend knows no agents yet.
    WaitingForAgents,
    /// The session ended because of a fetch failure.
    ConnectionFailed,
    Devices(Vec<DeviceCard>),
}

impl DeviceListView {
    pub fn from_devices(devices: &[Device]) -> Self {
        if devices.is_empty() {
            return DeviceListView::WaitingForAgents;
        }
        DeviceListView::Devices(devices.iter().map(DeviceCard::from).collect())
    }

    /// Placeholder text, for every view except a device list.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            DeviceListView::Idle => Some(messages::IDLE_PLACEHOLDER),
            DeviceListView::WaitingForAgents => Some(messages::WAITING_FOR_AGENTS),
            DeviceListView::ConnectionFailed => Some(messages::CONNECTION_FAILED),
            DeviceListView::Devices(_) => None,
        }
    }

    pub fn cards(&self) -> &[DeviceCard] {
        match self {
            DeviceListView::Devices(cards) => cards,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DeviceListView::ConnectionFailed)
    }
}
