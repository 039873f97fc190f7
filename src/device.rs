//! Device records reported by the backend.
//!
//! The backend answers `GET /api/devices` with a JSON object keyed by machine
//! id. Status strings and timestamps are parsed here, once, so the rest of the
//! console works with structured values.

use crate::consts::cli_consts::messages::{INVALID_DATE, UNKNOWN_STATUS};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt::Display;

/// Wire shape of a single entry in the devices map.
#[derive(Debug, Clone, Default, Deserialize)]
struct DeviceRecord {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    last_seen: Option<Value>,
}

/// A wipe agent as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub machine_id: String,
    pub status: DeviceStatus,
    /// `None` when the backend sent no timestamp or one that could not be parsed.
    pub last_seen: Option<DateTime<Utc>>,
}

impl Device {
    pub fn new(machine_id: impl Into<String>, status: Option<&str>) -> Self {
        Self {
            machine_id: machine_id.into(),
            status: DeviceStatus::parse(status),
            last_seen: None,
        }
    }

    pub fn with_last_seen(mut self, last_seen: DateTime<Utc>) -> Self {
        self.last_seen = Some(last_seen);
        self
    }

    /// Last-seen time in the operator's local timezone.
    pub fn last_seen_display(&self) -> String {
        match self.last_seen {
            Some(ts) => ts
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            None => INVALID_DATE.to_string(),
        }
    }
}

/// Agent status split into `<phase>:<detail>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatus {
    raw: Option<String>,
    phase: String,
    detail: Option<String>,
}

impl DeviceStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        let raw = raw.filter(|s| !s.is_empty());
        let (phase, detail) = match raw {
            Some(s) => match s.split_once(':') {
                Some((phase, detail)) => (phase.to_lowercase(), Some(detail.to_string())),
                None => (s.to_lowercase(), None),
            },
            None => (String::new(), None),
        };
        Self {
            raw: raw.map(str::to_string),
            phase,
            detail,
        }
    }

    /// Lower-cased phase, used to classify the status for styling.
    pub fn phase(&self) -> &str {
        &self.phase
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Full status text as sent by the backend.
    pub fn text(&self) -> &str {
        self.raw.as_deref().unwrap_or(UNKNOWN_STATUS)
    }
}

impl Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Parses a timestamp given either as an ISO-8601 string or as epoch milliseconds.
///
/// Date-times without an offset are read as local time. A bare date is
/// midnight UTC, the way ECMAScript reads `YYYY-MM-DD`.
pub fn parse_last_seen(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(ts.with_timezone(&Utc));
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
            }
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .and_then(|naive| Local.from_local_datetime(&naive).earliest())
                .map(|ts| ts.with_timezone(&Utc))
        }
        _ => None,
    }
}

/// Parses the devices map, keeping the response's key order.
pub fn parse_device_map(bytes: &[u8]) -> Result<Vec<Device>, serde_json::Error> {
    let map: Map<String, Value> = serde_json::from_slice(bytes)?;
    map.into_iter()
        .map(|(machine_id, value)| -> Result<Device, serde_json::Error> {
            let record: DeviceRecord = if value.is_null() {
                DeviceRecord::default()
            } else {
                serde_json::from_value(value)?
            };
            Ok(Device {
                status: DeviceStatus::parse(record.status.as_deref()),
                last_seen: record.last_seen.as_ref().and_then(parse_last_seen),
                machine_id,
            })
        })
        .collect()
}
