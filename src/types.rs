//! Common types used throughout artik-sync
//!
//! This module contains the data model shared by the sync pipeline:
//! timestamps, device identifiers, the sync window and device messages.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Opaque identifier of a device registered on the cloud platform
pub type DeviceId = String;

/// Current wall-clock time in milliseconds
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Render a millisecond timestamp as RFC 3339 for logs
pub fn format_timestamp(ts: Timestamp) -> String {
    match Utc.timestamp_millis_opt(ts).single() {
        Some(dt) => dt.to_rfc3339(),
        None => ts.to_string(),
    }
}

// ============================================================================
// Sync Window
// ============================================================================

/// Time range `[start_time, end_time]` covered by one sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncWindow {
    /// Previous checkpoint, or the configured default
    pub start_time: Timestamp,
    /// Wall-clock time at sync start
    pub end_time: Timestamp,
}

impl SyncWindow {
    /// Create a window, clamping `start_time` so that `start_time <= end_time`
    pub fn new(start_time: Timestamp, end_time: Timestamp) -> Self {
        Self {
            start_time: start_time.min(end_time),
            end_time,
        }
    }

    /// Window from `start_time` until now
    pub fn until_now(start_time: Timestamp) -> Self {
        Self::new(start_time, now_millis())
    }

    /// Window length in milliseconds
    pub fn duration_ms(&self) -> i64 {
        self.end_time - self.start_time
    }

    /// Start as a UTC datetime
    pub fn start(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.start_time).single()
    }

    /// End as a UTC datetime
    pub fn end(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.end_time).single()
    }
}

// ============================================================================
// Device Message
// ============================================================================

/// A message emitted by a device
///
/// `payload` is the full message record as returned by the platform and is
/// forwarded downstream without modification.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Source device id
    pub sdid: DeviceId,
    /// Message record, verbatim
    pub payload: JsonValue,
}

impl Message {
    /// Create a message
    pub fn new(sdid: impl Into<DeviceId>, payload: JsonValue) -> Self {
        Self {
            sdid: sdid.into(),
            payload,
        }
    }

    /// Build a message from a raw record, reading `sdid` from the record itself
    pub fn from_record(record: JsonValue) -> Self {
        let sdid = record
            .get("sdid")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();
        Self {
            sdid,
            payload: record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_window_clamps_start() {
        let window = SyncWindow::new(2000, 1000);
        assert_eq!(window.start_time, 1000);
        assert_eq!(window.end_time, 1000);
        assert_eq!(window.duration_ms(), 0);
    }

    #[test]
    fn test_window_until_now() {
        let before = now_millis();
        let window = SyncWindow::until_now(0);
        assert_eq!(window.start_time, 0);
        assert!(window.end_time >= before);
    }

    #[test]
    fn test_window_datetimes() {
        let window = SyncWindow::new(0, 1000);
        assert_eq!(window.start().unwrap().timestamp(), 0);
        assert_eq!(window.end().unwrap().timestamp_millis(), 1000);
    }

    #[test]
    fn test_message_from_record() {
        let record = json!({"sdid": "d1", "data": {"temp": 21.5}});
        let msg = Message::from_record(record.clone());
        assert_eq!(msg.sdid, "d1");
        assert_eq!(msg.payload, record);
    }

    #[test]
    fn test_message_from_record_without_sdid() {
        let msg = Message::from_record(json!({"data": {}}));
        assert!(msg.sdid.is_empty());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00+00:00");
    }
}
