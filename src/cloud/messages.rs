//! Per-device message fetch

use super::{array_at, CloudApi};
use crate::error::{Error, Result};
use crate::types::{Message, SyncWindow};
use tracing::debug;

impl CloudApi {
    /// Fetch the messages a device emitted within `window`
    ///
    /// Issues a single request for at most `message_count` messages; there
    /// is no pagination past the first page. Records are returned verbatim
    /// in arrival order. A record without its own `sdid` is attributed to
    /// `device_id`.
    pub async fn fetch_messages(
        &self,
        token: &str,
        device_id: &str,
        window: &SyncWindow,
    ) -> Result<Vec<Message>> {
        let url = self.endpoint(&["messages"]);
        let query = [
            ("count", self.message_count.to_string()),
            ("startDate", window.start_time.to_string()),
            ("endDate", window.end_time.to_string()),
            ("sdid", device_id.to_string()),
        ];

        let body = self
            .http
            .get_json(&url, &query, token)
            .await
            .map_err(|e| Error::message_fetch(device_id, e.to_string()))?;

        let messages: Vec<Message> = array_at(&body, "data")
            .iter()
            .cloned()
            .map(|record| {
                let mut message = Message::from_record(record);
                if message.sdid.is_empty() {
                    message.sdid = device_id.to_string();
                }
                message
            })
            .collect();

        debug!(device_id, count = messages.len(), "Fetched messages");
        Ok(messages)
    }
}
