//! Device enumeration

use super::{array_at, CloudApi};
use crate::error::{Error, Result};
use crate::pagination::{NextPage, PaginationState, Paginator};
use crate::types::DeviceId;
use serde_json::Value;
use tracing::{debug, info, warn};

impl CloudApi {
    /// List every device of an account
    ///
    /// Pages through `users/{account_id}/devices` until the first empty (or
    /// absent) `data.devices` batch. Any failure aborts the whole listing;
    /// no partial result is returned.
    pub async fn list_devices(&self, account_id: &str, token: &str) -> Result<Vec<DeviceId>> {
        let url = self.endpoint(&["users", account_id, "devices"]);
        let mut state = PaginationState::new();
        let mut query = self.paginator.query_params(&state);
        let mut devices = Vec::new();

        loop {
            debug!(offset = state.offset, page = state.page, "Fetching device page");

            let body = self
                .http
                .get_json(&url, &query, token)
                .await
                .map_err(|e| Error::device_list(e.to_string()))?;

            let batch = array_at(&body, "data.devices");
            devices.extend(batch.iter().filter_map(device_id));

            match self.paginator.process_response(batch.len(), &mut state) {
                NextPage::Continue { query_params } => query = query_params,
                NextPage::Done => break,
            }
        }

        info!(
            devices = devices.len(),
            pages = state.page,
            "Device enumeration complete"
        );
        Ok(devices)
    }
}

fn device_id(record: &Value) -> Option<DeviceId> {
    let id = record.get("id").and_then(Value::as_str);
    if id.is_none() {
        warn!(%record, "Skipping device record without an id");
    }
    id.map(ToString::to_string)
}
