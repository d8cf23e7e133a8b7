//! Cloud platform REST API
//!
//! Bearer-authenticated calls against the provider's API:
//! - Device enumeration (`GET /users/{account}/devices`, paginated)
//! - Message fetch (`GET /messages`, one page per device)
//!
//! Both calls classify failures into their own stage error
//! ([`Error::DeviceList`](crate::Error::DeviceList),
//! [`Error::MessageFetch`](crate::Error::MessageFetch)).

mod devices;
mod messages;

use crate::config::{ConnectorConfig, DEFAULT_PAGE_SIZE};
use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::OffsetPaginator;
use serde_json::Value;
use url::Url;

/// Client for the device and message endpoints
#[derive(Debug, Clone)]
pub struct CloudApi {
    http: HttpClient,
    base_url: Url,
    paginator: OffsetPaginator,
    message_count: u32,
}

impl CloudApi {
    /// Create a client for the given API base URL
    pub fn new(base_url: &str, http: HttpClient) -> Result<Self> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            paginator: OffsetPaginator::new(DEFAULT_PAGE_SIZE),
            message_count: DEFAULT_PAGE_SIZE,
        })
    }

    /// Create a client from the connector configuration
    pub fn from_config(config: &ConnectorConfig, http: HttpClient) -> Result<Self> {
        Ok(Self::new(&config.api_base_url, http)?
            .with_page_size(config.page_size)
            .with_message_count(config.message_count))
    }

    /// Set the device listing page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.paginator = OffsetPaginator::new(page_size);
        self
    }

    /// Set how many messages are requested per device
    #[must_use]
    pub fn with_message_count(mut self, count: u32) -> Self {
        self.message_count = count;
        self
    }

    /// API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }
}

/// Follow a dotted path (`data.devices`) through nested JSON objects
pub(crate) fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, part| current.as_object()?.get(part))
}

/// Array at `path`, or an empty slice when absent, null or not an array
pub(crate) fn array_at<'a>(value: &'a Value, path: &str) -> &'a [Value] {
    lookup_path(value, path)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}
