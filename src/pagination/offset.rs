//! Offset/count pagination
//!
//! Requests `?offset=<n>&count=<page_size>` pages, where `n` is the record
//! offset of the page. Pagination only ends on an empty batch; a short batch
//! is not treated as the last one because the provider does not promise full
//! pages.

use super::types::{NextPage, PaginationState, Paginator};
use crate::config::DEFAULT_PAGE_SIZE;

/// Offset-based pagination that stops on the first empty page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Query parameter name for page size
    pub count_param: String,
    /// Number of records per page
    pub page_size: u32,
}

impl Default for OffsetPaginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl OffsetPaginator {
    /// Create a paginator using the `offset`/`count` parameters
    pub fn new(page_size: u32) -> Self {
        Self {
            offset_param: "offset".to_string(),
            count_param: "count".to_string(),
            page_size,
        }
    }
}

impl Paginator for OffsetPaginator {
    fn query_params(&self, state: &PaginationState) -> Vec<(String, String)> {
        vec![
            (self.offset_param.clone(), state.offset.to_string()),
            (self.count_param.clone(), self.page_size.to_string()),
        ]
    }

    fn process_response(&self, records_count: usize, state: &mut PaginationState) -> NextPage {
        if records_count == 0 {
            state.mark_done();
            return NextPage::Done;
        }

        state.add_fetched(records_count as u64);
        state.advance(self.page_size);

        NextPage::Continue {
            query_params: self.query_params(state),
        }
    }
}
