//! Pagination types and traits

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these parameters
    Continue {
        /// Query parameters for the next request
        query_params: Vec<(String, String)>,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Zero-based index of the page to request next
    pub page: u32,
    /// Record offset of the page to request next
    pub offset: u64,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Move to the next page of `page_size` records
    pub fn advance(&mut self, page_size: u32) {
        self.page += 1;
        self.offset += u64::from(page_size);
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Query parameters for the page described by `state`
    fn query_params(&self, state: &PaginationState) -> Vec<(String, String)>;

    /// Record a batch of `records_count` items and decide whether to continue
    fn process_response(&self, records_count: usize, state: &mut PaginationState) -> NextPage;
}
