//! Pagination module
//!
//! Offset/count pagination as used by the device listing endpoint.
//!
//! # Overview
//!
//! A [`Paginator`] produces the query parameters for the current page and
//! decides, from the size of each batch, whether another page is requested.
//! Pages are strictly sequential: the next request is only built after the
//! previous batch has been consumed.

mod offset;
mod types;

pub use offset::OffsetPaginator;
pub use types::{NextPage, PaginationState, Paginator};

#[cfg(test)]
mod tests;
