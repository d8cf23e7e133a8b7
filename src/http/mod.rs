//! HTTP client module
//!
//! Provides the HTTP client used by every stage of the sync pipeline.
//!
//! # Features
//!
//! - **Single attempt**: Requests are never retried
//! - **Rate Limiting**: Optional token bucket rate limiter using governor
//! - **Classification**: Transport errors, provider `error` bodies and
//!   non-200 statuses are turned into typed errors

mod client;
mod rate_limit;

pub use client::{classify_response, error_message, HttpClient, HttpClientConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
