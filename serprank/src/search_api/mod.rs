//! Search API fetcher
//!
//! Retrieves paginated results from a SerpAPI-compatible JSON endpoint and
//! converts them into [`RawHit`](crate::models::RawHit)s for classification.

pub mod client;
pub mod errors;
pub mod pagination;

pub use client::{PageFetcher, SerpApiClient};
pub use errors::{SearchApiError, SearchApiResult};
pub use pagination::{convert_inline_video, convert_organic_result, fetch_results};
