//! # result-scrape
//!
//! Library for extracting structured academic records from a positional
//! HTML result-publishing site, at scale.
//!
//! Two tightly coupled pieces form the core:
//! - a **document decoder** that turns an index-addressed table layout
//!   (banner, identity row, alternating subject/summary pairs per term,
//!   decorative trailer) into a typed [`StudentRecord`], and
//! - a **bulk orchestrator** that schedules many such extractions under
//!   bounded parallelism, rate pacing, retries, and cancellation.
//!
//! ## Design Philosophy
//!
//! - **Library-first** — no CLI or persistence; callers hold the outcome
//!   collection
//! - **Classified failures** — every way a scrape can go wrong maps to one
//!   [`Error`] variant, so retry policy and reporting stay explicit
//! - **Tolerant decoding** — a bad numeric cell degrades to zero with a
//!   warning, never aborting the document
//!
//! ## Quick Start
//!
//! ```no_run
//! use result_scrape::{ResultClient, ScrapeConfig, ScrapeStrategy};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ResultClient::new(ScrapeConfig::default())?;
//!
//!     // One identifier
//!     let record = client.fetch_one("21bcs001").await?;
//!     println!("{} -> CGPI {}", record.roll_number, record.cgpi);
//!
//!     // Many identifiers under a bounded, paced worker pool
//!     let rolls: Vec<String> = (1..=60).map(|i| format!("21bcs{:03}", i)).collect();
//!     let outcomes = ScrapeStrategy::pooled_from_config(&client)
//!         .run(&client, &rolls, CancellationToken::new())
//!         .await;
//!     println!("{} outcomes collected", outcomes.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Bulk orchestration strategies
pub mod bulk;
/// Scrape client and single-identifier fetching
pub mod client;
/// Configuration types
pub mod config;
/// Positional HTML document decoding
pub mod decode;
/// Error types
pub mod error;
/// Retry classification and backoff
pub mod retry;
/// Roll number classification and path resolution
pub mod roll;
/// Anti-forgery token cache
pub mod tokens;
/// Core data model
pub mod types;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use bulk::{ScrapeStrategy, scrape_pooled, scrape_sequential};
pub use client::ResultClient;
pub use config::{RetryConfig, ScrapeConfig};
pub use decode::decode;
pub use error::{Error, Result};
pub use retry::IsRetryable;
pub use tokens::{FormTokens, TokenCache};
pub use types::{ScrapeOutcome, SemesterResult, StudentRecord, SubjectResult};
