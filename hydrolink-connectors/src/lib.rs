//! Outbound Connectors for Station-to-Cloud Uploads
//!
//! ## Overview
//!
//! The decoding engine hands validated records to a
//! [`RecordSink`](hydrolink_core::traits::RecordSink); this crate provides
//! the sinks that carry them off the station. The deployed system uploads
//! rows to a hosted REST table service over HTTPS, so HTTP is the one
//! protocol implemented here.
//!
//! ## Design Notes
//!
//! ### Why plain HTTP?
//!
//! - The storage service exposes a REST table API and nothing else
//! - Firewall-friendly from field sites on cellular backhaul
//! - Stateless: a lost connection costs one record, not a session
//!
//! ### Synchronous by design
//!
//! The collectors are single-threaded and cooperative; an async runtime
//! would buy nothing and cost a scheduler. Uploads block the poll loop for
//! at most `timeout x (1 + max_retries)`, which is fine at one record per
//! poll interval. Deployments needing pipelining should wrap a sink in
//! their own queue.
//!
//! ### Failure containment
//!
//! A sink failure is reported to the collector, which logs and counts it;
//! the record is dropped (at-most-once delivery, no dedup key beyond the
//! timestamp). Retries within one submit are bounded and only for
//! retryable failures (5xx, 429, transport).
//!
//! ## Example Usage
//!
//! ```no_run
//! use hydrolink_connectors::http::{HttpConfig, HttpSink};
//! use hydrolink_core::{traits::RecordSink, TemperatureRecord};
//!
//! # fn main() -> Result<(), hydrolink_connectors::http::HttpError> {
//! let config = HttpConfig::new("https://db.example.com/rest/v1")
//!     .api_key("apikey", "service-role-key")
//!     .timeout_secs(30);
//!
//! let mut sink = HttpSink::new(config)?;
//!
//! let record = TemperatureRecord { timestamp: 1_700_000_000_000, t1: 21.7, t2: 22.4 };
//! sink.submit(&record)?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{AuthMethod, HttpConfig, HttpError, HttpSink};

/// Upload statistics common to all connectors
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Rows uploaded successfully
    pub rows_sent: u64,
    /// Rows that failed after all retries
    pub rows_failed: u64,
    /// Payload bytes sent
    pub bytes_sent: u64,
    /// Last error message, for operator diagnostics
    pub last_error: Option<String>,
}
