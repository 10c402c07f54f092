//! HTTP Sink for REST Table Uploads
//!
//! ## Overview
//!
//! Uploads accepted records as JSON rows to a hosted REST table service:
//! one `POST <base_url>/<table>` per record, with the service's API key in
//! a header. Both record types map to the deployment's original table
//! schema - `flow_data {timestamp, flow, velocity}` and
//! `temperature_data {timestamp, t1, t2}` - with timestamps rendered as
//! ISO-8601 UTC strings.
//!
//! ## Implementation Choices
//!
//! Kept intentionally simple and lightweight:
//! - `ureq` blocking client, no connection state to manage
//! - JSON only; rows are small enough that compression is noise
//! - Bounded retry with exponential backoff for retryable failures
//!
//! ## Example Usage
//!
//! ```no_run
//! use hydrolink_connectors::http::{HttpConfig, HttpSink};
//!
//! # fn main() -> Result<(), hydrolink_connectors::http::HttpError> {
//! let config = HttpConfig::new("https://db.example.com/rest/v1")
//!     .bearer_token("service-token")
//!     .timeout_secs(30)
//!     .max_retries(3);
//!
//! let sink = HttpSink::new(config)?;
//! # let _ = sink;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use base64::Engine as _;
use hydrolink_core::{time::datetime_utc, traits::RecordSink, FlowRecord, TemperatureRecord};
use thiserror::Error;

use crate::ConnectionStats;

/// HTTP-specific errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Server returned error status
    #[error("Server error {status}: {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Authentication methods
#[derive(Clone)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// Bearer token
    Bearer(String),
    /// Basic authentication
    Basic {
        /// Account name
        username: String,
        /// Account secret
        password: String,
    },
    /// API key in a named header
    ApiKey {
        /// Header name, e.g. `apikey`
        header: String,
        /// Header value
        value: String,
    },
}

/// HTTP sink configuration
#[derive(Clone)]
pub struct HttpConfig {
    /// Base URL of the table API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Authentication method
    pub auth: AuthMethod,
    /// Retry attempts after the first try
    pub max_retries: u32,
    /// Table receiving flow records
    pub flow_table: String,
    /// Table receiving temperature records
    pub temperature_table: String,
    /// User agent string
    pub user_agent: String,
}

impl HttpConfig {
    /// Create new configuration with the table API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            auth: AuthMethod::None,
            max_retries: 3,
            flow_table: "flow_data".into(),
            temperature_table: "temperature_data".into(),
            user_agent: format!("Hydrolink/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set bearer token authentication
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMethod::Bearer(token.into());
        self
    }

    /// Set basic authentication
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set API key authentication
    pub fn api_key(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth = AuthMethod::ApiKey {
            header: header.into(),
            value: value.into(),
        };
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set retry attempts after the first try
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Override the destination tables
    pub fn tables(mut self, flow: impl Into<String>, temperature: impl Into<String>) -> Self {
        self.flow_table = flow.into();
        self.temperature_table = temperature.into();
        self
    }
}

/// Record sink uploading rows over HTTP using the lightweight ureq client
pub struct HttpSink {
    config: HttpConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl HttpSink {
    /// Create a sink, validating the configuration
    pub fn new(config: HttpConfig) -> Result<Self, HttpError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(HttpError::Config(
                "Base URL must start with http:// or https://".into(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: ConnectionStats::default(),
        })
    }

    /// Upload statistics so far
    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Render a flow record as its table row
    pub fn flow_row(record: &FlowRecord) -> serde_json::Value {
        serde_json::json!({
            "timestamp": datetime_utc(record.timestamp).to_rfc3339(),
            "flow": record.flow,
            "velocity": record.velocity,
        })
    }

    /// Render a temperature record as its table row
    pub fn temperature_row(record: &TemperatureRecord) -> serde_json::Value {
        serde_json::json!({
            "timestamp": datetime_utc(record.timestamp).to_rfc3339(),
            "t1": record.t1,
            "t2": record.t2,
        })
    }

    /// POST one row to a table, retrying retryable failures
    fn post_row(&mut self, table: &str, row: &serde_json::Value) -> Result<(), HttpError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), table);
        let body = serde_json::to_string(row)
            .map_err(|e| HttpError::Serialization(e.to_string()))?;

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Exponential backoff
                std::thread::sleep(Duration::from_millis(100 * (1 << attempt)));
            }

            let request = self.build_request(self.agent.post(&url));

            match request.send_string(&body) {
                Ok(_) => {
                    self.stats.rows_sent += 1;
                    self.stats.bytes_sent += body.len() as u64;
                    return Ok(());
                }
                Err(ureq::Error::Status(code, resp)) => {
                    let message = resp.into_string().unwrap_or_default();
                    let error = HttpError::ServerError { status: code, message };

                    // Server overload and rate limits are retryable;
                    // client errors are not
                    if code >= 500 || code == 429 {
                        last_error = Some(error);
                        continue;
                    }
                    self.record_failure(&error);
                    return Err(error);
                }
                Err(ureq::Error::Transport(e)) => {
                    last_error = Some(HttpError::Request(e.to_string()));
                    continue;
                }
            }
        }

        let error = last_error.unwrap_or_else(|| HttpError::Request("Unknown error".into()));
        self.record_failure(&error);
        Err(error)
    }

    fn record_failure(&mut self, error: &HttpError) {
        self.stats.rows_failed += 1;
        self.stats.last_error = Some(error.to_string());
        log::error!("row upload failed: {}", error);
    }

    /// Attach authentication and standard headers
    fn build_request(&self, mut request: ureq::Request) -> ureq::Request {
        match &self.config.auth {
            AuthMethod::None => {}
            AuthMethod::Bearer(token) => {
                request = request.set("Authorization", &format!("Bearer {}", token));
            }
            AuthMethod::Basic { username, password } => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                request = request.set("Authorization", &format!("Basic {}", credentials));
            }
            AuthMethod::ApiKey { header, value } => {
                request = request.set(header, value);
            }
        }

        request
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
    }
}

impl RecordSink<FlowRecord> for HttpSink {
    type Error = HttpError;

    fn submit(&mut self, record: &FlowRecord) -> Result<(), Self::Error> {
        let table = self.config.flow_table.clone();
        self.post_row(&table, &Self::flow_row(record))
    }
}

impl RecordSink<TemperatureRecord> for HttpSink {
    type Error = HttpError;

    fn submit(&mut self, record: &TemperatureRecord) -> Result<(), Self::Error> {
        let table = self.config.temperature_table.clone();
        self.post_row(&table, &Self::temperature_row(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = HttpConfig::new("https://db.example.com/rest/v1")
            .bearer_token("test-token")
            .timeout_secs(60)
            .max_retries(5)
            .tables("flow_rows", "temp_rows");

        assert_eq!(config.base_url, "https://db.example.com/rest/v1");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.flow_table, "flow_rows");
        assert_eq!(config.temperature_table, "temp_rows");

        match config.auth {
            AuthMethod::Bearer(token) => assert_eq!(token, "test-token"),
            _ => panic!("Wrong auth method"),
        }
    }

    #[test]
    fn url_validation() {
        assert!(HttpSink::new(HttpConfig::new("not-a-url")).is_err());
        assert!(HttpSink::new(HttpConfig::new("https://valid.url")).is_ok());
    }

    #[test]
    fn rows_render_iso8601_utc() {
        let record = TemperatureRecord {
            timestamp: 1_700_000_000_000,
            t1: 21.7,
            t2: 22.4,
        };
        let row = HttpSink::temperature_row(&record);

        assert_eq!(row["timestamp"], "2023-11-14T22:13:20+00:00");
        assert_eq!(row["t1"], 21.7f32);
        assert_eq!(row["t2"], 22.4f32);

        let record = FlowRecord {
            timestamp: 0,
            flow: 1.234,
            velocity: 0.87,
        };
        let row = HttpSink::flow_row(&record);
        assert_eq!(row["timestamp"], "1970-01-01T00:00:00+00:00");
        assert_eq!(row["flow"], 1.234f32);
    }
}
