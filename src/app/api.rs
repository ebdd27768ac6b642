// LogQuery - app/api.rs
//
// Client for the backend log API. Three POST endpoints, all taking and
// returning JSON except the download, which returns a CSV payload:
//
//   POST {base}/logs-types       {"type": T}                        -> [LogRecord]
//   POST {base}/logsfilter-date  {"startDate","endDate","logs"}     -> [LogRecord]
//   POST {base}/logs-download    {"logs": [...]}                    -> text/csv
//
// `LogApi` is the seam the request manager runs against, so the state
// machines can be exercised without a server. `HttpLogApi` is the real
// implementation (blocking reqwest, called from background threads only).

use crate::core::model::{format_wire_date, LogRecord};
use crate::util::constants::{
    CONTENT_TYPE_JSON, ENDPOINT_DOWNLOAD, ENDPOINT_FILTER_BY_DATE, ENDPOINT_LOGS_BY_TYPE,
    EXPORT_MIME_TYPE,
};
use crate::util::error::ApiError;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Backend operations used by the log query view.
pub trait LogApi: Send + Sync {
    /// All records of one log type.
    fn logs_by_type(&self, log_type: &str) -> Result<Vec<LogRecord>, ApiError>;

    /// Server-side date filtering of `logs`. The response is authoritative.
    fn filter_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        logs: &[LogRecord],
    ) -> Result<Vec<LogRecord>, ApiError>;

    /// CSV rendering of `logs`.
    fn download(&self, logs: &[LogRecord]) -> Result<Vec<u8>, ApiError>;
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Serialize)]
struct LogsByTypeBody<'a> {
    #[serde(rename = "type")]
    log_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterByDateBody<'a> {
    start_date: String,
    end_date: String,
    logs: &'a [LogRecord],
}

#[derive(Debug, Serialize)]
struct DownloadBody<'a> {
    logs: &'a [LogRecord],
}

// =============================================================================
// HTTP implementation
// =============================================================================

/// `LogApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLogApi {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpLogApi {
    /// Build a client for `base_url` (trailing slashes ignored). Every request
    /// is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client { source: e })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of `endpoint`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    fn classify(&self, endpoint: &'static str, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout {
                endpoint,
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            ApiError::Network {
                endpoint,
                source: e,
            }
        }
    }

    /// POST `body` as JSON and return the raw response body.
    fn post<B: Serialize>(
        &self,
        endpoint: &'static str,
        body: &B,
        accept: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint_url(endpoint))
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(ACCEPT, accept)
            .json(body)
            .send()
            .map_err(|e| self.classify(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "Backend returned an error status");
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| self.classify(endpoint, e))?;

        tracing::debug!(
            endpoint,
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request complete"
        );
        Ok(bytes.to_vec())
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<T, ApiError> {
        let bytes = self.post(endpoint, body, CONTENT_TYPE_JSON)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            endpoint,
            source: e,
        })
    }
}

impl LogApi for HttpLogApi {
    fn logs_by_type(&self, log_type: &str) -> Result<Vec<LogRecord>, ApiError> {
        self.post_json(ENDPOINT_LOGS_BY_TYPE, &LogsByTypeBody { log_type })
    }

    fn filter_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        logs: &[LogRecord],
    ) -> Result<Vec<LogRecord>, ApiError> {
        let body = FilterByDateBody {
            start_date: format_wire_date(start),
            end_date: format_wire_date(end),
            logs,
        };
        self.post_json(ENDPOINT_FILTER_BY_DATE, &body)
    }

    fn download(&self, logs: &[LogRecord]) -> Result<Vec<u8>, ApiError> {
        self.post(ENDPOINT_DOWNLOAD, &DownloadBody { logs }, EXPORT_MIME_TYPE)
    }
}
