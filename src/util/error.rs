// LogQuery - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every backend call, validation gap, export and config failure has a
// variant here; nothing is reported as a bare string or discarded.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogQuery operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogQueryError {
    /// A backend request failed.
    Api(ApiError),

    /// A user action was attempted while its preconditions were not met.
    Query(QueryError),

    /// Saving an export failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for LogQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {e}"),
            Self::Query(e) => write!(f, "Action not available: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for LogQueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Query(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// API errors
// ---------------------------------------------------------------------------

/// Errors produced while talking to the backend log API.
#[derive(Debug)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    Client { source: reqwest::Error },

    /// The request was rejected before a response arrived (DNS, connect,
    /// reset, TLS).
    Network {
        endpoint: &'static str,
        source: reqwest::Error,
    },

    /// No response within the configured timeout.
    Timeout {
        endpoint: &'static str,
        timeout_secs: u64,
    },

    /// The backend answered with a non-success status.
    Status { endpoint: &'static str, status: u16 },

    /// The response body was not the expected JSON shape.
    Decode {
        endpoint: &'static str,
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Endpoint the failed request targeted (None for client construction).
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Client { .. } => None,
            Self::Network { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(endpoint),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client { source } => write!(f, "Cannot create HTTP client: {source}"),
            Self::Network { endpoint, source } => {
                write!(f, "Request to '{endpoint}' failed: {source}")
            }
            Self::Timeout {
                endpoint,
                timeout_secs,
            } => write!(
                f,
                "Request to '{endpoint}' timed out after {timeout_secs}s. \
                 Increase [api] timeout_secs in config or check the backend."
            ),
            Self::Status { endpoint, status } => {
                write!(f, "'{endpoint}' returned HTTP {status}")
            }
            Self::Decode { endpoint, source } => {
                write!(f, "'{endpoint}' returned an unexpected body: {source}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client { source } => Some(source),
            Self::Network { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ApiError> for LogQueryError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

// ---------------------------------------------------------------------------
// Query (validation) errors
// ---------------------------------------------------------------------------

/// A user action whose preconditions are not met.
///
/// The UI disables the corresponding controls; handlers return these
/// instead of issuing a request when reached anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Filtering needs both a start and an end date.
    DateRangeIncomplete,

    /// The unfiltered fetch for the selected type has not produced records yet.
    RecordsUnavailable { log_type: String },

    /// A request of the same kind is already in flight.
    RequestPending { action: &'static str },

    /// Export is only meaningful on a filtered result set.
    NotFiltered,

    /// The filtered result set is empty.
    NothingToExport,

    /// The requested log type is not one of the configured tabs.
    UnknownLogType { log_type: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateRangeIncomplete => {
                write!(f, "both a start date and an end date are required")
            }
            Self::RecordsUnavailable { log_type } => {
                write!(f, "'{log_type}' logs have not been loaded yet")
            }
            Self::RequestPending { action } => {
                write!(f, "a {action} request is already in progress")
            }
            Self::NotFiltered => write!(f, "apply a date filter before downloading"),
            Self::NothingToExport => write!(f, "the filtered result set is empty"),
            Self::UnknownLogType { log_type } => {
                write!(f, "log type '{log_type}' is not configured")
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl From<QueryError> for LogQueryError {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to saving a downloaded export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// The payload could not be read as CSV.
    Csv { source: csv::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Cannot write '{}': {source}", path.display())
            }
            Self::Csv { source } => write!(f, "Downloaded payload is not valid CSV: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source } => Some(source),
        }
    }
}

impl From<ExportError> for LogQueryError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogQueryError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogQuery results.
pub type Result<T> = std::result::Result<T, LogQueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_endpoint_and_limit() {
        let e = ApiError::Timeout {
            endpoint: "logs-types",
            timeout_secs: 30,
        };
        let msg = e.to_string();
        assert!(msg.contains("logs-types"));
        assert!(msg.contains("30s"));
        assert_eq!(e.endpoint(), Some("logs-types"));
    }

    #[test]
    fn test_query_error_wraps_into_top_level() {
        let top: LogQueryError = QueryError::NothingToExport.into();
        assert!(matches!(top, LogQueryError::Query(QueryError::NothingToExport)));
        assert!(std::error::Error::source(&top).is_some());
    }

    #[test]
    fn test_config_range_error_display() {
        let e = ConfigError::ValueOutOfRange {
            field: "api.timeout_secs".to_string(),
            value: "0".to_string(),
            expected: "1-600".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Config 'api.timeout_secs' = '0' is out of range. Expected: 1-600"
        );
    }
}
