// LogQuery - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Backend endpoint names and the export file contract live here so the
// client and the tests agree on them.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogQuery";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogQuery";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Backend API
// =============================================================================

/// Base URL used when config.toml and the CLI do not provide one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Endpoint returning every record of one log type. Body: `{"type": ...}`.
pub const ENDPOINT_LOGS_BY_TYPE: &str = "logs-types";

/// Endpoint returning the server-side date-filtered subset of a record set.
pub const ENDPOINT_FILTER_BY_DATE: &str = "logsfilter-date";

/// Endpoint turning a record set into a CSV payload.
pub const ENDPOINT_DOWNLOAD: &str = "logs-download";

/// Content type sent with every request body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Minimum configurable request timeout (seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum configurable request timeout (seconds).
/// Ten minutes covers a slow CSV generation on a large filtered set.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Log types shown as tabs when config.toml does not list any.
pub const DEFAULT_LOG_TYPES: &[&str] = &["error", "warning", "info"];

/// Maximum number of log type tabs accepted from configuration.
pub const MAX_LOG_TYPES: usize = 32;

/// Wire format for date-range bounds (matches an HTML date input value).
pub const DATE_WIRE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Export
// =============================================================================

/// File name suggested for downloaded results.
pub const EXPORT_FILE_NAME: &str = "logs.csv";

/// MIME type of the downloaded payload.
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Extension used by the save dialog filter.
pub const EXPORT_FILE_EXTENSION: &str = "csv";

// =============================================================================
// UI
// =============================================================================

/// Number of skeleton rows drawn while the unfiltered fetch is loading.
pub const LOADING_PLACEHOLDER_ROWS: usize = 6;

/// Maximum number of API events applied per UI frame. Remaining events stay
/// in the channel for the next frame.
pub const MAX_API_MESSAGES_PER_FRAME: usize = 50;

/// Repaint cadence while any request is in flight (ms).
pub const PENDING_REPAINT_INTERVAL_MS: u64 = 100;

/// Characters of the `info` field shown in a table cell before truncation.
pub const INFO_PREVIEW_CHARS: usize = 80;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
