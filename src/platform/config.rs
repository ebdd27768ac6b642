// LogQuery - platform/config.rs
//
// Platform directory resolution and config.toml loading with startup
// validation. Invalid values produce actionable warnings and fall back to
// defaults; the application still starts.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogQuery configuration and exports.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logquery/ or %APPDATA%\LogQuery\config\)
    pub config_dir: PathBuf,

    /// The user's download directory, when the platform has one.
    pub download_dir: Option<PathBuf>,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        let download_dir = UserDirs::new().and_then(|u| u.download_dir().map(Path::to_path_buf));

        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                downloads = ?download_dir,
                "Platform paths resolved"
            );

            Self {
                config_dir,
                download_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
                download_dir,
            }
        }
    }

    /// Location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub api: ApiSection,
    pub export: ExportSection,
    pub ui: UiSection,
    pub logging: LoggingSection,
}

/// `[api]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Base URL the endpoint names are appended to.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Log types offered as tabs, in display order.
    pub log_types: Option<Vec<String>>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Directory the save dialog opens in.
    pub directory: Option<String>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- API --
    pub base_url: String,
    pub timeout_secs: u64,
    pub log_types: Vec<String>,

    // -- Export --
    /// Configured export directory; None means "platform download dir".
    pub export_dir: Option<PathBuf>,

    // -- UI --
    pub dark_mode: bool,

    // -- Logging --
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_types: constants::DEFAULT_LOG_TYPES
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
            export_dir: None,
            dark_mode: true,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load config.toml from `config_dir`.
///
/// A missing file yields defaults with no warnings (first run). An
/// unreadable or unparseable file yields defaults plus a warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match load_config_file(&config_path) {
        Ok(result) => result,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Load and validate an explicit config file. Unlike `load_config`, a
/// missing or malformed file is an error.
pub fn load_config_file(path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), "Loaded config.toml");
    Ok(validate(raw))
}

/// Check that `url` parses as an absolute http(s) URL with a host and strip
/// trailing slashes. `field` names the setting in the error.
pub fn normalise_base_url(field: &str, url: &str) -> Result<String, ConfigError> {
    let url = url.trim();
    let valid = reqwest::Url::parse(url).is_ok_and(|parsed| {
        matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some_and(|h| !h.is_empty())
    });
    if valid {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value: url.to_string(),
            expected: "an http:// or https:// URL with a host".to_string(),
        })
    }
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- API: base_url --
    if let Some(url) = raw.api.base_url {
        match normalise_base_url("[api] base_url", &url) {
            Ok(url) => config.base_url = url,
            Err(e) => warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_API_BASE_URL
            )),
        }
    }

    // -- API: timeout_secs --
    if let Some(secs) = raw.api.timeout_secs {
        if (constants::MIN_REQUEST_TIMEOUT_SECS..=constants::MAX_REQUEST_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.timeout_secs = secs;
        } else {
            warnings.push(format!(
                "[api] timeout_secs = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_REQUEST_TIMEOUT_SECS,
                constants::MAX_REQUEST_TIMEOUT_SECS,
                constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            ));
        }
    }

    // -- API: log_types --
    if let Some(types) = raw.api.log_types {
        let mut cleaned: Vec<String> = Vec::new();
        for t in types {
            let t = t.trim();
            if !t.is_empty() && !cleaned.iter().any(|c| c == t) {
                cleaned.push(t.to_string());
            }
        }
        if cleaned.is_empty() {
            warnings.push(
                "[api] log_types is empty. Using default (error, warning, info).".to_string(),
            );
        } else if cleaned.len() > constants::MAX_LOG_TYPES {
            warnings.push(format!(
                "[api] log_types lists {} types; only the first {} are shown.",
                cleaned.len(),
                constants::MAX_LOG_TYPES,
            ));
            cleaned.truncate(constants::MAX_LOG_TYPES);
            config.log_types = cleaned;
        } else {
            config.log_types = cleaned;
        }
    }

    // -- Export: directory --
    if let Some(dir) = raw.export.directory {
        if !dir.trim().is_empty() {
            config.export_dir = Some(PathBuf::from(dir.trim()));
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                warnings.push(format!(
                    "[ui] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
                ));
            }
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}
