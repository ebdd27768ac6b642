// LogQuery - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Backend client construction
// 4. Headless export (--export) or eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use logquery::app;

pub use logquery::core;
pub use logquery::platform;
pub use logquery::ui;
pub use logquery::util;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Browse, date-filter and export backend logs.
#[derive(Parser, Debug)]
#[command(name = "LogQuery", version, about)]
struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Backend base URL (overrides [api] base_url).
    #[arg(short = 'u', long = "base-url")]
    base_url: Option<String>,

    /// Log type selected at start-up.
    #[arg(short = 't', long = "type")]
    log_type: Option<String>,

    /// Start date (YYYY-MM-DD) for headless export.
    #[arg(long = "start", value_parser = app::controller::parse_cli_date)]
    start: Option<chrono::NaiveDate>,

    /// End date (YYYY-MM-DD) for headless export.
    #[arg(long = "end", value_parser = app::controller::parse_cli_date)]
    end: Option<chrono::NaiveDate>,

    /// Export the filtered logs to this CSV file and exit without a window.
    #[arg(short = 'e', long = "export", requires_all = ["log_type", "start", "end"])]
    export: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging so its level and file apply; warnings
    // are replayed once the subscriber is up.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (mut config, config_warnings) = match cli.config.as_deref() {
        Some(path) => match platform::config::load_config_file(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(2);
            }
        },
        None => platform::config::load_config(&platform_paths.config_dir),
    };

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LogQuery starting"
    );
    for warning in &config_warnings {
        tracing::warn!("Config: {warning}");
    }

    if let Some(url) = cli.base_url.as_deref() {
        match platform::config::normalise_base_url("--base-url", url) {
            Ok(url) => config.base_url = url,
            Err(e) => {
                tracing::error!(error = %e, "Invalid command line");
                eprintln!("Error: {e}");
                std::process::exit(2);
            }
        }
    }
    if let Some(t) = cli.log_type.as_deref() {
        if !config.log_types.iter().any(|lt| lt == t) {
            config.log_types.push(t.to_string());
        }
    }

    let timeout = Duration::from_secs(config.timeout_secs);
    let api = match app::api::HttpLogApi::new(&config.base_url, timeout) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create HTTP client");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(base_url = api.base_url(), timeout_secs = config.timeout_secs, "Backend configured");

    let export_dir = config
        .export_dir
        .clone()
        .or_else(|| platform_paths.download_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let state = app::state::AppState::new(
        config.log_types.clone(),
        cli.log_type.as_deref(),
        export_dir,
        config.dark_mode,
        cli.debug,
    );
    let mut controller = app::controller::QueryController::new(state, Arc::new(api));

    if let (Some(destination), Some(log_type), Some(start), Some(end)) =
        (cli.export, cli.log_type, cli.start, cli.end)
    {
        let opts = app::batch::BatchOptions {
            log_type,
            start,
            end,
            destination,
            // Request timeout plus slack for thread hand-off.
            timeout: timeout + Duration::from_secs(5),
        };
        match app::batch::run_export(&mut controller, &opts) {
            Ok(summary) => {
                println!(
                    "Fetched {} log(s), {} matched. {}",
                    summary.fetched,
                    summary.matched,
                    summary.export.summary()
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Headless export failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    controller.mount();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::LogQueryApp::new(controller)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch LogQuery GUI: {e}");
        std::process::exit(1);
    }
}
