// LogQuery - app/batch.rs
//
// Headless export: fetch one log type, filter it by date and save the CSV
// without opening a window. Drives the same controller the GUI uses.

use crate::app::controller::QueryController;
use crate::app::export::ExportOutcome;
use crate::core::model::{DateRange, QueryMode};
use crate::util::constants::{ENDPOINT_DOWNLOAD, ENDPOINT_FILTER_BY_DATE, ENDPOINT_LOGS_BY_TYPE};
use crate::util::error::{ApiError, QueryError, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

/// Inputs for one headless export.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub log_type: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub destination: PathBuf,
    /// Upper bound for each stage.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub fetched: usize,
    pub matched: usize,
    pub export: ExportOutcome,
}

/// Run fetch, filter and export in sequence, failing on the first error.
pub fn run_export(
    controller: &mut QueryController,
    opts: &BatchOptions,
) -> Result<BatchSummary> {
    tracing::info!(
        log_type = %opts.log_type,
        start = %opts.start,
        end = %opts.end,
        destination = %opts.destination.display(),
        "Starting headless export"
    );

    controller.select_log_type(&opts.log_type)?;
    settle(controller, opts.timeout, ENDPOINT_LOGS_BY_TYPE)?;
    let Some(fetched) = controller.state.records().map(<[_]>::len) else {
        return Err(controller.state.last_error.take().unwrap_or_else(|| {
            QueryError::RecordsUnavailable {
                log_type: opts.log_type.clone(),
            }
            .into()
        }));
    };

    controller.set_date_range(DateRange::new(Some(opts.start), Some(opts.end)));
    controller.apply_filter()?;
    settle(controller, opts.timeout, ENDPOINT_FILTER_BY_DATE)?;
    if let Some(e) = controller.state.last_error.take() {
        return Err(e);
    }
    if controller.state.query.mode() != QueryMode::Filtered {
        return Err(QueryError::NotFiltered.into());
    }
    let matched = controller.state.query.filtered_results().len();
    if matched == 0 {
        return Err(QueryError::NothingToExport.into());
    }

    controller.export_to(opts.destination.clone())?;
    settle(controller, opts.timeout, ENDPOINT_DOWNLOAD)?;
    if let Some(e) = controller.state.last_error.take() {
        return Err(e);
    }
    let export = controller
        .state
        .last_export
        .clone()
        .ok_or(QueryError::NothingToExport)?;

    Ok(BatchSummary {
        fetched,
        matched,
        export,
    })
}

fn settle(
    controller: &mut QueryController,
    timeout: Duration,
    endpoint: &'static str,
) -> Result<()> {
    if controller.pump_until_idle(timeout) {
        Ok(())
    } else {
        Err(ApiError::Timeout {
            endpoint,
            timeout_secs: timeout.as_secs(),
        }
        .into())
    }
}
