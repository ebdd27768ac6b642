// LogQuery - app/state.rs
//
// Application state for the log query view: query state machine, fetch
// cache, detail dialog, form buffers and user-facing status.
// Owned by the controller; mutated by user intents and by `apply_event`.

use crate::app::export::ExportOutcome;
use crate::app::requests::ApiEvent;
use crate::core::dialog::DialogState;
use crate::core::fetch::{FetchCache, FetchView};
use crate::core::model::{parse_date_input, DateRange, LogRecord, QueryMode};
use crate::core::query::QueryState;
use crate::core::render::{self, RenderState};
use crate::util::error::LogQueryError;
use std::path::PathBuf;

/// Top-level view state.
#[derive(Debug)]
pub struct AppState {
    /// Log types offered as tabs, in display order.
    pub log_types: Vec<String>,

    pub query: QueryState,
    pub fetch: FetchCache,
    pub dialog: DialogState,

    /// Raw text of the start/end date inputs.
    pub start_input: String,
    pub end_input: String,

    /// Status message for the status bar.
    pub status_message: String,

    /// Most recent failure, shown until dismissed or superseded.
    pub last_error: Option<LogQueryError>,

    /// Most recent successful export.
    pub last_export: Option<ExportOutcome>,

    /// Directory the save dialog starts in.
    pub export_dir: PathBuf,

    pub dark_mode: bool,
    pub debug_mode: bool,
}

impl AppState {
    /// Create the view state. `log_types` must be non-empty; the initial
    /// selection is `initial_type` when it is one of them, else the first.
    pub fn new(
        log_types: Vec<String>,
        initial_type: Option<&str>,
        export_dir: PathBuf,
        dark_mode: bool,
        debug_mode: bool,
    ) -> Self {
        let selected = initial_type
            .filter(|t| log_types.iter().any(|lt| lt == t))
            .map(str::to_string)
            .or_else(|| log_types.first().cloned())
            .unwrap_or_default();

        Self {
            log_types,
            query: QueryState::new(selected),
            fetch: FetchCache::new(),
            dialog: DialogState::new(),
            start_input: String::new(),
            end_input: String::new(),
            status_message: "Ready.".to_string(),
            last_error: None,
            last_export: None,
            export_dir,
            dark_mode,
            debug_mode,
        }
    }

    pub fn selected_log_type(&self) -> &str {
        self.query.selected_log_type()
    }

    /// Fetch state of the selected type.
    pub fn fetch_view(&self) -> FetchView<'_> {
        self.fetch.view(self.query.selected_log_type())
    }

    /// Unfiltered records of the selected type, once fetched.
    pub fn records(&self) -> Option<&[LogRecord]> {
        self.fetch.records(self.query.selected_log_type())
    }

    pub fn render_state(&self) -> RenderState<'_> {
        render::select(&self.query, self.fetch_view())
    }

    /// Re-parse the date input buffers into the query's date range.
    pub fn sync_date_inputs(&mut self) {
        let range = DateRange::new(
            parse_date_input(&self.start_input),
            parse_date_input(&self.end_input),
        );
        self.query.set_date_range(range);
    }

    pub fn can_apply_filter(&self) -> bool {
        self.query.can_apply_filter(self.records())
    }

    pub fn can_export(&self) -> bool {
        self.query.can_export()
    }

    /// Whether the clear button is worth enabling. Clearing itself is
    /// always permitted.
    pub fn can_clear(&self) -> bool {
        !self.start_input.trim().is_empty()
            || !self.end_input.trim().is_empty()
            || self.query.mode() == QueryMode::Filtered
    }

    /// Any request the user is waiting on.
    pub fn is_busy(&self) -> bool {
        self.fetch_view().in_flight || self.query.is_filter_pending() || self.query.is_export_pending()
    }

    fn report_error(&mut self, context: &str, error: LogQueryError) {
        tracing::warn!(error = %error, "{context}");
        self.status_message = format!("{context}: {error}");
        self.last_error = Some(error);
    }

    /// Apply one finished request to the state. Superseded responses are
    /// dropped here.
    pub fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::LogsFetched {
                ticket,
                result,
                elapsed,
            } => {
                let current = ticket.log_type == self.query.selected_log_type();
                match result {
                    Ok(records) => {
                        let count = records.len();
                        if !self.fetch.complete(&ticket, records) {
                            tracing::debug!(log_type = %ticket.log_type, seq = ticket.seq, "Discarded stale fetch");
                            return;
                        }
                        tracing::info!(
                            log_type = %ticket.log_type,
                            records = count,
                            elapsed_ms = elapsed.as_millis() as u64,
                            current,
                            "Logs fetched"
                        );
                        if current {
                            self.status_message =
                                format!("Loaded {count} '{}' log(s).", ticket.log_type);
                        }
                    }
                    Err(e) => {
                        if !self.fetch.fail(&ticket, e.to_string()) {
                            return;
                        }
                        if current {
                            self.report_error("Loading logs failed", e.into());
                        } else {
                            tracing::debug!(
                                log_type = %ticket.log_type,
                                endpoint = e.endpoint().unwrap_or("-"),
                                error = %e,
                                "Background fetch failed"
                            );
                        }
                    }
                }
            }

            ApiEvent::LogsFiltered {
                ticket,
                result,
                elapsed,
            } => match result {
                Ok(records) => {
                    let count = records.len();
                    if !self.query.complete_filter(ticket, records) {
                        tracing::debug!(generation = ticket.generation, "Discarded superseded filter response");
                        return;
                    }
                    tracing::info!(
                        results = count,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Filter applied"
                    );
                    self.status_message = format!("Filter matched {count} log(s).");
                }
                Err(e) => {
                    if self.query.fail_filter(ticket) {
                        self.report_error("Filtering failed", e.into());
                    }
                }
            },

            ApiEvent::LogsDownloaded {
                ticket,
                destination,
                result,
                elapsed,
            } => {
                if !self.query.finish_export(ticket) {
                    return;
                }
                tracing::debug!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    destination = %destination.display(),
                    "Download finished"
                );
                match result {
                    Ok(outcome) => {
                        self.status_message = outcome.summary();
                        self.last_export = Some(outcome);
                    }
                    Err(e) => self.report_error("Download failed", e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::FilterTicket;
    use crate::util::error::ApiError;
    use std::time::Duration;

    fn record(id: &str) -> LogRecord {
        serde_json::from_value(serde_json::json!({ "_id": id })).unwrap()
    }

    fn state() -> AppState {
        AppState::new(
            vec!["error".to_string(), "info".to_string()],
            None,
            PathBuf::from("."),
            true,
            false,
        )
    }

    fn fetched(state: &mut AppState, records: Vec<LogRecord>) {
        let log_type = state.selected_log_type().to_string();
        let ticket = state.fetch.revalidate(&log_type).unwrap();
        state.apply_event(ApiEvent::LogsFetched {
            ticket,
            result: Ok(records),
            elapsed: Duration::ZERO,
        });
    }

    #[test]
    fn test_initial_type_must_be_configured() {
        let s = AppState::new(
            vec!["error".to_string(), "info".to_string()],
            Some("info"),
            PathBuf::from("."),
            true,
            false,
        );
        assert_eq!(s.selected_log_type(), "info");

        let s = AppState::new(
            vec!["error".to_string()],
            Some("bogus"),
            PathBuf::from("."),
            true,
            false,
        );
        assert_eq!(s.selected_log_type(), "error");
    }

    #[test]
    fn test_date_inputs_drive_filter_enablement() {
        let mut s = state();
        fetched(&mut s, vec![record("a")]);
        s.start_input = "2024-01-01".to_string();
        s.sync_date_inputs();
        assert!(!s.can_apply_filter());
        assert!(s.can_clear());

        s.end_input = "2024-01-31".to_string();
        s.sync_date_inputs();
        assert!(s.can_apply_filter());

        s.end_input = "not a date".to_string();
        s.sync_date_inputs();
        assert!(!s.can_apply_filter());
    }

    #[test]
    fn test_fetch_failure_surfaces_error() {
        let mut s = state();
        let ticket = s.fetch.revalidate("error").unwrap();
        s.apply_event(ApiEvent::LogsFetched {
            ticket,
            result: Err(ApiError::Status {
                endpoint: "logs-types",
                status: 502,
            }),
            elapsed: Duration::ZERO,
        });
        assert!(matches!(s.render_state(), RenderState::FetchFailed { .. }));
        assert!(s.last_error.is_some());
        assert!(s.status_message.contains("502"));
    }

    #[test]
    fn test_background_type_failure_not_reported() {
        let mut s = state();
        let ticket = s.fetch.revalidate("info").unwrap();
        s.apply_event(ApiEvent::LogsFetched {
            ticket,
            result: Err(ApiError::Status {
                endpoint: "logs-types",
                status: 500,
            }),
            elapsed: Duration::ZERO,
        });
        assert!(s.last_error.is_none());
        assert_eq!(s.fetch.view("info").error.map(|e| e.contains("500")), Some(true));
    }

    #[test]
    fn test_filter_response_switches_render_state() {
        let mut s = state();
        fetched(&mut s, vec![record("a"), record("b")]);
        s.start_input = "2024-01-01".to_string();
        s.end_input = "2024-01-31".to_string();
        s.sync_date_inputs();
        let records = s.records().map(<[LogRecord]>::to_vec);
        let req = s.query.begin_filter(records).unwrap();

        s.apply_event(ApiEvent::LogsFiltered {
            ticket: req.ticket,
            result: Ok(vec![record("a")]),
            elapsed: Duration::ZERO,
        });
        assert_eq!(s.render_state().label(), "filtered-results");
        assert!(s.can_export());
    }

    #[test]
    fn test_unknown_filter_ticket_ignored() {
        let mut s = state();
        s.apply_event(ApiEvent::LogsFiltered {
            ticket: FilterTicket { generation: 99 },
            result: Ok(vec![record("a")]),
            elapsed: Duration::ZERO,
        });
        assert_eq!(s.query.mode(), QueryMode::Unfiltered);
    }

    fn pending_export(s: &mut AppState) -> crate::core::model::ExportRequest {
        fetched(s, vec![record("a")]);
        s.start_input = "2024-01-01".to_string();
        s.end_input = "2024-01-31".to_string();
        s.sync_date_inputs();
        let records = s.records().map(<[LogRecord]>::to_vec);
        let req = s.query.begin_filter(records).unwrap();
        s.query.complete_filter(req.ticket, vec![record("a")]);
        s.query.begin_export(PathBuf::from("logs.csv")).unwrap()
    }

    #[test]
    fn test_saved_download_recorded_without_touching_disk() {
        let mut s = state();
        let req = pending_export(&mut s);
        let outcome = ExportOutcome {
            path: req.destination.clone(),
            bytes: 12,
            rows: Some(1),
        };
        s.apply_event(ApiEvent::LogsDownloaded {
            ticket: req.ticket,
            destination: req.destination,
            result: Ok(outcome.clone()),
            elapsed: Duration::ZERO,
        });
        assert_eq!(s.last_export, Some(outcome));
        assert!(!s.query.is_export_pending());
        assert!(s.status_message.starts_with("Saved 1 rows"));
    }

    #[test]
    fn test_failed_download_reported() {
        let mut s = state();
        let req = pending_export(&mut s);
        s.apply_event(ApiEvent::LogsDownloaded {
            ticket: req.ticket,
            destination: req.destination,
            result: Err(ApiError::Timeout {
                endpoint: "logs-download",
                timeout_secs: 30,
            }
            .into()),
            elapsed: Duration::ZERO,
        });
        assert!(s.last_export.is_none());
        assert!(s.last_error.is_some());
        assert!(s.can_export());
    }
}
