// LogQuery - app/controller.rs
//
// User intents for the log query view. Each intent checks its
// preconditions against `AppState`, updates the state machines and hands
// any backend work to the `RequestManager`. Results come back through
// `pump`, which the UI calls once per frame.

use crate::app::api::LogApi;
use crate::app::requests::RequestManager;
use crate::app::state::AppState;
use crate::core::model::{parse_date_input, DateRange, LogRecord};
use crate::util::constants::MAX_API_MESSAGES_PER_FRAME;
use crate::util::error::{LogQueryError, QueryError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct QueryController {
    pub state: AppState,
    requests: RequestManager,
}

impl QueryController {
    pub fn new(state: AppState, api: Arc<dyn LogApi>) -> Self {
        Self {
            state,
            requests: RequestManager::new(api),
        }
    }

    /// Load the initially selected type.
    pub fn mount(&mut self) {
        let log_type = self.state.selected_log_type().to_string();
        self.revalidate(&log_type);
    }

    fn revalidate(&mut self, log_type: &str) {
        match self.state.fetch.revalidate(log_type) {
            Some(ticket) => self.requests.fetch_logs(ticket),
            None => tracing::debug!(log_type, "Fetch already in flight"),
        }
    }

    fn reject(&mut self, error: QueryError) -> LogQueryError {
        tracing::debug!(error = %error, "Action rejected");
        self.state.status_message = format!("{error}.");
        error.into()
    }

    // -------------------------------------------------------------------------
    // Log type
    // -------------------------------------------------------------------------

    /// Switch tabs. Cached records show immediately while the type is
    /// refetched in the background.
    pub fn select_log_type(&mut self, log_type: &str) -> Result<(), LogQueryError> {
        if !self.state.log_types.iter().any(|t| t == log_type) {
            return Err(self.reject(QueryError::UnknownLogType {
                log_type: log_type.to_string(),
            }));
        }
        if log_type != self.state.selected_log_type() {
            tracing::info!(log_type, "Log type selected");
            self.state.query.select_log_type(log_type);
            self.state.dialog.close();
        }
        self.revalidate(log_type);
        Ok(())
    }

    /// Refetch the selected type after a failure.
    pub fn retry_fetch(&mut self) {
        let log_type = self.state.selected_log_type().to_string();
        self.state.last_error = None;
        self.revalidate(&log_type);
    }

    // -------------------------------------------------------------------------
    // Date filter
    // -------------------------------------------------------------------------

    /// Replace the date input text and re-derive the date range.
    pub fn set_date_inputs(&mut self, start: &str, end: &str) {
        self.state.start_input = start.to_string();
        self.state.end_input = end.to_string();
        self.state.sync_date_inputs();
    }

    /// Set the date range directly, keeping the input text in step.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.state.start_input = range.start.map(|d| d.to_string()).unwrap_or_default();
        self.state.end_input = range.end.map(|d| d.to_string()).unwrap_or_default();
        self.state.query.set_date_range(range);
    }

    /// Submit the date filter for the selected type's records.
    pub fn apply_filter(&mut self) -> Result<(), LogQueryError> {
        self.state.sync_date_inputs();
        let records = self.state.records().map(<[LogRecord]>::to_vec);
        let request = match self.state.query.begin_filter(records) {
            Ok(request) => request,
            Err(e) => return Err(self.reject(e)),
        };
        self.state.status_message = "Filtering...".to_string();
        self.requests.filter_logs(request);
        Ok(())
    }

    /// Clear both dates and return to the unfiltered view.
    pub fn clear_filter(&mut self) {
        self.state.start_input.clear();
        self.state.end_input.clear();
        self.state.query.clear_filter();
        self.state.status_message = "Filter cleared.".to_string();
        tracing::info!("Date filter cleared");
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Download the filtered results as CSV into `destination`.
    pub fn export_to(&mut self, destination: PathBuf) -> Result<(), LogQueryError> {
        let request = match self.state.query.begin_export(destination) {
            Ok(request) => request,
            Err(e) => return Err(self.reject(e)),
        };
        if let Some(dir) = request.destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.state.export_dir = dir.to_path_buf();
        }
        self.state.status_message = "Downloading...".to_string();
        self.requests.download_logs(request);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Detail dialog
    // -------------------------------------------------------------------------

    pub fn view_details(&mut self, record: &LogRecord) {
        self.state.dialog.open(record.clone());
    }

    pub fn close_details(&mut self) {
        self.state.dialog.close();
    }

    // -------------------------------------------------------------------------
    // Event pump
    // -------------------------------------------------------------------------

    /// Apply finished requests, at most a frame's worth. Returns the number
    /// of events applied.
    pub fn pump(&mut self) -> usize {
        let events = self.requests.poll_events(MAX_API_MESSAGES_PER_FRAME);
        let n = events.len();
        for event in events {
            self.state.apply_event(event);
        }
        n
    }

    /// Block until no request is outstanding or `timeout` passes.
    /// Returns true when idle.
    pub fn pump_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.requests.outstanding() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            if let Some(event) = self.requests.wait_event(remaining) {
                self.state.apply_event(event);
            }
        }
        true
    }

    /// Whether any dispatched request has not reported back.
    pub fn is_busy(&self) -> bool {
        self.requests.outstanding() > 0
    }
}

/// Parse a date typed on the command line.
pub fn parse_cli_date(input: &str) -> Result<chrono::NaiveDate, String> {
    parse_date_input(input).ok_or_else(|| format!("'{input}' is not a valid YYYY-MM-DD date"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::ApiError;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// In-memory backend that records every call.
    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<String>>,
    }

    fn record(id: &str, date: &str) -> LogRecord {
        serde_json::from_value(serde_json::json!({ "_id": id, "date": date })).unwrap()
    }

    impl LogApi for FakeApi {
        fn logs_by_type(&self, log_type: &str) -> Result<Vec<LogRecord>, ApiError> {
            self.calls.lock().unwrap().push(format!("type:{log_type}"));
            Ok(vec![
                record("a", "2024-01-05T10:00:00Z"),
                record("b", "2024-03-01T10:00:00Z"),
            ])
        }

        fn filter_by_date(
            &self,
            start: NaiveDate,
            end: NaiveDate,
            logs: &[LogRecord],
        ) -> Result<Vec<LogRecord>, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("filter:{start}..{end}:{}", logs.len()));
            Ok(logs
                .iter()
                .filter(|r| {
                    r.timestamp()
                        .map(|t| t.date_naive() >= start && t.date_naive() <= end)
                        .unwrap_or(false)
                })
                .cloned()
                .collect())
        }

        fn download(&self, logs: &[LogRecord]) -> Result<Vec<u8>, ApiError> {
            self.calls.lock().unwrap().push(format!("download:{}", logs.len()));
            let mut out = b"_id\n".to_vec();
            for r in logs {
                out.extend_from_slice(r.id.as_bytes());
                out.push(b'\n');
            }
            Ok(out)
        }
    }

    fn controller(api: Arc<FakeApi>) -> QueryController {
        let state = AppState::new(
            vec!["error".to_string(), "info".to_string()],
            None,
            PathBuf::from("."),
            true,
            false,
        );
        QueryController::new(state, api)
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_unknown_log_type_rejected() {
        let mut c = controller(Arc::new(FakeApi::default()));
        let err = c.select_log_type("debug").unwrap_err();
        assert!(matches!(
            err,
            LogQueryError::Query(QueryError::UnknownLogType { .. })
        ));
        assert!(!c.is_busy());
    }

    #[test]
    fn test_filter_before_records_rejected() {
        let mut c = controller(Arc::new(FakeApi::default()));
        c.set_date_inputs("2024-01-01", "2024-01-31");
        let err = c.apply_filter().unwrap_err();
        assert!(matches!(
            err,
            LogQueryError::Query(QueryError::RecordsUnavailable { .. })
        ));
    }

    #[test]
    fn test_mount_filter_export_flow() {
        let api = Arc::new(FakeApi::default());
        let mut c = controller(Arc::clone(&api));
        c.mount();
        assert!(c.pump_until_idle(WAIT));
        assert_eq!(c.state.records().map(<[LogRecord]>::len), Some(2));

        c.set_date_inputs("2024-01-01", "2024-01-31");
        c.apply_filter().unwrap();
        assert!(c.pump_until_idle(WAIT));
        assert_eq!(c.state.render_state().label(), "filtered-results");
        assert_eq!(c.state.query.filtered_results().len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("logs.csv");
        c.export_to(dest.clone()).unwrap();
        assert!(c.pump_until_idle(WAIT));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "_id\na\n");
        assert_eq!(c.state.last_export.as_ref().and_then(|o| o.rows), Some(1));
        assert_eq!(c.state.export_dir, dir.path());

        let calls = api.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "type:error".to_string(),
                "filter:2024-01-01..2024-01-31:2".to_string(),
                "download:1".to_string(),
            ]
        );
    }

    #[test]
    fn test_export_requires_filtered_results() {
        let mut c = controller(Arc::new(FakeApi::default()));
        c.mount();
        assert!(c.pump_until_idle(WAIT));
        let err = c.export_to(PathBuf::from("logs.csv")).unwrap_err();
        assert!(matches!(err, LogQueryError::Query(QueryError::NotFiltered)));
    }

    #[test]
    fn test_clear_returns_to_unfiltered() {
        let mut c = controller(Arc::new(FakeApi::default()));
        c.mount();
        assert!(c.pump_until_idle(WAIT));
        c.set_date_inputs("2024-01-01", "2024-12-31");
        c.apply_filter().unwrap();
        assert!(c.pump_until_idle(WAIT));

        c.clear_filter();
        assert!(c.state.start_input.is_empty());
        assert!(c.state.query.date_range().is_empty());
        assert_eq!(c.state.render_state().label(), "unfiltered-results");
    }

    #[test]
    fn test_switching_type_closes_dialog_and_refetches() {
        let api = Arc::new(FakeApi::default());
        let mut c = controller(Arc::clone(&api));
        c.mount();
        assert!(c.pump_until_idle(WAIT));
        let first = c.state.records().unwrap()[0].clone();
        c.view_details(&first);
        assert!(c.state.dialog.is_open());

        c.select_log_type("info").unwrap();
        assert!(!c.state.dialog.is_open());
        assert_eq!(c.state.render_state().label(), "loading");
        assert!(c.pump_until_idle(WAIT));
        assert_eq!(c.state.render_state().label(), "unfiltered-results");
        assert!(api.calls.lock().unwrap().contains(&"type:info".to_string()));
    }

    #[test]
    fn test_set_date_range_updates_inputs() {
        let mut c = controller(Arc::new(FakeApi::default()));
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        c.set_date_range(DateRange::new(Some(d), None));
        assert_eq!(c.state.start_input, "2024-02-29");
        assert!(c.state.end_input.is_empty());
        assert!(!c.state.query.date_range().is_complete());
    }

    #[test]
    fn test_parse_cli_date() {
        assert!(parse_cli_date("2024-01-31").is_ok());
        assert!(parse_cli_date("31/01/2024").is_err());
    }
}
