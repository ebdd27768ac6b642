// LogQuery - app/requests.rs
//
// Backend request lifecycle. Each request runs on its own short-lived
// background thread and reports back to the UI thread over an mpsc channel.
//
// Architecture:
//   - `RequestManager` lives on the UI thread; workers only hold a Sender.
//   - Every event carries the ticket it was issued with; the state machines
//     decide whether the response is still current.
//   - Requests are never cancelled. A superseded response is delivered and
//     then discarded by ticket comparison.
//   - Timeouts are enforced by the HTTP client, so every worker eventually
//     reports.
//   - A download worker also writes the payload to disk, keeping file I/O
//     off the UI thread.

use crate::app::api::LogApi;
use crate::app::export::{save_export, ExportOutcome};
use crate::core::model::{
    ExportRequest, ExportTicket, FetchTicket, FilterRequest, FilterTicket, LogRecord,
};
use crate::util::error::{ApiError, LogQueryError};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Results sent from request threads to the UI thread.
#[derive(Debug)]
pub enum ApiEvent {
    /// Unfiltered fetch for one log type finished.
    LogsFetched {
        ticket: FetchTicket,
        result: Result<Vec<LogRecord>, ApiError>,
        elapsed: Duration,
    },

    /// Date filter request finished.
    LogsFiltered {
        ticket: FilterTicket,
        result: Result<Vec<LogRecord>, ApiError>,
        elapsed: Duration,
    },

    /// Download request finished and, on success, the file was saved.
    LogsDownloaded {
        ticket: ExportTicket,
        destination: PathBuf,
        result: Result<ExportOutcome, LogQueryError>,
        elapsed: Duration,
    },
}

/// Dispatches backend requests onto background threads.
pub struct RequestManager {
    api: Arc<dyn LogApi>,
    tx: mpsc::Sender<ApiEvent>,
    rx: mpsc::Receiver<ApiEvent>,

    /// Requests dispatched whose event has not been received yet.
    outstanding: usize,
}

impl RequestManager {
    pub fn new(api: Arc<dyn LogApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api,
            tx,
            rx,
            outstanding: 0,
        }
    }

    /// Number of requests whose result has not been collected.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Fetch all records of `ticket.log_type`.
    pub fn fetch_logs(&mut self, ticket: FetchTicket) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.outstanding += 1;

        tracing::info!(log_type = %ticket.log_type, seq = ticket.seq, "Fetching logs");

        std::thread::spawn(move || {
            let started = Instant::now();
            let result = api.logs_by_type(&ticket.log_type);
            // Receiver dropped means the UI closed; nothing left to inform.
            let _ = tx.send(ApiEvent::LogsFetched {
                ticket,
                result,
                elapsed: started.elapsed(),
            });
        });
    }

    /// Ask the backend for the date-filtered subset captured in `request`.
    pub fn filter_logs(&mut self, request: FilterRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.outstanding += 1;

        tracing::info!(
            start = %request.start,
            end = %request.end,
            records = request.logs.len(),
            generation = request.ticket.generation,
            "Filtering logs by date"
        );

        std::thread::spawn(move || {
            let started = Instant::now();
            let result = api.filter_by_date(request.start, request.end, &request.logs);
            let _ = tx.send(ApiEvent::LogsFiltered {
                ticket: request.ticket,
                result,
                elapsed: started.elapsed(),
            });
        });
    }

    /// Ask the backend to render `request.logs` as CSV and save it to
    /// `request.destination`.
    pub fn download_logs(&mut self, request: ExportRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.outstanding += 1;

        tracing::info!(
            records = request.logs.len(),
            destination = %request.destination.display(),
            "Downloading filtered logs"
        );

        std::thread::spawn(move || {
            let started = Instant::now();
            let result = api
                .download(&request.logs)
                .map_err(LogQueryError::from)
                .and_then(|payload| {
                    save_export(&request.destination, &payload).map_err(LogQueryError::from)
                });
            let _ = tx.send(ApiEvent::LogsDownloaded {
                ticket: request.ticket,
                destination: request.destination,
                result,
                elapsed: started.elapsed(),
            });
        });
    }

    /// Collect up to `max` finished requests without blocking.
    pub fn poll_events(&mut self, max: usize) -> Vec<ApiEvent> {
        let mut events = Vec::new();
        while events.len() < max {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(_) => break,
            }
        }
        self.outstanding = self.outstanding.saturating_sub(events.len());
        events
    }

    /// Block up to `timeout` for the next finished request.
    pub fn wait_event(&mut self, timeout: Duration) -> Option<ApiEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.outstanding = self.outstanding.saturating_sub(1);
                Some(event)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Backend that only knows how to download.
    struct CsvApi {
        fail: bool,
    }

    impl LogApi for CsvApi {
        fn logs_by_type(&self, _log_type: &str) -> Result<Vec<LogRecord>, ApiError> {
            Ok(Vec::new())
        }

        fn filter_by_date(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
            logs: &[LogRecord],
        ) -> Result<Vec<LogRecord>, ApiError> {
            Ok(logs.to_vec())
        }

        fn download(&self, _logs: &[LogRecord]) -> Result<Vec<u8>, ApiError> {
            if self.fail {
                Err(ApiError::Status {
                    endpoint: "logs-download",
                    status: 500,
                })
            } else {
                Ok(b"_id,info\na,x\n".to_vec())
            }
        }
    }

    fn export_request(destination: PathBuf) -> ExportRequest {
        ExportRequest {
            ticket: ExportTicket { id: 1 },
            logs: vec![serde_json::from_value(serde_json::json!({ "_id": "a" })).unwrap()],
            destination,
        }
    }

    #[test]
    fn test_download_worker_saves_file_before_reporting() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("logs.csv");
        let mut manager = RequestManager::new(Arc::new(CsvApi { fail: false }));
        manager.download_logs(export_request(dest.clone()));
        assert_eq!(manager.outstanding(), 1);

        let event = manager.wait_event(Duration::from_secs(5)).unwrap();
        let ApiEvent::LogsDownloaded { result, .. } = event else {
            panic!("expected a download event");
        };
        let outcome = result.unwrap();
        assert_eq!(outcome.path, dest);
        assert_eq!(outcome.rows, Some(1));
        // The file is on disk by the time the event arrives.
        assert_eq!(std::fs::read(&dest).unwrap(), b"_id,info\na,x\n");
        assert_eq!(manager.outstanding(), 0);
    }

    #[test]
    fn test_failed_download_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("logs.csv");
        let mut manager = RequestManager::new(Arc::new(CsvApi { fail: true }));
        manager.download_logs(export_request(dest.clone()));

        let event = manager.wait_event(Duration::from_secs(5)).unwrap();
        let ApiEvent::LogsDownloaded { result, .. } = event else {
            panic!("expected a download event");
        };
        assert!(matches!(result, Err(LogQueryError::Api(_))));
        assert!(!dest.exists());
    }
}
