// LogQuery - core/query.rs
//
// Query state machine for the log query view: selected log type, date
// range, filtered/unfiltered mode and the filtered result set.
// Core layer: pure transitions, no I/O or UI dependencies.
//
// Invariant: mode == Filtered iff a filter response was accepted since the
// last type change or clear. Type change and clear bump `generation`, so a
// filter response issued before them can never be accepted afterwards.

use crate::core::model::{
    DateRange, ExportRequest, ExportTicket, FilterRequest, FilterTicket, LogRecord, QueryMode,
};
use crate::util::error::QueryError;
use std::path::PathBuf;

/// Per-view query state. Created on mount, mutated only through the
/// transition methods below.
#[derive(Debug, Clone)]
pub struct QueryState {
    selected_log_type: String,
    date_range: DateRange,
    mode: QueryMode,
    filtered_results: Vec<LogRecord>,

    /// Bumped by every transition that invalidates in-flight filter responses.
    generation: u64,

    /// Filter request in flight, if any.
    pending_filter: Option<FilterTicket>,

    /// Export in flight, if any.
    pending_export: Option<ExportTicket>,
    next_export_id: u64,
}

impl QueryState {
    pub fn new(initial_log_type: impl Into<String>) -> Self {
        Self {
            selected_log_type: initial_log_type.into(),
            date_range: DateRange::default(),
            mode: QueryMode::Unfiltered,
            filtered_results: Vec::new(),
            generation: 0,
            pending_filter: None,
            pending_export: None,
            next_export_id: 0,
        }
    }

    pub fn selected_log_type(&self) -> &str {
        &self.selected_log_type
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn filtered_results(&self) -> &[LogRecord] {
        &self.filtered_results
    }

    pub fn is_filter_pending(&self) -> bool {
        self.pending_filter.is_some()
    }

    pub fn is_export_pending(&self) -> bool {
        self.pending_export.is_some()
    }

    // -------------------------------------------------------------------------
    // Type selection
    // -------------------------------------------------------------------------

    /// Switch the log stream. Always returns to Unfiltered with no filtered
    /// results, whatever the prior state. The date range is kept so the user
    /// can re-apply it to the new stream.
    pub fn select_log_type(&mut self, log_type: impl Into<String>) {
        self.selected_log_type = log_type.into();
        self.reset_filtered();
    }

    // -------------------------------------------------------------------------
    // Filter
    // -------------------------------------------------------------------------

    /// Local update of the date range; never triggers a request.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    /// Whether the filter action is enabled given the records currently
    /// available for the selected type.
    pub fn can_apply_filter(&self, records: Option<&[LogRecord]>) -> bool {
        self.check_filter(records).is_ok()
    }

    fn check_filter(&self, records: Option<&[LogRecord]>) -> Result<(), QueryError> {
        if !self.date_range.is_complete() {
            return Err(QueryError::DateRangeIncomplete);
        }
        if records.is_none() {
            return Err(QueryError::RecordsUnavailable {
                log_type: self.selected_log_type.clone(),
            });
        }
        if self.pending_filter.is_some() {
            return Err(QueryError::RequestPending { action: "filter" });
        }
        Ok(())
    }

    /// Start a filter submission. Validates the preconditions and moves
    /// `records` into the request payload; the caller sends it to the backend.
    pub fn begin_filter(
        &mut self,
        records: Option<Vec<LogRecord>>,
    ) -> Result<FilterRequest, QueryError> {
        self.check_filter(records.as_deref())?;
        let (start, end) = self
            .date_range
            .bounds()
            .ok_or(QueryError::DateRangeIncomplete)?;
        let logs = records.unwrap_or_default();

        self.generation += 1;
        let ticket = FilterTicket {
            generation: self.generation,
        };
        self.pending_filter = Some(ticket);

        Ok(FilterRequest {
            ticket,
            start,
            end,
            logs,
        })
    }

    /// Accept a filter response. Returns false (and changes nothing) when the
    /// response belongs to a superseded submission.
    pub fn complete_filter(&mut self, ticket: FilterTicket, results: Vec<LogRecord>) -> bool {
        if self.pending_filter != Some(ticket) {
            return false;
        }
        self.pending_filter = None;
        self.filtered_results = results;
        self.mode = QueryMode::Filtered;
        true
    }

    /// Record a failed filter request. Mode is left untouched. Returns false
    /// for a superseded submission.
    pub fn fail_filter(&mut self, ticket: FilterTicket) -> bool {
        if self.pending_filter != Some(ticket) {
            return false;
        }
        self.pending_filter = None;
        true
    }

    /// Reset the date range and return to the unfiltered view. Always allowed.
    pub fn clear_filter(&mut self) {
        self.date_range = DateRange::default();
        self.reset_filtered();
    }

    fn reset_filtered(&mut self) {
        self.generation += 1;
        self.mode = QueryMode::Unfiltered;
        self.filtered_results.clear();
        self.pending_filter = None;
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    pub fn can_export(&self) -> bool {
        self.check_export().is_ok()
    }

    fn check_export(&self) -> Result<(), QueryError> {
        if self.mode != QueryMode::Filtered {
            return Err(QueryError::NotFiltered);
        }
        if self.filtered_results.is_empty() {
            return Err(QueryError::NothingToExport);
        }
        if self.pending_export.is_some() {
            return Err(QueryError::RequestPending { action: "download" });
        }
        Ok(())
    }

    /// Start an export of the current filtered results to `destination`.
    pub fn begin_export(&mut self, destination: PathBuf) -> Result<ExportRequest, QueryError> {
        self.check_export()?;
        self.next_export_id += 1;
        let ticket = ExportTicket {
            id: self.next_export_id,
        };
        self.pending_export = Some(ticket);
        Ok(ExportRequest {
            ticket,
            logs: self.filtered_results.clone(),
            destination,
        })
    }

    /// Mark an export as finished (successfully or not). Returns false for an
    /// unknown ticket.
    pub fn finish_export(&mut self, ticket: ExportTicket) -> bool {
        if self.pending_export != Some(ticket) {
            return false;
        }
        self.pending_export = None;
        true
    }
}
