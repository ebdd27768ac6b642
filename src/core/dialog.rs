// LogQuery - core/dialog.rs
//
// Detail dialog controller: which single record, if any, is being
// inspected in the overlay.
//
// `open` implies a selected record. Closing keeps the record so the
// window's content does not go blank while it fades out; the next `open`
// replaces it.

use crate::core::model::LogRecord;

#[derive(Debug, Clone, Default)]
pub struct DialogState {
    open: bool,
    selected: Option<LogRecord>,
}

impl DialogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `record` and show the dialog in one step.
    pub fn open(&mut self, record: LogRecord) {
        self.selected = Some(record);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The record shown while open. None when closed.
    pub fn visible_record(&self) -> Option<&LogRecord> {
        if self.open {
            self.selected.as_ref()
        } else {
            None
        }
    }

    /// Last record opened, retained after close.
    pub fn selected_record(&self) -> Option<&LogRecord> {
        self.selected.as_ref()
    }
}
