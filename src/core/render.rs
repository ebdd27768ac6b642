// LogQuery - core/render.rs
//
// Table render selector: a total, pure function from query state and the
// selected type's fetch state to exactly one display state.
//
// Precedence (first match wins):
//   1. Loading            - unfiltered, no data, no error or a retry in flight
//   2. FetchFailed        - unfiltered, no data, error, nothing in flight
//   3. UnfilteredEmpty    - unfiltered, zero records
//   4. UnfilteredResults  - unfiltered, records present
//   5. FilteredEmpty      - filtered, zero results
//   6. FilteredResults    - filtered, results present

use crate::core::fetch::FetchView;
use crate::core::model::{LogRecord, QueryMode};
use crate::core::query::QueryState;

/// What the results table shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderState<'a> {
    Loading,
    FetchFailed { message: &'a str },
    UnfilteredEmpty,
    UnfilteredResults(&'a [LogRecord]),
    FilteredEmpty,
    FilteredResults(&'a [LogRecord]),
}

impl<'a> RenderState<'a> {
    /// Rows to draw, empty for the non-tabular states.
    pub fn rows(&self) -> &'a [LogRecord] {
        match *self {
            Self::UnfilteredResults(rows) | Self::FilteredResults(rows) => rows,
            _ => &[],
        }
    }

    /// Short label used in logs and the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::FetchFailed { .. } => "fetch-failed",
            Self::UnfilteredEmpty => "unfiltered-empty",
            Self::UnfilteredResults(_) => "unfiltered-results",
            Self::FilteredEmpty => "filtered-empty",
            Self::FilteredResults(_) => "filtered-results",
        }
    }
}

/// Select the render state for the current query and fetch view.
pub fn select<'a>(query: &'a QueryState, fetch: FetchView<'a>) -> RenderState<'a> {
    match query.mode() {
        QueryMode::Unfiltered => match (fetch.data, fetch.error) {
            (None, Some(message)) if !fetch.in_flight => RenderState::FetchFailed { message },
            (None, _) => RenderState::Loading,
            (Some([]), _) => RenderState::UnfilteredEmpty,
            (Some(rows), _) => RenderState::UnfilteredResults(rows),
        },
        QueryMode::Filtered => match query.filtered_results() {
            [] => RenderState::FilteredEmpty,
            rows => RenderState::FilteredResults(rows),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetch::FetchCache;
    use crate::core::model::DateRange;
    use chrono::NaiveDate;

    fn record(id: &str) -> LogRecord {
        serde_json::from_value(serde_json::json!({ "_id": id })).unwrap()
    }

    fn filtered(results: Vec<LogRecord>) -> QueryState {
        let mut q = QueryState::new("error");
        q.set_date_range(DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        ));
        let req = q.begin_filter(Some(vec![record("x")])).unwrap();
        q.complete_filter(req.ticket, results);
        q
    }

    #[test]
    fn test_loading_before_any_response() {
        let q = QueryState::new("error");
        let mut cache = FetchCache::new();
        assert_eq!(select(&q, cache.view("error")), RenderState::Loading);
        cache.revalidate("error");
        assert_eq!(select(&q, cache.view("error")), RenderState::Loading);
    }

    #[test]
    fn test_error_type_with_empty_fetch_is_unfiltered_empty() {
        let q = QueryState::new("error");
        let mut cache = FetchCache::new();
        let t = cache.revalidate("error").unwrap();
        cache.complete(&t, vec![]);
        assert_eq!(select(&q, cache.view("error")), RenderState::UnfilteredEmpty);
    }

    #[test]
    fn test_unfiltered_results() {
        let q = QueryState::new("error");
        let mut cache = FetchCache::new();
        let t = cache.revalidate("error").unwrap();
        cache.complete(&t, vec![record("a"), record("b")]);
        let state = select(&q, cache.view("error"));
        assert!(matches!(state, RenderState::UnfilteredResults(rows) if rows.len() == 2));
    }

    #[test]
    fn test_fetch_failure_without_data_is_explicit() {
        let q = QueryState::new("error");
        let mut cache = FetchCache::new();
        let t = cache.revalidate("error").unwrap();
        cache.fail(&t, "connection refused");
        assert_eq!(
            select(&q, cache.view("error")),
            RenderState::FetchFailed {
                message: "connection refused"
            }
        );
    }

    #[test]
    fn test_retry_after_failure_shows_loading() {
        let q = QueryState::new("error");
        let mut cache = FetchCache::new();
        let t = cache.revalidate("error").unwrap();
        cache.fail(&t, "connection refused");
        assert!(cache.revalidate("error").is_some());
        assert_eq!(select(&q, cache.view("error")), RenderState::Loading);
    }

    #[test]
    fn test_stale_data_wins_over_later_error() {
        let q = QueryState::new("error");
        let mut cache = FetchCache::new();
        let t1 = cache.revalidate("error").unwrap();
        cache.complete(&t1, vec![record("a")]);
        let t2 = cache.revalidate("error").unwrap();
        cache.fail(&t2, "timed out");
        assert_eq!(select(&q, cache.view("error")).label(), "unfiltered-results");
    }

    #[test]
    fn test_filtered_single_result() {
        let q = filtered(vec![record("a")]);
        let state = select(&q, FetchView::default());
        assert_eq!(state.label(), "filtered-results");
        assert_eq!(state.rows().len(), 1);
        assert_eq!(state.rows()[0].id, "a");
    }

    #[test]
    fn test_filtered_empty_ignores_fetch_state() {
        let q = filtered(vec![]);
        assert_eq!(select(&q, FetchView::default()), RenderState::FilteredEmpty);
        assert!(!q.can_export());
    }

    #[test]
    fn test_selector_is_total_over_combinations() {
        let records = vec![record("a")];
        let views = [
            FetchView::default(),
            FetchView {
                data: None,
                error: Some("boom"),
                in_flight: false,
            },
            FetchView {
                data: Some(&[][..]),
                error: None,
                in_flight: true,
            },
            FetchView {
                data: Some(records.as_slice()),
                error: Some("boom"),
                in_flight: false,
            },
        ];
        let queries = [
            QueryState::new("error"),
            filtered(vec![]),
            filtered(vec![record("b")]),
        ];
        for q in &queries {
            for v in views {
                let state = select(q, v);
                let unfiltered = q.mode() == QueryMode::Unfiltered;
                let unfiltered_label = matches!(
                    state,
                    RenderState::Loading
                        | RenderState::FetchFailed { .. }
                        | RenderState::UnfilteredEmpty
                        | RenderState::UnfilteredResults(_)
                );
                assert_eq!(unfiltered, unfiltered_label, "{}", state.label());
            }
        }
    }
}
