use serde_json::Value;

use super::column::ReportColumn;

/// Pipeline events, in the order the runner emits them:
/// `START_REPORT`, then per row `START_ROW`, `DATA` per column, `END_ROW`,
/// and finally `END_REPORT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportEvent {
    StartReport,
    StartRow,
    Data,
    EndRow,
    EndReport,
}

/// The single piece of state threaded through the pipeline: where the run
/// currently is and what it is looking at.
///
/// Contexts are copy-on-write: the runner owns the authoritative instance,
/// each visitor consumes one by value and returns the next. `name` holds the
/// report name on report-boundary events and the current column name during
/// `DATA`.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub event: ReportEvent,
    pub name: String,
    pub meta: Vec<ReportColumn>,
    /// Current row index, -1 before the first row.
    pub row: i64,
    /// Current column index, -1 before the first column of a row.
    pub column: i64,
    /// The current cell's value; `Null` outside `DATA` events and for
    /// missing cells.
    pub value: Value,
}

impl ReportContext {
    /// The context passed to the visitor before querying begins.
    #[must_use]
    pub fn start(
        report_name: impl Into<String>,
        meta: Vec<ReportColumn>,
    ) -> Self {
        Self {
            event: ReportEvent::StartReport,
            name: report_name.into(),
            meta,
            row: -1,
            column: -1,
            value: Value::Null,
        }
    }

    #[must_use]
    pub fn with_event(
        mut self,
        event: ReportEvent,
    ) -> Self {
        self.event = event;
        self
    }

    #[must_use]
    pub fn with_meta(
        mut self,
        meta: Vec<ReportColumn>,
    ) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn with_value(
        mut self,
        value: Value,
    ) -> Self {
        self.value = value;
        self
    }

    /// Advances to the next row boundary: `START_ROW` with the row counter
    /// incremented and the column counter reset.
    #[must_use]
    pub fn next_row(mut self) -> Self {
        self.event = ReportEvent::StartRow;
        self.row += 1;
        self.column = -1;
        self.value = Value::Null;
        self
    }

    /// Builds the `DATA` context for one cell.
    #[must_use]
    pub fn with_data(
        mut self,
        column: usize,
        name: impl Into<String>,
        value: Value,
    ) -> Self {
        self.event = ReportEvent::Data;
        self.column = column as i64;
        self.name = name.into();
        self.value = value;
        self
    }

    #[must_use]
    pub fn end_row(mut self) -> Self {
        self.event = ReportEvent::EndRow;
        self
    }

    /// Closes the report: `END_REPORT` with the name restored to the report
    /// name; row/column keep their final values.
    #[must_use]
    pub fn end_report(
        mut self,
        report_name: impl Into<String>,
    ) -> Self {
        self.event = ReportEvent::EndReport;
        self.name = report_name.into();
        self.value = Value::Null;
        self
    }

    /// The current column index as a usize, if a column is active.
    #[must_use]
    pub fn column_index(&self) -> Option<usize> {
        usize::try_from(self.column).ok()
    }
}
