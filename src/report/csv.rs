//! Streaming CSV sink
//!
//! [`CsvVisitor`] forwards the event stream straight to an RFC4180 encoder:
//! only the current row is buffered, so memory stays flat no matter how many
//! rows the report produces. The header record is emitted exactly once,
//! before the first data record; `END_REPORT` flushes the encoder.

use std::io::Write;

use csv::{Terminator, WriterBuilder};
use serde_json::Value;

use super::context::{ReportContext, ReportEvent};
use super::visitor::ReportVisitor;
use crate::error::Error;
use crate::formatter::value_text;

/// Streams report rows to a CSV writer. One instance per run.
pub struct CsvVisitor<W: Write> {
    writer: csv::Writer<W>,
    columns: Vec<String>,
    current: Vec<String>,
}

impl<W: Write> CsvVisitor<W> {
    /// A comma-delimited visitor writing to `inner`.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self::with_delimiter(inner, b',')
    }

    /// A visitor with a custom field delimiter.
    #[must_use]
    pub fn with_delimiter(
        inner: W,
        delimiter: u8,
    ) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(Terminator::CRLF)
            .from_writer(inner);

        Self {
            writer,
            columns: Vec::new(),
            current: Vec::new(),
        }
    }
}

/// CSV field text: nulls become empty fields, everything else renders with
/// the standard cell formatting.
fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => value_text(other),
    }
}

impl<W: Write> ReportVisitor for CsvVisitor<W> {
    fn visit(
        &mut self,
        ctx: ReportContext,
    ) -> Result<ReportContext, Error> {
        match ctx.event {
            ReportEvent::StartReport => {
                tracing::debug!("Streaming report '{}' as CSV", ctx.name);
            }
            ReportEvent::StartRow => {}
            ReportEvent::Data => {
                if ctx.row == 0 {
                    self.columns.push(ctx.name.clone());
                }
                self.current.push(field_text(&ctx.value));
            }
            ReportEvent::EndRow => {
                if ctx.row == 0 {
                    self.writer.write_record(&self.columns)?;
                }
                self.writer.write_record(&self.current)?;
                self.current.clear();
            }
            ReportEvent::EndReport => {
                self.writer.flush()?;
            }
        }
        Ok(ctx)
    }
}
