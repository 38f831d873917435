//! In-memory table sink
//!
//! [`TableVisitor`] buffers the whole report and renders it as a bordered
//! plain-text table, tracking per-column display widths as values stream
//! through. This sink buffers everything; contrast with the streaming CSV sink.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use super::column::DEFAULT_COLUMN_WIDTH;
use super::context::{ReportContext, ReportEvent};
use super::visitor::ReportVisitor;
use crate::error::Error;
use crate::formatter::value_text;

/// Accumulates rows and renders them via `Display`. One instance per run.
#[derive(Debug, Default)]
pub struct TableVisitor {
    columns: Vec<String>,
    widths: Vec<usize>,
    rows: Vec<HashMap<String, Value>>,
}

impl TableVisitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Discovered column names, in schema order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The tracked display width of `column`, if discovered.
    #[must_use]
    pub fn width(
        &self,
        column: &str,
    ) -> Option<usize> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|idx| self.widths[idx])
    }

    fn record(
        &mut self,
        ctx: &ReportContext,
    ) {
        let text = value_text(&ctx.value);

        if ctx.row == 0 && !self.columns.contains(&ctx.name) {
            self.columns.push(ctx.name.clone());
            self.widths
                .push(usize::from(DEFAULT_COLUMN_WIDTH).max(ctx.name.chars().count()));
        }

        if let Some(row) = self.rows.last_mut() {
            row.insert(ctx.name.clone(), ctx.value.clone());
        }

        if let Some(idx) = self.columns.iter().position(|name| name == &ctx.name) {
            self.widths[idx] = self.widths[idx].max(text.chars().count());
        }
    }
}

impl ReportVisitor for TableVisitor {
    fn visit(
        &mut self,
        ctx: ReportContext,
    ) -> Result<ReportContext, Error> {
        match ctx.event {
            ReportEvent::StartRow => self.rows.push(HashMap::new()),
            ReportEvent::Data => self.record(&ctx),
            ReportEvent::StartReport => {
                tracing::debug!("Accumulating table for report '{}'", ctx.name);
            }
            ReportEvent::EndRow => {}
            ReportEvent::EndReport => {
                tracing::debug!("Report '{}' accumulated: {} rows", ctx.name, self.rows.len());
            }
        }
        Ok(ctx)
    }
}

impl fmt::Display for TableVisitor {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(self.widths.iter().copied())
            .map(|(name, width)| format!("{name:<width$}"))
            .collect();
        writeln!(f, "| {} |", header.join(" | "))?;

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(self.widths.iter().copied())
                .map(|(name, width)| {
                    let text = row.get(name).map_or_else(|| "null".to_string(), value_text);
                    format!("{text:<width$}")
                })
                .collect();
            writeln!(f, "| {} |", cells.join(" | "))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed(
        table: &mut TableVisitor,
        rows: &[Vec<(&str, Value)>],
    ) {
        let mut ctx = ReportContext::start("table-test", Vec::new());
        ctx = table.visit(ctx).unwrap();

        for row in rows {
            ctx = table.visit(ctx.next_row()).unwrap();
            for (cdx, (name, value)) in row.iter().enumerate() {
                ctx = table.visit(ctx.with_data(cdx, *name, value.clone())).unwrap();
            }
            ctx = table.visit(ctx.end_row()).unwrap();
        }

        table.visit(ctx.end_report("table-test")).unwrap();
    }

    #[test]
    fn test_width_tracking() {
        let mut table = TableVisitor::new();
        feed(
            &mut table,
            &[vec![("name", json!("Bob"))], vec![("name", json!("Alexandra"))]],
        );

        assert_eq!(table.width("name"), Some(9));
    }

    #[test]
    fn test_width_floor_is_four() {
        let mut table = TableVisitor::new();
        feed(&mut table, &[vec![("id", json!(1))]]);
        assert_eq!(table.width("id"), Some(4));
    }

    #[test]
    fn test_columns_discovered_in_first_row_only() {
        let mut table = TableVisitor::new();
        feed(
            &mut table,
            &[
                vec![("a", json!(1)), ("b", json!(2))],
                vec![("a", json!(3)), ("b", json!(4))],
            ],
        );

        assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_render_bordered_table() {
        let mut table = TableVisitor::new();
        feed(
            &mut table,
            &[
                vec![("name", json!("Ada")), ("age", json!(36))],
                vec![("name", json!("Grace")), ("age", json!(45))],
            ],
        );

        let expected = "| name  | age  |\n\
                        | Ada   | 36   |\n\
                        | Grace | 45   |\n";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_missing_value_renders_null() {
        let mut table = TableVisitor::new();
        feed(
            &mut table,
            &[
                vec![("name", json!("Ada")), ("age", json!(36))],
                vec![("name", json!("Grace")), ("age", Value::Null)],
            ],
        );

        let rendered = table.to_string();
        assert!(rendered.contains("| Grace | null |"));
    }
}
