//! The report driver
//!
//! [`ReportRunner`] executes a report definition against a query executor
//! and walks a visitor through the event stream:
//! `START_REPORT`, then per row `START_ROW`, `DATA` per column, `END_ROW`,
//! and finally `END_REPORT`. The runner owns the authoritative context for
//! the whole run and carries forward whatever context the visitor returns.

use std::collections::HashMap;

use futures::StreamExt;
use serde_json::Value;

use super::column::{ReportColumn, ReportDefinition};
use super::context::ReportContext;
use super::visitor::ReportVisitor;
use crate::error::Error;
use crate::executor::{QueryExecutor, Row};
use crate::formatter::safe_value;

/// Drives report definitions through the visitor pipeline.
pub struct ReportRunner<'a> {
    executor: &'a dyn QueryExecutor,
}

impl<'a> ReportRunner<'a> {
    #[must_use]
    pub fn new(executor: &'a dyn QueryExecutor) -> Self {
        Self { executor }
    }

    /// Runs `report` and feeds every event to `visitor`, returning the final
    /// context.
    ///
    /// The executor is invoked exactly once; its row stream is consumed
    /// lazily and never replayed. If the definition predeclares no columns,
    /// the schema is inferred from the first row, in the order the backend
    /// reports its columns.
    ///
    /// # Errors
    ///
    /// Executor and visitor failures propagate unchanged; a positional
    /// schema mismatch aborts the run with [`Error::SchemaMismatch`]. A
    /// value missing by name is non-fatal: it is logged and surfaced as
    /// `Null`.
    pub async fn run_report(
        &self,
        report: &ReportDefinition,
        visitor: &mut dyn ReportVisitor,
    ) -> Result<ReportContext, Error> {
        tracing::info!("Running report '{}'", report.report_name);

        let mut ctx = ReportContext::start(&report.report_name, report.columns.clone());
        ctx = visitor.visit(ctx)?;

        let mut rows = self.executor.execute(&report.query, &HashMap::new()).await?;

        let mut first_row = true;
        while let Some(row) = rows.next().await {
            let row = row?;

            if first_row {
                first_row = false;
                if ctx.meta.is_empty() {
                    let inferred: Vec<ReportColumn> = row.column_names().map(ReportColumn::new).collect();
                    tracing::debug!(
                        "Report '{}': inferred {} columns from first row",
                        report.report_name,
                        inferred.len()
                    );
                    ctx = ctx.with_meta(inferred);
                }
            }

            ctx = visitor.visit(ctx.next_row())?;

            // The schema is positionally fixed from here on; visitors see it
            // through the context, the loop iterates the snapshot.
            let schema: Vec<String> = ctx.meta.iter().map(|column| column.name.clone()).collect();
            for (cdx, expected) in schema.iter().enumerate() {
                let value = resolve_cell(&report.report_name, &row, cdx, expected, ctx.row)?;
                ctx = visitor.visit(ctx.with_data(cdx, expected.clone(), value))?;
            }

            ctx = visitor.visit(ctx.end_row())?;
        }

        ctx = visitor.visit(ctx.end_report(&report.report_name))?;
        tracing::info!("Report '{}' finished after {} rows", report.report_name, ctx.row + 1);
        Ok(ctx)
    }
}

/// Resolves the cell for schema position `cdx`. The lookup is by name; a
/// name that moved to a different position is a hard mismatch, a name that
/// is absent altogether is a warning and a `Null` cell.
fn resolve_cell(
    report_name: &str,
    row: &Row,
    cdx: usize,
    expected: &str,
    row_index: i64,
) -> Result<Value, Error> {
    match row.position_of(expected) {
        Some(pos) if pos == cdx => Ok(safe_value(row.get(expected).cloned().unwrap_or(Value::Null))),
        Some(_) => Err(Error::schema_mismatch(
            report_name,
            cdx,
            expected,
            row.name_at(cdx).unwrap_or("<missing>"),
        )),
        None => {
            tracing::warn!(
                "Report '{}' row {}: no value for column '{}'",
                report_name,
                row_index,
                expected
            );
            Ok(Value::Null)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::CypherStatement;
    use crate::executor::InMemoryExecutor;
    use crate::report::context::ReportEvent;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn definition() -> ReportDefinition {
        ReportDefinition::new("people", CypherStatement::new("MATCH (p:Person) RETURN p"))
    }

    fn people_rows(count: usize) -> Vec<Row> {
        (0..count)
            .map(|i| Row::from_pairs(vec![("name", json!(format!("person-{i}"))), ("age", json!(20 + i))]))
            .collect()
    }

    async fn record_events(rows: Vec<Row>) -> Vec<(ReportEvent, i64, i64, String)> {
        let executor = InMemoryExecutor::new(rows);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut recorder = move |ctx: ReportContext| -> Result<ReportContext, Error> {
            sink.borrow_mut().push((ctx.event, ctx.row, ctx.column, ctx.name.clone()));
            Ok(ctx)
        };

        ReportRunner::new(&executor)
            .run_report(&definition(), &mut recorder)
            .await
            .unwrap();

        let observed = events.borrow().clone();
        observed
    }

    #[tokio::test]
    async fn test_event_ordering_invariant() {
        let observed = record_events(people_rows(2)).await;
        let shape: Vec<ReportEvent> = observed.iter().map(|(event, ..)| *event).collect();

        assert_eq!(
            shape,
            vec![
                ReportEvent::StartReport,
                ReportEvent::StartRow,
                ReportEvent::Data,
                ReportEvent::Data,
                ReportEvent::EndRow,
                ReportEvent::StartRow,
                ReportEvent::Data,
                ReportEvent::Data,
                ReportEvent::EndRow,
                ReportEvent::EndReport,
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_report_emits_boundaries_only() {
        let observed = record_events(Vec::new()).await;
        let shape: Vec<ReportEvent> = observed.iter().map(|(event, ..)| *event).collect();
        assert_eq!(shape, vec![ReportEvent::StartReport, ReportEvent::EndReport]);
    }

    #[tokio::test]
    async fn test_row_and_column_counters() {
        let observed = record_events(people_rows(2)).await;

        assert_eq!(observed[0].1, -1, "row is -1 before the first row");
        assert_eq!(observed[0].2, -1);

        let start_rows: Vec<i64> = observed
            .iter()
            .filter(|(event, ..)| *event == ReportEvent::StartRow)
            .map(|(_, row, ..)| *row)
            .collect();
        assert_eq!(start_rows, vec![0, 1]);

        for (event, _, column, _) in &observed {
            if *event == ReportEvent::StartRow {
                assert_eq!(*column, -1, "column resets at START_ROW");
            }
        }

        let columns: Vec<i64> = observed
            .iter()
            .filter(|(event, _, _, _)| *event == ReportEvent::Data)
            .map(|(_, _, column, _)| *column)
            .collect();
        assert_eq!(columns, vec![0, 1, 0, 1]);
    }

    #[tokio::test]
    async fn test_data_events_carry_column_names() {
        let observed = record_events(people_rows(1)).await;
        let names: Vec<&str> = observed
            .iter()
            .filter(|(event, ..)| *event == ReportEvent::Data)
            .map(|(.., name)| name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[tokio::test]
    async fn test_column_inference_idempotence() {
        for count in [0usize, 1, 5] {
            let executor = InMemoryExecutor::new(people_rows(count));
            let mut passthrough = |ctx: ReportContext| -> Result<ReportContext, Error> { Ok(ctx) };
            let finished = ReportRunner::new(&executor)
                .run_report(&definition(), &mut passthrough)
                .await
                .unwrap();

            let names: Vec<&str> = finished.meta.iter().map(|c| c.name.as_str()).collect();
            if count == 0 {
                assert!(names.is_empty(), "nothing to infer from an empty result");
            } else {
                assert_eq!(names, vec!["name", "age"], "rows={count}");
            }
        }
    }

    #[tokio::test]
    async fn test_missing_value_is_null_not_error() {
        let rows = vec![
            Row::from_pairs(vec![("name", json!("Ada")), ("age", json!(36))]),
            Row::from_pairs(vec![("name", json!("Grace"))]),
        ];
        let executor = InMemoryExecutor::new(rows);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut recorder = move |ctx: ReportContext| -> Result<ReportContext, Error> {
            if ctx.event == ReportEvent::Data && ctx.row == 1 {
                sink.borrow_mut().push((ctx.name.clone(), ctx.value.clone()));
            }
            Ok(ctx)
        };

        ReportRunner::new(&executor)
            .run_report(&definition(), &mut recorder)
            .await
            .unwrap();

        let seen = seen.borrow();
        assert_eq!(seen[0], ("name".to_string(), json!("Grace")));
        assert_eq!(seen[1], ("age".to_string(), Value::Null));
    }

    #[tokio::test]
    async fn test_positional_mismatch_fails_fast() {
        let rows = vec![
            Row::from_pairs(vec![("name", json!("Ada")), ("age", json!(36))]),
            Row::from_pairs(vec![("age", json!(45)), ("name", json!("Grace"))]),
        ];
        let executor = InMemoryExecutor::new(rows);
        let mut passthrough = |ctx: ReportContext| -> Result<ReportContext, Error> { Ok(ctx) };

        let err = ReportRunner::new(&executor)
            .run_report(&definition(), &mut passthrough)
            .await
            .unwrap_err();

        match err {
            Error::SchemaMismatch {
                report,
                column,
                expected,
                actual,
            } => {
                assert_eq!(report, "people");
                assert_eq!(column, 0);
                assert_eq!(expected, "name");
                assert_eq!(actual, "age");
            }
            other => panic!("expected SchemaMismatch, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_safe_value_conversion() {
        let rows = vec![Row::from_pairs(vec![
            ("plain", json!("text")),
            ("number", json!(7)),
            ("absent_value", Value::Null),
            ("nested", json!({"id": 1})),
        ])];
        let executor = InMemoryExecutor::new(rows);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut recorder = move |ctx: ReportContext| -> Result<ReportContext, Error> {
            if ctx.event == ReportEvent::Data {
                sink.borrow_mut().push(ctx.value.clone());
            }
            Ok(ctx)
        };

        ReportRunner::new(&executor)
            .run_report(&definition(), &mut recorder)
            .await
            .unwrap();

        assert_eq!(*seen.borrow(), vec![json!("text"), json!(7), json!(""), json!("{id: 1}")]);
    }

    #[tokio::test]
    async fn test_predeclared_columns_are_used() {
        use crate::report::column::{ColumnType, ReportColumn};

        let report = definition().with_columns(vec![
            ReportColumn::new("name"),
            ReportColumn::new("age").with_type(ColumnType::Int),
        ]);
        let executor = InMemoryExecutor::new(people_rows(1));
        let mut passthrough = |ctx: ReportContext| -> Result<ReportContext, Error> { Ok(ctx) };

        let finished = ReportRunner::new(&executor)
            .run_report(&report, &mut passthrough)
            .await
            .unwrap();

        assert_eq!(finished.meta.len(), 2);
        assert_eq!(finished.meta[1].column_type, ColumnType::Int);
    }
}
