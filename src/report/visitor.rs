//! Visitor protocol and the standard decoding stage
//!
//! A [`ReportVisitor`] observes the report event stream: it consumes each
//! [`ReportContext`] by value and returns the context the next stage (and
//! ultimately the runner) continues with. Visitors must accept every event
//! kind and return the context unchanged for events they ignore.
//!
//! [`VisitorChain`] composes visitors into a strict pipeline with no fan-out;
//! a sink that only performs a side effect returns the context untouched so
//! downstream visitors still see the full stream.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;

use super::column::ColumnType;
use super::context::{ReportContext, ReportEvent};
use crate::error::Error;

/// A pluggable consumer of the report event stream.
pub trait ReportVisitor {
    /// Observes one event and returns the context to continue with.
    ///
    /// # Errors
    ///
    /// A visitor failure aborts the run; the runner propagates it to the
    /// caller unchanged.
    fn visit(
        &mut self,
        ctx: ReportContext,
    ) -> Result<ReportContext, Error>;
}

impl<F> ReportVisitor for F
where
    F: FnMut(ReportContext) -> Result<ReportContext, Error>,
{
    fn visit(
        &mut self,
        ctx: ReportContext,
    ) -> Result<ReportContext, Error> {
        self(ctx)
    }
}

/// An ordered pipeline of visitors. Each event is folded through the list in
/// order; the context returned by the last visitor feeds back into the
/// runner.
#[derive(Default)]
pub struct VisitorChain {
    visitors: Vec<Box<dyn ReportVisitor>>,
}

impl VisitorChain {
    /// An empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard chain: [`DecodeVisitor`] first, sinks appended after.
    #[must_use]
    pub fn standard() -> Self {
        Self::new().then(DecodeVisitor)
    }

    /// Appends a visitor to the end of the pipeline.
    #[must_use]
    pub fn then(
        mut self,
        visitor: impl ReportVisitor + 'static,
    ) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}

impl ReportVisitor for VisitorChain {
    fn visit(
        &mut self,
        ctx: ReportContext,
    ) -> Result<ReportContext, Error> {
        let mut ctx = ctx;
        for visitor in &mut self.visitors {
            ctx = visitor.visit(ctx)?;
        }
        Ok(ctx)
    }
}

/// The type-coercion stage, always first in the standard chain. On `DATA`
/// events it rewrites the cell value according to the column's declared
/// type; all other events pass through unchanged.
///
/// Failed coercions are non-fatal: the value becomes `Null` and a warning is
/// logged (except `Boolean`, where any non-"true" input is simply `false`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeVisitor;

impl ReportVisitor for DecodeVisitor {
    fn visit(
        &mut self,
        mut ctx: ReportContext,
    ) -> Result<ReportContext, Error> {
        if ctx.event != ReportEvent::Data {
            return Ok(ctx);
        }

        let column_type = match ctx.column_index().and_then(|idx| ctx.meta.get(idx)) {
            Some(column) => column.column_type,
            None => return Ok(ctx),
        };

        ctx.value = decode_value(column_type, ctx.value, &ctx.name, ctx.row);
        Ok(ctx)
    }
}

fn decode_value(
    column_type: ColumnType,
    value: Value,
    column_name: &str,
    row: i64,
) -> Value {
    match column_type {
        ColumnType::String => value,
        ColumnType::Int => decode_int(value, column_name, row),
        ColumnType::Double => decode_double(value, column_name, row),
        ColumnType::Boolean => decode_boolean(value),
        ColumnType::Base64 => decode_base64(value, column_name, row),
    }
}

fn decode_int(
    value: Value,
    column_name: &str,
    row: i64,
) -> Value {
    match &value {
        Value::Number(n) if n.is_i64() || n.is_u64() => value,
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(parsed) => Value::from(parsed),
            Err(_) => {
                tracing::warn!("Column '{}' row {}: '{}' is not an integer", column_name, row, s);
                Value::Null
            }
        },
        _ => {
            tracing::warn!("Column '{}' row {}: value is not an integer", column_name, row);
            Value::Null
        }
    }
}

fn decode_double(
    value: Value,
    column_name: &str,
    row: i64,
) -> Value {
    match &value {
        Value::Number(_) => value,
        Value::String(s) => match s.trim().parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            Some(parsed) => Value::Number(parsed),
            None => {
                tracing::warn!("Column '{}' row {}: '{}' is not a number", column_name, row, s);
                Value::Null
            }
        },
        _ => {
            tracing::warn!("Column '{}' row {}: value is not a number", column_name, row);
            Value::Null
        }
    }
}

fn decode_boolean(value: Value) -> Value {
    match &value {
        Value::Bool(_) => value,
        Value::String(s) => Value::Bool(s.trim().eq_ignore_ascii_case("true")),
        _ => Value::Bool(false),
    }
}

fn decode_base64(
    value: Value,
    column_name: &str,
    row: i64,
) -> Value {
    match &value {
        Value::String(s) => match BASE64.decode(s.trim()).map(String::from_utf8) {
            Ok(Ok(decoded)) => Value::String(decoded),
            _ => {
                tracing::warn!("Column '{}' row {}: value is not base64 text", column_name, row);
                Value::Null
            }
        },
        _ => {
            tracing::warn!("Column '{}' row {}: value is not base64 text", column_name, row);
            Value::Null
        }
    }
}
