//! The report generation pipeline
//!
//! A [`ReportRunner`] executes a [`ReportDefinition`]'s query and walks a
//! visitor chain through a fixed event sequence (report start, then per row
//! a row-start, one data event per column, a row-end, and finally a report
//! end), threading a single [`ReportContext`] through every step. Sinks
//! ([`TableVisitor`], [`CsvVisitor`]) are just visitors that accumulate or
//! emit as the events arrive.

pub mod column;
pub mod context;
pub mod csv;
pub mod runner;
pub mod table;
pub mod visitor;

pub use self::column::{ColumnType, DEFAULT_COLUMN_WIDTH, ReportColumn, ReportDefinition};
pub use self::context::{ReportContext, ReportEvent};
pub use self::csv::CsvVisitor;
pub use self::runner::ReportRunner;
pub use self::table::TableVisitor;
pub use self::visitor::{DecodeVisitor, ReportVisitor, VisitorChain};
