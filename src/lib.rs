//! # cypher-reports
//!
//! A library for running named, Cypher-backed tabular reports against a
//! graph database, with built-in support for Neo4j over Bolt.
//!
//! A report is a query plus (optionally) a predeclared column schema. The
//! runner executes the query once, streams its rows through a visitor
//! pipeline, and lets pluggable sinks accumulate or emit the result. An
//! in-memory bordered table and a streaming CSV encoder ship with the
//! crate.
//!
//! ## Features
//!
//! - **Report pipeline**: a streaming state machine that walks query rows
//!   column by column, discovers the schema from the first row when none is
//!   declared, and detects positional drift in later rows
//! - **Pluggable sinks**: any `ReportVisitor` can observe the event stream;
//!   visitors compose into an ordered chain with type decoding first
//! - **Typed columns**: per-column decoding of integers, floats, booleans
//!   and base64-encoded text
//! - **Cypher composition**: a small statement builder plus APOC call
//!   helpers for JSON/JDBC loading and periodic batch iteration
//! - **Backend seam**: reports run against any `QueryExecutor`; a pooled
//!   Bolt adapter and an in-memory fixture executor are provided
//!
//! ## Usage
//!
//! Run a report over canned rows and render it as a table:
//!
//! ```rust
//! use cypher_reports::{CypherStatement, InMemoryExecutor, ReportDefinition, ReportService, Row};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rows = vec![
//!         Row::from_pairs(vec![("name", json!("Ada")), ("age", json!(36))]),
//!         Row::from_pairs(vec![("name", json!("Grace")), ("age", json!(45))]),
//!     ];
//!     let service = ReportService::new(InMemoryExecutor::new(rows));
//!
//!     let report = ReportDefinition::new(
//!         "people",
//!         CypherStatement::new("MATCH (p:Person) RETURN p.name AS name, p.age AS age"),
//!     );
//!
//!     let table = service.render_table(&report).await?;
//!     assert!(table.contains("| Ada   | 36   |"));
//!     Ok(())
//! }
//! ```
//!
//! Against a live Neo4j server:
//!
//! ```rust,no_run
//! use cypher_reports::{ConnectionSettings, CypherStatement, ReportDefinition, ReportService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ConnectionSettings::new("127.0.0.1:7687", "neo4j", "secret");
//!     let service = ReportService::connect(&settings).await?;
//!
//!     let report = ReportDefinition::new(
//!         "movie-titles",
//!         CypherStatement::new("MATCH (m:Movie) RETURN m.title AS title ORDER BY title"),
//!     );
//!
//!     let mut out = Vec::new();
//!     service.write_csv(&report, &mut out).await?;
//!     print!("{}", String::from_utf8_lossy(&out));
//!     Ok(())
//! }
//! ```
//!
//! Custom sinks implement [`ReportVisitor`] and plug into the same event
//! stream; see the `report` module documentation for the event contract.

pub mod config;
pub mod cypher;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod neo4j;
pub mod report;

pub use config::ConnectionSettings;
pub use cypher::{CypherBuilder, CypherStatement, apoc};
pub use error::Error;
pub use executor::{InMemoryExecutor, QueryExecutor, Row, RowStream};
pub use neo4j::Neo4jExecutor;
pub use report::{
    ColumnType, CsvVisitor, DecodeVisitor, ReportColumn, ReportContext, ReportDefinition, ReportEvent, ReportRunner,
    ReportVisitor, TableVisitor, VisitorChain,
};

/// A high-level handle bundling a query executor with the report pipeline.
///
/// The service applies the standard decoding stage in front of whatever
/// sink it is given, so typed columns arrive at sinks already coerced.
///
/// # Example
///
/// ```no_run
/// use cypher_reports::{ConnectionSettings, CypherStatement, ReportDefinition, ReportService};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = ReportService::connect(&ConnectionSettings::from_env()).await?;
///     let report = ReportDefinition::new(
///         "node-count",
///         CypherStatement::new("MATCH (n) RETURN count(n) AS nodes"),
///     );
///     println!("{}", service.render_table(&report).await?);
///     Ok(())
/// }
/// ```
pub struct ReportService {
    executor: Box<dyn QueryExecutor>,
}

impl ReportService {
    /// Wraps an already-constructed executor.
    #[must_use]
    pub fn new(executor: impl QueryExecutor + 'static) -> Self {
        Self {
            executor: Box::new(executor),
        }
    }

    /// Connects the bundled Bolt executor and wraps it.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, Error> {
        Ok(Self::new(Neo4jExecutor::connect(settings).await?))
    }

    /// Runs `report`, feeding every event through the decoding stage and
    /// then into `sink`. Returns the final pipeline context.
    ///
    /// # Errors
    ///
    /// Propagates executor, visitor and schema-mismatch failures.
    pub async fn run_report(
        &self,
        report: &ReportDefinition,
        sink: &mut dyn ReportVisitor,
    ) -> Result<ReportContext, Error> {
        let mut decode = DecodeVisitor;
        let mut chain = |ctx: ReportContext| -> Result<ReportContext, Error> { sink.visit(decode.visit(ctx)?) };

        ReportRunner::new(self.executor.as_ref())
            .run_report(report, &mut chain)
            .await
    }

    /// Runs `report` into a fresh [`TableVisitor`] and renders the bordered
    /// text table.
    ///
    /// # Errors
    ///
    /// Propagates pipeline failures.
    pub async fn render_table(
        &self,
        report: &ReportDefinition,
    ) -> Result<String, Error> {
        let mut table = TableVisitor::new();
        self.run_report(report, &mut table).await?;
        Ok(table.to_string())
    }

    /// Streams `report` as CSV into `writer`.
    ///
    /// # Errors
    ///
    /// Propagates pipeline and encoder failures.
    pub async fn write_csv<W: std::io::Write>(
        &self,
        report: &ReportDefinition,
        writer: W,
    ) -> Result<(), Error> {
        let mut csv = CsvVisitor::new(writer);
        self.run_report(report, &mut csv).await?;
        Ok(())
    }
}
