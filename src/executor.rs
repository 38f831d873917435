//! Query execution seam for the report pipeline
//!
//! The pipeline never talks to a graph driver directly; it consumes the
//! [`QueryExecutor`] capability: run a statement, get back a lazy, finite
//! stream of rows. Rows are ordered name-to-value mappings; the column order
//! reported by the backend is the order schema inference uses.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;

use crate::cypher::CypherStatement;
use crate::error::Error;

/// A lazy stream of query result rows.
pub type RowStream = BoxStream<'static, Result<Row, Error>>;

/// One query result row: an ordered mapping from column name to value.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    #[must_use]
    pub fn new(cells: Vec<(String, Value)>) -> Self {
        Self { cells }
    }

    /// Builds a row from name/value pairs in iteration order.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            cells: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Column names in backend order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// The column name at `index`, if the row is that wide.
    #[must_use]
    pub fn name_at(
        &self,
        index: usize,
    ) -> Option<&str> {
        self.cells.get(index).map(|(name, _)| name.as_str())
    }

    /// Looks a value up by column name.
    #[must_use]
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(cell_name, _)| cell_name == name)
            .map(|(_, value)| value)
    }

    /// The position of `name` within the row, if present.
    #[must_use]
    pub fn position_of(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.cells.iter().position(|(cell_name, _)| cell_name == name)
    }
}

/// Capability consumed by the report pipeline: execute a statement and yield
/// its rows lazily. One active iteration per call; the stream is finite and
/// is never replayed.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Executes `statement`, binding its default parameters overlaid with
    /// `params`, and returns a lazy row stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the statement or the
    /// connection fails. Row-level failures surface as `Err` items on the
    /// returned stream.
    async fn execute(
        &self,
        statement: &CypherStatement,
        params: &HashMap<String, Value>,
    ) -> Result<RowStream, Error>;
}

/// An executor over canned rows, for tests and offline fixtures. The
/// statement text is ignored; every call streams a fresh copy of the rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutor {
    rows: Vec<Row>,
}

impl InMemoryExecutor {
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl QueryExecutor for InMemoryExecutor {
    async fn execute(
        &self,
        statement: &CypherStatement,
        _params: &HashMap<String, Value>,
    ) -> Result<RowStream, Error> {
        tracing::debug!("Serving {} canned rows for: {}", self.rows.len(), statement.text());
        Ok(stream::iter(self.rows.clone().into_iter().map(Ok)).boxed())
    }
}
