//! Neo4j (Bolt) executor adapter
//!
//! Wraps a pooled [`neo4rs`] graph handle behind the [`QueryExecutor`]
//! capability. Driver rows are deserialized into ordered JSON objects and
//! re-surfaced as [`Row`]s; scalar parameters are bound from the statement's
//! defaults overlaid with call-site parameters.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use neo4rs::{ConfigBuilder, Graph, Query, query};
use serde_json::Value;

use crate::config::ConnectionSettings;
use crate::cypher::CypherStatement;
use crate::error::Error;
use crate::executor::{QueryExecutor, Row, RowStream};

/// A [`QueryExecutor`] backed by a Neo4j Bolt connection pool.
pub struct Neo4jExecutor {
    graph: Graph,
}

impl Neo4jExecutor {
    /// Connects to the server described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is rejected or the connection
    /// cannot be established.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, Error> {
        let config = ConfigBuilder::default()
            .uri(settings.uri.as_str())
            .user(settings.user.as_str())
            .password(settings.password.as_str())
            .db(settings.database.as_str())
            .build()?;

        let graph = Graph::connect(config).await?;
        tracing::info!("Connected to Neo4j at {}", settings.uri);

        Ok(Self { graph })
    }

    /// Wraps an already-connected graph handle.
    #[must_use]
    pub fn from_graph(graph: Graph) -> Self {
        Self { graph }
    }
}

/// Binds one JSON parameter onto the driver query. Only scalars are bound;
/// nested values are passed as their JSON text and nulls are skipped.
fn bind_param(
    q: Query,
    name: &str,
    value: &Value,
) -> Query {
    match value {
        Value::Null => q,
        Value::Bool(b) => q.param(name, *b),
        Value::Number(n) if n.is_i64() => q.param(name, n.as_i64().unwrap_or_default()),
        Value::Number(n) => q.param(name, n.as_f64().unwrap_or_default()),
        Value::String(s) => q.param(name, s.as_str()),
        other => q.param(name, other.to_string()),
    }
}

/// Converts a driver row into an ordered column mapping.
fn convert_row(row: &neo4rs::Row) -> Result<Row, Error> {
    let value: Value = row
        .to::<Value>()
        .map_err(|e| Error::invalid_row(format!("row is not deserializable: {e}")))?;

    match value {
        Value::Object(map) => Ok(Row::from_pairs(map)),
        other => Err(Error::invalid_row(format!("expected a record, got: {other}"))),
    }
}

#[async_trait]
impl QueryExecutor for Neo4jExecutor {
    async fn execute(
        &self,
        statement: &CypherStatement,
        params: &HashMap<String, Value>,
    ) -> Result<RowStream, Error> {
        tracing::debug!("Executing Cypher: {}", statement.text());

        let mut q = query(statement.text());
        for (name, value) in statement.merged_params(params) {
            q = bind_param(q, &name, &value);
        }

        let raw = self.graph.execute(q).await?;

        let rows = stream::try_unfold(raw, |mut raw| async move {
            match raw.next().await {
                Ok(Some(row)) => {
                    let converted = convert_row(&row)?;
                    Ok(Some((converted, raw)))
                }
                Ok(None) => Ok(None),
                Err(e) => Err(Error::from(e)),
            }
        });

        Ok(rows.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bind_param_scalars() {
        let q = query("RETURN $a, $b, $c");
        let q = bind_param(q, "a", &json!(1));
        let q = bind_param(q, "b", &json!("x"));
        let _q = bind_param(q, "c", &json!(true));
    }

    #[test]
    fn test_bind_param_skips_null() {
        let q = query("RETURN 1");
        let _q = bind_param(q, "nothing", &Value::Null);
    }
}
