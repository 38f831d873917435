//! APOC procedure call builders
//!
//! String assembly for the APOC procedures this layer leans on: JSON and
//! JDBC ingestion plus `apoc.periodic.iterate` batching. Inner statements
//! are single-quote escaped before embedding.

use super::CypherStatement;

/// Escapes a statement for embedding inside a single-quoted APOC argument.
fn escape_inner(statement: &str) -> String {
    statement.replace('\\', "\\\\").replace('\'', "\\'")
}

/// `CALL apoc.load.json($url)` yielding each JSON value as `value`.
#[must_use]
pub fn load_json(url_param: &str) -> CypherStatement {
    CypherStatement::new(format!("CALL apoc.load.json(${url_param}) YIELD value"))
        .with_description("apoc.load.json")
}

/// `CALL apoc.load.jdbc($jdbc, '<query>')` yielding each result row as `row`.
#[must_use]
pub fn load_jdbc(
    jdbc_param: &str,
    query: &str,
) -> CypherStatement {
    CypherStatement::new(format!(
        "CALL apoc.load.jdbc(${jdbc_param}, '{}') YIELD row",
        escape_inner(query)
    ))
    .with_description("apoc.load.jdbc")
}

/// `CALL apoc.periodic.iterate('<outer>', '<inner>', {batchSize: n,
/// parallel: b})`: batched execution of `inner` over the rows produced by
/// `outer`.
#[must_use]
pub fn periodic_iterate(
    outer: &str,
    inner: &str,
    batch_size: u32,
    parallel: bool,
) -> CypherStatement {
    CypherStatement::new(format!(
        "CALL apoc.periodic.iterate('{}', '{}', {{batchSize: {batch_size}, parallel: {parallel}}})",
        escape_inner(outer),
        escape_inner(inner)
    ))
    .with_description("apoc.periodic.iterate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json() {
        let statement = load_json("url");
        assert_eq!(statement.text(), "CALL apoc.load.json($url) YIELD value");
    }

    #[test]
    fn test_load_jdbc_escapes_quotes() {
        let statement = load_jdbc("jdbc", "SELECT * FROM t WHERE name = 'x'");
        assert_eq!(
            statement.text(),
            "CALL apoc.load.jdbc($jdbc, 'SELECT * FROM t WHERE name = \\'x\\'') YIELD row"
        );
    }

    #[test]
    fn test_periodic_iterate() {
        let statement = periodic_iterate("MATCH (n) RETURN n", "DETACH DELETE n", 1000, false);
        assert_eq!(
            statement.text(),
            "CALL apoc.periodic.iterate('MATCH (n) RETURN n', 'DETACH DELETE n', {batchSize: 1000, parallel: false})"
        );
    }
}
