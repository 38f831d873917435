//! Cypher statement composition
//!
//! A small string-assembly layer for Cypher: [`CypherStatement`] bundles the
//! query text with a human description and default parameters, and
//! [`CypherBuilder`] assembles multi-clause statements line by line. This is
//! composition only; no parsing and no validation of the resulting text.

pub mod apoc;

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static IDENTIFIER: OnceLock<Regex> = OnceLock::new();

fn identifier_pattern() -> &'static Regex {
    IDENTIFIER.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

/// Backtick-quotes `name` unless it is already a plain Cypher identifier.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    if identifier_pattern().is_match(name) {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

/// An executable Cypher statement: query text, a description for logs, and
/// default parameters merged under caller-supplied ones at execution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CypherStatement {
    description: String,
    text: String,
    #[serde(default)]
    defaults: HashMap<String, Value>,
}

impl CypherStatement {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            description: String::new(),
            text: text.into(),
            defaults: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_description(
        mut self,
        description: impl Into<String>,
    ) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_default(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn defaults(&self) -> &HashMap<String, Value> {
        &self.defaults
    }

    /// Default parameters overlaid with `params` (caller wins on conflict).
    #[must_use]
    pub fn merged_params(
        &self,
        params: &HashMap<String, Value>,
    ) -> HashMap<String, Value> {
        let mut merged = self.defaults.clone();
        for (name, value) in params {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }
}

impl fmt::Display for CypherStatement {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.text)
        } else {
            write!(f, "{}: {}", self.description, self.text)
        }
    }
}

/// Line-oriented Cypher assembly. Clauses are appended in call order and
/// joined with newlines by [`CypherBuilder::build`].
#[derive(Debug, Default)]
pub struct CypherBuilder {
    lines: Vec<String>,
}

impl CypherBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn match_clause(
        mut self,
        pattern: &str,
    ) -> Self {
        self.lines.push(format!("MATCH {pattern}"));
        self
    }

    #[must_use]
    pub fn optional_match(
        mut self,
        pattern: &str,
    ) -> Self {
        self.lines.push(format!("OPTIONAL MATCH {pattern}"));
        self
    }

    #[must_use]
    pub fn where_clause(
        mut self,
        condition: &str,
    ) -> Self {
        self.lines.push(format!("WHERE {condition}"));
        self
    }

    #[must_use]
    pub fn unwind(
        mut self,
        expression: &str,
        alias: &str,
    ) -> Self {
        self.lines.push(format!("UNWIND {expression} AS {}", quote_identifier(alias)));
        self
    }

    #[must_use]
    pub fn with_clause(
        mut self,
        projection: &str,
    ) -> Self {
        self.lines.push(format!("WITH {projection}"));
        self
    }

    #[must_use]
    pub fn call(
        mut self,
        procedure: &str,
    ) -> Self {
        self.lines.push(format!("CALL {procedure}"));
        self
    }

    #[must_use]
    pub fn return_clause(
        mut self,
        projection: &str,
    ) -> Self {
        self.lines.push(format!("RETURN {projection}"));
        self
    }

    #[must_use]
    pub fn order_by(
        mut self,
        expression: &str,
    ) -> Self {
        self.lines.push(format!("ORDER BY {expression}"));
        self
    }

    #[must_use]
    pub fn skip(
        mut self,
        count: u64,
    ) -> Self {
        self.lines.push(format!("SKIP {count}"));
        self
    }

    #[must_use]
    pub fn limit(
        mut self,
        count: u64,
    ) -> Self {
        self.lines.push(format!("LIMIT {count}"));
        self
    }

    /// Appends a raw clause verbatim.
    #[must_use]
    pub fn raw(
        mut self,
        clause: impl Into<String>,
    ) -> Self {
        self.lines.push(clause.into());
        self
    }

    #[must_use]
    pub fn build(self) -> CypherStatement {
        CypherStatement::new(self.lines.join("\n"))
    }
}
