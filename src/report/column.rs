use serde::{Deserialize, Serialize};

use crate::cypher::CypherStatement;

/// Minimum display width a column starts from.
pub const DEFAULT_COLUMN_WIDTH: u16 = 4;

/// Semantic cell kind of a report column, resolved once when the schema is
/// fixed. Drives the decoding step; anything unrecognized decays to
/// `String`, which passes values through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::EnumString, strum::Display)]
pub enum ColumnType {
    #[default]
    String,
    Int,
    Double,
    Boolean,
    #[serde(rename = "BASE64:DECODE")]
    #[strum(serialize = "BASE64:DECODE")]
    Base64,
}

impl ColumnType {
    /// Parses a free-form type tag, defaulting to `String` for anything
    /// unknown.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        tag.parse::<Self>().unwrap_or_else(|_| {
            tracing::warn!("Unknown column type tag '{}', defaulting to String", tag);
            Self::String
        })
    }
}

/// One column of report schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportColumn {
    pub name: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default = "default_width")]
    pub width: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
}

const fn default_width() -> u16 {
    DEFAULT_COLUMN_WIDTH
}

impl ReportColumn {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::String,
            width: DEFAULT_COLUMN_WIDTH,
            format: String::new(),
        }
    }

    #[must_use]
    pub fn with_type(
        mut self,
        column_type: ColumnType,
    ) -> Self {
        self.column_type = column_type;
        self
    }

    #[must_use]
    pub fn with_width(
        mut self,
        width: u16,
    ) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_format(
        mut self,
        format: impl Into<String>,
    ) -> Self {
        self.format = format.into();
        self
    }
}

impl std::fmt::Display for ReportColumn {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}: {} (width: {})", self.name, self.column_type, self.width)
    }
}

/// Immutable definition of a report: its name, the query that feeds it, and
/// an optional predeclared column list. An empty list means "infer the
/// schema from the first row".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDefinition {
    pub report_name: String,
    pub query: CypherStatement,
    #[serde(default)]
    pub columns: Vec<ReportColumn>,
}

impl ReportDefinition {
    #[must_use]
    pub fn new(
        report_name: impl Into<String>,
        query: CypherStatement,
    ) -> Self {
        Self {
            report_name: report_name.into(),
            query,
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_columns(
        mut self,
        columns: Vec<ReportColumn>,
    ) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_column(
        mut self,
        column: ReportColumn,
    ) -> Self {
        self.columns.push(column);
        self
    }
}
