use std::fmt;

/// Errors surfaced by report execution and the bundled sinks.
#[derive(Debug)]
pub enum Error {
    /// The underlying graph driver failed to connect or to execute a query.
    Graph(neo4rs::Error),
    /// A driver row could not be converted into an ordered column mapping.
    InvalidRow(String),
    /// A later row's columns disagree positionally with the schema fixed at
    /// the first row.
    SchemaMismatch {
        report: String,
        column: usize,
        expected: String,
        actual: String,
    },
    /// The CSV encoder rejected a record.
    Csv(csv::Error),
    /// A sink failed to write or flush its output.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Error::Graph(err) => write!(f, "Graph error: {}", err),
            Error::InvalidRow(msg) => write!(f, "Invalid row: {}", msg),
            Error::SchemaMismatch {
                report,
                column,
                expected,
                actual,
            } => write!(
                f,
                "Schema mismatch in report '{}' at column {}: expected '{}', found '{}'",
                report, column, expected, actual
            ),
            Error::Csv(err) => write!(f, "CSV error: {}", err),
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Graph(err) => Some(err),
            Error::Csv(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<neo4rs::Error> for Error {
    fn from(err: neo4rs::Error) -> Self {
        Error::Graph(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl Error {
    pub fn invalid_row(msg: impl Into<String>) -> Self {
        Error::InvalidRow(msg.into())
    }

    pub fn schema_mismatch(
        report: impl Into<String>,
        column: usize,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Error::SchemaMismatch {
            report: report.into(),
            column,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
