use crate::client::Row;
use crate::value::ConversionError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the mapper and its database client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open connection `{conn}`: {source}")]
    Connection {
        conn: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to execute `{sql}`: {source}")]
    Query {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The result set failed after `rows` had already been read.
    #[error("result set interrupted after {} row(s): {source}", .rows.len())]
    Interrupted {
        rows: Vec<Row>,
        #[source]
        source: Box<Error>,
    },

    #[error("field `{field}` ({ty}): {source}")]
    Conversion {
        field: &'static str,
        ty: &'static str,
        #[source]
        source: ConversionError,
    },

    #[error("result set has no column named `{field}`")]
    MissingColumn { field: &'static str },

    #[error("{record} must mark exactly one field as primary key, found {found}")]
    MissingPrimaryKey { record: &'static str, found: usize },

    #[error("{record} has no value for its primary key `{key}`")]
    NullPrimaryKey {
        record: &'static str,
        key: &'static str,
    },

    #[error("{record} has no non-key field with a value to update")]
    NothingToUpdate { record: &'static str },
}

impl Error {
    /// True for failures raised while talking to the database, as opposed to
    /// problems with the record itself.
    pub fn is_database(&self) -> bool {
        matches!(
            self,
            Error::Connection { .. } | Error::Query { .. } | Error::Interrupted { .. }
        )
    }

    /// Rows retrieved before the failure, if any were.
    pub fn into_partial_rows(self) -> Vec<Row> {
        match self {
            Error::Interrupted { rows, .. } => rows,
            _ => Vec::new(),
        }
    }
}
