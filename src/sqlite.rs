use crate::client::{DatabaseClient, Row};
use crate::error::{Error, Result};
use crate::query::SqlQuery;
use crate::value::Value;
use log::trace;
use rusqlite::{types::ToSql, Connection, Rows};

/// [`DatabaseClient`] backed by SQLite.
///
/// The connection string is a database file path, `:memory:`, or a
/// `file:` URI. A connection is opened for every call and closed when the
/// call returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteClient;

impl SqliteClient {
    pub fn new() -> Self {
        Self
    }

    fn open(conn: &str) -> Result<Connection> {
        trace!("opening sqlite connection: {}", conn);
        Connection::open(conn).map_err(|source| Error::Connection {
            conn: conn.to_string(),
            source,
        })
    }
}

fn query_error(query: &SqlQuery) -> impl FnOnce(rusqlite::Error) -> Error + '_ {
    move |source| Error::Query {
        sql: query.statement.clone(),
        source,
    }
}

fn named_params(query: &SqlQuery) -> Vec<(&str, &dyn ToSql)> {
    query
        .params
        .values
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}

fn read_row(rows: &mut Rows<'_>, names: &[String]) -> rusqlite::Result<Option<Row>> {
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let mut mapped = Row::new();
    for (index, name) in names.iter().enumerate() {
        mapped.push(name, Value::from(row.get_ref(index)?));
    }
    Ok(Some(mapped))
}

impl DatabaseClient for SqliteClient {
    fn query(&self, conn: &str, query: &SqlQuery) -> Result<Vec<Row>> {
        let connection = Self::open(conn)?;
        let mut stmt = connection
            .prepare(&query.statement)
            .map_err(query_error(query))?;

        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let params = named_params(query);
        let mut rows = stmt.query(params.as_slice()).map_err(query_error(query))?;

        let mut result = Vec::new();
        loop {
            match read_row(&mut rows, &names) {
                Ok(Some(row)) => result.push(row),
                Ok(None) => return Ok(result),
                Err(source) => {
                    return Err(Error::Interrupted {
                        rows: result,
                        source: Box::new(query_error(query)(source)),
                    })
                }
            }
        }
    }

    fn execute(&self, conn: &str, query: &SqlQuery) -> Result<usize> {
        let connection = Self::open(conn)?;
        let mut stmt = connection
            .prepare(&query.statement)
            .map_err(query_error(query))?;

        let params = named_params(query);
        stmt.execute(params.as_slice()).map_err(query_error(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Params;
    use tempfile::NamedTempFile;

    fn temp_db() -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let conn = Connection::open(file.path()).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                score REAL,
                avatar BLOB
            );
            "#,
        )
        .unwrap();
        file
    }

    #[test]
    fn execute_and_query_with_named_params() {
        let file = temp_db();
        let path = file.path().to_str().unwrap();
        let client = SqliteClient::new();

        let insert = SqlQuery::new(
            "INSERT INTO users (id, name, score, avatar) VALUES (@id, @name, @score, @avatar)",
        )
        .with_params(
            Params::new()
                .with_value("@id", 1i64)
                .with_value("@name", "John Doe")
                .with_value("@score", None::<f64>)
                .with_value("@avatar", vec![1u8, 2, 3]),
        );
        assert_eq!(client.execute(path, &insert).unwrap(), 1);

        let rows = client
            .query(path, &SqlQuery::new("SELECT id, name, score, avatar FROM users"))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&Value::Integer(1)));
        assert_eq!(rows[0].get("name"), Some(&Value::Text("John Doe".into())));
        assert_eq!(rows[0].get("score"), Some(&Value::Null));
        assert_eq!(rows[0].get("avatar"), Some(&Value::Blob(vec![1, 2, 3])));
    }

    #[test]
    fn malformed_sql_is_a_query_error() {
        let file = temp_db();
        let path = file.path().to_str().unwrap();

        let err = SqliteClient
            .query(path, &SqlQuery::new("SELEKT * FROM users"))
            .unwrap_err();
        assert!(matches!(err, Error::Query { .. }));
        assert!(err.is_database());
    }

    #[test]
    fn unreachable_database_is_a_connection_error() {
        let err = SqliteClient
            .execute("/nonexistent/dir/db.sqlite", &SqlQuery::new("SELECT 1"))
            .unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
    }
}
