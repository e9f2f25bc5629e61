use crate::client::{DatabaseClient, Row};
use crate::config::MapperConfig;
use crate::error::{Error, Result};
use crate::query::{self, Operation, SqlQuery};
use crate::record::Record;
use crate::sqlite::SqliteClient;
use log::{debug, error, info, warn};

/// Maps record types to table rows through a [`DatabaseClient`].
///
/// Every operation takes the connection string explicitly; the mapper keeps
/// no connection between calls.
#[derive(Debug, Default, Clone)]
pub struct Mapper<C = SqliteClient> {
    client: C,
    config: MapperConfig,
}

impl Mapper<SqliteClient> {
    /// A mapper over SQLite with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sqlite(config: MapperConfig) -> Self {
        Self::with_client(SqliteClient, config)
    }
}

impl<C: DatabaseClient> Mapper<C> {
    pub fn with_client(client: C, config: MapperConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// View of this mapper that absorbs every error.
    pub fn best_effort(&self) -> BestEffort<'_, C> {
        BestEffort { mapper: self }
    }

    /// Runs `sql` and returns the raw rows.
    pub fn fetch_rows(&self, sql: &str, conn: &str) -> Result<Vec<Row>> {
        let query = SqlQuery::new(sql);
        self.trace(&query);
        self.client.query(conn, &query).map_err(|err| {
            debug!("fetch failed: {}", err);
            err
        })
    }

    /// Runs `sql` and decodes every returned row into `R`, preserving order.
    ///
    /// Columns are matched to fields by name. A NULL column leaves the field
    /// at its default. Unless `strict_fields` is set, a field that cannot be
    /// decoded is also left at its default.
    pub fn fetch<R: Record>(&self, sql: &str, conn: &str) -> Result<Vec<R>> {
        let rows = self.fetch_rows(sql, conn)?;
        self.decode_all(&rows)
    }

    fn decode_all<R: Record>(&self, rows: &[Row]) -> Result<Vec<R>> {
        rows.iter()
            .map(|row| decode(row, self.config.strict_fields))
            .collect()
    }

    /// Writes `record` as a new row of `table`.
    pub fn insert<R: Record>(&self, record: &R, conn: &str, table: &str) -> Result<usize> {
        let query = query::insert_statement(record, table);
        self.mutate::<R>(Operation::Insert, Ok(query), conn)
    }

    /// Overwrites the row of `table` keyed by the record's primary key.
    /// Fields without a value keep their stored column value.
    pub fn update<R: Record>(&self, record: &R, conn: &str, table: &str) -> Result<usize> {
        let query = query::update_statement(record, table);
        self.mutate::<R>(Operation::Update, query, conn)
    }

    /// Deletes the row of `table` keyed by the record's primary key.
    pub fn delete<R: Record>(&self, record: &R, conn: &str, table: &str) -> Result<usize> {
        let query = query::delete_statement(record, table);
        self.mutate::<R>(Operation::Delete, query, conn)
    }

    fn mutate<R: Record>(
        &self,
        operation: Operation,
        query: Result<SqlQuery>,
        conn: &str,
    ) -> Result<usize> {
        let result = query.and_then(|query| {
            self.trace(&query);
            self.client.execute(conn, &query)
        });

        match &result {
            Ok(count) => {
                info!("{} {}", R::NAME, operation.past_tense());
                debug!("{} affected {} row(s)", operation, count);
            }
            Err(err) => error!("{} {} failed: {}", R::NAME, operation, err),
        }
        result
    }

    fn trace(&self, query: &SqlQuery) {
        if self.config.debug {
            info!("{}", query);
        } else {
            debug!("{}", query);
        }
    }
}

/// Builds a record from a row, field by field.
pub fn decode<R: Record>(row: &Row, strict: bool) -> Result<R> {
    let mut record = R::default();

    for field in R::FIELDS {
        let value = match row.get(field.name) {
            Some(value) => value,
            None if strict => return Err(Error::MissingColumn { field: field.name }),
            None => {
                warn!("{}: no column named `{}`", R::NAME, field.name);
                continue;
            }
        };

        if value.is_null() {
            continue;
        }

        if let Err(source) = (field.set)(&mut record, value) {
            if strict {
                return Err(Error::Conversion {
                    field: field.name,
                    ty: field.ty,
                    source,
                });
            }
            warn!("{}.{} ({}): {}", R::NAME, field.name, field.ty, source);
        }
    }

    Ok(record)
}

/// A [`Mapper`] view that never fails.
///
/// Fetches return whatever rows were retrieved before a failure, which is
/// nothing when the query never ran. Mutations return nothing. Failures only
/// reach the log.
#[derive(Debug, Clone, Copy)]
pub struct BestEffort<'a, C> {
    mapper: &'a Mapper<C>,
}

impl<C: DatabaseClient> BestEffort<'_, C> {
    pub fn fetch_rows(&self, sql: &str, conn: &str) -> Vec<Row> {
        self.mapper
            .fetch_rows(sql, conn)
            .unwrap_or_else(Error::into_partial_rows)
    }

    pub fn fetch<R: Record>(&self, sql: &str, conn: &str) -> Vec<R> {
        let rows = self.fetch_rows(sql, conn);
        self.mapper.decode_all(&rows).unwrap_or_default()
    }

    pub fn insert<R: Record>(&self, record: &R, conn: &str, table: &str) {
        let _ = self.mapper.insert(record, conn, table);
    }

    pub fn update<R: Record>(&self, record: &R, conn: &str, table: &str) {
        let _ = self.mapper.update(record, conn, table);
    }

    pub fn delete<R: Record>(&self, record: &R, conn: &str, table: &str) {
        let _ = self.mapper.delete(record, conn, table);
    }
}
