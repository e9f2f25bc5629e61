use crate::error::Result;
use crate::query::SqlQuery;
use crate::value::Value;

/// One result row: column names paired with their values, in select order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.push(name, value.into());
        self
    }

    pub fn push(&mut self, name: &str, value: Value) {
        self.columns.push((name.to_string(), value));
    }

    /// Value of the column named exactly `name`. The first match wins when a
    /// query returns duplicate column names.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(column, _)| column.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The collaborator that actually talks to a database.
///
/// Each call receives the connection string and is responsible for opening
/// and releasing its own connection.
pub trait DatabaseClient {
    /// Runs a statement that returns rows.
    fn query(&self, conn: &str, query: &SqlQuery) -> Result<Vec<Row>>;

    /// Runs a statement that returns no rows, yielding the affected row count.
    fn execute(&self, conn: &str, query: &SqlQuery) -> Result<usize>;
}

impl<C: DatabaseClient + ?Sized> DatabaseClient for &C {
    fn query(&self, conn: &str, query: &SqlQuery) -> Result<Vec<Row>> {
        (**self).query(conn, query)
    }

    fn execute(&self, conn: &str, query: &SqlQuery) -> Result<usize> {
        (**self).execute(conn, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_lookup_is_exact_and_case_sensitive() {
        let row = Row::new()
            .with_column("StudentID", 1i64)
            .with_column("Name", "Ana");

        assert_eq!(row.get("Name"), Some(&Value::Text("Ana".into())));
        assert_eq!(row.get("name"), None);
        assert_eq!(row.columns().collect::<Vec<_>>(), ["StudentID", "Name"]);
        assert_eq!(row.len(), 2);
    }
}
