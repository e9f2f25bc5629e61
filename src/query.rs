use crate::error::{Error, Result};
use crate::record::{Field, Record};
use crate::value::Value;
use std::fmt;

/// Named parameter bindings for SQL queries, in binding order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    pub values: Vec<(String, Value)>,
}

impl Params {
    /// Create a new Params object
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named value. `name` is the full placeholder, e.g. `@Name`.
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.push(name, value.into());
        self
    }

    pub fn push(&mut self, name: &str, value: Value) {
        self.values.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// SQL statement with typed parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub statement: String,
    pub params: Params,
}

impl SqlQuery {
    pub fn new(statement: &str) -> Self {
        Self {
            statement: statement.to_string(),
            params: Params::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

impl fmt::Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.statement)?;
        for (i, (name, value)) in self.params.values.iter().enumerate() {
            let sep = if i == 0 { " -- " } else { ", " };
            write!(f, "{sep}{name} = {value}")?;
        }
        Ok(())
    }
}

/// Mutating operations, as reported to the operator log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn past_tense(self) -> &'static str {
        match self {
            Operation::Insert => "inserted",
            Operation::Update => "updated",
            Operation::Delete => "deleted",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        })
    }
}

fn placeholder(column: &str) -> String {
    format!("@{column}")
}

/// `INSERT INTO <table> (<columns>) VALUES (@<column>, ...)` binding every
/// field, absent values as NULL.
pub fn insert_statement<R: Record>(record: &R, table: &str) -> SqlQuery {
    let mut columns = Vec::with_capacity(R::FIELDS.len());
    let mut placeholders = Vec::with_capacity(R::FIELDS.len());
    let mut params = Params::new();

    for (column, value) in record.values() {
        let name = placeholder(column);
        columns.push(column);
        params.push(&name, value);
        placeholders.push(name);
    }

    let statement = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );
    SqlQuery::new(&statement).with_params(params)
}

/// `UPDATE <table> SET ... WHERE <key> = @<key>`.
///
/// Non-key fields holding [`Value::Null`] are left out of the SET list, so
/// the stored column keeps its value.
pub fn update_statement<R: Record>(record: &R, table: &str) -> Result<SqlQuery> {
    let (key, key_value) = bound_key(record)?;

    let mut assignments = Vec::new();
    let mut params = Params::new();
    for field in R::FIELDS.iter().filter(|field| !field.primary_key) {
        let value = (field.get)(record);
        if value.is_null() {
            continue;
        }
        let name = placeholder(field.name);
        assignments.push(format!("{} = {}", field.name, name));
        params.push(&name, value);
    }

    if assignments.is_empty() {
        return Err(Error::NothingToUpdate { record: R::NAME });
    }

    let key_name = placeholder(key.name);
    let statement = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        table,
        assignments.join(", "),
        key.name,
        key_name
    );
    params.push(&key_name, key_value);
    Ok(SqlQuery::new(&statement).with_params(params))
}

/// `DELETE FROM <table> WHERE <key> = @<key>`.
pub fn delete_statement<R: Record>(record: &R, table: &str) -> Result<SqlQuery> {
    let (key, key_value) = bound_key(record)?;

    let key_name = placeholder(key.name);
    let statement = format!("DELETE FROM {} WHERE {} = {}", table, key.name, key_name);
    Ok(SqlQuery::new(&statement).with_params(Params::new().with_value(&key_name, key_value)))
}

fn bound_key<R: Record>(record: &R) -> Result<(&'static Field<R>, Value)> {
    let key = R::key_field()?;
    let value = (key.get)(record);
    if value.is_null() {
        return Err(Error::NullPrimaryKey {
            record: R::NAME,
            key: key.name,
        });
    }
    Ok((key, value))
}
