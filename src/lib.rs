//! Convention-based mapping of plain Rust records to SQLite table rows.
//!
//! # Intention
//!
//! - Fetch rows as records, insert a record as a row, update a row from a
//!   record and delete a row by primary key.
//! - Describe each record type once, as an ordered table of field
//!   descriptors, and reuse it for all four operations.
//! - Return explicit results, with a best-effort view for callers that only
//!   want failures logged.
//!
//! # Architectural Boundaries
//!
//! - Only the record/row translation belongs here.
//! - Executing SQL is delegated to a [`DatabaseClient`]; [`SqliteClient`] is
//!   the bundled one.
//! - No query DSL, relationships, transactions, migrations or pooling.

pub mod client;
pub mod config;
pub mod error;
pub mod mapper;
pub mod query;
pub mod record;
pub mod sqlite;
pub mod value;

pub use client::{DatabaseClient, Row};
pub use config::MapperConfig;
pub use error::{Error, Result};
pub use mapper::{decode, BestEffort, Mapper};
pub use query::{Operation, Params, SqlQuery};
pub use record::{Field, Record};
pub use sqlite::SqliteClient;
pub use value::{ConversionError, FromValue, Value};
