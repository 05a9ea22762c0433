//! Repository layer: entity-scoped database operations.
//!
//! One sub-module per entity; all public functions are re-exported here.
//! Functions take an explicit `&Connection` handle so the core stays
//! testable against an in-memory database.

mod doctor;
mod medicine;
mod patient;
mod pharmacy;
mod prescription;

pub use doctor::*;
pub use medicine::*;
pub use patient::*;
pub use pharmacy::*;
pub use prescription::*;

use rusqlite::Connection;

use super::DatabaseError;

/// Check whether a row with the given id exists in `table`.
/// `table` must be a compile-time constant, never user input.
pub(crate) fn row_exists(
    conn: &Connection,
    table: &'static str,
    id: i64,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE id = ?1"),
        [id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
