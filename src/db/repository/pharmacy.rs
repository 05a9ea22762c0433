use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::{Pharmacy, PharmacyFields};

fn map_pharmacy(row: &Row) -> rusqlite::Result<Pharmacy> {
    Ok(Pharmacy {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        contact_number: row.get(3)?,
        email: row.get(4)?,
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        operating_hours: row.get(7)?,
        is_active: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

const PHARMACY_COLUMNS: &str = "id, name, address, contact_number, email, latitude, longitude, \
     operating_hours, is_active, created_at, updated_at";

/// Stored coordinates are range-checked at write time; only query-side
/// reference coordinates skip the range check.
fn validate_fields(fields: &PharmacyFields) -> Result<(), DatabaseError> {
    if fields.name.trim().is_empty() {
        return Err(DatabaseError::validation("pharmacy name is required"));
    }
    if fields.address.trim().is_empty() || fields.contact_number.trim().is_empty() {
        return Err(DatabaseError::validation(
            "pharmacy address and contact number are required",
        ));
    }
    if !(-90.0..=90.0).contains(&fields.latitude) {
        return Err(DatabaseError::validation(format!(
            "latitude {} outside [-90, 90]",
            fields.latitude
        )));
    }
    if !(-180.0..=180.0).contains(&fields.longitude) {
        return Err(DatabaseError::validation(format!(
            "longitude {} outside [-180, 180]",
            fields.longitude
        )));
    }
    Ok(())
}

pub fn create_pharmacy(
    conn: &Connection,
    fields: &PharmacyFields,
) -> Result<Pharmacy, DatabaseError> {
    validate_fields(fields)?;

    let now = Utc::now();
    conn.execute(
        "INSERT INTO pharmacies (name, address, contact_number, email, latitude, longitude,
             operating_hours, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            fields.name,
            fields.address,
            fields.contact_number,
            fields.email,
            fields.latitude,
            fields.longitude,
            fields.operating_hours,
            fields.is_active,
            now,
            now,
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "pharmacy insert"))?;

    get_pharmacy(conn, conn.last_insert_rowid())
}

pub fn get_pharmacy(conn: &Connection, id: i64) -> Result<Pharmacy, DatabaseError> {
    conn.query_row(
        &format!("SELECT {PHARMACY_COLUMNS} FROM pharmacies WHERE id = ?1"),
        [id],
        map_pharmacy,
    )
    .optional()?
    .ok_or(DatabaseError::not_found("pharmacy", id))
}

/// Update a pharmacy in place. Setting `is_active = false` is the only
/// delete path.
pub fn update_pharmacy(
    conn: &Connection,
    id: i64,
    fields: &PharmacyFields,
) -> Result<Pharmacy, DatabaseError> {
    validate_fields(fields)?;
    get_pharmacy(conn, id)?;

    conn.execute(
        "UPDATE pharmacies SET name = ?1, address = ?2, contact_number = ?3, email = ?4,
             latitude = ?5, longitude = ?6, operating_hours = ?7, is_active = ?8, updated_at = ?9
         WHERE id = ?10",
        params![
            fields.name,
            fields.address,
            fields.contact_number,
            fields.email,
            fields.latitude,
            fields.longitude,
            fields.operating_hours,
            fields.is_active,
            Utc::now(),
            id,
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "pharmacy update"))?;

    get_pharmacy(conn, id)
}

/// List pharmacies, most recently created first. Search matches name,
/// address, or contact number, case-insensitive. Inactive pharmacies are
/// hidden unless requested.
pub fn list_pharmacies(
    conn: &Connection,
    search: Option<&str>,
    include_inactive: bool,
) -> Result<Vec<Pharmacy>, DatabaseError> {
    let term = search.map(str::trim).filter(|s| !s.is_empty());
    let sql = format!(
        "SELECT {PHARMACY_COLUMNS} FROM pharmacies
         WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%'
                OR address LIKE '%' || ?1 || '%'
                OR contact_number LIKE '%' || ?1 || '%')
           AND (?2 OR is_active)
         ORDER BY datetime(created_at) DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![term, include_inactive], map_pharmacy)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// All active pharmacies, id ascending: the input set for the proximity
/// finder.
pub fn active_pharmacies(conn: &Connection) -> Result<Vec<Pharmacy>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PHARMACY_COLUMNS} FROM pharmacies WHERE is_active ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map([], map_pharmacy)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Natural-key lookup (name) used by idempotent seeding.
pub fn find_pharmacy_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Pharmacy>, DatabaseError> {
    let pharmacy = conn
        .query_row(
            &format!("SELECT {PHARMACY_COLUMNS} FROM pharmacies WHERE name = ?1 LIMIT 1"),
            [name],
            map_pharmacy,
        )
        .optional()?;
    Ok(pharmacy)
}

pub fn count_pharmacies(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM pharmacies", [], |row| row.get(0))?;
    Ok(count)
}
