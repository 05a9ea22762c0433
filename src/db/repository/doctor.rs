use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::{Doctor, NewDoctor};

fn map_doctor(row: &Row) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        specialization: row.get(4)?,
        contact: row.get(5)?,
        email: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const DOCTOR_COLUMNS: &str =
    "id, username, name, password_hash, specialization, contact, email, created_at, updated_at";

/// Insert a doctor account. The password must already be hashed by the
/// caller; plaintext never reaches this layer.
pub fn insert_doctor(
    conn: &Connection,
    new: &NewDoctor,
    password_hash: &str,
) -> Result<Doctor, DatabaseError> {
    if new.username.trim().is_empty() || new.name.trim().is_empty() {
        return Err(DatabaseError::validation("username and name are required"));
    }

    let now = Utc::now();
    conn.execute(
        "INSERT INTO doctors (username, name, password_hash, specialization, contact, email, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            new.username,
            new.name,
            password_hash,
            new.specialization,
            new.contact,
            new.email,
            now,
            now,
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "doctor username must be unique"))?;

    get_doctor(conn, conn.last_insert_rowid())
}

pub fn get_doctor(conn: &Connection, id: i64) -> Result<Doctor, DatabaseError> {
    conn.query_row(
        &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"),
        [id],
        map_doctor,
    )
    .optional()?
    .ok_or(DatabaseError::not_found("doctor", id))
}

pub fn find_doctor_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE username = ?1"),
            [username],
            map_doctor,
        )
        .optional()?;
    Ok(doctor)
}

pub fn doctor_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    super::row_exists(conn, "doctors", id)
}

pub fn count_doctors(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn sample() -> NewDoctor {
        NewDoctor {
            username: "kaashvi".into(),
            name: "Dr. Kaashvi Srivastava".into(),
            password: "unused-here".into(),
            specialization: Some("General Medicine".into()),
            contact: Some("+91-9876543210".into()),
            email: Some("kaashvi@sksmedical.com".into()),
        }
    }

    #[test]
    fn insert_and_fetch_roundtrip() {
        let conn = open_memory_database().unwrap();
        let created = insert_doctor(&conn, &sample(), "hashed").unwrap();
        let fetched = get_doctor(&conn, created.id).unwrap();
        assert_eq!(fetched.username, "kaashvi");
        assert_eq!(fetched.password_hash, "hashed");
        assert_eq!(fetched.specialization.as_deref(), Some("General Medicine"));
    }

    #[test]
    fn duplicate_username_is_conflict() {
        let conn = open_memory_database().unwrap();
        insert_doctor(&conn, &sample(), "h1").unwrap();
        let err = insert_doctor(&conn, &sample(), "h2").unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)), "got {err}");
    }

    #[test]
    fn find_by_username_misses_cleanly() {
        let conn = open_memory_database().unwrap();
        assert!(find_doctor_by_username(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn empty_username_rejected() {
        let conn = open_memory_database().unwrap();
        let mut bad = sample();
        bad.username = "  ".into();
        let err = insert_doctor(&conn, &bad, "h").unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }
}
