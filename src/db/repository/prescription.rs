use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::{Prescription, PrescriptionFields};

fn map_prescription(row: &Row) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        medicine_id: row.get(3)?,
        dosage: row.get(4)?,
        frequency: row.get(5)?,
        duration: row.get(6)?,
        instructions: row.get(7)?,
        diagnosis: row.get(8)?,
        prescribed_at: row.get(9)?,
    })
}

const PRESCRIPTION_COLUMNS: &str = "id, patient_id, doctor_id, medicine_id, dosage, frequency, \
     duration, instructions, diagnosis, prescribed_at";

/// Issue a prescription inside a single transaction: all three references
/// are checked against existing rows, and a failed check rolls back the
/// whole write.
pub fn create_prescription(
    conn: &mut Connection,
    fields: &PrescriptionFields,
    doctor_id: i64,
) -> Result<Prescription, DatabaseError> {
    if fields.dosage.trim().is_empty()
        || fields.frequency.trim().is_empty()
        || fields.duration.trim().is_empty()
    {
        return Err(DatabaseError::validation(
            "dosage, frequency, and duration are required",
        ));
    }

    let tx = conn.transaction()?;

    if !super::row_exists(&tx, "patients", fields.patient_id)? {
        return Err(DatabaseError::not_found("patient", fields.patient_id));
    }
    if !super::row_exists(&tx, "doctors", doctor_id)? {
        return Err(DatabaseError::not_found("doctor", doctor_id));
    }
    if !super::row_exists(&tx, "medicines", fields.medicine_id)? {
        return Err(DatabaseError::not_found("medicine", fields.medicine_id));
    }

    tx.execute(
        "INSERT INTO prescriptions (patient_id, doctor_id, medicine_id, dosage, frequency,
             duration, instructions, diagnosis, prescribed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            fields.patient_id,
            doctor_id,
            fields.medicine_id,
            fields.dosage,
            fields.frequency,
            fields.duration,
            fields.instructions,
            fields.diagnosis,
            Utc::now(),
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "prescription insert"))?;

    let id = tx.last_insert_rowid();
    tx.commit()?;

    get_prescription(conn, id)
}

pub fn get_prescription(conn: &Connection, id: i64) -> Result<Prescription, DatabaseError> {
    conn.query_row(
        &format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = ?1"),
        [id],
        map_prescription,
    )
    .optional()?
    .ok_or(DatabaseError::not_found("prescription", id))
}

/// List prescriptions, most recently prescribed first.
pub fn list_prescriptions(conn: &Connection) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions
         ORDER BY datetime(prescribed_at) DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], map_prescription)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Explicit reverse lookup instead of an ORM backref.
pub fn prescriptions_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions
         WHERE patient_id = ?1
         ORDER BY datetime(prescribed_at) DESC, id DESC"
    ))?;
    let rows = stmt.query_map([patient_id], map_prescription)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn count_prescriptions(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM prescriptions", [], |row| row.get(0))?;
    Ok(count)
}
