use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::{Patient, PatientFields};

fn map_patient(row: &Row) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        gender: row.get(4)?,
        blood_group: row.get(5)?,
        contact_number: row.get(6)?,
        email: row.get(7)?,
        address: row.get(8)?,
        medical_history: row.get(9)?,
        allergies: row.get(10)?,
        current_medications: row.get(11)?,
        emergency_contact_name: row.get(12)?,
        emergency_contact_number: row.get(13)?,
        registered_by: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

const PATIENT_COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender, blood_group, \
     contact_number, email, address, medical_history, allergies, current_medications, \
     emergency_contact_name, emergency_contact_number, registered_by, created_at, updated_at";

/// Required fields plus the one date rule: date of birth must not lie in
/// the future. Runs before any write so a rejected payload never mutates
/// a row.
fn validate_fields(fields: &PatientFields) -> Result<(), DatabaseError> {
    if fields.first_name.trim().is_empty() || fields.last_name.trim().is_empty() {
        return Err(DatabaseError::validation("first and last name are required"));
    }
    if fields.gender.trim().is_empty() {
        return Err(DatabaseError::validation("gender is required"));
    }
    if fields.contact_number.trim().is_empty() {
        return Err(DatabaseError::validation("contact number is required"));
    }
    if fields.date_of_birth > Utc::now().date_naive() {
        return Err(DatabaseError::validation(
            "date of birth cannot be in the future",
        ));
    }
    Ok(())
}

/// Register a patient. `registered_by` must reference an existing doctor.
pub fn create_patient(
    conn: &Connection,
    fields: &PatientFields,
    registered_by: i64,
) -> Result<Patient, DatabaseError> {
    validate_fields(fields)?;
    if !super::doctor_exists(conn, registered_by)? {
        return Err(DatabaseError::not_found("doctor", registered_by));
    }

    let now = Utc::now();
    conn.execute(
        "INSERT INTO patients (first_name, last_name, date_of_birth, gender, blood_group,
             contact_number, email, address, medical_history, allergies, current_medications,
             emergency_contact_name, emergency_contact_number, registered_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            fields.first_name,
            fields.last_name,
            fields.date_of_birth,
            fields.gender,
            fields.blood_group,
            fields.contact_number,
            fields.email,
            fields.address,
            fields.medical_history,
            fields.allergies,
            fields.current_medications,
            fields.emergency_contact_name,
            fields.emergency_contact_number,
            registered_by,
            now,
            now,
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "patient insert"))?;

    get_patient(conn, conn.last_insert_rowid())
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Patient, DatabaseError> {
    conn.query_row(
        &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
        [id],
        map_patient,
    )
    .optional()?
    .ok_or(DatabaseError::not_found("patient", id))
}

/// Update patient fields in place. The registering doctor reference is
/// immutable and intentionally not touched. Last write wins;
/// `updated_at` is refreshed.
pub fn update_patient(
    conn: &Connection,
    id: i64,
    fields: &PatientFields,
) -> Result<Patient, DatabaseError> {
    validate_fields(fields)?;
    // Ensure the row exists before writing so callers get NotFound, not
    // a silent zero-row update.
    get_patient(conn, id)?;

    conn.execute(
        "UPDATE patients SET first_name = ?1, last_name = ?2, date_of_birth = ?3, gender = ?4,
             blood_group = ?5, contact_number = ?6, email = ?7, address = ?8,
             medical_history = ?9, allergies = ?10, current_medications = ?11,
             emergency_contact_name = ?12, emergency_contact_number = ?13, updated_at = ?14
         WHERE id = ?15",
        params![
            fields.first_name,
            fields.last_name,
            fields.date_of_birth,
            fields.gender,
            fields.blood_group,
            fields.contact_number,
            fields.email,
            fields.address,
            fields.medical_history,
            fields.allergies,
            fields.current_medications,
            fields.emergency_contact_name,
            fields.emergency_contact_number,
            Utc::now(),
            id,
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "patient update"))?;

    get_patient(conn, id)
}

/// List patients, most recently registered first. An optional search term
/// matches case-insensitive substrings of first name, last name, or
/// contact number.
pub fn list_patients(
    conn: &Connection,
    search: Option<&str>,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut out = Vec::new();
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(term) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PATIENT_COLUMNS} FROM patients
                 WHERE first_name LIKE '%' || ?1 || '%'
                    OR last_name LIKE '%' || ?1 || '%'
                    OR contact_number LIKE '%' || ?1 || '%'
                 ORDER BY datetime(created_at) DESC, id DESC"
            ))?;
            let rows = stmt.query_map([term], map_patient)?;
            for row in rows {
                out.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PATIENT_COLUMNS} FROM patients
                 ORDER BY datetime(created_at) DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], map_patient)?;
            for row in rows {
                out.push(row?);
            }
        }
    }
    Ok(out)
}

/// The most recently registered patients (dashboard view).
pub fn recent_patients(conn: &Connection, limit: u32) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         ORDER BY datetime(created_at) DESC, id DESC LIMIT ?1"
    ))?;
    let rows = stmt.query_map([limit], map_patient)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

pub fn count_patients_registered_by(
    conn: &Connection,
    doctor_id: i64,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM patients WHERE registered_by = ?1",
        [doctor_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::db::repository::insert_doctor;
    use crate::db::sqlite::open_memory_database;
    use crate::models::NewDoctor;

    fn setup() -> (Connection, i64) {
        let conn = open_memory_database().unwrap();
        let doctor = insert_doctor(
            &conn,
            &NewDoctor {
                username: "yuvaan".into(),
                name: "Dr. Yuvaan Srivastava".into(),
                password: String::new(),
                specialization: Some("Pediatrics".into()),
                contact: None,
                email: None,
            },
            "hash",
        )
        .unwrap();
        (conn, doctor.id)
    }

    fn fields(first: &str, contact: &str) -> PatientFields {
        PatientFields {
            first_name: first.into(),
            last_name: "Kumar".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1988, 3, 2).unwrap(),
            gender: "Male".into(),
            blood_group: Some("O+".into()),
            contact_number: contact.into(),
            email: Some("p@example.com".into()),
            address: Some("Jayanagar, Bengaluru".into()),
            medical_history: Some("Hypertension".into()),
            allergies: None,
            current_medications: None,
            emergency_contact_name: Some("Meera Kumar".into()),
            emergency_contact_number: Some("+91-9876511111".into()),
        }
    }

    #[test]
    fn create_then_get_returns_identical_fields() {
        let (conn, doctor_id) = setup();
        let created = create_patient(&conn, &fields("Ravi", "+91-9000000001"), doctor_id).unwrap();
        let fetched = get_patient(&conn, created.id).unwrap();

        assert_eq!(fetched.first_name, "Ravi");
        assert_eq!(fetched.last_name, "Kumar");
        assert_eq!(fetched.date_of_birth, NaiveDate::from_ymd_opt(1988, 3, 2).unwrap());
        assert_eq!(fetched.blood_group.as_deref(), Some("O+"));
        assert_eq!(fetched.contact_number, "+91-9000000001");
        assert_eq!(fetched.medical_history.as_deref(), Some("Hypertension"));
        assert_eq!(fetched.registered_by, doctor_id);
    }

    #[test]
    fn future_date_of_birth_rejected() {
        let (conn, doctor_id) = setup();
        let mut bad = fields("Ravi", "+91-9000000001");
        bad.date_of_birth = Utc::now().date_naive() + chrono::Duration::days(1);

        let err = create_patient(&conn, &bad, doctor_id).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)), "got {err}");
        assert_eq!(count_patients(&conn).unwrap(), 0);
    }

    #[test]
    fn update_to_future_dob_rejected_without_mutation() {
        let (conn, doctor_id) = setup();
        let created = create_patient(&conn, &fields("Ravi", "+91-9000000001"), doctor_id).unwrap();

        let mut bad = fields("Somebody", "+91-9000099999");
        bad.date_of_birth = Utc::now().date_naive() + chrono::Duration::days(30);
        let err = update_patient(&conn, created.id, &bad).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));

        // Row is untouched
        let fetched = get_patient(&conn, created.id).unwrap();
        assert_eq!(fetched.first_name, "Ravi");
        assert_eq!(fetched.contact_number, "+91-9000000001");
        assert_eq!(fetched.updated_at, created.updated_at);
    }

    #[test]
    fn missing_contact_number_rejected() {
        let (conn, doctor_id) = setup();
        let err = create_patient(&conn, &fields("Ravi", "  "), doctor_id).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[test]
    fn unknown_registering_doctor_rejected() {
        let (conn, _) = setup();
        let err = create_patient(&conn, &fields("Ravi", "+91-9000000001"), 999).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { entity: "doctor", .. }));
    }

    #[test]
    fn update_missing_patient_is_not_found() {
        let (conn, _) = setup();
        let err = update_patient(&conn, 42, &fields("Ravi", "+91-9000000001")).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { entity: "patient", .. }));
    }

    #[test]
    fn search_matches_name_and_contact_case_insensitive() {
        let (conn, doctor_id) = setup();
        create_patient(&conn, &fields("Ravi", "+91-9000000001"), doctor_id).unwrap();
        create_patient(&conn, &fields("Asha", "+91-9111111111"), doctor_id).unwrap();

        let by_name = list_patients(&conn, Some("ravi")).unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].first_name, "Ravi");

        let by_contact = list_patients(&conn, Some("9111")).unwrap();
        assert_eq!(by_contact.len(), 1);
        assert_eq!(by_contact[0].first_name, "Asha");

        let all = list_patients(&conn, None).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn listing_is_newest_first() {
        let (conn, doctor_id) = setup();
        let first = create_patient(&conn, &fields("Ravi", "+91-9000000001"), doctor_id).unwrap();
        let second = create_patient(&conn, &fields("Asha", "+91-9111111111"), doctor_id).unwrap();

        let all = list_patients(&conn, None).unwrap();
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        let recent = recent_patients(&conn, 1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, second.id);
    }

    #[test]
    fn per_doctor_count() {
        let (conn, doctor_id) = setup();
        create_patient(&conn, &fields("Ravi", "+91-9000000001"), doctor_id).unwrap();
        assert_eq!(count_patients_registered_by(&conn, doctor_id).unwrap(), 1);
        assert_eq!(count_patients_registered_by(&conn, doctor_id + 1).unwrap(), 0);
    }
}
