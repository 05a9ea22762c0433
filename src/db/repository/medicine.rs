use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::{Medicine, MedicineFields};

fn map_medicine(row: &Row) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        id: row.get(0)?,
        name: row.get(1)?,
        generic_name: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        dosage_form: row.get(5)?,
        strength: row.get(6)?,
        manufacturer: row.get(7)?,
        is_active: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

const MEDICINE_COLUMNS: &str = "id, name, generic_name, description, category, dosage_form, \
     strength, manufacturer, is_active, created_at, updated_at";

pub fn create_medicine(
    conn: &Connection,
    fields: &MedicineFields,
) -> Result<Medicine, DatabaseError> {
    if fields.name.trim().is_empty() {
        return Err(DatabaseError::validation("medicine name is required"));
    }

    let now = Utc::now();
    conn.execute(
        "INSERT INTO medicines (name, generic_name, description, category, dosage_form,
             strength, manufacturer, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            fields.name,
            fields.generic_name,
            fields.description,
            fields.category,
            fields.dosage_form,
            fields.strength,
            fields.manufacturer,
            fields.is_active,
            now,
            now,
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "medicine insert"))?;

    get_medicine(conn, conn.last_insert_rowid())
}

pub fn get_medicine(conn: &Connection, id: i64) -> Result<Medicine, DatabaseError> {
    conn.query_row(
        &format!("SELECT {MEDICINE_COLUMNS} FROM medicines WHERE id = ?1"),
        [id],
        map_medicine,
    )
    .optional()?
    .ok_or(DatabaseError::not_found("medicine", id))
}

/// Update a medicine in place. Setting `is_active = false` is the only
/// delete path (soft deactivation keeps prescription references valid).
pub fn update_medicine(
    conn: &Connection,
    id: i64,
    fields: &MedicineFields,
) -> Result<Medicine, DatabaseError> {
    if fields.name.trim().is_empty() {
        return Err(DatabaseError::validation("medicine name is required"));
    }
    get_medicine(conn, id)?;

    conn.execute(
        "UPDATE medicines SET name = ?1, generic_name = ?2, description = ?3, category = ?4,
             dosage_form = ?5, strength = ?6, manufacturer = ?7, is_active = ?8, updated_at = ?9
         WHERE id = ?10",
        params![
            fields.name,
            fields.generic_name,
            fields.description,
            fields.category,
            fields.dosage_form,
            fields.strength,
            fields.manufacturer,
            fields.is_active,
            Utc::now(),
            id,
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "medicine update"))?;

    get_medicine(conn, id)
}

/// List medicines alphabetically. Search matches name or generic name,
/// case-insensitive. Inactive medicines are hidden unless requested.
pub fn list_medicines(
    conn: &Connection,
    search: Option<&str>,
    include_inactive: bool,
) -> Result<Vec<Medicine>, DatabaseError> {
    let term = search.map(str::trim).filter(|s| !s.is_empty());
    let sql = format!(
        "SELECT {MEDICINE_COLUMNS} FROM medicines
         WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%' OR generic_name LIKE '%' || ?1 || '%')
           AND (?2 OR is_active)
         ORDER BY name COLLATE NOCASE ASC, id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![term, include_inactive], map_medicine)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Natural-key lookup (name + strength) used by idempotent seeding.
pub fn find_medicine_by_name_strength(
    conn: &Connection,
    name: &str,
    strength: Option<&str>,
) -> Result<Option<Medicine>, DatabaseError> {
    let medicine = conn
        .query_row(
            &format!(
                "SELECT {MEDICINE_COLUMNS} FROM medicines
                 WHERE name = ?1 AND strength IS ?2 LIMIT 1"
            ),
            params![name, strength],
            map_medicine,
        )
        .optional()?;
    Ok(medicine)
}

pub fn medicine_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    super::row_exists(conn, "medicines", id)
}

pub fn count_medicines(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM medicines", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn fields(name: &str, strength: &str) -> MedicineFields {
        MedicineFields {
            name: name.into(),
            generic_name: Some("Acetaminophen".into()),
            description: Some("Fever and mild pain relief".into()),
            category: Some("Pain Relief".into()),
            dosage_form: Some("Tablet".into()),
            strength: Some(strength.into()),
            manufacturer: Some("GSK Pharmaceuticals".into()),
            is_active: true,
        }
    }

    #[test]
    fn create_and_fetch() {
        let conn = open_memory_database().unwrap();
        let created = create_medicine(&conn, &fields("Paracetamol", "500mg")).unwrap();
        let fetched = get_medicine(&conn, created.id).unwrap();
        assert_eq!(fetched.name, "Paracetamol");
        assert_eq!(fetched.strength.as_deref(), Some("500mg"));
        assert!(fetched.is_active);
    }

    #[test]
    fn empty_name_rejected() {
        let conn = open_memory_database().unwrap();
        let mut bad = fields("", "500mg");
        bad.name = " ".into();
        let err = create_medicine(&conn, &bad).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[test]
    fn deactivated_medicine_hidden_from_active_list() {
        let conn = open_memory_database().unwrap();
        let med = create_medicine(&conn, &fields("Crocin", "650mg")).unwrap();

        let mut update = fields("Crocin", "650mg");
        update.is_active = false;
        update_medicine(&conn, med.id, &update).unwrap();

        assert!(list_medicines(&conn, None, false).unwrap().is_empty());
        let with_inactive = list_medicines(&conn, None, true).unwrap();
        assert_eq!(with_inactive.len(), 1);
        assert!(!with_inactive[0].is_active);
        // Row still exists: soft delete only
        assert!(get_medicine(&conn, med.id).is_ok());
    }

    #[test]
    fn listing_is_alphabetical() {
        let conn = open_memory_database().unwrap();
        create_medicine(&conn, &fields("Omeprazole", "20mg")).unwrap();
        create_medicine(&conn, &fields("Amoxicillin", "500mg")).unwrap();
        create_medicine(&conn, &fields("cetirizine", "10mg")).unwrap();

        let names: Vec<String> = list_medicines(&conn, None, false)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Amoxicillin", "cetirizine", "Omeprazole"]);
    }

    #[test]
    fn search_matches_generic_name() {
        let conn = open_memory_database().unwrap();
        create_medicine(&conn, &fields("Crocin", "650mg")).unwrap();
        let hits = list_medicines(&conn, Some("acetamino"), false).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Crocin");
    }

    #[test]
    fn natural_key_lookup_distinguishes_strength() {
        let conn = open_memory_database().unwrap();
        create_medicine(&conn, &fields("Paracetamol", "500mg")).unwrap();

        assert!(find_medicine_by_name_strength(&conn, "Paracetamol", Some("500mg"))
            .unwrap()
            .is_some());
        assert!(find_medicine_by_name_strength(&conn, "Paracetamol", Some("650mg"))
            .unwrap()
            .is_none());
    }
}
