//! First-run data seeding.
//!
//! Seeds default doctor accounts, the medicine catalog, and the Bengaluru
//! pharmacy directory. Every insert is guarded by a natural-key lookup
//! (username, name+strength, name) so reruns on an existing database are
//! no-ops.

use rusqlite::Connection;

use crate::auth;
use crate::db::repository;
use crate::db::DatabaseError;
use crate::models::{MedicineFields, NewDoctor, PharmacyFields};

/// Seed all default data. Returns how many rows were inserted.
pub fn seed_all(conn: &Connection) -> Result<usize, DatabaseError> {
    let doctors = seed_doctors(conn)?;
    let medicines = seed_medicines(conn)?;
    let pharmacies = seed_pharmacies(conn)?;
    let total = doctors + medicines + pharmacies;
    if total > 0 {
        tracing::info!(doctors, medicines, pharmacies, "seeded default data");
    }
    Ok(total)
}

fn seed_doctors(conn: &Connection) -> Result<usize, DatabaseError> {
    let mut inserted = 0;
    for doctor in default_doctors() {
        if repository::find_doctor_by_username(conn, &doctor.username)?.is_some() {
            continue;
        }
        // Password hashing is intentionally slow (600k PBKDF2 rounds),
        // hence the existence check before hashing.
        let hash = auth::hash_password(&doctor.password);
        repository::insert_doctor(conn, &doctor, &hash)?;
        tracing::debug!(username = %doctor.username, "seeded doctor account");
        inserted += 1;
    }
    Ok(inserted)
}

fn seed_medicines(conn: &Connection) -> Result<usize, DatabaseError> {
    let mut inserted = 0;
    for medicine in default_medicines() {
        let existing = repository::find_medicine_by_name_strength(
            conn,
            &medicine.name,
            medicine.strength.as_deref(),
        )?;
        if existing.is_none() {
            repository::create_medicine(conn, &medicine)?;
            inserted += 1;
        }
    }
    Ok(inserted)
}

fn seed_pharmacies(conn: &Connection) -> Result<usize, DatabaseError> {
    let mut inserted = 0;
    for pharmacy in default_pharmacies() {
        if repository::find_pharmacy_by_name(conn, &pharmacy.name)?.is_none() {
            repository::create_pharmacy(conn, &pharmacy)?;
            inserted += 1;
        }
    }
    Ok(inserted)
}

fn doctor(
    username: &str,
    name: &str,
    password: &str,
    specialization: &str,
    contact: &str,
    email: &str,
) -> NewDoctor {
    NewDoctor {
        username: username.into(),
        name: name.into(),
        password: password.into(),
        specialization: Some(specialization.into()),
        contact: Some(contact.into()),
        email: Some(email.into()),
    }
}

fn default_doctors() -> Vec<NewDoctor> {
    vec![
        doctor(
            "kaashvi",
            "Dr. Kaashvi Srivastava",
            "kaashvi123",
            "General Medicine",
            "+91-9876543210",
            "kaashvi@sksmedical.com",
        ),
        doctor(
            "yuvaan",
            "Dr. Yuvaan Srivastava",
            "yuvaan123",
            "Pediatrics",
            "+91-9876543211",
            "yuvaan@sksmedical.com",
        ),
        doctor(
            "karthik",
            "Dr. Karthik",
            "karthik123",
            "Cardiology",
            "+91-9876543212",
            "karthik@sksmedical.com",
        ),
        doctor(
            "omkar",
            "Dr. Omkar",
            "omkar123",
            "Orthopedics",
            "+91-9876543213",
            "omkar@sksmedical.com",
        ),
    ]
}

fn medicine(
    name: &str,
    generic_name: &str,
    category: &str,
    dosage_form: &str,
    strength: &str,
    manufacturer: &str,
    description: &str,
) -> MedicineFields {
    MedicineFields {
        name: name.into(),
        generic_name: Some(generic_name.into()),
        description: Some(description.into()),
        category: Some(category.into()),
        dosage_form: Some(dosage_form.into()),
        strength: Some(strength.into()),
        manufacturer: Some(manufacturer.into()),
        is_active: true,
    }
}

fn default_medicines() -> Vec<MedicineFields> {
    vec![
        medicine(
            "Paracetamol",
            "Acetaminophen",
            "Pain Relief",
            "Tablet",
            "500mg",
            "GSK Pharmaceuticals",
            "Used for fever and mild to moderate pain relief",
        ),
        medicine(
            "Amoxicillin",
            "Amoxicillin Trihydrate",
            "Antibiotic",
            "Capsule",
            "500mg",
            "Cipla Ltd",
            "Broad-spectrum antibiotic for bacterial infections",
        ),
        medicine(
            "Crocin",
            "Paracetamol",
            "Pain Relief",
            "Tablet",
            "650mg",
            "GSK Pharmaceuticals",
            "Pain reliever and fever reducer",
        ),
        medicine(
            "Azithromycin",
            "Azithromycin Dihydrate",
            "Antibiotic",
            "Tablet",
            "500mg",
            "Pfizer",
            "Macrolide antibiotic for respiratory infections",
        ),
        medicine(
            "Omeprazole",
            "Omeprazole",
            "Gastrointestinal",
            "Capsule",
            "20mg",
            "Dr. Reddy's",
            "Proton pump inhibitor for acid reflux and ulcers",
        ),
        medicine(
            "Metformin",
            "Metformin Hydrochloride",
            "Diabetes",
            "Tablet",
            "500mg",
            "Sun Pharma",
            "Oral diabetes medication for Type 2 diabetes",
        ),
        medicine(
            "Atorvastatin",
            "Atorvastatin Calcium",
            "Cardiovascular",
            "Tablet",
            "10mg",
            "Pfizer",
            "Statin medication to lower cholesterol",
        ),
        medicine(
            "Cetirizine",
            "Cetirizine Hydrochloride",
            "Antihistamine",
            "Tablet",
            "10mg",
            "UCB Pharma",
            "Antihistamine for allergies and hay fever",
        ),
        medicine(
            "Vitamin D3",
            "Cholecalciferol",
            "Vitamin/Supplement",
            "Capsule",
            "60000 IU",
            "Abbott",
            "Vitamin D supplement for bone health",
        ),
        medicine(
            "Ibuprofen",
            "Ibuprofen",
            "Pain Relief",
            "Tablet",
            "400mg",
            "Abbott",
            "NSAID for pain, inflammation, and fever",
        ),
    ]
}

fn pharmacy(
    name: &str,
    address: &str,
    contact_number: &str,
    email: &str,
    latitude: f64,
    longitude: f64,
    operating_hours: &str,
) -> PharmacyFields {
    PharmacyFields {
        name: name.into(),
        address: address.into(),
        contact_number: contact_number.into(),
        email: Some(email.into()),
        latitude,
        longitude,
        operating_hours: Some(operating_hours.into()),
        is_active: true,
    }
}

fn default_pharmacies() -> Vec<PharmacyFields> {
    vec![
        pharmacy(
            "Apollo Pharmacy - Koramangala",
            "80 Feet Road, Koramangala 4th Block, Bengaluru, Karnataka 560034",
            "+91-80-41551234",
            "koramangala@apollopharmacy.in",
            12.9352,
            77.6245,
            "Mon-Sun: 24 Hours",
        ),
        pharmacy(
            "MedPlus Pharmacy - Indiranagar",
            "100 Feet Road, Indiranagar, Bengaluru, Karnataka 560038",
            "+91-80-25201234",
            "indiranagar@medplusmart.com",
            12.9716,
            77.6412,
            "Mon-Sun: 8 AM - 11 PM",
        ),
        pharmacy(
            "Wellness Forever - Whitefield",
            "ITPL Main Road, Whitefield, Bengaluru, Karnataka 560066",
            "+91-80-28451234",
            "whitefield@wellnessforever.com",
            12.9698,
            77.7500,
            "Mon-Sun: 9 AM - 10 PM",
        ),
        pharmacy(
            "Fortis Healthcare Pharmacy",
            "154/9, Bannerghatta Road, Bengaluru, Karnataka 560076",
            "+91-80-66214444",
            "pharmacy@fortishealthcare.com",
            12.9010,
            77.5950,
            "Mon-Sun: 24 Hours",
        ),
        pharmacy(
            "Manipal Hospital Pharmacy - HAL",
            "Old Airport Road, HAL, Bengaluru, Karnataka 560017",
            "+91-80-25023456",
            "hal@manipalhospitals.com",
            12.9611,
            77.6387,
            "Mon-Sun: 24 Hours",
        ),
        pharmacy(
            "1mg Pharmacy - Jayanagar",
            "9th Block, Jayanagar, Bengaluru, Karnataka 560069",
            "+91-80-26783456",
            "jayanagar@1mg.com",
            12.9250,
            77.5838,
            "Mon-Sun: 7 AM - 11 PM",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn seed_populates_catalog_and_directory() {
        let conn = open_memory_database().unwrap();
        let inserted = seed_all(&conn).unwrap();
        assert_eq!(inserted, 4 + 10 + 6);
        assert_eq!(repository::count_doctors(&conn).unwrap(), 4);
        assert_eq!(repository::count_medicines(&conn).unwrap(), 10);
        assert_eq!(repository::count_pharmacies(&conn).unwrap(), 6);
    }

    #[test]
    fn reseeding_is_a_noop() {
        let conn = open_memory_database().unwrap();
        seed_all(&conn).unwrap();
        let second = seed_all(&conn).unwrap();
        assert_eq!(second, 0);
        assert_eq!(repository::count_doctors(&conn).unwrap(), 4);
    }

    #[test]
    fn seeded_doctor_can_authenticate() {
        let conn = open_memory_database().unwrap();
        seed_all(&conn).unwrap();
        let doc = repository::find_doctor_by_username(&conn, "kaashvi")
            .unwrap()
            .unwrap();
        assert!(auth::verify_password("kaashvi123", &doc.password_hash));
        assert!(!auth::verify_password("wrong", &doc.password_hash));
    }

    #[test]
    fn crocin_and_paracetamol_are_distinct_rows() {
        let conn = open_memory_database().unwrap();
        seed_all(&conn).unwrap();
        let crocin = repository::find_medicine_by_name_strength(&conn, "Crocin", Some("650mg"))
            .unwrap()
            .unwrap();
        assert_eq!(crocin.generic_name.as_deref(), Some("Paracetamol"));
        let para = repository::find_medicine_by_name_strength(&conn, "Paracetamol", Some("500mg"))
            .unwrap()
            .unwrap();
        assert_ne!(crocin.id, para.id);
    }
}
