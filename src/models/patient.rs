use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered patient. `age` and `full_name` are derived on demand and
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub blood_group: Option<String>,
    pub contact_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub current_medications: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    /// Doctor who registered this patient. Immutable after creation.
    pub registered_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in completed years as of `today`.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.date_of_birth.year();
        if (today.month(), today.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age
    }

    pub fn age(&self) -> i32 {
        self.age_on(Utc::now().date_naive())
    }
}

/// Fields accepted when registering or editing a patient.
/// `registered_by` is taken from the authenticated doctor, not the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientFields {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub blood_group: Option<String>,
    pub contact_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub current_medications: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
}
