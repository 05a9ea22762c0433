use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog medicine. Soft-deleted via `is_active` so historical
/// prescriptions keep a valid reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
    pub manufacturer: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or editing a medicine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineFields {
    pub name: String,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
    pub manufacturer: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
