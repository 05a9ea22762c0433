use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory pharmacy with a fixed coordinate. Soft-deleted via
/// `is_active`; inactive pharmacies are excluded from proximity results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub email: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub operating_hours: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or editing a pharmacy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PharmacyFields {
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub email: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub operating_hours: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
