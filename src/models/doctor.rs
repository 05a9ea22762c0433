use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A doctor account. Doctors authenticate with username + password and
/// own the records they register; there is no delete path for doctors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// PBKDF2-SHA256 encoded hash: never serialized to API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub specialization: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a doctor account (seeding path).
#[derive(Debug, Clone, Deserialize)]
pub struct NewDoctor {
    pub username: String,
    pub name: String,
    pub password: String,
    pub specialization: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
}
