use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prescription linking one patient, one doctor, and one medicine.
/// All three references are immutable after creation and there is no
/// delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub medicine_id: i64,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: Option<String>,
    pub diagnosis: Option<String>,
    pub prescribed_at: DateTime<Utc>,
}

/// Fields accepted when issuing a prescription. `doctor_id` comes from
/// the authenticated session, not the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionFields {
    pub patient_id: i64,
    pub medicine_id: i64,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: Option<String>,
    pub diagnosis: Option<String>,
}
