//! Dashboard endpoint: per-doctor overview of the clinic.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DoctorContext};
use crate::db::repository;
use crate::models::Patient;

const RECENT_PATIENT_LIMIT: u32 = 5;

#[derive(Serialize)]
pub struct DashboardResponse {
    pub doctor_name: String,
    pub total_patients: i64,
    pub my_patients: i64,
    pub total_medicines: i64,
    pub total_pharmacies: i64,
    pub total_prescriptions: i64,
    pub recent_patients: Vec<Patient>,
}

/// `GET /dashboard`: clinic totals plus the latest registrations.
pub async fn overview(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let conn = ctx.state.open_db()?;

    Ok(Json(DashboardResponse {
        doctor_name: doctor.name,
        total_patients: repository::count_patients(&conn)?,
        my_patients: repository::count_patients_registered_by(&conn, doctor.doctor_id)?,
        total_medicines: repository::count_medicines(&conn)?,
        total_pharmacies: repository::count_pharmacies(&conn)?,
        total_prescriptions: repository::count_prescriptions(&conn)?,
        recent_patients: repository::recent_patients(&conn, RECENT_PATIENT_LIMIT)?,
    }))
}
