//! Prescription endpoints. Prescriptions are immutable once issued.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DoctorContext};
use crate::db::repository;
use crate::models::{Prescription, PrescriptionFields};

#[derive(Serialize)]
pub struct PrescriptionListResponse {
    pub prescriptions: Vec<Prescription>,
    pub total: usize,
}

/// `GET /prescriptions`: all prescriptions, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
) -> Result<Json<PrescriptionListResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let prescriptions = repository::list_prescriptions(&conn)?;
    let total = prescriptions.len();
    Ok(Json(PrescriptionListResponse {
        prescriptions,
        total,
    }))
}

/// `POST /prescriptions`: issue a prescription as the logged-in doctor.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
    Json(fields): Json<PrescriptionFields>,
) -> Result<Json<Prescription>, ApiError> {
    let mut conn = ctx.state.open_db()?;
    let prescription = repository::create_prescription(&mut conn, &fields, doctor.doctor_id)?;
    tracing::info!(
        prescription_id = prescription.id,
        patient_id = prescription.patient_id,
        doctor_id = doctor.doctor_id,
        "prescription issued"
    );
    Ok(Json(prescription))
}

/// `GET /prescriptions/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Path(id): Path<i64>,
) -> Result<Json<Prescription>, ApiError> {
    let conn = ctx.state.open_db()?;
    Ok(Json(repository::get_prescription(&conn, id)?))
}
