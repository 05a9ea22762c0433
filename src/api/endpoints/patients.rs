//! Patient endpoints.
//!
//! - `GET /patients`: list with optional search
//! - `POST /patients`: register, attributed to the logged-in doctor
//! - `GET /patients/:id`: detail with derived age
//! - `PUT /patients/:id`: edit (`registered_by` stays fixed)
//! - `GET /patients/:id/prescriptions`: prescription history

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DoctorContext};
use crate::db::repository;
use crate::models::{Patient, PatientFields, Prescription};

#[derive(Deserialize)]
pub struct PatientListQuery {
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct PatientListResponse {
    pub patients: Vec<Patient>,
    pub total: usize,
}

/// `GET /patients`: newest first, optionally filtered.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<PatientListResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let patients = repository::list_patients(&conn, query.search.as_deref())?;
    let total = patients.len();
    Ok(Json(PatientListResponse { patients, total }))
}

/// `POST /patients`: register a new patient.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<DoctorContext>,
    Json(fields): Json<PatientFields>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.state.open_db()?;
    let patient = repository::create_patient(&conn, &fields, doctor.doctor_id)?;
    tracing::info!(patient_id = patient.id, registered_by = doctor.doctor_id, "patient registered");
    Ok(Json(patient))
}

#[derive(Serialize)]
pub struct PatientDetailResponse {
    #[serde(flatten)]
    pub patient: Patient,
    pub age: i32,
    pub full_name: String,
}

/// `GET /patients/:id`: full record plus derived fields.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Path(id): Path<i64>,
) -> Result<Json<PatientDetailResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let patient = repository::get_patient(&conn, id)?;
    let age = patient.age();
    let full_name = patient.full_name();
    Ok(Json(PatientDetailResponse {
        patient,
        age,
        full_name,
    }))
}

/// `PUT /patients/:id`: update every editable field.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Path(id): Path<i64>,
    Json(fields): Json<PatientFields>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.state.open_db()?;
    let patient = repository::update_patient(&conn, id, &fields)?;
    Ok(Json(patient))
}

#[derive(Serialize)]
pub struct PatientPrescriptionsResponse {
    pub patient_id: i64,
    pub full_name: String,
    pub prescriptions: Vec<Prescription>,
}

/// `GET /patients/:id/prescriptions`: history, newest first.
pub async fn prescriptions(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Path(id): Path<i64>,
) -> Result<Json<PatientPrescriptionsResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let patient = repository::get_patient(&conn, id)?;
    let prescriptions = repository::prescriptions_for_patient(&conn, id)?;
    Ok(Json(PatientPrescriptionsResponse {
        patient_id: patient.id,
        full_name: patient.full_name(),
        prescriptions,
    }))
}
