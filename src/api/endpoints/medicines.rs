//! Medicine catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DoctorContext};
use crate::db::repository;
use crate::models::{Medicine, MedicineFields};

#[derive(Deserialize)]
pub struct MedicineListQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Serialize)]
pub struct MedicineListResponse {
    pub medicines: Vec<Medicine>,
    pub total: usize,
}

/// `GET /medicines`: alphabetical catalog, optionally searched.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Query(query): Query<MedicineListQuery>,
) -> Result<Json<MedicineListResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let medicines =
        repository::list_medicines(&conn, query.search.as_deref(), query.include_inactive)?;
    let total = medicines.len();
    Ok(Json(MedicineListResponse { medicines, total }))
}

/// `POST /medicines`: add a catalog entry.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Json(fields): Json<MedicineFields>,
) -> Result<Json<Medicine>, ApiError> {
    let conn = ctx.state.open_db()?;
    let medicine = repository::create_medicine(&conn, &fields)?;
    tracing::info!(medicine_id = medicine.id, name = %medicine.name, "medicine added");
    Ok(Json(medicine))
}

/// `GET /medicines/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Path(id): Path<i64>,
) -> Result<Json<Medicine>, ApiError> {
    let conn = ctx.state.open_db()?;
    Ok(Json(repository::get_medicine(&conn, id)?))
}

/// `PUT /medicines/:id`: edit, including `is_active` for soft delete.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Path(id): Path<i64>,
    Json(fields): Json<MedicineFields>,
) -> Result<Json<Medicine>, ApiError> {
    let conn = ctx.state.open_db()?;
    Ok(Json(repository::update_medicine(&conn, id, &fields)?))
}
