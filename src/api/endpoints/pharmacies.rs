//! Pharmacy directory endpoints.
//!
//! List and detail reads go through the TTL listing cache; every write
//! clears it. The nearest-pharmacy finder is computed per request and
//! never cached, since the reference coordinate varies per caller.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DoctorContext};
use crate::cache::ListingCache;
use crate::db::repository;
use crate::geo::{self, Coordinate, NEAREST_LIMIT};
use crate::models::{Pharmacy, PharmacyFields};

#[derive(Deserialize)]
pub struct PharmacyListQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Serialize)]
pub struct PharmacyListResponse {
    pub pharmacies: Vec<Pharmacy>,
    pub total: usize,
}

/// `GET /pharmacies`: directory listing, cached for the TTL window.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Query(query): Query<PharmacyListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let search = query.search.as_deref().unwrap_or("");
    let include_inactive = if query.include_inactive { "1" } else { "0" };
    let key = ListingCache::key(
        "pharmacies:list",
        &[("search", search), ("include_inactive", include_inactive)],
    );

    if let Some(cached) = ctx.cache_get(&key) {
        tracing::debug!(%key, "pharmacy list served from cache");
        return Ok(Json(cached));
    }

    let conn = ctx.state.open_db()?;
    let pharmacies =
        repository::list_pharmacies(&conn, query.search.as_deref(), query.include_inactive)?;
    let total = pharmacies.len();
    let body = serde_json::to_value(PharmacyListResponse { pharmacies, total })
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    ctx.cache_put(key, body.clone());
    Ok(Json(body))
}

/// `POST /pharmacies`: add a pharmacy and invalidate cached listings.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Json(fields): Json<PharmacyFields>,
) -> Result<Json<Pharmacy>, ApiError> {
    let conn = ctx.state.open_db()?;
    let pharmacy = repository::create_pharmacy(&conn, &fields)?;
    ctx.cache_invalidate();
    tracing::info!(pharmacy_id = pharmacy.id, name = %pharmacy.name, "pharmacy added");
    Ok(Json(pharmacy))
}

/// `GET /pharmacies/:id`: cached detail view.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id_param = id.to_string();
    let key = ListingCache::key("pharmacies:detail", &[("id", &id_param)]);

    if let Some(cached) = ctx.cache_get(&key) {
        return Ok(Json(cached));
    }

    let conn = ctx.state.open_db()?;
    let pharmacy = repository::get_pharmacy(&conn, id)?;
    let body =
        serde_json::to_value(pharmacy).map_err(|e| ApiError::Internal(e.to_string()))?;
    ctx.cache_put(key, body.clone());
    Ok(Json(body))
}

/// `PUT /pharmacies/:id`: edit (including soft delete) and invalidate.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Path(id): Path<i64>,
    Json(fields): Json<PharmacyFields>,
) -> Result<Json<Pharmacy>, ApiError> {
    let conn = ctx.state.open_db()?;
    let pharmacy = repository::update_pharmacy(&conn, id, &fields)?;
    ctx.cache_invalidate();
    Ok(Json(pharmacy))
}

/// Coordinates arrive as raw strings so an unparseable value can be a
/// clean 400 instead of a rejected extractor.
#[derive(Deserialize)]
pub struct NearestQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Serialize)]
pub struct NearestEntry {
    #[serde(flatten)]
    pub pharmacy: Pharmacy,
    pub distance_km: f64,
}

#[derive(Serialize)]
pub struct NearestResponse {
    pub reference: Coordinate,
    pub pharmacies: Vec<NearestEntry>,
}

/// `GET /pharmacies/nearest?latitude=&longitude=`: up to three active
/// pharmacies ranked by great-circle distance. Missing coordinates fall
/// back to the clinic's own location.
pub async fn nearest(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<NearestResponse>, ApiError> {
    let home = ctx.state.config.home;
    let reference = Coordinate {
        latitude: parse_coordinate(query.latitude.as_deref(), "latitude", home.latitude)?,
        longitude: parse_coordinate(query.longitude.as_deref(), "longitude", home.longitude)?,
    };

    let conn = ctx.state.open_db()?;
    let candidates = repository::active_pharmacies(&conn)?;
    let ranked = geo::nearest_pharmacies(reference, &candidates, NEAREST_LIMIT);

    let pharmacies = ranked
        .into_iter()
        .map(|r| NearestEntry {
            distance_km: r.display_distance_km(),
            pharmacy: r.pharmacy,
        })
        .collect();

    Ok(Json(NearestResponse {
        reference,
        pharmacies,
    }))
}

fn parse_coordinate(raw: Option<&str>, name: &str, fallback: f64) -> Result<f64, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("{name} must be a number, got {value:?}"))),
        None => Ok(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_coordinate_accepts_decimal() {
        assert_eq!(
            parse_coordinate(Some("12.9716"), "latitude", 0.0).unwrap(),
            12.9716
        );
        assert_eq!(
            parse_coordinate(Some("-77.5"), "longitude", 0.0).unwrap(),
            -77.5
        );
    }

    #[test]
    fn parse_coordinate_defaults_when_absent_or_blank() {
        assert_eq!(parse_coordinate(None, "latitude", 12.9716).unwrap(), 12.9716);
        assert_eq!(parse_coordinate(Some("  "), "latitude", 12.9716).unwrap(), 12.9716);
    }

    #[test]
    fn parse_coordinate_rejects_garbage() {
        let err = parse_coordinate(Some("north"), "latitude", 0.0).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
