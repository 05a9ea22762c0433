//! Pharmacy proximity ranking.
//!
//! Pure functions over (reference coordinate, active pharmacy set):
//! great-circle distance via the haversine formula, ranked ascending on
//! unrounded distance. Rounding to 2 decimal places happens only for
//! display, after ranking, so premature rounding can never distort order.

use serde::Serialize;

use crate::models::Pharmacy;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// How many pharmacies a nearest-pharmacy query returns.
pub const NEAREST_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A pharmacy with its unrounded distance from the reference point.
#[derive(Debug, Clone, Serialize)]
pub struct RankedPharmacy {
    pub pharmacy: Pharmacy,
    /// Great-circle distance in km, unrounded. Use [`RankedPharmacy::display_distance_km`]
    /// for presentation.
    pub distance_km: f64,
}

impl RankedPharmacy {
    /// Distance rounded to 2 decimal places for display.
    pub fn display_distance_km(&self) -> f64 {
        round2(self.distance_km)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Great-circle distance between two coordinates in kilometers
/// (haversine formula on a spherical Earth).
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Rank pharmacies by distance from `reference`, ascending, truncated to
/// `limit`. Inactive pharmacies are excluded entirely. Ties are broken by
/// pharmacy id ascending so identical input always produces identical
/// output. No side effects; an empty input yields an empty result.
pub fn nearest_pharmacies(
    reference: Coordinate,
    pharmacies: &[Pharmacy],
    limit: usize,
) -> Vec<RankedPharmacy> {
    let mut ranked: Vec<RankedPharmacy> = pharmacies
        .iter()
        .filter(|p| p.is_active)
        .map(|p| RankedPharmacy {
            distance_km: haversine_km(reference, Coordinate::new(p.latitude, p.longitude)),
            pharmacy: p.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.pharmacy.id.cmp(&b.pharmacy.id))
    });
    ranked.truncate(limit);
    ranked
}
