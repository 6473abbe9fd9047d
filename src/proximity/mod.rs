//! Nearest-center ranking by great-circle distance.

pub mod catalog;

pub use catalog::default_catalog;

use crate::models::{Coordinates, RankedCenter, RecyclingCenter};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lng = (to.longitude - from.longitude).to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Returns the catalog ordered nearest first. Centers at equal distance keep
/// their catalog order.
pub fn rank(origin: Coordinates, catalog: &[RecyclingCenter]) -> Vec<RankedCenter> {
    let mut ranked: Vec<RankedCenter> = catalog
        .iter()
        .map(|center| RankedCenter {
            distance_km: haversine_km(origin, center.coordinates),
            center: center.clone(),
        })
        .collect();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// Distance label as shown next to each center, e.g. `"3.2 km"`.
pub fn format_distance(distance_km: f64) -> String {
    format!("{distance_km:.1} km")
}
