use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A disposal location from the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecyclingCenter {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
}

/// A catalog center paired with its distance from the user for one ranking
/// call. Not persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedCenter {
    #[serde(flatten)]
    pub center: RecyclingCenter,
    pub distance_km: f64,
}
