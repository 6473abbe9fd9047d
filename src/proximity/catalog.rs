use crate::models::{Coordinates, RecyclingCenter};

struct CenterSeed {
    id: u32,
    name: &'static str,
    address: &'static str,
    latitude: f64,
    longitude: f64,
}

const DEFAULT_CENTERS: &[CenterSeed] = &[
    CenterSeed {
        id: 1,
        name: "Eco-Friendly Recyclers",
        address: "123 Green Way, Chennai",
        latitude: 13.0827,
        longitude: 80.2707,
    },
    CenterSeed {
        id: 2,
        name: "SIDCO Industrial Estate",
        address: "26, Thirumazhisai, Chennai, Tamil Nadu 600124",
        latitude: 13.05,
        longitude: 80.05,
    },
    CenterSeed {
        id: 3,
        name: "Chennai Waste Management",
        address: "456 Recycle Ave, Chennai",
        latitude: 13.01,
        longitude: 80.23,
    },
    CenterSeed {
        id: 4,
        name: "Planet Savers Inc.",
        address: "789 Earth St, Chennai",
        latitude: 13.1,
        longitude: 80.15,
    },
];

/// Built-in center list used when settings do not provide one.
pub fn default_catalog() -> Vec<RecyclingCenter> {
    DEFAULT_CENTERS
        .iter()
        .map(|seed| RecyclingCenter {
            id: seed.id,
            name: seed.name.to_string(),
            address: seed.address.to_string(),
            coordinates: Coordinates::new(seed.latitude, seed.longitude),
        })
        .collect()
}
