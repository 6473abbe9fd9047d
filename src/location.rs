use async_trait::async_trait;
use log::{info, warn};

use crate::error::PositionError;
use crate::models::{Coordinates, RankedCenter, RecyclingCenter};
use crate::proximity::rank;

/// Source of the device's current position. Acquisition may prompt the user
/// and may take a while.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// A provider that always answers with the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Ok(self.0)
    }
}

/// Locates the user, then ranks `catalog` by distance. When no position is
/// available the error is returned and nothing is ranked.
pub async fn nearby_centers(
    provider: &dyn LocationProvider,
    catalog: &[RecyclingCenter],
) -> Result<Vec<RankedCenter>, PositionError> {
    let origin = provider.current_position().await.map_err(|err| {
        warn!("Could not get a position for center ranking: {err}");
        err
    })?;

    let ranked = rank(origin, catalog);
    if let Some(nearest) = ranked.first() {
        info!(
            "Nearest of {} centers is {} at {:.1} km",
            ranked.len(),
            nearest.center.name,
            nearest.distance_km
        );
    }
    Ok(ranked)
}
