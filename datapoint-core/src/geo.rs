use haversine::{Location as HaversineLocation, Units, distance};

use crate::{
    error::{DataPointError, Result},
    model::{Coordinate, Site},
};

/// Great-circle distance in kilometres (haversine, Earth radius 6371 km).
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    distance(
        HaversineLocation {
            latitude: a.latitude,
            longitude: a.longitude,
        },
        HaversineLocation {
            latitude: b.latitude,
            longitude: b.longitude,
        },
        Units::Kilometers,
    )
}

/// Closest site to `target`. Equidistant sites resolve to the earliest one
/// in `sites`.
pub fn nearest(sites: &[Site], target: Coordinate) -> Result<&Site> {
    let mut iter = sites.iter();
    let first = iter
        .next()
        .ok_or_else(|| DataPointError::InvalidInput("site list is empty".to_string()))?;

    let mut best = first;
    let mut best_km = distance_km(first.coordinate, target);

    for site in iter {
        let km = distance_km(site.coordinate, target);
        if km < best_km {
            best = site;
            best_km = km;
        }
    }

    tracing::debug!(site_id = best.id, name = %best.name, distance_km = best_km, "nearest site");
    Ok(best)
}
