use crate::{
    geo::centroid,
    models::{DistributorLocation, DistributorType, DistributorsReport, GeoPoint},
};

/// Mean latitude/longitude of the locations, skipping non-finite coordinates.
pub fn distributor_center(locations: &[DistributorLocation]) -> Option<GeoPoint> {
    let positions: Vec<GeoPoint> = locations
        .iter()
        .map(DistributorLocation::position)
        .filter(|p| p.lat.is_finite() && p.lon.is_finite())
        .collect();
    centroid(&positions)
}

pub fn build_distributor_report(
    country: &str,
    distributor_type: Option<DistributorType>,
    locations: Vec<DistributorLocation>,
) -> DistributorsReport {
    let map_center = distributor_center(&locations);
    tracing::debug!(
        "{} distributor location(s) for {country}, center {:?}",
        locations.len(),
        map_center
    );
    DistributorsReport {
        country: country.to_string(),
        distributor_type,
        locations,
        map_center,
    }
}
