use crate::models::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("expected \"(lat,lon)\" but found {found} component(s) in {raw:?}")]
    ComponentCount { raw: String, found: usize },
    #[error("{component} in {raw:?} is not a finite number")]
    NotANumber { raw: String, component: &'static str },
}

/// Great-circle distance in kilometres. Inputs outside the canonical
/// latitude/longitude ranges are computed as given.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Parse a `"(lat,lon)"` string as sent by the zones API.
pub fn parse_gps_coordinates(raw: &str) -> Result<GeoPoint, CoordinateError> {
    let inner = raw
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');
    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != 2 {
        return Err(CoordinateError::ComponentCount {
            raw: raw.to_string(),
            found: parts.len(),
        });
    }

    let parse = |field: &str, component: &'static str| {
        field
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| CoordinateError::NotANumber {
                raw: raw.to_string(),
                component,
            })
    };

    Ok(GeoPoint {
        lat: parse(parts[0], "latitude")?,
        lon: parse(parts[1], "longitude")?,
    })
}

/// Arithmetic mean of the given points, `None` for an empty input.
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let count = points.len() as f64;
    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.lat, lon + p.lon));
    Some(GeoPoint {
        lat: lat_sum / count,
        lon: lon_sum / count,
    })
}
