/// Haversine distance in km between two lat/lon points.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const R: f64 = 6371.0; // Earth radius in km
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    R * c
}

/// Distance between two optional locations. A missing endpoint yields
/// positive infinity, which compares as out of range against any finite
/// maximum without a special case at the call site.
pub fn distance_km(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> f64 {
    match (a, b) {
        (Some((lat1, lon1)), Some((lat2, lon2))) => haversine_km(lat1, lon1, lat2, lon2),
        _ => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOSCOW: (f64, f64) = (55.7558, 37.6173);
    const SAINT_PETERSBURG: (f64, f64) = (59.9311, 30.3609);

    #[test]
    fn test_distance_is_symmetric() {
        let ab = distance_km(Some(MOSCOW), Some(SAINT_PETERSBURG));
        let ba = distance_km(Some(SAINT_PETERSBURG), Some(MOSCOW));
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_km(Some(MOSCOW), Some(MOSCOW)), 0.0);
    }

    #[test]
    fn test_known_city_pair() {
        // Moscow to Saint Petersburg is roughly 634 km.
        let km = distance_km(Some(MOSCOW), Some(SAINT_PETERSBURG));
        assert!((km - 634.0).abs() < 5.0, "got {km}");
    }

    #[test]
    fn test_missing_endpoint_exceeds_any_finite_maximum() {
        assert!(distance_km(None, Some(MOSCOW)) > 40_000.0);
        assert!(distance_km(Some(MOSCOW), None) > 40_000.0);
        assert!(distance_km(None, None) > 40_000.0);
    }
}
