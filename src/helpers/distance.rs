use crate::models::restaurant::Location;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates, in kilometers.
pub fn haversine_km(from: &Location, to: &Location) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Display form: whole meters under 1 km, otherwise one decimal in km.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round() as i64)
    } else {
        format!("{km:.1} km")
    }
}

/// Distance between the map center and a point, formatted for display.
/// `None` when either side is missing.
pub fn distance_display(center: Option<&Location>, point: Option<&Location>) -> Option<String> {
    match (center, point) {
        (Some(center), Some(point)) => Some(format_distance(haversine_km(center, point))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paris_to_berlin_is_roughly_878_km() {
        let paris = Location::new(48.8566, 2.3522);
        let berlin = Location::new(52.5200, 13.4050);
        let distance = haversine_km(&paris, &berlin);
        assert!((distance - 878.0).abs() < 10.0, "got {distance}");
    }

    #[test]
    fn distance_to_self_is_zero() {
        let spot = Location::new(48.8566, 2.3522);
        assert_eq!(haversine_km(&spot, &spot), 0.0);
    }

    #[test]
    fn formats_sub_kilometer_as_whole_meters() {
        assert_eq!(format_distance(0.5), "500 m");
        assert_eq!(format_distance(0.049999), "50 m");
    }

    #[test]
    fn formats_kilometers_to_one_decimal() {
        assert_eq!(format_distance(2.3), "2.3 km");
        assert_eq!(format_distance(12.04), "12.0 km");
    }

    #[test]
    fn display_is_unavailable_without_both_sides() {
        let spot = Location::new(48.8566, 2.3522);
        assert_eq!(distance_display(Some(&spot), None), None);
        assert_eq!(distance_display(None, Some(&spot)), None);
        assert!(distance_display(Some(&spot), Some(&spot)).is_some());
    }
}
