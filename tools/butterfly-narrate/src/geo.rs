use geo::{HaversineBearing, HaversineDistance, Point};

/// `[lon, lat]`, the coordinate order used in OSRM responses
pub type LonLat = [f64; 2];

pub fn haversine_distance(a: LonLat, b: LonLat) -> f64 {
    Point::new(a[0], a[1]).haversine_distance(&Point::new(b[0], b[1]))
}

/// Initial bearing from `a` to `b`, whole degrees clockwise from north in `0..360`
pub fn bearing(a: LonLat, b: LonLat) -> u16 {
    let deg = Point::new(a[0], a[1]).haversine_bearing(Point::new(b[0], b[1]));
    (deg.rem_euclid(360.0).round() as u16) % 360
}

/// Bearing pointing the opposite way
pub fn reverse_bearing(bearing: u16) -> u16 {
    (bearing + 180) % 360
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_bearings() {
        let origin = [0.0, 0.0];
        assert_eq!(bearing(origin, [0.0, 0.001]), 0);
        assert_eq!(bearing(origin, [0.001, 0.0]), 90);
        assert_eq!(bearing(origin, [0.0, -0.001]), 180);
        assert_eq!(bearing(origin, [-0.001, 0.0]), 270);
    }

    #[test]
    fn test_reverse_bearing() {
        assert_eq!(reverse_bearing(0), 180);
        assert_eq!(reverse_bearing(270), 90);
    }

    #[test]
    fn test_distance_at_equator() {
        // 0.0009 degrees of longitude at the equator is about 100 m
        let d = haversine_distance([0.0, 0.0], [0.0009, 0.0]);
        assert!((d - 100.0).abs() < 1.0, "{d}");
    }
}
