/// Nautical miles in one meter. Fixed conversion constant, not a geodesy model.
pub const NAUTICAL_MILES_PER_METER: f64 = 0.000_539_957;
/// Default range ring drawn around a station, in nautical miles.
pub const RANGE_RING_NAUTICAL_MILES: f64 = 200.0;

/// Quantization used by `PositionKey` (1e-9 degrees).
pub const POSITION_KEY_SCALE: f64 = 1e9;

pub fn nautical_miles_to_meters(nautical_miles: f64) -> f64 {
    nautical_miles / NAUTICAL_MILES_PER_METER
}

/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPosition {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoPosition {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    pub fn is_finite(&self) -> bool {
        self.lat_deg.is_finite() && self.lon_deg.is_finite()
    }

    pub fn key(&self) -> PositionKey {
        PositionKey::from(*self)
    }
}

/// Value key for a position, usable in hashed and ordered maps.
///
/// Two positions that agree to 1e-9 degrees map to the same key. `-0.0` and
/// `0.0` collapse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey {
    lat_q: i64,
    lon_q: i64,
}

impl PositionKey {
    pub fn lat_q(&self) -> i64 {
        self.lat_q
    }

    pub fn lon_q(&self) -> i64 {
        self.lon_q
    }
}

impl From<GeoPosition> for PositionKey {
    fn from(p: GeoPosition) -> Self {
        Self {
            lat_q: quantize(p.lat_deg),
            lon_q: quantize(p.lon_deg),
        }
    }
}

impl std::fmt::Display for PositionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.9},{:.9}",
            self.lat_q as f64 / POSITION_KEY_SCALE,
            self.lon_q as f64 / POSITION_KEY_SCALE
        )
    }
}

fn quantize(deg: f64) -> i64 {
    (deg * POSITION_KEY_SCALE).round() as i64
}

#[cfg(test)]
mod tests {
    use super::{GeoPosition, RANGE_RING_NAUTICAL_MILES, nautical_miles_to_meters};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn range_ring_in_meters() {
        assert_close(
            nautical_miles_to_meters(RANGE_RING_NAUTICAL_MILES),
            370_399.865,
            0.01,
        );
    }

    #[test]
    fn identical_positions_share_a_key() {
        let a = GeoPosition::new(10.0, 20.0);
        let b = GeoPosition::new(10.0, 20.0);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn sub_nanodegree_noise_collapses() {
        let a = GeoPosition::new(39.1696, -76.6786);
        let b = GeoPosition::new(39.1696 + 1e-12, -76.6786);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), GeoPosition::new(39.1697, -76.6786).key());
    }

    #[test]
    fn signed_zero_collapses() {
        assert_eq!(
            GeoPosition::new(0.0, -0.0).key(),
            GeoPosition::new(-0.0, 0.0).key()
        );
    }

    #[test]
    fn key_displays_degrees() {
        let key = GeoPosition::new(10.5, -20.25).key();
        assert_eq!(key.to_string(), "10.500000000,-20.250000000");
    }
}
