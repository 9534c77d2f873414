//! Named locations for realistic test fixtures.
//!
//! City centres are far enough apart that any sub-hour hop between them
//! is an outlier. The London street locations are a few hundred meters
//! apart and make plausible courier segments.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// City centres
// ============================================================================

pub const LONDON: Location = Location::new("London", 51.5074, -0.1278);
pub const PARIS: Location = Location::new("Paris", 48.8566, 2.3522);
pub const BERLIN: Location = Location::new("Berlin", 52.5200, 13.4050);
pub const NEW_YORK: Location = Location::new("New York", 40.7128, -74.0060);

/// Straight-line London to Paris, kilometers (approximate).
pub const LONDON_PARIS_KM: f64 = 343.0;

// ============================================================================
// Central London stops
// ============================================================================

pub const LONDON_STOPS: &[Location] = &[
    Location::new("Trafalgar Square", 51.5080, -0.1281),
    Location::new("Covent Garden", 51.5117, -0.1240),
    Location::new("Holborn", 51.5174, -0.1200),
    Location::new("St Paul's", 51.5138, -0.0984),
    Location::new("Bank", 51.5133, -0.0886),
    Location::new("Liverpool Street", 51.5178, -0.0823),
];
