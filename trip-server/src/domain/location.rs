//! Geographic coordinate type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing invalid coordinates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location: {reason}")]
pub struct InvalidLocation {
    reason: &'static str,
}

/// A validated latitude/longitude pair in degrees.
///
/// Both components are finite; latitude lies in [-90, 90] and longitude in
/// [-180, 180].
///
/// # Examples
///
/// ```
/// use trip_server::domain::Location;
///
/// let hoboken = Location::new(40.74273, -74.038).unwrap();
/// assert_eq!(hoboken.lat(), 40.74273);
///
/// assert!(Location::new(f64::NAN, 0.0).is_err());
/// assert!(Location::new(91.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation", into = "RawLocation")]
pub struct Location {
    lat: f64,
    lng: f64,
}

/// Wire form of [`Location`], validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawLocation {
    lat: f64,
    lng: f64,
}

impl Location {
    /// Create a location from latitude and longitude in degrees.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidLocation> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidLocation {
                reason: "coordinates must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidLocation {
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidLocation {
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Location { lat, lng })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl TryFrom<RawLocation> for Location {
    type Error = InvalidLocation;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Location::new(raw.lat, raw.lng)
    }
}

impl From<Location> for RawLocation {
    fn from(loc: Location) -> Self {
        RawLocation {
            lat: loc.lat,
            lng: loc.lng,
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({}, {})", self.lat, self.lng)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_coordinates() {
        assert!(Location::new(0.0, 0.0).is_ok());
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(-90.0, -180.0).is_ok());
        assert!(Location::new(40.74273, -74.038).is_ok());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Location::new(f64::NAN, 0.0).is_err());
        assert!(Location::new(0.0, f64::INFINITY).is_err());
        assert!(Location::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Location::new(90.5, 0.0).is_err());
        assert!(Location::new(-91.0, 0.0).is_err());
        assert!(Location::new(0.0, 180.1).is_err());
        assert!(Location::new(0.0, -200.0).is_err());
    }

    #[test]
    fn display_is_provider_query_form() {
        let loc = Location::new(40.5, -74.25).unwrap();
        assert_eq!(loc.to_string(), "40.5,-74.25");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Location = serde_json::from_str(r#"{"lat": 1.5, "lng": 2.5}"#).unwrap();
        assert_eq!(ok.lat(), 1.5);
        assert_eq!(ok.lng(), 2.5);

        assert!(serde_json::from_str::<Location>(r#"{"lat": 100.0, "lng": 2.5}"#).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every in-range pair is accepted and preserved
        #[test]
        fn in_range_accepted(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
            let loc = Location::new(lat, lng).unwrap();
            prop_assert_eq!(loc.lat(), lat);
            prop_assert_eq!(loc.lng(), lng);
        }

        /// Latitudes beyond the poles are rejected
        #[test]
        fn beyond_poles_rejected(lat in 90.0001f64..1000.0, lng in -180.0f64..=180.0) {
            prop_assert!(Location::new(lat, lng).is_err());
            prop_assert!(Location::new(-lat, lng).is_err());
        }
    }
}
