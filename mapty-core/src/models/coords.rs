use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A geographic point. Stored as a `[lat, lng]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for Coords {
    type Err = String;

    /// Parses `"lat,lng"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid coordinates '{}'. Use LAT,LNG (e.g. 40.7,-74.0)", s);

        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Coordinates out of range '{}'. Latitude is -90..90, longitude -180..180",
                s
            ));
        }

        Ok(Self { lat, lng })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_json_is_pair() {
        let coords = Coords::new(40.7, -74.0);
        let json = serde_json::to_string(&coords).unwrap();
        assert_eq!(json, "[40.7,-74.0]");

        let parsed: Coords = serde_json::from_str("[51.5, -0.12]").unwrap();
        assert_eq!(parsed, Coords::new(51.5, -0.12));
    }

    #[test]
    fn test_coords_from_str() {
        let coords: Coords = "40.7, -74.0".parse().unwrap();
        assert_eq!(coords, Coords::new(40.7, -74.0));
    }

    #[test]
    fn test_coords_from_str_invalid() {
        assert!("40.7".parse::<Coords>().is_err());
        assert!("north,south".parse::<Coords>().is_err());
        assert!("91,0".parse::<Coords>().is_err());
        assert!("0,181".parse::<Coords>().is_err());
    }

    #[test]
    fn test_coords_display() {
        assert_eq!(Coords::new(40.7, -74.0).to_string(), "40.7,-74");
    }
}
