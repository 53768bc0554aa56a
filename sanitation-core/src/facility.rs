use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    geo::GeoPoint,
    scoring::{Grade, Rating},
};

/// Whether a facility is currently usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityStatus {
    Open,
    Closed,
}

impl FacilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityStatus::Open => "open",
            FacilityStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for FacilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown facility status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for FacilityStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(FacilityStatus::Open),
            "closed" => Ok(FacilityStatus::Closed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A sanitation facility.
///
/// Serializes flat: `{id, name, lat, lng, score, grade, status}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facility {
    /// Assigned by the store, never changes.
    pub id: i64,
    pub name: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    #[serde(flatten)]
    pub rating: Rating,
    pub status: FacilityStatus,
}

impl Facility {
    pub fn score(&self) -> u8 {
        self.rating.score()
    }

    pub fn grade(&self) -> Grade {
        self.rating.grade()
    }

    pub fn is_open(&self) -> bool {
        self.status == FacilityStatus::Open
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Input for creating a facility.
///
/// Anything besides name and coordinates in the request body is ignored: new
/// facilities always start open with a perfect rating.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewFacility {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}
