//! Scoring and ranking logic for sanitation facilities.
//!
//! Everything in this crate is pure: no model, no database. The API server and
//! the recognizer feed it labels and facility records.

pub mod detection;
pub mod facility;
pub mod geo;
pub mod nearby;
pub mod scoring;

pub use detection::Detection;
pub use facility::{Facility, FacilityStatus, NewFacility, UnknownStatus};
pub use geo::{EARTH_RADIUS_KM, GeoPoint, distance_km};
pub use nearby::{NEARBY_LIMIT, NearbyFacility, nearby};
pub use scoring::{BASELINE_SCORE, DEFAULT_PENALTY, Grade, PenaltyTable, Rating, score};
