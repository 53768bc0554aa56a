use async_graphql::Object;
use sanitation_core::{Facility, NearbyFacility};

/// GraphQL view of a [`Facility`].
pub struct FacilityNode(pub Facility);

#[Object(name = "Facility")]
impl FacilityNode {
    /// The ID of the facility.
    async fn id(&self) -> i64 {
        self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Latitude in decimal degrees.
    async fn lat(&self) -> f64 {
        self.0.lat
    }

    /// Longitude in decimal degrees.
    async fn lng(&self) -> f64 {
        self.0.lng
    }

    /// Cleanliness score, from 0 to 100.
    async fn score(&self) -> i32 {
        i32::from(self.0.score())
    }

    /// Letter grade, always derived from the score.
    async fn grade(&self) -> &'static str {
        self.0.grade().as_str()
    }

    /// Either `open` or `closed`.
    async fn status(&self) -> &'static str {
        self.0.status.as_str()
    }
}

pub struct NearbyNode(pub NearbyFacility);

#[Object(name = "NearbyFacility")]
impl NearbyNode {
    async fn facility(&self) -> FacilityNode {
        FacilityNode(self.0.facility.clone())
    }

    /// Distance to the requested facility, in kilometers.
    async fn distance(&self) -> f64 {
        self.0.distance
    }
}
