use sanitation_core::NewFacility;

use crate::node::FacilityNode;
use crate::prelude::*;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a facility.
    ///
    /// New facilities are open and start with a score of 100 (grade A).
    async fn create_facility(
        &self,
        context: &Context<'_>,
        name: String,
        lat: f64,
        lng: f64,
    ) -> async_graphql::Result<FacilityNode> {
        let store = get_store(context)?;

        let facility = store.create(NewFacility { name, lat, lng }).await?;

        tracing::info!("Created facility {} ({})", facility.id, facility.name);
        Ok(FacilityNode(facility))
    }
}
