use sanitation_core::nearby;

use crate::node::{FacilityNode, NearbyNode};
use crate::prelude::*;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn facilities(&self, context: &Context<'_>) -> async_graphql::Result<Vec<FacilityNode>> {
        let store = get_store(context)?;

        let facilities = store.list().await?;

        Ok(facilities.into_iter().map(FacilityNode).collect())
    }

    async fn facility(
        &self,
        context: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<Option<FacilityNode>> {
        let store = get_store(context)?;

        let facility = store.get(id).await?;

        Ok(facility.map(FacilityNode))
    }

    /// Of the three open facilities closest to `facility_id`, the cleanest first.
    ///
    /// Empty when there is no such facility.
    async fn nearby(
        &self,
        context: &Context<'_>,
        facility_id: i64,
    ) -> async_graphql::Result<Vec<NearbyNode>> {
        let store = get_store(context)?;

        let facilities = store.list().await?;

        Ok(nearby(facility_id, &facilities)
            .into_iter()
            .map(NearbyNode)
            .collect())
    }
}
