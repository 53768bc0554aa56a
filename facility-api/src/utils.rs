use async_graphql::Context;

use crate::database::FacilityStore;

/// Get the facility store from [`Context`].
pub fn get_store(context: &Context<'_>) -> async_graphql::Result<FacilityStore> {
    Ok(context.data::<FacilityStore>()?.clone())
}
