pub use async_graphql::{Context, Object};

pub use crate::utils::get_store;
