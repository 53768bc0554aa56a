pub mod config;
pub mod database;
pub mod detect;
pub mod error;
pub mod facilities;
pub mod mutation;
pub mod node;
pub(crate) mod prelude;
pub mod query;
pub mod state;
pub(crate) mod utils;

use async_graphql::{EmptySubscription, Schema, http::GraphiQLSource};
use async_graphql_poem::GraphQL;
use mutation::MutationRoot;
use poem::{
    Endpoint, EndpointExt, IntoResponse, Route, get, handler,
    middleware::Cors,
    post,
    web::{Html, Json},
};
use query::QueryRoot;
use state::AppState;

pub type FacilitySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn schema(state: &AppState) -> FacilitySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state.store.clone())
        .finish()
}

#[handler]
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

#[handler]
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// All routes of the API, with permissive CORS.
pub fn app(state: AppState) -> impl Endpoint {
    let schema = schema(&state);

    Route::new()
        .at("/health", get(health))
        .at(
            "/facilities",
            get(facilities::list_facilities).post(facilities::create_facility),
        )
        .at("/facilities/:facility_id", get(facilities::get_facility))
        .at(
            "/facilities/nearby/:facility_id",
            get(facilities::nearby_facilities),
        )
        .at("/detect", post(detect::score_picture))
        .at("/score", post(detect::score_picture))
        .at("/detect/:facility_id", post(detect::score_facility))
        .at("/score/:facility_id", post(detect::score_facility))
        .at("/graphql", get(graphiql).post(GraphQL::new(schema)))
        .with(Cors::new())
        .data(state)
}
