//! HTTP routes.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};

use crate::extractors::RequestContext;
use crate::state::AppState;

/// Execute a GraphQL operation on behalf of the request's viewer.
async fn graphql_handler(
    State(state): State<AppState>,
    context: RequestContext,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = req.into_inner().data(context);
    state.schema.execute(request).await.into()
}

/// Serve the GraphiQL playground.
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn health() -> &'static str {
    "ok"
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/health", get(health))
}
