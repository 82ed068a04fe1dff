//! GraphQL API layer for snapfeed.
//!
//! - **Schema**: async-graphql queries and mutations over the core services
//! - **Extractors**: the per-request [`RequestContext`] built from a bearer token
//! - **Endpoints**: `/graphql` (POST operations, GET playground) and `/health`
//!
//! Built on Axum 0.8 with async-graphql 7.

pub mod endpoints;
pub mod extractors;
pub mod schema;
pub mod state;

pub use endpoints::router;
pub use extractors::{RequestContext, Viewer};
pub use schema::{AppSchema, build_schema};
pub use state::{AppState, Services};
