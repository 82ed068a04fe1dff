//! Field guards.

use async_graphql::{Context, ErrorExtensions, Guard, Result};
use snapfeed_common::AppError;

use crate::extractors::RequestContext;

/// Rejects callers without an authenticated viewer before the resolver runs.
pub struct AuthGuard;

impl Guard for AuthGuard {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        let authenticated = ctx
            .data_opt::<RequestContext>()
            .is_some_and(|request| request.viewer.is_some());

        if authenticated {
            Ok(())
        } else {
            Err(AppError::AuthenticationRequired.extend())
        }
    }
}
