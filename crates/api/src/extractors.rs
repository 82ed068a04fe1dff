//! Request extractors.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use snapfeed_common::{AppError, AppResult, Claims};

use crate::state::AppState;

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: i64,
    pub username: String,
}

/// Per-request data handed to every resolver.
///
/// Built from the `Authorization: Bearer` header. A missing, malformed or
/// expired token yields an anonymous context rather than a rejection; the
/// schema's guards decide which fields need a viewer.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub viewer: Option<Viewer>,
}

impl RequestContext {
    /// A context without a viewer.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { viewer: None }
    }

    /// A context for a known viewer.
    #[must_use]
    pub const fn authenticated(viewer: Viewer) -> Self {
        Self {
            viewer: Some(viewer),
        }
    }

    /// Build a context from verified token claims.
    pub fn from_claims(claims: &Claims) -> AppResult<Self> {
        Ok(Self::authenticated(Viewer {
            id: claims.user_id()?,
            username: claims.username.clone(),
        }))
    }

    /// The viewer's user ID.
    pub fn viewer_id(&self) -> AppResult<i64> {
        self.viewer
            .as_ref()
            .map(|viewer| viewer.id)
            .ok_or(AppError::AuthenticationRequired)
    }
}

/// Pull the bearer token out of the request headers.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self::anonymous());
        };

        let context = state
            .tokens
            .verify(token)
            .and_then(|claims| Self::from_claims(&claims));

        Ok(context.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Ignoring invalid bearer token");
            Self::anonymous()
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/graphql");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }

    #[test]
    fn test_viewer_id() {
        assert!(matches!(
            RequestContext::anonymous().viewer_id(),
            Err(AppError::AuthenticationRequired)
        ));

        let ctx = RequestContext::authenticated(Viewer {
            id: 3,
            username: "carol".to_string(),
        });
        assert_eq!(ctx.viewer_id().unwrap(), 3);
    }
}
