//! GraphQL schema.
//!
//! Every field except the registration and token mutations is guarded by
//! [`AuthGuard`]; resolvers read the acting user from the
//! [`RequestContext`] attached to each request.

pub mod annotation;
pub mod auth;
pub mod content;
pub mod guard;
pub mod messaging;
pub mod types;
pub mod user;

use std::io::Read;

use async_graphql::{Context, EmptySubscription, MergedObject, Result, ResultExt, Schema, ID, Upload};
use snapfeed_common::{AppError, TokenIssuer};
use snapfeed_core::{ImageSource, NewUpload};

use crate::extractors::RequestContext;
use crate::state::Services;

pub use guard::AuthGuard;

/// Default page size for list fields.
const DEFAULT_LIMIT: u64 = 20;

/// Largest page a client may request.
const MAX_LIMIT: u64 = 100;

/// Root query object.
#[derive(MergedObject, Default)]
pub struct QueryRoot(
    user::UserQuery,
    content::ContentQuery,
    annotation::AnnotationQuery,
    messaging::MessagingQuery,
);

/// Root mutation object.
#[derive(MergedObject, Default)]
pub struct MutationRoot(
    auth::AuthMutation,
    user::UserMutation,
    content::ContentMutation,
    annotation::AnnotationMutation,
    messaging::MessagingMutation,
);

/// The application schema.
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with services and the token issuer as shared data.
#[must_use]
pub fn build_schema(services: Services, tokens: TokenIssuer) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(services)
        .data(tokens)
        .finish()
}

pub(crate) fn services<'a>(ctx: &Context<'a>) -> Result<&'a Services> {
    ctx.data::<Services>()
}

/// The acting user's ID.
pub(crate) fn viewer_id(ctx: &Context<'_>) -> Result<i64> {
    match ctx.data_opt::<RequestContext>() {
        Some(request) => request.viewer_id().extend(),
        None => Err(AppError::AuthenticationRequired).extend(),
    }
}

/// The acting user's ID, if any.
pub(crate) fn maybe_viewer_id(ctx: &Context<'_>) -> Option<i64> {
    ctx.data_opt::<RequestContext>()
        .and_then(|request| request.viewer.as_ref())
        .map(|viewer| viewer.id)
}

pub(crate) fn parse_id(id: &ID) -> Result<i64> {
    id.parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid ID: {}", id.as_str())))
        .extend()
}

pub(crate) fn parse_opt_id(id: Option<&ID>) -> Result<Option<i64>> {
    id.map(parse_id).transpose()
}

pub(crate) fn page_limit(limit: Option<i32>) -> u64 {
    limit.map_or(DEFAULT_LIMIT, |l| u64::try_from(l).unwrap_or(1).clamp(1, MAX_LIMIT))
}

pub(crate) fn to_id(id: i64) -> ID {
    ID(id.to_string())
}

/// Read an uploaded file into memory.
pub(crate) fn read_upload(ctx: &Context<'_>, upload: &Upload) -> Result<NewUpload> {
    let mut value = upload
        .value(ctx)
        .map_err(|e| AppError::BadRequest(format!("Unreadable upload: {e}")))
        .extend()?;

    let mut data = Vec::new();
    value
        .content
        .read_to_end(&mut data)
        .map_err(|e| AppError::BadRequest(format!("Unreadable upload: {e}")))
        .extend()?;

    Ok(NewUpload {
        filename: value.filename,
        content_type: value
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        data,
    })
}

/// An image given either as a stored path or as an upload.
pub(crate) fn image_source(
    ctx: &Context<'_>,
    path: Option<String>,
    file: Option<&Upload>,
) -> Result<ImageSource> {
    match (path, file) {
        (_, Some(upload)) => Ok(ImageSource::Upload(read_upload(ctx, upload)?)),
        (Some(path), None) => Ok(ImageSource::Path(path)),
        (None, None) => Err(AppError::BadRequest("An image is required".to_string())).extend(),
    }
}
