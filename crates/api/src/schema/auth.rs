//! Registration and token mutations. These fields are not guarded.

use async_graphql::{Context, Json, Object, Result, ResultExt};
use snapfeed_common::TokenIssuer;
use snapfeed_core::RegisterInput;

use super::services;
use super::types::{AuthPayload, RegisterPayload, UserType, VerifyPayload};

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Create an account.
    async fn register_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
    ) -> Result<RegisterPayload> {
        let user = services(ctx)?
            .user_service
            .register(RegisterInput {
                username,
                email,
                password,
            })
            .await
            .extend()?;

        Ok(RegisterPayload {
            user: UserType(user),
        })
    }

    /// Exchange credentials for a token.
    async fn token_auth(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<AuthPayload> {
        let user = services(ctx)?
            .user_service
            .authenticate(&username, &password)
            .await
            .extend()?;

        let tokens = ctx.data::<TokenIssuer>()?;
        let token = tokens.issue(user.id, &user.username).extend()?;
        let claims = tokens.verify(&token).extend()?;

        tracing::debug!(user_id = user.id, "Issued token");

        Ok(AuthPayload {
            token,
            refresh_expires_in: tokens.refresh_expires_at(&claims),
            payload: Json(claims),
            user: Some(UserType(user)),
        })
    }

    /// Check a token's signature and expiry.
    async fn verify_token(&self, ctx: &Context<'_>, token: String) -> Result<VerifyPayload> {
        let claims = ctx.data::<TokenIssuer>()?.verify(&token).extend()?;
        Ok(VerifyPayload {
            payload: Json(claims),
        })
    }

    /// Issue a new token while the refresh window is still open.
    async fn refresh_token(&self, ctx: &Context<'_>, token: String) -> Result<AuthPayload> {
        let tokens = ctx.data::<TokenIssuer>()?;
        let (token, claims) = tokens.refresh(&token).extend()?;

        Ok(AuthPayload {
            token,
            refresh_expires_in: tokens.refresh_expires_at(&claims),
            payload: Json(claims),
            user: None,
        })
    }
}
