//! Request extractors: bearer sessions, plus body, path and query
//! extractors whose rejections render as JSON errors.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::application::ports::Repositories;
use crate::domain::accounts::Account;
use crate::error::MarketplaceError;

use super::controller::AppState;

const BEARER: &str = "Bearer ";

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER)?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// The logged-in requester. Rejects with 401 when the token is missing,
/// unknown or expired.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Account behind the token.
    pub account: Account,
    /// The presented token, needed for logout.
    pub token: String,
}

impl<R> FromRequestParts<AppState<R>> for AuthUser
where
    R: Repositories,
{
    type Rejection = MarketplaceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<R>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(MarketplaceError::unauthenticated)?;
        let account = state.session.authenticate(&token).await?;
        Ok(Self { account, token })
    }
}

/// The requester if a token was presented. An invalid token still rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Account>);

impl<R> FromRequestParts<AppState<R>> for MaybeUser
where
    R: Repositories,
{
    type Rejection = MarketplaceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<R>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Some(token) => Ok(Self(Some(state.session.authenticate(&token).await?))),
            None => Ok(Self(None)),
        }
    }
}

/// [`Json`] whose rejection is rendered as a [`MarketplaceError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = MarketplaceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection| MarketplaceError::invalid_request(rejection.body_text()))
    }
}

/// [`Path`] whose rejection is rendered as a [`MarketplaceError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = MarketplaceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| MarketplaceError::invalid_request(rejection.body_text()))
    }
}

/// [`Query`] whose rejection is rendered as a [`MarketplaceError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = MarketplaceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| MarketplaceError::invalid_request(rejection.body_text()))
    }
}
