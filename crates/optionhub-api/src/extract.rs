//! Request extractors.
//!
//! [`Caller`] and [`RequireCaller`] carry the identity. [`ApiJson`],
//! [`ApiPath`] and [`ApiQuery`] wrap the axum extractors so their rejections
//! come back as `{"error": ...}` bodies like every other failure.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use tower_http::request_id::RequestId;
use tracing::Span;

use optionhub_core::defaults::IDENTITY_HEADER;
use optionhub_core::RequestContext;

use crate::error::ApiError;

/// Builds the [`RequestContext`] for a handler.
///
/// The caller identity comes from the `uuid` header. A missing header yields
/// an anonymous context (see [`RequireCaller`]); more than one `uuid` value
/// is rejected outright.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut values = parts.headers.get_all(IDENTITY_HEADER).iter();

        let identity = match (values.next(), values.next()) {
            (None, _) => None,
            (Some(value), None) => {
                let value = value
                    .to_str()
                    .map_err(|_| ApiError::Unauthorized("malformed uuid".to_string()))?
                    .trim();
                (!value.is_empty()).then(|| value.to_string())
            }
            (Some(_), Some(_)) => {
                return Err(ApiError::Unauthorized(
                    "multiple uuids are not allowed".to_string(),
                ))
            }
        };

        let request_id = parts
            .extensions
            .get::<RequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .map(str::to_string);

        Ok(Caller(
            RequestContext::new(identity, request_id).with_span(Span::current()),
        ))
    }
}

/// Like [`Caller`], but rejects an anonymous request with 401.
///
/// Mutation handlers take this before their path and body extractors, so a
/// missing identity is reported ahead of any malformed input.
#[derive(Debug, Clone)]
pub struct RequireCaller(pub RequestContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireCaller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Caller(ctx) = Caller::from_request_parts(parts, state).await?;
        ctx.require_identity()?;
        Ok(RequireCaller(ctx))
    }
}

/// JSON body extractor with [`ApiError`] rejections.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ApiJson(value))
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
    }
}

/// Path extractor with [`ApiError`] rejections.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ApiPath(value))
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
    }
}

/// Query string extractor with [`ApiError`] rejections.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
    }
}

/// Reject any request that carries more than one `uuid` header.
///
/// Applied router-wide, so reads that never look at the identity still honor
/// the single-identity rule.
pub async fn single_identity(req: Request, next: Next) -> Result<Response, ApiError> {
    if req.headers().get_all(IDENTITY_HEADER).iter().count() > 1 {
        return Err(ApiError::Unauthorized(
            "multiple uuids are not allowed".to_string(),
        ));
    }
    Ok(next.run(req).await)
}
