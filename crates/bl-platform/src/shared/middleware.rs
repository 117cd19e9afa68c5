//! API Middleware
//!
//! `IdentityLayer` resolves the bearer token of every request into an [`Extraction`] and
//! stores it in the request extensions. Handlers then pick it up through the
//! [`CurrentIdentity`] or [`RequireIdentity`] extractors.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
    response::Response,
};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::debug;

use crate::auth::identity::{extract_identity, Extraction, Identity, Principal};
use crate::auth::token_codec::TokenCodec;
use crate::shared::error::{PlatformError, TOKEN_MISSING};

/// Identity of the caller, anonymous when no valid token was presented
pub struct CurrentIdentity(pub Identity);

impl std::ops::Deref for CurrentIdentity {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Extraction>()
            .map(Extraction::identity)
            .unwrap_or(Identity::Anonymous);

        Ok(CurrentIdentity(identity))
    }
}

/// Verified principal. Rejects the request with 401 when there is none.
pub struct RequireIdentity(pub Principal);

impl std::ops::Deref for RequireIdentity {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl RequireIdentity {
    pub fn identity(&self) -> Identity {
        Identity::Authenticated(self.0.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireIdentity
where
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Extraction>() {
            Some(Extraction::Verified(principal)) => Ok(RequireIdentity(principal.clone())),
            Some(Extraction::Rejected(err)) => Err(err.clone().into()),
            Some(Extraction::NoToken) | None => Err(PlatformError::unauthenticated(TOKEN_MISSING)),
        }
    }
}

/// Middleware layer that resolves request identity into the extensions
#[derive(Clone)]
pub struct IdentityLayer {
    codec: Arc<TokenCodec>,
}

impl IdentityLayer {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl<S> Layer<S> for IdentityLayer {
    type Service = IdentityMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IdentityMiddleware {
            inner,
            codec: self.codec.clone(),
        }
    }
}

#[derive(Clone)]
pub struct IdentityMiddleware<S> {
    inner: S,
    codec: Arc<TokenCodec>,
}

impl<S, B> Service<axum::http::Request<B>> for IdentityMiddleware<S>
where
    S: Service<axum::http::Request<B>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v: &HeaderValue| v.to_str().ok());

        let extraction = extract_identity(&self.codec, header);
        if let Extraction::Rejected(ref e) = extraction {
            debug!(error = %e, path = %req.uri().path(), "Bearer token rejected, continuing anonymously");
        }

        req.extensions_mut().insert(extraction);

        let future = self.inner.call(req);
        Box::pin(async move { future.await })
    }
}
