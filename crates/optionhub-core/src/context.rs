//! Per-request context threaded explicitly through service calls.
//!
//! Carries the caller identity and diagnostic handles. Nothing here is
//! ambient: handlers build a [`RequestContext`] and pass it by reference.

use tracing::Span;

use crate::error::{Error, Result};

/// Caller identity and diagnostics for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    identity: Option<String>,
    request_id: Option<String>,
    span: Span,
}

impl RequestContext {
    pub fn new(identity: Option<String>, request_id: Option<String>) -> Self {
        Self {
            identity,
            request_id,
            span: Span::current(),
        }
    }

    /// Context with no caller identity.
    pub fn anonymous() -> Self {
        Self::new(None, None)
    }

    /// Context for an identified caller.
    pub fn for_user(identity: impl Into<String>) -> Self {
        Self::new(Some(identity.into()), None)
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// The caller identity, or `Unauthenticated` when absent.
    pub fn require_identity(&self) -> Result<&str> {
        self.identity
            .as_deref()
            .ok_or_else(|| Error::Unauthenticated("cannot find uuid".to_string()))
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Tracing span the request's work should be recorded under.
    pub fn span(&self) -> &Span {
        &self.span
    }
}
