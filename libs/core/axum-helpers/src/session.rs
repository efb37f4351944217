//! Caller identity forwarded by the upstream auth layer
//!
//! The service sits behind a gateway that authenticates the user and passes
//! the id in a trusted request header. [`session_middleware`] lifts that
//! header into a [`SessionUser`] request extension; handlers take
//! `Option<SessionUser>` and decide for themselves what anonymous means.

use axum::{
    extract::{OptionalFromRequestParts, Request, State},
    http::{HeaderName, header::InvalidHeaderName, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

/// Authenticated user id for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: String,
}

impl SessionUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for SessionUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<SessionUser>().cloned())
    }
}

/// Which header carries the user id
#[derive(Debug, Clone)]
pub struct SessionConfig {
    header: HeaderName,
}

impl SessionConfig {
    pub fn new(header: &str) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            header: HeaderName::from_bytes(header.as_bytes())?,
        })
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static(core_config::server::DEFAULT_SESSION_HEADER),
        }
    }
}

/// Inserts a [`SessionUser`] when the configured header holds a non-blank value
///
/// ```ignore
/// let app = routes.layer(axum::middleware::from_fn_with_state(
///     SessionConfig::default(),
///     session_middleware,
/// ));
/// ```
pub async fn session_middleware(
    State(config): State<SessionConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = request
        .headers()
        .get(config.header())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(SessionUser::new);

    match user {
        Some(user) => {
            tracing::debug!(user_id = %user.user_id, "Session user attached");
            request.extensions_mut().insert(user);
        }
        None => tracing::debug!(header = %config.header(), "Request without session user"),
    }

    next.run(request).await
}
