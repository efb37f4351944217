use axum::http::{HeaderName, HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds a CORS layer for the configured origins
///
/// Returns `Ok(None)` for an empty list so the router can skip CORS entirely.
/// The extra `session_header` is allowed so browsers can forward the caller
/// identity in development setups.
pub fn create_cors_layer(
    origins: &[String],
    session_header: &HeaderName,
) -> io::Result<Option<CorsLayer>> {
    if origins.is_empty() {
        return Ok(None);
    }

    let allowed = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    let layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::COOKIE,
            session_header.clone(),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    Ok(Some(layer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_header() -> HeaderName {
        HeaderName::from_static("x-user-id")
    }

    #[test]
    fn test_empty_origins_disable_cors() {
        assert!(create_cors_layer(&[], &user_header()).unwrap().is_none());
    }

    #[test]
    fn test_valid_origins_build_layer() {
        let origins = vec!["http://localhost:5173".to_string()];
        assert!(create_cors_layer(&origins, &user_header()).unwrap().is_some());
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let origins = vec!["http://bad\norigin".to_string()];
        let err = create_cors_layer(&origins, &user_header()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
