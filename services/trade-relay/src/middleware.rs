//! Middleware for API key checks, request logging and CORS

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{any::Any, sync::Arc};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{config::RelayConfig, error::RelayError};

/// API key middleware state
#[derive(Clone)]
pub struct ApiKeyState {
    pub header_name: HeaderName,
    api_key: Arc<str>,
}

impl ApiKeyState {
    /// Build from a header name and the expected key
    pub fn new(header_name: &str, api_key: &str) -> Result<Self, axum::http::header::InvalidHeaderName> {
        Ok(Self {
            header_name: HeaderName::from_bytes(header_name.as_bytes())?,
            api_key: Arc::from(api_key),
        })
    }

    /// Build from a validated configuration
    pub fn from_config(config: &RelayConfig) -> anyhow::Result<Self> {
        let api_key = config
            .auth
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("API key is not configured"))?;
        Ok(Self::new(&config.auth.header_name, api_key)?)
    }

    /// Exact comparison against the configured key
    #[must_use]
    pub fn matches(&self, provided: &str) -> bool {
        provided == &*self.api_key
    }
}

impl std::fmt::Debug for ApiKeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyState")
            .field("header_name", &self.header_name)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Reject requests whose key header is absent or does not match.
/// Runs before the body is read.
pub async fn api_key_middleware(
    State(state): State<ApiKeyState>,
    request: Request,
    next: Next,
) -> Result<Response, RelayError> {
    let provided = request
        .headers()
        .get(&state.header_name)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if state.matches(key) => Ok(next.run(request).await),
        Some(_) => {
            warn!(
                client_ip = %get_client_ip(&request),
                path = %request.uri().path(),
                "Rejected request with mismatched API key"
            );
            Err(RelayError::Unauthorized)
        }
        None => {
            warn!(
                client_ip = %get_client_ip(&request),
                path = %request.uri().path(),
                header = %state.header_name,
                "Rejected request without API key header"
            );
            Err(RelayError::Unauthorized)
        }
    }
}

/// Request logging middleware
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client_ip = get_client_ip(&request);

    let response = next.run(request).await;

    info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = start.elapsed().as_millis(),
        client_ip = %client_ip,
        "Request processed"
    );

    response
}

/// Turn a handler panic into a generic 500
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    RelayError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// CORS layer factory
pub fn create_cors_layer(config: &RelayConfig) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_credentials(config.cors.allow_credentials)
        .max_age(std::time::Duration::from_secs(config.cors.max_age_seconds));

    if config.cors.allowed_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_origin(tower_http::cors::Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Result<Vec<Method>, _> = config
        .cors
        .allowed_methods
        .iter()
        .map(|method| method.parse())
        .collect();

    if let Ok(methods) = methods {
        cors = cors.allow_methods(methods);
    }

    let headers: Result<Vec<HeaderName>, _> = config
        .cors
        .allowed_headers
        .iter()
        .map(|header| header.parse())
        .collect();

    if let Ok(headers) = headers {
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Extract client IP from proxy headers
pub fn get_client_ip(request: &Request) -> String {
    // X-Forwarded-For first, as set by reverse proxies
    if let Some(first_ip) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
    {
        return first_ip.trim().to_string();
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|value| value.to_str().ok())
    {
        return real_ip.to_string();
    }

    "unknown".to_string()
}
