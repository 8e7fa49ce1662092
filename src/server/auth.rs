//! Bearer-token authentication for the API.
//!
//! The token is the configured transport token; every `/api` route requires it.

use crate::server::AppContext;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeader,
};
use serde_json::{json, Value};

/// Compare a presented token against the configured one.
fn check_token(expected: Option<&str>, presented: Option<&str>) -> bool {
    match (expected, presented) {
        (Some(expected), Some(presented)) => !expected.is_empty() && expected == presented,
        _ => false,
    }
}

/// Middleware rejecting requests without the transport token.
pub async fn api_auth_middleware(
    State(ctx): State<AppContext>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let presented = bearer.as_ref().map(|b| b.token());

    if !check_token(ctx.config.transport.token.as_deref(), presented) {
        tracing::debug!(path = %request.uri().path(), "Rejected unauthenticated request");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": posterdeck_common::Error::Unauthorized.to_string() })),
        ));
    }

    Ok(next.run(request).await)
}
