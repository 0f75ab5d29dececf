use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode, header::ORIGIN},
    middleware::Next,
    response::Response,
};

use crate::{errors::HttpError, state::HttpState};

pub const TOKEN_HEADER: &str = "x-water-token";

pub async fn require_token(
    State(state): State<HttpState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    if let Some(origin) = req.headers().get(ORIGIN) {
        let origin = origin.to_str().map_err(|_| {
            HttpError::invalid_origin(StatusCode::BAD_REQUEST, "invalid Origin header")
        })?;
        if !is_allowed_origin(origin) {
            return Err(HttpError::invalid_origin(
                StatusCode::FORBIDDEN,
                "invalid origin",
            ));
        }
    }

    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| query_token(&req));
    if !state.token_matches(token.as_deref()) {
        return Err(HttpError::invalid_token());
    }

    Ok(next.run(req).await)
}

// EventSource cannot set headers, so GET requests may pass the token as
// `?token=`.
fn query_token(req: &Request<Body>) -> Option<String> {
    if req.method() != Method::GET {
        return None;
    }
    req.uri()
        .query()?
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .map(str::to_string)
}

fn is_allowed_origin(origin: &str) -> bool {
    origin.starts_with("chrome-extension://")
        || origin.starts_with("http://127.0.0.1:")
        || origin.starts_with("http://localhost:")
        || origin.starts_with("http://[::1]:")
        || origin.starts_with("https://127.0.0.1:")
        || origin.starts_with("https://localhost:")
        || origin.starts_with("https://[::1]:")
}
