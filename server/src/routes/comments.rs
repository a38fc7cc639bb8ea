//! Discussion-board comment routes.
//!
//! DESIGN
//! ======
//! Handlers translate between HTTP and [`crate::services::comments`]. Every
//! error body is `{"error": "..."}`; store failures are logged here and
//! reported to the client only as "Server error".

use std::net::SocketAddr;

use axum::body::{Body, to_bytes};
use axum::extract::{ConnectInfo, Query, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{error, info};

use crate::rate_limit::RateLimitError;
use crate::services::comments::{self, CommentDraft, CommentError};
use crate::state::AppState;

/// Bodies beyond this are refused with 413. The message limit applies after
/// trimming, so the cap leaves room for padded but valid posts.
pub(crate) const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

pub(crate) fn comment_error_response(err: CommentError) -> Response {
    match err {
        CommentError::MessageRequired | CommentError::MessageTooLong => {
            error_body(StatusCode::BAD_REQUEST, &err.to_string())
        }
        CommentError::RateLimited(ref limited) => {
            let RateLimitError::CooldownActive { retry_after_secs } = limited;
            let mut resp = error_body(StatusCode::TOO_MANY_REQUESTS, &limited.to_string());
            resp.headers_mut().insert(RETRY_AFTER, (*retry_after_secs).into());
            resp
        }
        CommentError::Store(e) => {
            error!(error = %e, "comment store failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        }
    }
}

/// Client address: first `x-forwarded-for` hop, then `client-ip`, then the
/// socket peer. Empty when none is known.
pub(crate) fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    };
    header("x-forwarded-for")
        .or_else(|| header("client-ip"))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_default()
}

/// `GET /api/comments`: recent comments, newest first.
pub async fn list_comments(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    let limit = comments::parse_limit(params.limit.as_deref());
    match comments::list_comments(state.comments.as_ref(), limit).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => comment_error_response(e),
    }
}

/// `POST /api/comments`: store a comment after validation and the IP cooldown.
pub async fn create_comment(State(state): State<AppState>, request: Request) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(request.headers(), peer);
    let body = match to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(e) => {
            info!(error = %e, %ip, "comment body rejected");
            return error_body(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large");
        }
    };
    let draft = CommentDraft::from_body(&body);

    match comments::post_comment(state.comments.as_ref(), &state.cooldown, &draft, &ip, OffsetDateTime::now_utc())
        .await
    {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(e) => comment_error_response(e),
    }
}

/// `OPTIONS /api/comments`: empty 200 for clients that skip CORS preflight.
pub async fn preflight() -> Response {
    (StatusCode::OK, Body::empty()).into_response()
}

pub async fn method_not_allowed() -> Response {
    error_body(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;
