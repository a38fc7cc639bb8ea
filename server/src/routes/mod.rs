//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the discussion-board endpoint and the read-only course
//! API under a single Axum router. The comment endpoint is mounted twice:
//! at `/api/comments` and at the serverless-style path the static site was
//! first deployed against, so older front-end builds keep working.

pub mod comments;
pub mod course;

use axum::Router;
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::routing::{MethodRouter, get};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AllowedOrigin, ServerConfig};
use crate::state::AppState;

pub const COMMENTS_PATH: &str = "/api/comments";
pub const LEGACY_COMMENTS_PATH: &str = "/.netlify/functions/comments";

fn cors_layer(origin: &AllowedOrigin) -> CorsLayer {
    let allow_origin = match origin {
        AllowedOrigin::Any => AllowOrigin::any(),
        AllowedOrigin::Exact(value) => AllowOrigin::exact(value.clone()),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

fn comments_routes() -> MethodRouter<AppState> {
    get(comments::list_comments)
        .post(comments::create_comment)
        .options(comments::preflight)
        .fallback(comments::method_not_allowed)
}

/// Full application router.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route(COMMENTS_PATH, comments_routes())
        .route(LEGACY_COMMENTS_PATH, comments_routes())
        .route("/api/course", get(course::course_info))
        .route("/api/syllabus", get(course::syllabus))
        .route("/api/students", get(course::students))
        .route("/api/students/{id}/grades", get(course::student_grades))
        .route("/api/students/{id}/attendance", get(course::student_attendance))
        .route("/api/students/{id}/assignments", get(course::student_assignments))
        .route("/api/grades", get(course::class_grades))
        .route("/api/homework", get(course::homework))
        .route("/api/books", get(course::books))
        .route("/api/notes", get(course::notes))
        .route("/healthz", get(healthz))
        // Every response lists the allowed methods and headers, not only
        // preflight replies.
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET,POST,OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        ))
        .layer(cors_layer(&config.allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
