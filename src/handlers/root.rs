// src/handlers/root.rs

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};

const TEAPOT_PAGE: &str = include_str!("../../templates/teapot.html");

/// Greeting, doubles as a liveness probe.
#[utoipa::path(get, path = "/", tag = "misc", responses((status = 200, description = "Greeting", body = String)))]
pub async fn hello_world() -> &'static str {
    "Hello world!"
}

/// Refuses to brew coffee.
#[utoipa::path(get, path = "/teapot", tag = "misc", responses((status = 418, description = "I'm a teapot", content_type = "text/html")))]
pub async fn teapot() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, Html(TEAPOT_PAGE))
}
