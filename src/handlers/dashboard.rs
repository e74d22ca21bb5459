//! Embedded single-page dashboard.

use actix_web::{Error, HttpResponse, Result, http::header};
use paperclip::actix::api_v2_operation;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const DASHBOARD_JS: &str = include_str!("../../static/dashboard.js");

/// Dashboard page
#[api_v2_operation(
    summary = "Dashboard",
    description = "Serves the bot administration dashboard.",
    tags("Dashboard"),
    responses(
        (status = 200, description = "HTML page", content_type = "text/html")
    )
)]
pub async fn index() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .body(INDEX_HTML))
}

/// Dashboard script
#[api_v2_operation(
    summary = "Dashboard Script",
    tags("Dashboard"),
    responses(
        (status = 200, description = "JavaScript source", content_type = "application/javascript")
    )
)]
pub async fn dashboard_script() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .body(DASHBOARD_JS))
}
