use actix_web::{HttpResponse, error::ErrorInternalServerError, web};

use crate::startup::AppState;

/// Launcher-owned endpoints, mounted ahead of the bundle fallback so
/// they are never shadowed by a client-side route.
pub fn build_app_scope() -> actix_web::Scope {
    web::scope("/_app")
        .route("/health", web::get().to(|| async { "OK" }))
        .route("/status", web::get().to(status))
}

#[derive(Debug, serde::Serialize)]
struct StatusBody {
    name: &'static str,
    version: &'static str,
    debug: bool,
    bundle_dir: String,
}

async fn status(state: web::Data<AppState>) -> actix_web::Result<HttpResponse> {
    let body = StatusBody {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        debug: state.debug,
        bundle_dir: state.bundle.root().display().to_string(),
    };

    let payload = serde_json::to_string(&body).map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok()
        .append_header(("Cache-Control", "no-store, max-age=0"))
        .content_type("application/json")
        .body(payload))
}
