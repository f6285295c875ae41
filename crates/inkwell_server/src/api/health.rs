use actix_web::{get, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthBody {
    ok: bool,
    version: &'static str,
}

/// Liveness probe; also handy for checking CORS from the frontend.
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthBody {
        ok: inkwell_core::ping() == "pong",
        version: inkwell_core::core_version(),
    })
}
