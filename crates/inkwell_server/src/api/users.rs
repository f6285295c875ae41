use crate::api::current_user;
use crate::error::ApiResult;
use crate::session::SessionContext;
use crate::state::AppState;
use actix_web::{get, web, HttpResponse};
use inkwell_core::user_stats;

/// Word count and level for the logged-in user.
#[get("/user/stats")]
pub async fn stats(state: web::Data<AppState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let session_user = session.user_id()?;
    let stats = state
        .run(move |conn| current_user(conn, session_user).map(|user| user_stats(&user)))
        .await?;
    Ok(HttpResponse::Ok().json(stats))
}
