//! Page routes.
//!
//! Body and path extraction failures are held back until the session user is
//! resolved, so an anonymous caller always sees 401.

use crate::api::current_user;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionContext;
use crate::state::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse};
use inkwell_core::{Page, PageId, PageService};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PageBody {
    pub id: PageId,
    pub title: String,
}

impl From<Page> for PageBody {
    fn from(page: Page) -> Self {
        Self {
            id: page.id,
            title: page.title,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePageBody {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenamePageBody {
    #[serde(default)]
    pub title: Option<String>,
}

#[get("/pages")]
pub async fn list_pages(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let session_user = session.user_id()?;
    let pages = state
        .run(move |conn| {
            let user = current_user(conn, session_user)?;
            PageService::new(conn).list_pages(&user)
        })
        .await?;
    let body: Vec<PageBody> = pages.into_iter().map(PageBody::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/pages")]
pub async fn create_page(
    state: web::Data<AppState>,
    session: SessionContext,
    body: Result<web::Json<CreatePageBody>, ApiError>,
) -> ApiResult<HttpResponse> {
    let session_user = session.user_id()?;
    let page = state
        .run(move |conn| -> ApiResult<Page> {
            let user = current_user(conn, session_user)?;
            let CreatePageBody { title } = body?.into_inner();
            Ok(PageService::new(conn).create_page(&user, &title)?)
        })
        .await?;
    Ok(HttpResponse::Created().json(PageBody::from(page)))
}

#[put("/pages/{page_id}")]
pub async fn rename_page(
    state: web::Data<AppState>,
    session: SessionContext,
    path: Result<web::Path<PageId>, ApiError>,
    body: Result<web::Json<RenamePageBody>, ApiError>,
) -> ApiResult<HttpResponse> {
    let session_user = session.user_id()?;
    let page = state
        .run(move |conn| -> ApiResult<Page> {
            let user = current_user(conn, session_user)?;
            let page_id = path?.into_inner();
            let RenamePageBody { title } = body?.into_inner();
            Ok(PageService::new(conn).rename_page(&user, page_id, title.as_deref())?)
        })
        .await?;
    Ok(HttpResponse::Ok().json(PageBody::from(page)))
}

#[delete("/pages/{page_id}")]
pub async fn delete_page(
    state: web::Data<AppState>,
    session: SessionContext,
    path: Result<web::Path<PageId>, ApiError>,
) -> ApiResult<HttpResponse> {
    let session_user = session.user_id()?;
    state
        .run(move |conn| -> ApiResult<()> {
            let user = current_user(conn, session_user)?;
            PageService::new(conn).delete_page(&user, path?.into_inner())?;
            Ok(())
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
