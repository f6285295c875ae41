//! Block routes.

use crate::api::current_user;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionContext;
use crate::state::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse};
use inkwell_core::{
    Block, BlockContent, BlockEdit, BlockId, BlockKind, BlockService, NewBlock, PageId,
    ServiceError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct BlockBody {
    pub id: BlockId,
    pub page_id: PageId,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: BlockContent,
    pub order_index: i64,
}

impl From<Block> for BlockBody {
    fn from(block: Block) -> Self {
        Self {
            kind: block.kind(),
            id: block.id,
            page_id: block.page_id,
            content: block.content,
            order_index: block.order_index,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBlockBody {
    pub page_id: PageId,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Value,
    pub order_index: i64,
}

impl CreateBlockBody {
    fn into_new_block(self) -> Result<NewBlock, ServiceError> {
        let kind = match self.kind.as_deref() {
            Some(raw) => raw.parse::<BlockKind>()?,
            None => BlockKind::default(),
        };
        Ok(NewBlock {
            page_id: self.page_id,
            kind,
            content: self.content,
            order_index: self.order_index,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateBlockBody {
    pub content: Value,
    #[serde(default)]
    pub order_index: Option<i64>,
}

#[get("/pages/{page_id}/blocks")]
pub async fn list_blocks(
    state: web::Data<AppState>,
    session: SessionContext,
    path: Result<web::Path<PageId>, ApiError>,
) -> ApiResult<HttpResponse> {
    let session_user = session.user_id()?;
    let blocks = state
        .run(move |conn| -> ApiResult<Vec<Block>> {
            let user = current_user(conn, session_user)?;
            Ok(BlockService::new(conn).list_blocks(&user, path?.into_inner())?)
        })
        .await?;
    let body: Vec<BlockBody> = blocks.into_iter().map(BlockBody::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[post("/blocks")]
pub async fn create_block(
    state: web::Data<AppState>,
    session: SessionContext,
    body: Result<web::Json<CreateBlockBody>, ApiError>,
) -> ApiResult<HttpResponse> {
    let session_user = session.user_id()?;
    let block = state
        .run(move |conn| -> ApiResult<Block> {
            let user = current_user(conn, session_user)?;
            let input = body?.into_inner().into_new_block()?;
            Ok(BlockService::new(conn).create_block(&user, input)?)
        })
        .await?;
    Ok(HttpResponse::Created().json(BlockBody::from(block)))
}

#[put("/blocks/{block_id}")]
pub async fn update_block(
    state: web::Data<AppState>,
    session: SessionContext,
    path: Result<web::Path<BlockId>, ApiError>,
    body: Result<web::Json<UpdateBlockBody>, ApiError>,
) -> ApiResult<HttpResponse> {
    let session_user = session.user_id()?;
    let block = state
        .run(move |conn| -> ApiResult<Block> {
            let user = current_user(conn, session_user)?;
            let block_id = path?.into_inner();
            let UpdateBlockBody {
                content,
                order_index,
            } = body?.into_inner();
            let edit = BlockEdit {
                content,
                order_index,
            };
            Ok(BlockService::new(conn).update_block(&user, block_id, edit)?)
        })
        .await?;
    Ok(HttpResponse::Ok().json(BlockBody::from(block)))
}

#[delete("/blocks/{block_id}")]
pub async fn delete_block(
    state: web::Data<AppState>,
    session: SessionContext,
    path: Result<web::Path<BlockId>, ApiError>,
) -> ApiResult<HttpResponse> {
    let session_user = session.user_id()?;
    state
        .run(move |conn| -> ApiResult<()> {
            let user = current_user(conn, session_user)?;
            BlockService::new(conn).delete_block(&user, path?.into_inner())?;
            Ok(())
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
