//! Space CRUD and price preview handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;

use venue_core::types::{PageResponse, SpaceId};
use venue_entity::pricing::PriceBreakdown;
use venue_entity::space::Space;
use venue_service::QuoteRequest;

use crate::dto::request::{CreateSpaceBody, QuoteBody, SpaceListQuery, UpdateSpaceBody, validated};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// POST /api/spaces
pub async fn create_space(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateSpaceBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Space>>)> {
    let body = validated(body)?;
    let space = state.space_service.create(&auth, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(space))))
}

/// GET /api/spaces
pub async fn list_spaces(
    State(state): State<AppState>,
    MaybeAuthUser(ctx): MaybeAuthUser,
    Query(query): Query<SpaceListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Space>>>> {
    let page = state
        .space_service
        .list(
            ctx.as_ref(),
            query.filter(),
            query.pagination().into_page_request(),
        )
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/spaces/mine
pub async fn list_my_spaces(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SpaceListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Space>>>> {
    let page = state
        .space_service
        .list_mine(
            &auth,
            query.space_type,
            query.pagination().into_page_request(),
        )
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/spaces/{id}
pub async fn get_space(
    State(state): State<AppState>,
    Path(id): Path<SpaceId>,
) -> ApiResult<Json<ApiResponse<Space>>> {
    let space = state.space_service.get(id).await?;
    Ok(Json(ApiResponse::ok(space)))
}

/// PUT /api/spaces/{id}
pub async fn update_space(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SpaceId>,
    Json(body): Json<UpdateSpaceBody>,
) -> ApiResult<Json<ApiResponse<Space>>> {
    let body = validated(body)?;
    let space = state.space_service.update(&auth, id, body.into()).await?;
    Ok(Json(ApiResponse::ok(space)))
}

/// DELETE /api/spaces/{id}
pub async fn delete_space(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SpaceId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let message = match state.space_service.delete(&auth, id).await? {
        Some(_) => "Space deactivated",
        None => "Space deleted",
    };
    Ok(Json(ApiResponse::ok(MessageResponse::new(message))))
}

/// POST /api/spaces/{id}/quote
pub async fn quote_price(
    State(state): State<AppState>,
    Path(id): Path<SpaceId>,
    Json(body): Json<QuoteBody>,
) -> ApiResult<Json<ApiResponse<PriceBreakdown>>> {
    let request: QuoteRequest = validated(body)?.into();
    let quote = state.space_service.quote(id, &request, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(quote)))
}
