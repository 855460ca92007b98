//! Pack catalog and pack assignment handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::*;
use crate::application::{PackAssignmentService, PackCatalogService};
use crate::interfaces::http::common::{
    ApiError, ApiResponse, ApiResult, ConflictReport, ValidatedJson,
};

#[derive(Clone)]
pub struct PackState {
    pub catalog: Arc<PackCatalogService>,
    pub assignments: Arc<PackAssignmentService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/packs",
    tag = "Packs",
    params(ListPacksParams),
    responses((status = 200, description = "Pack catalog", body = ApiResponse<Vec<PackDto>>))
)]
pub async fn list_packs(
    State(state): State<PackState>,
    Query(params): Query<ListPacksParams>,
) -> ApiResult<Vec<PackDto>> {
    let packs = state.catalog.list(params.active_only).await?;
    Ok(Json(ApiResponse::success(
        packs.into_iter().map(PackDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/packs/{id}",
    tag = "Packs",
    params(("id" = i32, Path, description = "Pack ID")),
    responses(
        (status = 200, description = "Pack details", body = ApiResponse<PackDto>),
        (status = 404, description = "Pack not found")
    )
)]
pub async fn get_pack(State(state): State<PackState>, Path(id): Path<i32>) -> ApiResult<PackDto> {
    let pack = state.catalog.get(id).await?;
    Ok(Json(ApiResponse::success(pack.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/packs",
    tag = "Packs",
    request_body = CreatePackRequest,
    responses(
        (status = 201, description = "Pack created", body = ApiResponse<PackDto>),
        (status = 400, description = "Invalid pack"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_pack(
    State(state): State<PackState>,
    ValidatedJson(request): ValidatedJson<CreatePackRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PackDto>>), ApiError> {
    let pack = state.catalog.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(pack.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/packs/{id}",
    tag = "Packs",
    params(("id" = i32, Path, description = "Pack ID")),
    request_body = UpdatePackRequest,
    responses(
        (status = 200, description = "Pack updated", body = ApiResponse<PackDto>),
        (status = 404, description = "Pack not found")
    )
)]
pub async fn update_pack(
    State(state): State<PackState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdatePackRequest>,
) -> ApiResult<PackDto> {
    let pack = state.catalog.update(id, request.into()).await?;
    Ok(Json(ApiResponse::success(pack.into())))
}

/// Packs are never removed; this deactivates them.
#[utoipa::path(
    delete,
    path = "/api/v1/packs/{id}",
    tag = "Packs",
    params(("id" = i32, Path, description = "Pack ID")),
    responses(
        (status = 200, description = "Pack deactivated", body = ApiResponse<PackDto>),
        (status = 404, description = "Pack not found")
    )
)]
pub async fn deactivate_pack(
    State(state): State<PackState>,
    Path(id): Path<i32>,
) -> ApiResult<PackDto> {
    let pack = state.catalog.deactivate(id).await?;
    Ok(Json(ApiResponse::success(pack.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/packs/assign",
    tag = "Packs",
    request_body = AssignPackRequest,
    responses(
        (status = 200, description = "Pack assigned", body = ApiResponse<AssignPackResponse>),
        (status = 400, description = "Invalid request or schedule conflicts", body = ApiResponse<ConflictReport>),
        (status = 404, description = "Pack, user, sede or room not found")
    )
)]
pub async fn assign_pack(
    State(state): State<PackState>,
    ValidatedJson(request): ValidatedJson<AssignPackRequest>,
) -> ApiResult<AssignPackResponse> {
    let summary = state.assignments.assign(request.into()).await?;
    Ok(Json(ApiResponse::success(summary.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/packs/assign/check",
    tag = "Packs",
    request_body = AssignPackRequest,
    responses(
        (status = 200, description = "Planned range and conflicts; nothing is written", body = ApiResponse<ConflictCheckResponse>),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn check_assignment(
    State(state): State<PackState>,
    ValidatedJson(request): ValidatedJson<AssignPackRequest>,
) -> ApiResult<ConflictCheckResponse> {
    let check = state.assignments.check(request.into()).await?;
    Ok(Json(ApiResponse::success(check.into())))
}
