//! Asset management handlers
//!
//! Thin wrappers over `AssetService`; permission and invariant checks live
//! in the service and `domain::policy`. Read endpoints are public, mutating
//! and export endpoints authenticate via the [`Actor`] extractor.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use super::dto::{
    render_asset, render_assets, selected_columns, AllAssetsDeleted, AssetCreated, AssetDeleted,
    AssetDto, BulkCheckInRequest, BulkCheckInResponse, CheckEpcParams, CheckEpcResponse,
    CheckInRequest, CheckInResponse, CreateAssetRequest, DeleteAllParams, ExportAssetsParams,
    ListAssetsParams, SearchAssetsParams, ASSET_COLUMNS,
};
use crate::application::assets::AssetService;
use crate::domain::policy::Actor;
use crate::infrastructure::database::repositories::AssetRepository;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::shared::DomainError;

/// Asset handler state — concrete over `AssetRepository` for Axum.
#[derive(Clone)]
pub struct AssetHandlerState {
    pub service: Arc<AssetService<AssetRepository>>,
}

#[utoipa::path(
    get,
    path = "/assets",
    tag = "Assets",
    params(ListAssetsParams),
    responses(
        (status = 200, description = "Asset list", body = ApiResponse<Vec<AssetDto>>)
    )
)]
pub async fn list_assets(
    State(state): State<AssetHandlerState>,
    Query(params): Query<ListAssetsParams>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let assets = state.service.list().await?;
    let (count, data) = render_assets(assets, params.columns.as_deref());
    Ok(Json(ApiResponse {
        success: true,
        message: None,
        data: Some(data),
        count: Some(count),
    }))
}

#[utoipa::path(
    get,
    path = "/assets/search",
    tag = "Assets",
    params(SearchAssetsParams),
    responses(
        (status = 200, description = "Matching assets", body = ApiResponse<Vec<AssetDto>>)
    )
)]
pub async fn search_assets(
    State(state): State<AssetHandlerState>,
    Query(params): Query<SearchAssetsParams>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let assets = state.service.search(params.into()).await?;
    let (count, data) = render_assets(assets, None);
    Ok(Json(ApiResponse {
        success: true,
        message: None,
        data: Some(data),
        count: Some(count),
    }))
}

#[utoipa::path(
    get,
    path = "/assets/check-epc",
    tag = "Assets",
    params(CheckEpcParams),
    responses(
        (status = 200, description = "EPC existence", body = ApiResponse<CheckEpcResponse>),
        (status = 400, description = "Missing epc parameter")
    )
)]
pub async fn check_epc(
    State(state): State<AssetHandlerState>,
    Query(params): Query<CheckEpcParams>,
) -> Result<Json<ApiResponse<CheckEpcResponse>>, ApiError> {
    let epc = params.epc.unwrap_or_default();
    let existing = state.service.check_epc(&epc).await?;

    let response = CheckEpcResponse {
        exists: existing.is_some(),
        asset: existing.map(|a| AssetCreated {
            id: a.id,
            tag_id: a.tag_id,
            epc: a.epc,
        }),
    };
    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/assets/id/{id}",
    tag = "Assets",
    params(("id" = String, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset record", body = ApiResponse<AssetDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_asset_by_id(
    State(state): State<AssetHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let asset = state.service.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(render_asset(asset, None))))
}

#[utoipa::path(
    get,
    path = "/assets/{tag_id}",
    tag = "Assets",
    params(
        ("tag_id" = String, Path, description = "RFID tag ID"),
        ListAssetsParams
    ),
    responses(
        (status = 200, description = "Asset record", body = ApiResponse<AssetDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_asset_by_tag(
    State(state): State<AssetHandlerState>,
    Path(tag_id): Path<String>,
    Query(params): Query<ListAssetsParams>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let asset = state.service.get_by_tag_id(&tag_id).await?;
    Ok(Json(ApiResponse::success(render_asset(
        asset,
        params.columns.as_deref(),
    ))))
}

#[utoipa::path(
    post,
    path = "/assets",
    tag = "Assets",
    security(("bearer_auth" = [])),
    request_body = CreateAssetRequest,
    responses(
        (status = 201, description = "Asset created", body = ApiResponse<AssetCreated>),
        (status = 400, description = "Missing required field"),
        (status = 401, description = "Requires manager level"),
        (status = 409, description = "Duplicate epc or tagId")
    )
)]
pub async fn create_asset(
    State(state): State<AssetHandlerState>,
    actor: Actor,
    ValidatedJson(request): ValidatedJson<CreateAssetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AssetCreated>>), ApiError> {
    let asset = state.service.create(Some(&actor), request.into()).await?;

    let created = AssetCreated {
        id: asset.id,
        tag_id: asset.tag_id,
        epc: asset.epc,
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Asset created successfully", created)),
    ))
}

#[utoipa::path(
    put,
    path = "/assets/{tag_id}/status/checked",
    tag = "Assets",
    security(("bearer_auth" = [])),
    params(("tag_id" = String, Path, description = "RFID tag ID")),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<CheckInResponse>),
        (status = 400, description = "Asset is not Available"),
        (status = 401, description = "Requires staff level"),
        (status = 404, description = "Not found")
    )
)]
pub async fn check_in_asset(
    State(state): State<AssetHandlerState>,
    actor: Actor,
    Path(tag_id): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<CheckInResponse>>, ApiError> {
    // The scanner name rides in an optional JSON body.
    let request: CheckInRequest = if body.is_empty() {
        CheckInRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| DomainError::Validation(format!("Invalid JSON: {}", e)))?
    };

    let outcome = state
        .service
        .check_in(Some(&actor), &tag_id, request.last_scanned_by.as_deref())
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Status updated successfully",
        CheckInResponse::from(outcome),
    )))
}

#[utoipa::path(
    put,
    path = "/assets/bulk/status/checked",
    tag = "Assets",
    security(("bearer_auth" = [])),
    request_body = BulkCheckInRequest,
    responses(
        (status = 200, description = "Bulk status update", body = ApiResponse<BulkCheckInResponse>),
        (status = 401, description = "Requires staff level")
    )
)]
pub async fn bulk_check_in(
    State(state): State<AssetHandlerState>,
    actor: Actor,
    ValidatedJson(request): ValidatedJson<BulkCheckInRequest>,
) -> Result<Json<ApiResponse<BulkCheckInResponse>>, ApiError> {
    let updated = state
        .service
        .bulk_check_in(
            Some(&actor),
            &request.tag_ids,
            request.last_scanned_by.as_deref(),
        )
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Status updated successfully",
        BulkCheckInResponse {
            requested: request.tag_ids.len(),
            updated,
        },
    )))
}

#[utoipa::path(
    delete,
    path = "/assets/{tag_id}",
    tag = "Assets",
    security(("bearer_auth" = [])),
    params(("tag_id" = String, Path, description = "RFID tag ID")),
    responses(
        (status = 200, description = "Asset deleted", body = ApiResponse<AssetDeleted>),
        (status = 401, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_asset(
    State(state): State<AssetHandlerState>,
    actor: Actor,
    Path(tag_id): Path<String>,
) -> Result<Json<ApiResponse<AssetDeleted>>, ApiError> {
    state.service.delete(Some(&actor), &tag_id).await?;

    Ok(Json(ApiResponse::with_message(
        "Asset deleted successfully",
        AssetDeleted {
            tag_id,
            deleted_by: actor.username,
            deleted_at: Utc::now(),
        },
    )))
}

#[utoipa::path(
    delete,
    path = "/assets/all",
    tag = "Assets",
    security(("bearer_auth" = [])),
    params(DeleteAllParams),
    responses(
        (status = 200, description = "All assets deleted", body = ApiResponse<AllAssetsDeleted>),
        (status = 400, description = "Missing confirmation sentinel"),
        (status = 401, description = "Admin only")
    )
)]
pub async fn delete_all_assets(
    State(state): State<AssetHandlerState>,
    actor: Actor,
    Query(params): Query<DeleteAllParams>,
) -> Result<Json<ApiResponse<AllAssetsDeleted>>, ApiError> {
    let deleted_count = state
        .service
        .delete_all(Some(&actor), params.confirm.as_deref())
        .await?;

    let message = if deleted_count == 0 {
        "No assets to delete".to_string()
    } else {
        format!("All assets deleted successfully ({} records)", deleted_count)
    };

    Ok(Json(ApiResponse::with_message(
        message,
        AllAssetsDeleted {
            deleted_count,
            deleted_by: actor.username,
            deleted_at: Utc::now(),
        },
    )))
}

#[utoipa::path(
    get,
    path = "/assets/export",
    tag = "Assets",
    security(("bearer_auth" = [])),
    params(ExportAssetsParams),
    responses(
        (status = 200, description = "Export as JSON or CSV attachment"),
        (status = 401, description = "Requires staff level")
    )
)]
pub async fn export_assets(
    State(state): State<AssetHandlerState>,
    actor: Actor,
    Query(params): Query<ExportAssetsParams>,
) -> Result<Response, ApiError> {
    let assets = state.service.export(Some(&actor), params.filter()).await?;
    let dtos: Vec<AssetDto> = assets.into_iter().map(AssetDto::from).collect();

    let columns =
        selected_columns(params.columns.as_deref()).unwrap_or_else(|| ASSET_COLUMNS.to_vec());
    let format = params
        .format
        .as_deref()
        .unwrap_or("json")
        .to_ascii_lowercase();

    if format == "csv" {
        if dtos.is_empty() {
            let empty: ApiResponse<Vec<Value>> = ApiResponse::with_message(
                "No records match the export filters",
                Vec::new(),
            );
            return Ok(Json(empty).into_response());
        }

        let filename = format!(
            "assets_export_{}.csv",
            Utc::now().format("%Y-%m-%dT%H-%M-%S")
        );
        let csv = to_csv(&dtos, &columns);

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/csv")
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            )
            .body(csv.into())
            .map_err(|e| DomainError::Internal(format!("Failed to build response: {}", e)))?;
        return Ok(response);
    }

    let rows: Vec<Value> = dtos.iter().map(|d| super::dto::project(d, &columns)).collect();
    let body = json!({
        "success": true,
        "count": rows.len(),
        "exportInfo": {
            "totalRecords": rows.len(),
            "exportedBy": actor.username,
            "exportedAt": Utc::now(),
            "filters": {
                "category": params.category,
                "status": params.status,
                "currentLocation": params.current_location,
                "zone": params.zone,
            },
            "format": "json",
        },
        "data": rows,
    });
    Ok(Json(body).into_response())
}

/// CSV rows in column order; values containing commas are quoted.
fn to_csv(dtos: &[AssetDto], columns: &[&'static str]) -> String {
    let mut lines = Vec::with_capacity(dtos.len() + 1);
    lines.push(columns.join(","));

    for dto in dtos {
        let full = serde_json::to_value(dto).unwrap_or(Value::Null);
        let cells: Vec<String> = columns
            .iter()
            .map(|c| csv_cell(full.get(*c).unwrap_or(&Value::Null)))
            .collect();
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => {
            if s.contains(',') {
                format!("\"{}\"", s)
            } else {
                s.clone()
            }
        }
        other => other.to_string(),
    }
}
