//! Outlet administration endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use opsboard_common::AppResult;
use opsboard_core::OutletInput;
use opsboard_db::entities::outlet;
use serde::{Deserialize, Serialize};

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

/// Outlet response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub code: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<outlet::Model> for OutletResponse {
    fn from(o: outlet::Model) -> Self {
        Self {
            id: o.id,
            organization_id: o.organization_id,
            name: o.name,
            code: o.code,
            address: o.address,
            phone: o.phone,
            email: o.email,
            is_active: o.is_active,
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

/// Create/update outlet request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletRequest {
    pub name: String,
    pub code: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl From<OutletRequest> for OutletInput {
    fn from(req: OutletRequest) -> Self {
        Self {
            name: req.name,
            code: req.code,
            address: req.address,
            phone: req.phone,
            email: req.email,
        }
    }
}

/// List the organization's outlets.
async fn list_outlets(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<OutletResponse>>> {
    let outlets = state.outlet_service.list(&ctx).await?;

    Ok(ApiResponse::ok(
        outlets.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one outlet.
async fn get_outlet(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OutletResponse>> {
    let outlet = state.outlet_service.get(&ctx, &id).await?;

    Ok(ApiResponse::ok(outlet.into()))
}

/// Create an outlet.
async fn create_outlet(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Json(req): Json<OutletRequest>,
) -> AppResult<ApiResponse<OutletResponse>> {
    let outlet = state.outlet_service.create(&ctx, req.into()).await?;

    Ok(ApiResponse::ok(outlet.into()))
}

/// Update an outlet.
async fn update_outlet(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<OutletRequest>,
) -> AppResult<ApiResponse<OutletResponse>> {
    let outlet = state.outlet_service.update(&ctx, &id, req.into()).await?;

    Ok(ApiResponse::ok(outlet.into()))
}

/// Delete an outlet.
async fn delete_outlet(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.outlet_service.delete(&ctx, &id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "ok": true })))
}

/// Create the outlets router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_outlets).post(create_outlet))
        .route(
            "/{id}",
            get(get_outlet).put(update_outlet).delete(delete_outlet),
        )
}
