//! Audit query endpoint (spec.md §6, §4.6): cursor-paginated read access
//! over recorded authorization decisions.

use crate::error::AppError;
use crate::state::AppState;
use audit_recorder::{AuditFilter, Cursor, Page};
use axum::{Json, extract::{Query, State}};
use kernel::EntityId;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AuditQueryParams {
    pub principal_id: Option<String>,
    pub resource_id: Option<String>,
    pub capability_id: Option<String>,
    pub allow: Option<bool>,
    pub correlation_id: Option<String>,
    pub cursor_timestamp_ns: Option<i128>,
    pub cursor_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

#[utoipa::path(
    get,
    path = "/audit",
    tag = "audit",
    params(AuditQueryParams),
    responses(
        (status = 200, description = "Matching audit records, cursor-paginated")
    )
)]
pub async fn query_audit(State(state): State<AppState>, Query(params): Query<AuditQueryParams>) -> Result<Json<Page>, AppError> {
    let filter = AuditFilter {
        principal_id: params.principal_id.map(EntityId::from),
        resource_id: params.resource_id.map(EntityId::from),
        capability_id: params.capability_id,
        allow: params.allow,
        time_range: None,
        correlation_id: params.correlation_id,
    };

    let cursor = match (params.cursor_timestamp_ns, params.cursor_id) {
        (Some(timestamp_ns), Some(id)) => Some(Cursor { timestamp_ns, id: EntityId::from(id) }),
        _ => None,
    };

    let page = state.audit.query(&filter, cursor, params.limit.max(1));
    Ok(Json(page))
}
