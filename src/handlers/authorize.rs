//! Authorization endpoints (spec.md §6): the single-decision and
//! batch-decision HTTP surface over the `AuthorizationPipeline`.

use crate::error::AppError;
use crate::state::AppState;
use authz_pipeline::dto::{AuthorizeRequest, Credential};
use axum::{Json, extract::State, http::HeaderMap};
use kernel::{Decision, RequestContext};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EmergencyOverrideDto {
    pub approver: String,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuthorizeHttpRequest {
    pub action: String,
    pub resource_id: Option<String>,
    pub capability_name: Option<String>,
    /// A JSON object; structurally converted into `kernel::ParameterMap`.
    #[serde(default)]
    pub parameters: serde_json::Value,
    pub emergency_override: Option<EmergencyOverrideDto>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuthorizeBatchHttpRequest {
    pub requests: Vec<AuthorizeHttpRequest>,
}

/// Extracts the caller's credential from `Authorization: Bearer <token>`
/// or `X-Api-Key: <key>` (spec.md §4.1 accepts either on the same
/// endpoint). An agent token is not distinguishable by header alone in
/// this deployment shape and is out of scope for the HTTP surface.
fn extract_credential(headers: &HeaderMap) -> Result<Credential, AppError> {
    if let Some(auth) = headers.get(axum::http::header::AUTHORIZATION) {
        let value = auth.to_str().map_err(|_| AppError::Unauthenticated("malformed authorization header".to_string()))?;
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Ok(Credential::Bearer(token.to_string()));
        }
        return Err(AppError::Unauthenticated("unsupported authorization scheme".to_string()));
    }
    if let Some(key) = headers.get("x-api-key") {
        let value = key.to_str().map_err(|_| AppError::Unauthenticated("malformed api key header".to_string()))?;
        return Ok(Credential::ApiKey(value.to_string()));
    }
    Err(AppError::Unauthenticated("missing credential".to_string()))
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn client_ip(headers: &HeaderMap) -> Option<std::net::IpAddr> {
    headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()).and_then(|v| v.split(',').next()).and_then(|v| v.trim().parse().ok())
}

fn to_authorize_request(request: AuthorizeHttpRequest, headers: &HeaderMap) -> AuthorizeRequest {
    let mut context = RequestContext::new(request_id(headers), time::OffsetDateTime::now_utc());
    if let Some(ip) = client_ip(headers) {
        context = context.with_client_ip(ip);
    }
    if let Some(over) = request.emergency_override {
        context = context.with_emergency_override(over.approver, over.reason);
    }

    let mut built = AuthorizeRequest::new(request.action, context);
    if let Some(resource_id) = request.resource_id {
        built = built.with_resource(resource_id);
    }
    if let Some(capability_name) = request.capability_name {
        built = built.with_capability(capability_name);
    }
    if let Some(object) = kernel::AttributeValue::from(request.parameters).as_object() {
        built.parameters = object.clone();
    }
    built
}

#[utoipa::path(
    post,
    path = "/authorize",
    tag = "authorize",
    request_body = AuthorizeHttpRequest,
    responses(
        (status = 200, description = "Decision computed"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Resource or capability not found")
    )
)]
pub async fn authorize(State(state): State<AppState>, headers: HeaderMap, Json(request): Json<AuthorizeHttpRequest>) -> Result<Json<Decision>, AppError> {
    let credential = extract_credential(&headers)?;
    let request = to_authorize_request(request, &headers);
    let decision = state.pipeline.authorize(&credential, request).await?;
    Ok(Json(decision))
}

#[utoipa::path(
    post,
    path = "/authorize/batch",
    tag = "authorize",
    request_body = AuthorizeBatchHttpRequest,
    responses(
        (status = 200, description = "Decisions computed, in request order"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn authorize_batch(State(state): State<AppState>, headers: HeaderMap, Json(request): Json<AuthorizeBatchHttpRequest>) -> Result<Json<Vec<Decision>>, AppError> {
    let credential = extract_credential(&headers)?;
    let requests = request.requests.into_iter().map(|r| to_authorize_request(r, &headers)).collect();
    let decisions = state.pipeline.authorize_batch(&credential, requests).await?;
    Ok(Json(decisions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_is_rejected() {
        let headers = HeaderMap::new();
        assert!(extract_credential(&headers).is_err());
    }

    #[test]
    fn bearer_header_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        match extract_credential(&headers).unwrap() {
            Credential::Bearer(token) => assert_eq!(token, "abc.def.ghi"),
            _ => panic!("expected bearer credential"),
        }
    }

    #[test]
    fn api_key_header_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "key-1".parse().unwrap());
        match extract_credential(&headers).unwrap() {
            Credential::ApiKey(key) => assert_eq!(key, "key-1"),
            _ => panic!("expected api key credential"),
        }
    }

    #[test]
    fn request_id_falls_back_to_generated_uuid() {
        let headers = HeaderMap::new();
        assert!(uuid::Uuid::parse_str(&request_id(&headers)).is_ok());
    }
}
