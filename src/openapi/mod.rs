//! OpenAPI documentation for the authorization gateway.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Authorization Gateway",
        version = "0.1.0",
        description = "Credential verification, resource/capability resolution, policy evaluation, decision caching, and audit recording for MCP/agent-facing authorization requests.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "authorize", description = "Authorization decisions"),
        (name = "audit", description = "Audit record queries"),
    ),
    paths(
        crate::handlers::health::health_check,
        crate::handlers::authorize::authorize,
        crate::handlers::authorize::authorize_batch,
        crate::handlers::audit::query_audit,
    ),
    components(
        schemas(
            crate::handlers::health::HealthResponse,
            crate::handlers::authorize::AuthorizeHttpRequest,
            crate::handlers::authorize::AuthorizeBatchHttpRequest,
            crate::handlers::authorize::EmergencyOverrideDto,
        )
    )
)]
pub struct ApiDoc;

pub fn create_api_doc() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_generates() {
        let openapi = create_api_doc();
        assert_eq!(openapi.info.title, "Authorization Gateway");
        assert!(openapi.tags.as_ref().unwrap().iter().any(|t| t.name == "authorize"));
    }

    #[test]
    fn openapi_document_serializes() {
        let json = serde_json::to_string(&create_api_doc()).unwrap();
        assert!(json.contains("\"paths\""));
    }
}
