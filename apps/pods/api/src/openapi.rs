use axum_helpers::errors::responses::UnauthorizedResponse;
use utoipa::OpenApi;

use crate::api::{pod, root};

/// Routes served by this binary directly
#[derive(OpenApi)]
#[openapi(
    paths(root::root, pod::create_pod),
    components(
        schemas(root::Greeting, pod::IdentityGreeting, axum_helpers::ErrorResponse),
        responses(UnauthorizedResponse)
    ),
    info(
        title = "Pods API",
        version = "0.1.0",
        description = "Per-pod document collections with question answering over them"
    ),
    tags(
        (name = root::TAG, description = "Service greeting")
    )
)]
struct AppRoutesDoc;

/// Full document: this binary's routes plus the pod domain's.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        AppRoutesDoc::openapi().merge_from(domain_pods::ApiDoc::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in ["/", "/pod", "/seed/{pod_id}", "/query/{pod_id}"] {
            assert!(paths.contains(&expected), "missing {expected} in {paths:?}");
        }
        assert_eq!(doc.info.title, "Pods API");
    }

    #[test]
    fn test_document_only_lists_wire_schemas() {
        let doc = ApiDoc::openapi();
        let schemas: Vec<&str> = doc
            .components
            .as_ref()
            .map(|c| c.schemas.keys().map(String::as_str).collect())
            .unwrap_or_default();

        assert!(schemas.contains(&"SourceDocument"), "{schemas:?}");
        assert!(schemas.contains(&"DetailResponse"), "{schemas:?}");
        assert!(!schemas.contains(&"ScoredDocument"), "{schemas:?}");
        assert!(!schemas.contains(&"EmbeddingModel"), "{schemas:?}");
    }
}
