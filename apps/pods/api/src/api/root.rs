use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const TAG: &str = "Root";

/// Fixed greeting returned by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Greeting {
    #[serde(rename = "Hello")]
    pub hello: String,
}

pub fn router() -> Router {
    Router::new().route("/", get(root))
}

/// Static health payload
#[utoipa::path(
    get,
    path = "/",
    tag = TAG,
    responses(
        (status = 200, description = "Service is up", body = Greeting)
    )
)]
pub async fn root() -> Json<Greeting> {
    Json(Greeting {
        hello: "World".to_string(),
    })
}
