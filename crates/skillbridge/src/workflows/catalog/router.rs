use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::slug::unique_slug;
use crate::validation::Validator;

#[derive(Debug, Clone, Deserialize)]
pub struct SlugRequest {
    pub name: String,
    #[serde(default)]
    pub existing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugResponse {
    pub slug: String,
}

pub fn catalog_router() -> Router {
    Router::new().route("/api/v1/catalog/slugs", post(slug_handler))
}

pub(crate) async fn slug_handler(Json(request): Json<SlugRequest>) -> Response {
    let mut validator = Validator::new();
    validator.name("name", &request.name);
    if let Err(err) = validator.finish(()) {
        return err.into_response();
    }

    let slug = unique_slug(&request.name, &request.existing);
    (StatusCode::OK, Json(SlugResponse { slug })).into_response()
}
