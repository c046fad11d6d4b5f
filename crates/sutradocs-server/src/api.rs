//! JSON data routes backing the API reference pages.

use std::path::PathBuf;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sutradocs_static::{load_json, load_openapi_spec, DataError};

use crate::server::SharedState;

const CACHE_CONTROL: &str = "public, max-age=3600";

/// Handle GET /api/openapi-spec.
///
/// The OpenAPI document is kept as YAML on disk and served as JSON.
pub(crate) async fn openapi_spec(State(state): State<SharedState>) -> Response {
    let path = state.read().await.config.api.openapi.clone();

    match load(path, "OpenAPI specification", load_openapi_spec) {
        Ok(spec) => ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(spec)).into_response(),
        Err(message) => data_error(message),
    }
}

/// Handle GET /api/sutra-api.
pub(crate) async fn service_description(State(state): State<SharedState>) -> Response {
    let path = state.read().await.config.api.service.clone();

    match load(path, "API service description", load_json) {
        Ok(service) => Json(service).into_response(),
        Err(message) => data_error(message),
    }
}

fn load(
    path: Option<PathBuf>,
    what: &str,
    loader: fn(&std::path::Path) -> Result<serde_json::Value, DataError>,
) -> Result<serde_json::Value, String> {
    let path = path.ok_or_else(|| format!("No {what} configured"))?;
    loader(&path).map_err(|e| e.to_string())
}

fn data_error(message: String) -> Response {
    tracing::error!("{}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
