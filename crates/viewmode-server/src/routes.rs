//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::state::AppState;
use viewmode_classifiers::{InputError, Outcome};
use viewmode_core::{AudioProfile, PictureMode, Revision, ViewingMode};

const EXAMPLE_INPUT: &str = "Thor Will Return | Avengers: Doomsday in Theaters";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/classify", get(classify_query).post(classify_json))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn metrics(State(state): State<AppState>) -> Response {
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
struct ClassifyQuery {
    input: Option<String>,
}

/// `GET /classify?input=...`
async fn classify_query(
    State(state): State<AppState>,
    Query(query): Query<ClassifyQuery>,
) -> Result<Json<Value>, AppError> {
    let input = query
        .input
        .ok_or_else(|| AppError::InvalidRequest("Missing 'input' query parameter".to_string()))?;
    classify(&state, input).await
}

/// `POST /classify` with `{"input": "..."}`.
///
/// The body is parsed by hand so malformed JSON gets the same 400 shape as
/// a missing field.
async fn classify_json(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, AppError> {
    let request: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidRequest(format!("Request body is not valid JSON: {}", e)))?;

    let input = match request.get("input") {
        Some(Value::String(input)) => input.clone(),
        Some(_) => {
            return Err(AppError::InvalidRequest(
                "Field 'input' must be a string".to_string(),
            ))
        }
        None => {
            return Err(AppError::InvalidRequest(
                "Missing 'input' field in JSON body".to_string(),
            ))
        }
    };

    classify(&state, input).await
}

async fn classify(state: &AppState, input: String) -> Result<Json<Value>, AppError> {
    let outcome = state.classifier.classify(&input).await?;
    info!(
        result = %outcome.classification,
        source = outcome.source.as_str(),
        "Classified request"
    );
    Ok(Json(render_outcome(&outcome, input, state.expose_source)?))
}

/// Flatten the classification into the response object and echo the input
fn render_outcome(outcome: &Outcome, input: String, expose_source: bool) -> Result<Value, AppError> {
    let mut body = match serde_json::to_value(outcome.classification) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            return Err(AppError::Internal(format!(
                "classification serialized to a non-object: {}",
                other
            )))
        }
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    body.insert("input".to_string(), Value::String(input));
    if expose_source {
        body.insert(
            "source".to_string(),
            Value::String(outcome.source.as_str().to_string()),
        );
    }
    Ok(Value::Object(body))
}

/// `GET /` capability document
async fn index(State(state): State<AppState>) -> Json<Value> {
    let revision = state.classifier.revision();
    let mut doc = Map::new();

    doc.insert("name".into(), json!("viewmode"));
    doc.insert("version".into(), json!(env!("CARGO_PKG_VERSION")));
    doc.insert("revision".into(), json!(revision));
    doc.insert(
        "model_enabled".into(),
        json!(state.classifier.has_backend()),
    );

    let response_example = match revision {
        Revision::Legacy => {
            doc.insert(
                "description".into(),
                json!("Classifies video titles into a TV viewing mode"),
            );
            doc.insert("viewing_modes".into(), json!(ViewingMode::ALL));
            json!({ "viewing_mode": "Cinema", "input": EXAMPLE_INPUT })
        }
        Revision::Paired => {
            doc.insert(
                "description".into(),
                json!("Classifies video titles into picture_mode and audio_profile settings"),
            );
            doc.insert("picture_modes".into(), json!(PictureMode::ALL));
            doc.insert("audio_profiles".into(), json!(AudioProfile::ALL));
            json!({ "picture_mode": "Movie", "audio_profile": "Movie", "input": EXAMPLE_INPUT })
        }
    };

    doc.insert(
        "endpoints".into(),
        json!({
            "/classify": {
                "methods": ["GET", "POST"],
                "description": "Classify a YouTube title or URL",
                "post_example": { "input": EXAMPLE_INPUT },
                "get_example": "/classify?input=Lakers%20vs%20Warriors%20Highlights",
                "response_example": response_example,
            },
            "/health": {
                "methods": ["GET"],
                "description": "Health check endpoint",
            },
            "/metrics": {
                "methods": ["GET"],
                "description": "Prometheus metrics",
            },
        }),
    );

    Json(Value::Object(doc))
}

async fn fallback() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    Internal(String),
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidRequest(message) => {
                debug!("Rejected request: {}", message);
                let body = json!({
                    "error": message,
                    "example": { "input": EXAMPLE_INPUT },
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::Internal(message) => {
                error!("Internal error: {}", message);
                let body = json!({
                    "error": "Classification failed",
                    "message": message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
