use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::{
    commands::{UploadListCommand, UploadListError},
    queries::{GetAgentListError, GetAgentListQuery},
};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;
use crate::import::{DecodeError, ImportError, TabularFormat};

/// Multipart field carrying the uploaded list
pub const FILE_FIELD: &str = "file";

pub fn lists_routes() -> Router<FeatureState> {
    Router::new()
        .route("/upload", post(upload_list))
        .route("/agent/:agent_id", get(get_agent_list))
}

#[tracing::instrument(skip(state, multipart))]
async fn upload_list(
    State(state): State<FeatureState>,
    mut multipart: Multipart,
) -> Result<Response, ListApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        upload = Some((filename, data.to_vec()));
    }

    let (filename, content) = upload.ok_or(UploadListError::FileRequired)?;
    let command = UploadListCommand { filename, content };

    let response = super::commands::upload::handle(state, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state))]
async fn get_agent_list(
    State(state): State<FeatureState>,
    Path(agent_id): Path<String>,
) -> Result<Response, ListApiError> {
    let query = GetAgentListQuery { agent_id };
    let items = super::queries::agent_items::handle(state.store.as_ref(), query).await?;

    tracing::debug!(count = items.len(), "Agent list fetched");

    Ok(ApiResponse::success(items).into_response())
}

#[derive(Debug)]
enum ListApiError {
    Upload(UploadListError),
    Query(GetAgentListError),
    Multipart(MultipartError),
}

impl From<UploadListError> for ListApiError {
    fn from(err: UploadListError) -> Self {
        Self::Upload(err)
    }
}

impl From<GetAgentListError> for ListApiError {
    fn from(err: GetAgentListError) -> Self {
        Self::Query(err)
    }
}

impl From<MultipartError> for ListApiError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart(err)
    }
}

impl IntoResponse for ListApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ListApiError::Upload(UploadListError::FileRequired)
            | ListApiError::Upload(UploadListError::ContentRequired)
            | ListApiError::Query(GetAgentListError::InvalidAgentId(_)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_ERROR", self.to_string()),
            ),
            ListApiError::Multipart(ref e) => (
                e.status(),
                ErrorResponse::new("INVALID_MULTIPART", e.body_text()),
            ),
            ListApiError::Upload(UploadListError::Import(ref err)) => import_error(err),
            ListApiError::Query(GetAgentListError::Store(ref e)) => {
                tracing::error!("Store error while reading agent list: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("STORE_ERROR", "Failed to load agent list"),
                )
            },
        };

        (status, Json(error)).into_response()
    }
}

fn import_error(err: &ImportError) -> (StatusCode, ErrorResponse) {
    let message = err.to_string();
    match err {
        ImportError::Decode(DecodeError::UnsupportedFormat { extension }) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorResponse::with_details(
                "UNSUPPORTED_FORMAT",
                message,
                json!({ "extension": extension, "allowed": TabularFormat::ALLOWED_EXTENSIONS }),
            ),
        ),
        ImportError::Decode(DecodeError::MalformedInput { format, .. }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse::with_details("MALFORMED_INPUT", message, json!({ "format": format })),
        ),
        ImportError::Schema(schema) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::with_details(
                "SCHEMA_ERROR",
                message,
                json!({ "missing": schema.missing, "row": schema.first_invalid_row }),
            ),
        ),
        ImportError::Distribution(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INSUFFICIENT_WORKERS", message),
        ),
        ImportError::Registry(source) => {
            tracing::error!("Agent roster unavailable: {}", source);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new("REGISTRY_UNAVAILABLE", "Could not load the agent roster"),
            )
        },
        ImportError::Store {
            persisted,
            total,
            source,
        } => {
            tracing::error!(persisted, total, "Import stopped by store failure: {}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details(
                    "STORE_ERROR",
                    format!(
                        "Import incomplete: {} of {} items were saved before a write failed",
                        persisted, total
                    ),
                    json!({ "persisted": persisted, "total": total }),
                ),
            )
        },
    }
}

impl std::fmt::Display for ListApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListApiError::Upload(e) => write!(f, "{}", e),
            ListApiError::Query(e) => write!(f, "{}", e),
            ListApiError::Multipart(e) => write!(f, "{}", e),
        }
    }
}
