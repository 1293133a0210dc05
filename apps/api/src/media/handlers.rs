use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::content::handlers::MessageResponse;
use crate::errors::AppError;
use crate::media::optimize::{encode_derivative, optimized_filename};
use crate::media::{generate_filename, is_image_mime, validate_upload};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// URL the client should reference: the derivative when one was
    /// produced, the original otherwise.
    pub url: String,
    #[serde(rename = "originalUrl", skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    pub filename: String,
    pub size: usize,
    pub mimetype: String,
    /// Present for image uploads only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized: Option<bool>,
}

/// POST /api/upload — multipart with a single `file` field.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or("upload").to_string();
            let mimetype = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            file = Some((original_name, mimetype, data));
            break;
        }
    }
    let Some((original_name, mimetype, data)) = file else {
        return Err(AppError::Validation("No file uploaded".to_string()));
    };

    validate_upload(data.len(), &mimetype)?;

    let filename = generate_filename(&original_name);
    let size = data.len();
    state.media.save(&filename, &data).await?;
    let original_url = state.upload_url(&filename);

    if !is_image_mime(&mimetype) {
        return Ok((
            StatusCode::OK,
            Json(UploadResponse {
                url: original_url,
                original_url: None,
                filename,
                size,
                mimetype,
                optimized: None,
            }),
        ));
    }

    let response = match make_derivative(&state, &filename, data).await {
        Some(derivative_name) => UploadResponse {
            url: state.upload_url(&derivative_name),
            original_url: Some(original_url),
            filename,
            size,
            mimetype,
            optimized: Some(true),
        },
        None => UploadResponse {
            url: original_url,
            original_url: None,
            filename,
            size,
            mimetype,
            optimized: Some(false),
        },
    };
    Ok((StatusCode::OK, Json(response)))
}

/// Runs the derivative pass off the request thread and persists the result.
/// Any failure downgrades the upload to "serve the original" — logged, never
/// returned to the caller.
async fn make_derivative(state: &AppState, filename: &str, data: Bytes) -> Option<String> {
    let input = data.clone();
    let encoded = match tokio::task::spawn_blocking(move || encode_derivative(&input)).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            warn!("Image optimization failed for {filename}: {e:#}");
            return None;
        }
        Err(e) => {
            warn!("Image optimization task failed for {filename}: {e}");
            return None;
        }
    };

    let derivative_name = optimized_filename(filename);
    if let Err(e) = state.media.save(&derivative_name, &encoded).await {
        warn!("Failed to persist derivative {derivative_name}: {e}");
        return None;
    }
    Some(derivative_name)
}

/// DELETE /api/upload/:filename
pub async fn delete_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.media.delete(&filename).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}
