//! Axum route handlers for the Session API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{export_spec, ExportDocument, ExportSpec};
use crate::models::job::{JobInput, JobStatus};
use crate::models::resume::UploadedFile;
use crate::session::orchestrator::BatchDecline;
use crate::session::store::SessionState;
use crate::state::AppState;
use crate::upload::encode_upload;

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectJobRequest {
    pub job_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBatchResponse {
    pub started: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<Uuid>,
    pub job_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<BatchDecline>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionState> {
    Json(state.session.snapshot())
}

/// PUT /api/v1/resume
///
/// Multipart upload; the document must arrive in the `file` field.
/// A rejected upload leaves the current resume in place.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, state.config.max_upload_bytes))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("resume.pdf").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, state.config.max_upload_bytes))?;

        let file = encode_upload(
            &name,
            content_type.as_deref(),
            &data,
            state.config.max_upload_bytes,
        )
        .map_err(|e| {
            warn!("Rejected upload {name}: {e}");
            AppError::from(e)
        })?;

        info!("Resume uploaded: {} ({} bytes)", file.name, file.size_bytes);
        state.session.set_resume(file.clone());
        return Ok(Json(file));
    }

    Err(AppError::Validation(format!(
        "multipart field '{UPLOAD_FIELD}' is required"
    )))
}

/// Bodies cut off by the request size limit surface as 413, everything else as a bad request.
fn multipart_error(error: MultipartError, max_upload_bytes: usize) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Rejected upload over the {max_upload_bytes}-byte limit");
        return AppError::PayloadTooLarge(format!(
            "The uploaded file exceeds the limit of {max_upload_bytes} bytes."
        ));
    }
    AppError::Validation(format!("Malformed multipart body: {error}"))
}

/// DELETE /api/v1/resume
pub async fn handle_clear_resume(State(state): State<AppState>) -> StatusCode {
    state.session.clear_resume();
    StatusCode::NO_CONTENT
}

/// POST /api/v1/jobs
pub async fn handle_add_job(State(state): State<AppState>) -> (StatusCode, Json<JobInput>) {
    (StatusCode::CREATED, Json(state.session.add_job()))
}

/// PUT /api/v1/jobs/:id
///
/// Unknown ids are a no-op.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateJobRequest>,
) -> StatusCode {
    state.session.update_job_text(&id, request.text);
    StatusCode::NO_CONTENT
}

/// DELETE /api/v1/jobs/:id
///
/// Removing the last remaining job is a no-op.
pub async fn handle_remove_job(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.session.remove_job(&id);
    StatusCode::NO_CONTENT
}

/// POST /api/v1/batch
///
/// Publishes the all-Loading result map before responding, then settles jobs
/// in the background. Progress is observed through GET /api/v1/session.
pub async fn handle_start_batch(
    State(state): State<AppState>,
) -> (StatusCode, Json<StartBatchResponse>) {
    let snapshot = state.session.snapshot();

    match state
        .orchestrator
        .begin(snapshot.resume.as_ref(), snapshot.jobs.jobs())
    {
        Ok(ticket) => {
            let batch_id = ticket.batch_id;
            let job_ids = ticket.job_ids();
            let orchestrator = state.orchestrator.clone();
            tokio::spawn(async move {
                orchestrator.run(ticket).await;
            });
            (
                StatusCode::ACCEPTED,
                Json(StartBatchResponse {
                    started: true,
                    batch_id: Some(batch_id),
                    job_ids,
                    reason: None,
                }),
            )
        }
        Err(reason) => {
            info!("Batch not started: {reason:?}");
            (
                StatusCode::OK,
                Json(StartBatchResponse {
                    started: false,
                    batch_id: None,
                    job_ids: vec![],
                    reason: Some(reason),
                }),
            )
        }
    }
}

/// DELETE /api/v1/batch
pub async fn handle_reset_batch(State(state): State<AppState>) -> StatusCode {
    state.orchestrator.reset_batch();
    StatusCode::NO_CONTENT
}

/// PUT /api/v1/batch/selection
pub async fn handle_select_job(
    State(state): State<AppState>,
    Json(request): Json<SelectJobRequest>,
) -> StatusCode {
    state.orchestrator.select_job(request.job_id);
    StatusCode::NO_CONTENT
}

/// GET /api/v1/batch/results/:id/export/:document
pub async fn handle_export(
    State(state): State<AppState>,
    Path((job_id, document)): Path<(String, ExportDocument)>,
) -> Result<Json<ExportSpec>, AppError> {
    let snapshot = state.session.snapshot();
    let entry = snapshot
        .results
        .get(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("No result for job {job_id}")))?;

    let result = match (entry.status, entry.result.as_ref()) {
        (JobStatus::Success, Some(result)) => result,
        (status, _) => {
            return Err(AppError::Conflict(format!(
                "Job {job_id} has no successful result (status {status:?})"
            )))
        }
    };

    export_spec(result, document)
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!("Job {job_id} has no {} to export", document.label()))
        })
}
