//! Pull request handlers for the REST API.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use roster_types::pull_request::{PullRequest, PullRequestId};
use roster_types::user::UserId;

use crate::http::error::AppError;
use crate::http::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePullRequest {
    pub pull_request_id: PullRequestId,
    pub pull_request_name: String,
    pub author_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct MergePullRequest {
    pub pull_request_id: PullRequestId,
}

#[derive(Debug, Deserialize)]
pub struct ReassignReviewer {
    pub pull_request_id: PullRequestId,
    pub old_user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct PullRequestResponse {
    pub pr: PullRequest,
}

#[derive(Debug, Serialize)]
pub struct ReassignResponse {
    pub pr: PullRequest,
    pub replaced_by: UserId,
}

/// POST /pullRequest/create - Open a pull request and assign reviewers.
pub async fn create_pull_request(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreatePullRequest>,
) -> Result<(StatusCode, Json<PullRequestResponse>), AppError> {
    let pr = state
        .pr_service
        .create_pr(body.pull_request_id, body.pull_request_name, body.author_id)
        .await?;
    Ok((StatusCode::CREATED, Json(PullRequestResponse { pr })))
}

/// POST /pullRequest/merge - Merge a pull request (idempotent).
pub async fn merge_pull_request(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MergePullRequest>,
) -> Result<Json<PullRequestResponse>, AppError> {
    let pr = state.pr_service.merge_pr(&body.pull_request_id).await?;
    Ok(Json(PullRequestResponse { pr }))
}

/// POST /pullRequest/reassign - Replace one reviewer with another team member.
pub async fn reassign_reviewer(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReassignReviewer>,
) -> Result<Json<ReassignResponse>, AppError> {
    let reassignment = state
        .pr_service
        .reassign_reviewer(&body.pull_request_id, &body.old_user_id)
        .await?;
    Ok(Json(ReassignResponse {
        pr: reassignment.pull_request,
        replaced_by: reassignment.replaced_by,
    }))
}
