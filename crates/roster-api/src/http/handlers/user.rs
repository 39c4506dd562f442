//! User handlers for the REST API.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use roster_types::pull_request::PullRequestShort;
use roster_types::user::{User, UserId};

use crate::http::error::AppError;
use crate::http::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub user_id: UserId,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub user_id: UserId,
    pub pull_requests: Vec<PullRequestShort>,
}

/// POST /users/setIsActive - Toggle a user's active flag.
pub async fn set_is_active(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SetActiveRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .user_service
        .set_user_active(&body.user_id, body.is_active)
        .await?;
    Ok(Json(UserResponse { user }))
}

/// GET /users/getReview?user_id= - Pull requests the user currently reviews.
pub async fn get_review(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<ReviewsResponse>, AppError> {
    let pull_requests = state.user_service.get_user_reviews(&query.user_id).await?;
    Ok(Json(ReviewsResponse {
        user_id: query.user_id,
        pull_requests,
    }))
}
