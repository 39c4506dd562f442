//! Team handlers for the REST API.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use roster_types::team::Team;

use crate::http::error::AppError;
use crate::http::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub team: Team,
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub team_name: String,
}

/// POST /team/add - Create a team and upsert its members.
pub async fn add_team(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Team>,
) -> Result<(StatusCode, Json<TeamResponse>), AppError> {
    let team = state.team_service.create_team(body).await?;
    Ok((StatusCode::CREATED, Json(TeamResponse { team })))
}

/// GET /team/get?team_name= - Get a team with its members.
pub async fn get_team(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TeamQuery>,
) -> Result<Json<Team>, AppError> {
    let team = state.team_service.get_team(&query.team_name).await?;
    Ok(Json(team))
}
