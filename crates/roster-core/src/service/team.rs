//! Team management service.
//!
//! Creating a team also upserts every listed member as a user of that team.
//! Upsert is by user id and unconditional: a user who already belongs to
//! another team is moved into the new one, and its username and active flag
//! are overwritten with the supplied values.

use roster_types::error::{RepositoryError, ServiceError};
use roster_types::team::Team;

use crate::repository::team::TeamRepository;

/// Service for team creation and lookup.
pub struct TeamService<T: TeamRepository> {
    team_repo: T,
}

impl<T: TeamRepository> TeamService<T> {
    pub fn new(team_repo: T) -> Self {
        Self { team_repo }
    }

    /// Create a team and upsert its members.
    ///
    /// Fails with `TEAM_EXISTS` if the name is taken. Re-creating a team is
    /// rejected, never merged.
    pub async fn create_team(&self, team: Team) -> Result<Team, ServiceError> {
        validate_team(&team)?;

        tracing::info!(team = %team.name, members = team.members.len(), "creating team");

        let exists = self
            .team_repo
            .exists(&team.name)
            .await
            .map_err(|e| ServiceError::storage("create_team.exists", e))?;
        if exists {
            tracing::debug!(team = %team.name, "team already exists");
            return Err(ServiceError::team_exists("team already exists"));
        }

        let created = self.team_repo.create(&team).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => ServiceError::team_exists("team already exists"),
            other => ServiceError::storage("create_team.create", other),
        })?;

        tracing::info!(team = %created.name, "team created");
        Ok(created)
    }

    /// Get a team with its current members.
    ///
    /// A team that exists but has no members left (everyone was moved to
    /// another team) is returned with an empty member list.
    pub async fn get_team(&self, name: &str) -> Result<Team, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::invalid_input("team_name is required"));
        }

        self.team_repo
            .get_by_name(name)
            .await
            .map_err(|e| ServiceError::storage("get_team", e))?
            .ok_or_else(|| {
                tracing::debug!(team = %name, "team not found");
                ServiceError::not_found("team not found")
            })
    }
}

fn validate_team(team: &Team) -> Result<(), ServiceError> {
    if team.name.trim().is_empty() {
        return Err(ServiceError::invalid_input("team_name cannot be empty"));
    }
    if let Some(member) = team.members.iter().find(|m| m.user_id.is_blank()) {
        return Err(ServiceError::invalid_input(format!(
            "member '{}' has an empty user_id",
            member.username
        )));
    }
    Ok(())
}
