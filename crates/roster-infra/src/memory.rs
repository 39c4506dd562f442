//! In-memory implementation of the repository traits.
//!
//! All state sits behind one `RwLock`, so every operation is atomic with
//! respect to the others and all three repository views stay consistent.
//! All state is lost when the last clone is dropped.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use roster_core::repository::pull_request::{PullRequestRepository, ReplaceOutcome};
use roster_core::repository::team::TeamRepository;
use roster_core::repository::user::UserRepository;
use roster_types::error::RepositoryError;
use roster_types::pull_request::{MAX_REVIEWERS, PullRequest, PullRequestId, PullRequestStatus};
use roster_types::team::{Team, TeamMember};
use roster_types::user::{User, UserId};
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    teams: BTreeSet<String>,
    users: BTreeMap<UserId, User>,
    pull_requests: HashMap<PullRequestId, PullRequest>,
}

impl State {
    fn members_of(&self, team_name: &str) -> Vec<TeamMember> {
        let mut members: Vec<TeamMember> = self
            .users
            .values()
            .filter(|u| u.team_name == team_name)
            .map(TeamMember::from)
            .collect();
        members.sort_by(|a, b| {
            a.username
                .cmp(&b.username)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        members
    }

    fn require_team(&self, team_name: &str) -> Result<(), RepositoryError> {
        if self.teams.contains(team_name) {
            Ok(())
        } else {
            Err(RepositoryError::Query(format!("unknown team '{team_name}'")))
        }
    }
}

/// Shared in-memory store implementing every repository trait.
///
/// Cloning is cheap and every clone sees the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TeamRepository for InMemoryStore {
    async fn create(&self, team: &Team) -> Result<Team, RepositoryError> {
        let mut state = self.state.write().await;
        if state.teams.contains(&team.name) {
            return Err(RepositoryError::Conflict(format!("team '{}' already exists", team.name)));
        }

        state.teams.insert(team.name.clone());
        for member in &team.members {
            state
                .users
                .insert(member.user_id.clone(), member.to_user(&team.name));
        }

        Ok(Team {
            name: team.name.clone(),
            members: state.members_of(&team.name),
        })
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Team>, RepositoryError> {
        let state = self.state.read().await;
        if !state.teams.contains(name) {
            return Ok(None);
        }
        Ok(Some(Team {
            name: name.to_string(),
            members: state.members_of(name),
        }))
    }

    async fn exists(&self, name: &str) -> Result<bool, RepositoryError> {
        Ok(self.state.read().await.teams.contains(name))
    }
}

impl UserRepository for InMemoryStore {
    async fn create_or_update(&self, user: &User) -> Result<User, RepositoryError> {
        let mut state = self.state.write().await;
        state.require_team(&user.team_name)?;
        state.users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn update(&self, user: &User) -> Result<User, RepositoryError> {
        let mut state = self.state.write().await;
        state.require_team(&user.team_name)?;
        match state.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user.clone())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn set_active(&self, id: &UserId, active: bool) -> Result<Option<User>, RepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(id).map(|stored| {
            stored.is_active = active;
            stored.clone()
        }))
    }

    async fn list_active_by_team(
        &self,
        team_name: &str,
        exclude: &UserId,
    ) -> Result<Vec<User>, RepositoryError> {
        let state = self.state.read().await;
        // BTreeMap iteration is already ordered by id.
        Ok(state
            .users
            .values()
            .filter(|u| u.team_name == team_name && u.is_active && u.id != *exclude)
            .cloned()
            .collect())
    }
}

impl PullRequestRepository for InMemoryStore {
    async fn create(&self, pr: &PullRequest) -> Result<PullRequest, RepositoryError> {
        let mut state = self.state.write().await;
        if state.pull_requests.contains_key(&pr.id) {
            return Err(RepositoryError::Conflict(format!(
                "pull request '{}' already exists",
                pr.id
            )));
        }
        if !state.users.contains_key(&pr.author_id) {
            return Err(RepositoryError::Query(format!("unknown author '{}'", pr.author_id)));
        }
        state.pull_requests.insert(pr.id.clone(), pr.clone());
        Ok(pr.clone())
    }

    async fn get_by_id(&self, id: &PullRequestId) -> Result<Option<PullRequest>, RepositoryError> {
        Ok(self.state.read().await.pull_requests.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &PullRequestId,
        status: PullRequestStatus,
        merged_at: Option<DateTime<Utc>>,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let pr = state
            .pull_requests
            .get_mut(id)
            .ok_or(RepositoryError::NotFound)?;
        if pr.status != PullRequestStatus::Open {
            return Ok(false);
        }
        pr.status = status;
        pr.merged_at = merged_at;
        Ok(true)
    }

    async fn list_by_reviewer(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequest>, RepositoryError> {
        let state = self.state.read().await;
        let mut prs: Vec<PullRequest> = state
            .pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(user_id))
            .cloned()
            .collect();
        prs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(prs)
    }

    async fn add_reviewer(
        &self,
        pr_id: &PullRequestId,
        user_id: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let pr = state
            .pull_requests
            .get_mut(pr_id)
            .ok_or(RepositoryError::NotFound)?;
        if pr.has_reviewer(user_id) {
            return Ok(());
        }
        if pr.assigned_reviewers.len() >= MAX_REVIEWERS {
            return Err(RepositoryError::Conflict(format!(
                "pull request '{pr_id}' already has {MAX_REVIEWERS} reviewers"
            )));
        }
        pr.assigned_reviewers.push(user_id.clone());
        Ok(())
    }

    async fn remove_reviewer(
        &self,
        pr_id: &PullRequestId,
        user_id: &UserId,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let Some(pr) = state.pull_requests.get_mut(pr_id) else {
            return Ok(false);
        };
        let before = pr.assigned_reviewers.len();
        pr.assigned_reviewers.retain(|r| r != user_id);
        Ok(pr.assigned_reviewers.len() < before)
    }

    async fn replace_reviewer(
        &self,
        pr_id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<ReplaceOutcome, RepositoryError> {
        let mut state = self.state.write().await;
        let pr = state
            .pull_requests
            .get_mut(pr_id)
            .ok_or(RepositoryError::NotFound)?;

        if pr.is_merged() {
            return Ok(ReplaceOutcome::Merged);
        }
        if !pr.has_reviewer(old) {
            return Ok(ReplaceOutcome::NotAssigned);
        }
        if pr.has_reviewer(new) {
            return Ok(ReplaceOutcome::AlreadyAssigned);
        }

        pr.replace_reviewer(old, new.clone());
        Ok(ReplaceOutcome::Replaced)
    }
}
