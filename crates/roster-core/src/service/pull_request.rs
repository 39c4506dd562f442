//! Pull request lifecycle service.
//!
//! Opens pull requests with up to two reviewers drawn at random from the
//! author's team, merges them idempotently, and swaps out a single reviewer
//! for another active member of that reviewer's team.
//!
//! Pre-checks here are advisory. The store is the authority on uniqueness and
//! re-checks state inside its own atomic units, so concurrent callers never
//! corrupt a pull request.

use chrono::Utc;
use roster_types::error::{RepositoryError, ServiceError};
use roster_types::pull_request::{PullRequest, PullRequestId, PullRequestStatus};
use roster_types::user::{User, UserId};

use crate::repository::pull_request::{PullRequestRepository, ReplaceOutcome};
use crate::repository::user::UserRepository;
use crate::service::picker::ReviewerPicker;
use crate::service::selection;

/// Result of a successful reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub pull_request: PullRequest,
    pub replaced_by: UserId,
}

/// Service orchestrating pull request creation, merge and reviewer reassignment.
///
/// Generic over repository traits and the randomness source so tests can pin
/// selection with a seeded picker.
pub struct PullRequestService<P: PullRequestRepository, U: UserRepository, R: ReviewerPicker> {
    pr_repo: P,
    user_repo: U,
    picker: R,
}

impl<P: PullRequestRepository, U: UserRepository, R: ReviewerPicker> PullRequestService<P, U, R> {
    pub fn new(pr_repo: P, user_repo: U, picker: R) -> Self {
        Self {
            pr_repo,
            user_repo,
            picker,
        }
    }

    /// Open a pull request and assign up to two reviewers.
    ///
    /// Candidates are the active members of the author's team other than the
    /// author. An empty pool is not an error: the pull request opens with no
    /// reviewers.
    pub async fn create_pr(
        &self,
        id: PullRequestId,
        name: String,
        author_id: UserId,
    ) -> Result<PullRequest, ServiceError> {
        if id.is_blank() {
            return Err(ServiceError::invalid_input("pull_request_id is required"));
        }
        if name.trim().is_empty() {
            return Err(ServiceError::invalid_input("pull_request_name is required"));
        }
        if author_id.is_blank() {
            return Err(ServiceError::invalid_input("author_id is required"));
        }

        tracing::info!(pr_id = %id, author_id = %author_id, "creating pull request");

        if self.find_pr(&id).await?.is_some() {
            tracing::debug!(pr_id = %id, "pull request already exists");
            return Err(ServiceError::pr_exists("PR already exists"));
        }

        let author = self
            .find_user(&author_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("author not found"))?;

        let pool = self
            .user_repo
            .list_active_by_team(&author.team_name, &author.id)
            .await
            .map_err(|e| ServiceError::storage("create_pr.list_active_by_team", e))?;
        tracing::debug!(team = %author.team_name, candidates = pool.len(), "reviewer pool loaded");

        let reviewers = selection::choose_reviewers(pool, &author.id, &self.picker);

        let pr = PullRequest::open(id, name, author.id, reviewers, Utc::now());
        let created = self.pr_repo.create(&pr).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => ServiceError::pr_exists("PR already exists"),
            other => ServiceError::storage("create_pr.create", other),
        })?;

        tracing::info!(
            pr_id = %created.id,
            reviewers = ?created.assigned_reviewers,
            "pull request created"
        );
        Ok(created)
    }

    /// Mark a pull request as merged.
    ///
    /// Idempotent: merging an already merged pull request returns it unchanged
    /// and writes nothing.
    pub async fn merge_pr(&self, id: &PullRequestId) -> Result<PullRequest, ServiceError> {
        if id.is_blank() {
            return Err(ServiceError::invalid_input("pull_request_id is required"));
        }

        let mut pr = self.require_pr(id).await?;
        if pr.is_merged() {
            tracing::debug!(pr_id = %id, "pull request already merged");
            return Ok(pr);
        }

        let now = Utc::now();
        let transitioned = self
            .pr_repo
            .update_status(id, PullRequestStatus::Merged, Some(now))
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::not_found("PR not found"),
                other => ServiceError::storage("merge_pr.update_status", other),
            })?;

        if !transitioned {
            // Lost a race with another merge; report the stored outcome.
            tracing::debug!(pr_id = %id, "pull request merged concurrently");
            return self.require_pr(id).await;
        }

        pr.merge(now);
        tracing::info!(pr_id = %id, "pull request merged");
        Ok(pr)
    }

    /// Replace `old_reviewer` with a random active member of their team.
    ///
    /// Candidates exclude the old reviewer, the author and everyone already
    /// assigned. Only valid while the pull request is open.
    pub async fn reassign_reviewer(
        &self,
        id: &PullRequestId,
        old_reviewer: &UserId,
    ) -> Result<Reassignment, ServiceError> {
        if id.is_blank() {
            return Err(ServiceError::invalid_input("pull_request_id is required"));
        }
        if old_reviewer.is_blank() {
            return Err(ServiceError::invalid_input("old_user_id is required"));
        }

        tracing::info!(pr_id = %id, old_reviewer = %old_reviewer, "reassigning reviewer");

        let mut pr = self.require_pr(id).await?;
        if pr.is_merged() {
            tracing::debug!(pr_id = %id, "cannot reassign on merged pull request");
            return Err(ServiceError::pr_merged("cannot reassign on merged PR"));
        }
        if !pr.has_reviewer(old_reviewer) {
            tracing::debug!(pr_id = %id, old_reviewer = %old_reviewer, "reviewer not assigned");
            return Err(ServiceError::not_assigned("reviewer is not assigned to this PR"));
        }

        let old = self
            .find_user(old_reviewer)
            .await?
            .ok_or_else(|| ServiceError::not_found("old reviewer not found"))?;

        let pool = self
            .user_repo
            .list_active_by_team(&old.team_name, &old.id)
            .await
            .map_err(|e| ServiceError::storage("reassign_reviewer.list_active_by_team", e))?;
        let candidates = selection::replacement_candidates(pool, &pr, &old.id);
        tracing::debug!(pr_id = %id, candidates = candidates.len(), "replacement candidates");

        let new = selection::pick_replacement(candidates, &self.picker).ok_or_else(|| {
            tracing::debug!(pr_id = %id, "no replacement candidate");
            ServiceError::no_candidate("no active replacement candidate in team")
        })?;

        let outcome = self
            .pr_repo
            .replace_reviewer(id, &old.id, &new.id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::not_found("PR not found"),
                other => ServiceError::storage("reassign_reviewer.replace_reviewer", other),
            })?;

        match outcome {
            ReplaceOutcome::Replaced => {}
            ReplaceOutcome::Merged => {
                return Err(ServiceError::pr_merged("cannot reassign on merged PR"));
            }
            ReplaceOutcome::NotAssigned => {
                return Err(ServiceError::not_assigned("reviewer is not assigned to this PR"));
            }
            ReplaceOutcome::AlreadyAssigned => {
                return Err(ServiceError::no_candidate(
                    "replacement candidate was assigned concurrently",
                ));
            }
        }

        pr.replace_reviewer(&old.id, new.id.clone());
        tracing::info!(
            pr_id = %id,
            old_reviewer = %old.id,
            new_reviewer = %new.id,
            "reviewer reassigned"
        );

        Ok(Reassignment {
            pull_request: pr,
            replaced_by: new.id,
        })
    }

    async fn find_pr(&self, id: &PullRequestId) -> Result<Option<PullRequest>, ServiceError> {
        self.pr_repo
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::storage("get_pr", e))
    }

    async fn require_pr(&self, id: &PullRequestId) -> Result<PullRequest, ServiceError> {
        self.find_pr(id).await?.ok_or_else(|| {
            tracing::debug!(pr_id = %id, "pull request not found");
            ServiceError::not_found("PR not found")
        })
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, ServiceError> {
        self.user_repo
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::storage("get_user", e))
    }
}
