//! User activity and review-queue service.

use roster_types::error::ServiceError;
use roster_types::pull_request::PullRequestShort;
use roster_types::user::{User, UserId};

use crate::repository::pull_request::PullRequestRepository;
use crate::repository::user::UserRepository;

/// Service for toggling user activity and listing a user's reviews.
pub struct UserService<U: UserRepository, P: PullRequestRepository> {
    user_repo: U,
    pr_repo: P,
}

impl<U: UserRepository, P: PullRequestRepository> UserService<U, P> {
    pub fn new(user_repo: U, pr_repo: P) -> Self {
        Self { user_repo, pr_repo }
    }

    /// Set a user's active flag and return the updated user.
    ///
    /// Only the flag is written, so a concurrent team upsert that moves the
    /// user is never rolled back. Existing reviewer assignments are left
    /// alone: deactivation only keeps the user out of future selections.
    pub async fn set_user_active(
        &self,
        user_id: &UserId,
        active: bool,
    ) -> Result<User, ServiceError> {
        if user_id.is_blank() {
            return Err(ServiceError::invalid_input("user_id is required"));
        }

        let updated = self
            .user_repo
            .set_active(user_id, active)
            .await
            .map_err(|e| ServiceError::storage("set_user_active.set_active", e))?
            .ok_or_else(|| {
                tracing::debug!(user_id = %user_id, "user not found");
                ServiceError::not_found("user not found")
            })?;

        tracing::info!(user_id = %updated.id, active, "user activity updated");
        Ok(updated)
    }

    /// Summaries of every pull request where the user is currently a reviewer,
    /// newest first.
    pub async fn get_user_reviews(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, ServiceError> {
        if user_id.is_blank() {
            return Err(ServiceError::invalid_input("user_id is required"));
        }

        self.require_user(user_id).await?;

        let prs = self
            .pr_repo
            .list_by_reviewer(user_id)
            .await
            .map_err(|e| ServiceError::storage("get_user_reviews.list_by_reviewer", e))?;

        tracing::debug!(user_id = %user_id, count = prs.len(), "listed user reviews");
        Ok(prs.iter().map(|pr| pr.summary()).collect())
    }

    async fn require_user(&self, user_id: &UserId) -> Result<User, ServiceError> {
        self.user_repo
            .get_by_id(user_id)
            .await
            .map_err(|e| ServiceError::storage("get_user", e))?
            .ok_or_else(|| {
                tracing::debug!(user_id = %user_id, "user not found");
                ServiceError::not_found("user not found")
            })
    }
}
