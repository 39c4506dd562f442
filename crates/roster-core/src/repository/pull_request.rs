//! Pull request repository trait definition.

use chrono::{DateTime, Utc};
use roster_types::error::RepositoryError;
use roster_types::pull_request::{PullRequest, PullRequestId, PullRequestStatus};
use roster_types::user::UserId;

/// Result of an atomic reviewer substitution.
///
/// Everything except `Replaced` means nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced,
    /// The pull request was merged before the substitution could apply.
    Merged,
    /// The old reviewer is no longer assigned.
    NotAssigned,
    /// The new reviewer got assigned concurrently.
    AlreadyAssigned,
}

/// Repository trait for pull request and reviewer-assignment persistence.
pub trait PullRequestRepository: Send + Sync {
    /// Insert the pull request and its reviewer rows as one atomic unit.
    ///
    /// Returns `RepositoryError::Conflict` if the id is already taken. This is
    /// the authoritative duplicate check; any pre-check by the caller is advisory.
    fn create(
        &self,
        pr: &PullRequest,
    ) -> impl std::future::Future<Output = Result<PullRequest, RepositoryError>> + Send;

    /// Get a pull request with its reviewers in assignment order.
    fn get_by_id(
        &self,
        id: &PullRequestId,
    ) -> impl std::future::Future<Output = Result<Option<PullRequest>, RepositoryError>> + Send;

    /// Move an OPEN pull request to `status`, recording `merged_at`.
    ///
    /// Returns `Ok(false)` without writing if the row is no longer OPEN, so two
    /// racing merges keep the first `merged_at`. Returns
    /// `RepositoryError::NotFound` if the pull request does not exist.
    fn update_status(
        &self,
        id: &PullRequestId,
        status: PullRequestStatus,
        merged_at: Option<DateTime<Utc>>,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// All pull requests where `user_id` is currently a reviewer, newest first.
    fn list_by_reviewer(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<PullRequest>, RepositoryError>> + Send;

    /// Append a reviewer. A reviewer that is already assigned is left as is.
    ///
    /// Returns `RepositoryError::Conflict` if the pull request already has the
    /// maximum number of reviewers, and `NotFound` if it does not exist.
    fn add_reviewer(
        &self,
        pr_id: &PullRequestId,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove a reviewer. Returns whether a row was removed.
    fn remove_reviewer(
        &self,
        pr_id: &PullRequestId,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Substitute `old` with `new` in one atomic unit, keeping the slot.
    ///
    /// The pull request status is re-checked inside the same unit.
    /// Returns `RepositoryError::NotFound` if the pull request does not exist.
    fn replace_reviewer(
        &self,
        pr_id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> impl std::future::Future<Output = Result<ReplaceOutcome, RepositoryError>> + Send;
}
