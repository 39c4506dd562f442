//! User repository trait definition.

use roster_types::error::RepositoryError;
use roster_types::user::{User, UserId};

/// Repository trait for user persistence.
pub trait UserRepository: Send + Sync {
    /// Insert the user, or overwrite username, team and active flag of an
    /// existing user with the same id.
    fn create_or_update(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Get a user by id.
    fn get_by_id(
        &self,
        id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Update an existing user. Returns `RepositoryError::NotFound` if absent.
    fn update(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Set only the active flag, leaving team and username as stored.
    ///
    /// Returns the user as written, or `None` if no such user exists.
    fn set_active(
        &self,
        id: &UserId,
        active: bool,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// List active users of `team_name` other than `exclude`, ordered by id.
    fn list_active_by_team(
        &self,
        team_name: &str,
        exclude: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;
}
