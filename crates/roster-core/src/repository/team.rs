//! Team repository trait definition.

use roster_types::error::RepositoryError;
use roster_types::team::Team;

/// Repository trait for team persistence.
///
/// Implementations live in roster-infra (e.g., SqliteTeamRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait TeamRepository: Send + Sync {
    /// Insert the team row and upsert every member as a user of this team,
    /// as one atomic unit.
    ///
    /// An existing user with the same id is repointed into this team and has
    /// its username and active flag overwritten.
    ///
    /// Returns `RepositoryError::Conflict` if the team name is already taken.
    fn create(
        &self,
        team: &Team,
    ) -> impl std::future::Future<Output = Result<Team, RepositoryError>> + Send;

    /// Get a team with its current members (users whose team is `name`),
    /// ordered by username.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Team>, RepositoryError>> + Send;

    /// Check whether a team row with this name exists.
    fn exists(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
