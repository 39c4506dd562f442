//! SQLite team repository implementation.
//!
//! Implements `TeamRepository` from `roster-core`. Team creation inserts the
//! team row and upserts every member inside one transaction.

use chrono::Utc;
use roster_core::repository::team::TeamRepository;
use roster_types::error::RepositoryError;
use roster_types::team::{Team, TeamMember};
use roster_types::user::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, query_error};

/// SQLite-backed implementation of `TeamRepository`.
pub struct SqliteTeamRepository {
    pool: DatabasePool,
}

impl SqliteTeamRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

const MEMBERS_QUERY: &str =
    "SELECT id, username, is_active FROM users WHERE team_name = ? ORDER BY username, id";

fn row_to_member(row: &sqlx::sqlite::SqliteRow) -> Result<TeamMember, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    Ok(TeamMember {
        user_id: UserId(id),
        username: row.try_get("username").map_err(query_error)?,
        is_active: row.try_get::<i64, _>("is_active").map_err(query_error)? != 0,
    })
}

impl TeamRepository for SqliteTeamRepository {
    async fn create(&self, team: &Team) -> Result<Team, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query("INSERT INTO teams (name, created_at) VALUES (?, ?)")
            .bind(&team.name)
            .bind(format_datetime(&Utc::now()))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepositoryError::Conflict(format!("team '{}' already exists", team.name))
                } else {
                    query_error(e)
                }
            })?;

        for member in &team.members {
            sqlx::query(
                "INSERT INTO users (id, username, team_name, is_active)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT (id) DO UPDATE SET
                     username = excluded.username,
                     team_name = excluded.team_name,
                     is_active = excluded.is_active",
            )
            .bind(member.user_id.as_str())
            .bind(&member.username)
            .bind(&team.name)
            .bind(member.is_active)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;
        }

        let rows = sqlx::query(MEMBERS_QUERY)
            .bind(&team.name)
            .fetch_all(&mut *tx)
            .await
            .map_err(query_error)?;
        let members = rows.iter().map(row_to_member).collect::<Result<Vec<_>, _>>()?;

        tx.commit().await.map_err(query_error)?;

        tracing::debug!(team = %team.name, members = members.len(), "team row and members written");
        Ok(Team {
            name: team.name.clone(),
            members,
        })
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Team>, RepositoryError> {
        if !self.exists(name).await? {
            return Ok(None);
        }

        let rows = sqlx::query(MEMBERS_QUERY)
            .bind(name)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let members = rows.iter().map(row_to_member).collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Team {
            name: name.to_string(),
            members,
        }))
    }

    async fn exists(&self, name: &str) -> Result<bool, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM teams WHERE name = ?)")
            .bind(name)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(row.0 != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;

    fn member(id: &str, username: &str, active: bool) -> TeamMember {
        TeamMember {
            user_id: UserId::from(id),
            username: username.to_string(),
            is_active: active,
        }
    }

    fn team(name: &str, members: Vec<TeamMember>) -> Team {
        Team {
            name: name.to_string(),
            members,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = SqliteTeamRepository::new(test_pool().await);

        let created = repo
            .create(&team(
                "backend",
                vec![member("u2", "Bob", true), member("u1", "Alice", false)],
            ))
            .await
            .unwrap();
        assert_eq!(created.members.len(), 2);

        let found = repo.get_by_name("backend").await.unwrap().unwrap();
        let names: Vec<&str> = found.members.iter().map(|m| m.username.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert!(!found.members[0].is_active);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let repo = SqliteTeamRepository::new(test_pool().await);
        repo.create(&team("backend", Vec::new())).await.unwrap();

        let err = repo.create(&team("backend", Vec::new())).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let repo = SqliteTeamRepository::new(test_pool().await);
        repo.create(&team("Backend", Vec::new())).await.unwrap();
        repo.create(&team("backend", Vec::new())).await.unwrap();
        assert!(repo.exists("Backend").await.unwrap());
        assert!(!repo.exists("BACKEND").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_moves_existing_user() {
        let repo = SqliteTeamRepository::new(test_pool().await);
        repo.create(&team("alpha", vec![member("u1", "Alice", true)]))
            .await
            .unwrap();
        repo.create(&team("beta", vec![member("u1", "Alice B", false)]))
            .await
            .unwrap();

        let alpha = repo.get_by_name("alpha").await.unwrap().unwrap();
        assert!(alpha.members.is_empty());

        let beta = repo.get_by_name("beta").await.unwrap().unwrap();
        assert_eq!(beta.members, vec![member("u1", "Alice B", false)]);
    }

    #[tokio::test]
    async fn test_failed_create_writes_nothing() {
        let repo = SqliteTeamRepository::new(test_pool().await);
        repo.create(&team("alpha", vec![member("u1", "Alice", true)]))
            .await
            .unwrap();

        // Rejected on the team row, so the member upsert must not leak through.
        repo.create(&team("alpha", vec![member("u1", "Renamed", false)]))
            .await
            .unwrap_err();

        let alpha = repo.get_by_name("alpha").await.unwrap().unwrap();
        assert_eq!(alpha.members, vec![member("u1", "Alice", true)]);
    }

    #[tokio::test]
    async fn test_get_missing_team() {
        let repo = SqliteTeamRepository::new(test_pool().await);
        assert!(repo.get_by_name("nope").await.unwrap().is_none());
    }
}
