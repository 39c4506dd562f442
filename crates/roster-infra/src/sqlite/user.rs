//! SQLite user repository implementation.

use roster_core::repository::user::UserRepository;
use roster_types::error::RepositoryError;
use roster_types::user::{User, UserId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::query_error;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    Ok(User {
        id: UserId(id),
        username: row.try_get("username").map_err(query_error)?,
        team_name: row.try_get("team_name").map_err(query_error)?,
        is_active: row.try_get::<i64, _>("is_active").map_err(query_error)? != 0,
    })
}

impl UserRepository for SqliteUserRepository {
    async fn create_or_update(&self, user: &User) -> Result<User, RepositoryError> {
        sqlx::query(
            "INSERT INTO users (id, username, team_name, is_active)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                 username = excluded.username,
                 team_name = excluded.team_name,
                 is_active = excluded.is_active",
        )
        .bind(user.id.as_str())
        .bind(&user.username)
        .bind(&user.team_name)
        .bind(user.is_active)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(user.clone())
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT id, username, team_name, is_active FROM users WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(ref r) => Ok(Some(row_to_user(r)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET username = ?, team_name = ?, is_active = ? WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.team_name)
        .bind(user.is_active)
        .bind(user.id.as_str())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(user.clone())
    }

    async fn set_active(&self, id: &UserId, active: bool) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "UPDATE users SET is_active = ? WHERE id = ?
             RETURNING id, username, team_name, is_active",
        )
        .bind(active)
        .bind(id.as_str())
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(query_error)?;

        match row {
            Some(ref r) => Ok(Some(row_to_user(r)?)),
            None => Ok(None),
        }
    }

    async fn list_active_by_team(
        &self,
        team_name: &str,
        exclude: &UserId,
    ) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, username, team_name, is_active FROM users
             WHERE team_name = ? AND is_active = 1 AND id != ?
             ORDER BY id",
        )
        .bind(team_name)
        .bind(exclude.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(row_to_user).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::team::SqliteTeamRepository;
    use crate::sqlite::test_support::test_pool;
    use roster_core::repository::team::TeamRepository;
    use roster_types::team::{Team, TeamMember};

    async fn seed(pool: &DatabasePool) {
        let teams = SqliteTeamRepository::new(pool.clone());
        let members = [("u1", "Alice", true), ("u2", "Bob", true), ("u3", "Carol", false)]
            .into_iter()
            .map(|(id, name, active)| TeamMember {
                user_id: UserId::from(id),
                username: name.to_string(),
                is_active: active,
            })
            .collect();
        teams
            .create(&Team {
                name: "backend".to_string(),
                members,
            })
            .await
            .unwrap();
        teams
            .create(&Team {
                name: "frontend".to_string(),
                members: Vec::new(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let pool = test_pool().await;
        seed(&pool).await;
        let repo = SqliteUserRepository::new(pool);

        let user = repo.get_by_id(&UserId::from("u3")).await.unwrap().unwrap();
        assert_eq!(user.username, "Carol");
        assert_eq!(user.team_name, "backend");
        assert!(!user.is_active);

        assert!(repo.get_by_id(&UserId::from("nobody")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_active_flag() {
        let pool = test_pool().await;
        seed(&pool).await;
        let repo = SqliteUserRepository::new(pool);

        let mut user = repo.get_by_id(&UserId::from("u1")).await.unwrap().unwrap();
        user.is_active = false;
        repo.update(&user).await.unwrap();

        let reloaded = repo.get_by_id(&UserId::from("u1")).await.unwrap().unwrap();
        assert!(!reloaded.is_active);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let pool = test_pool().await;
        seed(&pool).await;
        let repo = SqliteUserRepository::new(pool);

        let ghost = User {
            id: UserId::from("ghost"),
            username: "Ghost".to_string(),
            team_name: "backend".to_string(),
            is_active: true,
        };
        assert!(matches!(repo.update(&ghost).await, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_set_active_only_touches_flag() {
        let pool = test_pool().await;
        seed(&pool).await;
        let repo = SqliteUserRepository::new(pool);

        let moved = User {
            id: UserId::from("u1"),
            username: "Alicia".to_string(),
            team_name: "frontend".to_string(),
            is_active: true,
        };
        repo.create_or_update(&moved).await.unwrap();

        let updated = repo.set_active(&UserId::from("u1"), false).await.unwrap().unwrap();
        assert_eq!(updated.team_name, "frontend");
        assert_eq!(updated.username, "Alicia");
        assert!(!updated.is_active);

        let reloaded = repo.get_by_id(&UserId::from("u1")).await.unwrap().unwrap();
        assert_eq!(reloaded, updated);

        assert!(repo.set_active(&UserId::from("nobody"), true).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_or_update_moves_team() {
        let pool = test_pool().await;
        seed(&pool).await;
        let repo = SqliteUserRepository::new(pool);

        let moved = User {
            id: UserId::from("u2"),
            username: "Bobby".to_string(),
            team_name: "frontend".to_string(),
            is_active: true,
        };
        repo.create_or_update(&moved).await.unwrap();

        let reloaded = repo.get_by_id(&UserId::from("u2")).await.unwrap().unwrap();
        assert_eq!(reloaded, moved);
    }

    #[tokio::test]
    async fn test_create_or_update_rejects_unknown_team() {
        let pool = test_pool().await;
        seed(&pool).await;
        let repo = SqliteUserRepository::new(pool);

        let orphan = User {
            id: UserId::from("u9"),
            username: "Orphan".to_string(),
            team_name: "nowhere".to_string(),
            is_active: true,
        };
        assert!(repo.create_or_update(&orphan).await.is_err());
    }

    #[tokio::test]
    async fn test_list_active_by_team() {
        let pool = test_pool().await;
        seed(&pool).await;
        let repo = SqliteUserRepository::new(pool);

        let active = repo
            .list_active_by_team("backend", &UserId::from("u1"))
            .await
            .unwrap();
        let ids: Vec<&str> = active.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u2"]);

        let all = repo
            .list_active_by_team("backend", &UserId::from("nobody"))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        assert!(repo
            .list_active_by_team("frontend", &UserId::from("u1"))
            .await
            .unwrap()
            .is_empty());
    }
}
