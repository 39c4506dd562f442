//! SQLite pull request repository implementation.
//!
//! Reviewer assignments live in `pr_reviewers` with an explicit `position`
//! column, so a substituted reviewer keeps the slot of the one it replaces.

use chrono::{DateTime, Utc};
use roster_core::repository::pull_request::{PullRequestRepository, ReplaceOutcome};
use roster_types::error::RepositoryError;
use roster_types::pull_request::{MAX_REVIEWERS, PullRequest, PullRequestId, PullRequestStatus};
use roster_types::user::UserId;
use sqlx::{Row, SqliteConnection};

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, parse_datetime, query_error};

/// SQLite-backed implementation of `PullRequestRepository`.
pub struct SqlitePullRequestRepository {
    pool: DatabasePool,
}

impl SqlitePullRequestRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn reviewers_of(&self, pr_id: &str) -> Result<Vec<UserId>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT user_id FROM pr_reviewers WHERE pr_id = ? ORDER BY position",
        )
        .bind(pr_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        Ok(rows.into_iter().map(|(id,)| UserId(id)).collect())
    }

    async fn with_reviewers(&self, mut pr: PullRequest) -> Result<PullRequest, RepositoryError> {
        pr.assigned_reviewers = self.reviewers_of(pr.id.as_str()).await?;
        Ok(pr)
    }
}

/// Parse a row into a `PullRequest` without its reviewers.
fn row_to_pull_request(row: &sqlx::sqlite::SqliteRow) -> Result<PullRequest, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let author_id: String = row.try_get("author_id").map_err(query_error)?;
    let status_str: String = row.try_get("status").map_err(query_error)?;
    let created_at_str: String = row.try_get("created_at").map_err(query_error)?;
    let merged_at_str: Option<String> = row.try_get("merged_at").map_err(query_error)?;

    let status = status_str
        .parse::<PullRequestStatus>()
        .map_err(RepositoryError::Query)?;

    Ok(PullRequest {
        id: PullRequestId(id),
        name: row.try_get("name").map_err(query_error)?,
        author_id: UserId(author_id),
        status,
        assigned_reviewers: Vec::new(),
        created_at: parse_datetime(&created_at_str)?,
        merged_at: merged_at_str.as_deref().map(parse_datetime).transpose()?,
    })
}

async fn status_in_tx(
    conn: &mut SqliteConnection,
    pr_id: &str,
) -> Result<Option<PullRequestStatus>, RepositoryError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT status FROM pull_requests WHERE id = ?")
        .bind(pr_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(query_error)?;

    row.map(|(s,)| s.parse::<PullRequestStatus>().map_err(RepositoryError::Query))
        .transpose()
}

async fn is_assigned_in_tx(
    conn: &mut SqliteConnection,
    pr_id: &str,
    user_id: &str,
) -> Result<bool, RepositoryError> {
    let row: (i64,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM pr_reviewers WHERE pr_id = ? AND user_id = ?)",
    )
    .bind(pr_id)
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(query_error)?;
    Ok(row.0 != 0)
}

const SELECT_COLUMNS: &str = "id, name, author_id, status, created_at, merged_at";

impl PullRequestRepository for SqlitePullRequestRepository {
    async fn create(&self, pr: &PullRequest) -> Result<PullRequest, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query(
            "INSERT INTO pull_requests (id, name, author_id, status, created_at, merged_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(pr.id.as_str())
        .bind(&pr.name)
        .bind(pr.author_id.as_str())
        .bind(pr.status.to_string())
        .bind(format_datetime(&pr.created_at))
        .bind(pr.merged_at.as_ref().map(format_datetime))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Conflict(format!("pull request '{}' already exists", pr.id))
            } else {
                query_error(e)
            }
        })?;

        for (position, reviewer) in pr.assigned_reviewers.iter().enumerate() {
            sqlx::query("INSERT INTO pr_reviewers (pr_id, user_id, position) VALUES (?, ?, ?)")
                .bind(pr.id.as_str())
                .bind(reviewer.as_str())
                .bind(position as i64)
                .execute(&mut *tx)
                .await
                .map_err(query_error)?;
        }

        tx.commit().await.map_err(query_error)?;

        tracing::debug!(
            pr_id = %pr.id,
            reviewers = pr.assigned_reviewers.len(),
            "pull request row written"
        );
        Ok(pr.clone())
    }

    async fn get_by_id(&self, id: &PullRequestId) -> Result<Option<PullRequest>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM pull_requests WHERE id = ?"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let pr = match row {
            Some(r) => row_to_pull_request(&r)?,
            None => return Ok(None),
        };
        Ok(Some(self.with_reviewers(pr).await?))
    }

    async fn update_status(
        &self,
        id: &PullRequestId,
        status: PullRequestStatus,
        merged_at: Option<DateTime<Utc>>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE pull_requests SET status = ?, merged_at = ? WHERE id = ? AND status = 'OPEN'",
        )
        .bind(status.to_string())
        .bind(merged_at.as_ref().map(format_datetime))
        .bind(id.as_str())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let exists: (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pull_requests WHERE id = ?)")
                .bind(id.as_str())
                .fetch_one(&self.pool.writer)
                .await
            .map_err(query_error)?;

        if exists.0 != 0 {
            Ok(false)
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    async fn list_by_reviewer(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequest>, RepositoryError> {
        let bare = sqlx::query(
            "SELECT p.id, p.name, p.author_id, p.status, p.created_at, p.merged_at
             FROM pull_requests p
             JOIN pr_reviewers r ON r.pr_id = p.id
             WHERE r.user_id = ?
             ORDER BY p.created_at DESC, p.id ASC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?
        .iter()
        .map(row_to_pull_request)
        .collect::<Result<Vec<_>, _>>()?;

        let mut prs = Vec::with_capacity(bare.len());
        for pr in bare {
            prs.push(self.with_reviewers(pr).await?);
        }
        Ok(prs)
    }

    async fn add_reviewer(
        &self,
        pr_id: &PullRequestId,
        user_id: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        if status_in_tx(&mut tx, pr_id.as_str()).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }
        if is_assigned_in_tx(&mut tx, pr_id.as_str(), user_id.as_str()).await? {
            return Ok(());
        }

        let (count, next): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(MAX(position) + 1, 0) FROM pr_reviewers WHERE pr_id = ?",
        )
        .bind(pr_id.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(query_error)?;

        if count as usize >= MAX_REVIEWERS {
            return Err(RepositoryError::Conflict(format!(
                "pull request '{pr_id}' already has {MAX_REVIEWERS} reviewers"
            )));
        }

        sqlx::query("INSERT INTO pr_reviewers (pr_id, user_id, position) VALUES (?, ?, ?)")
            .bind(pr_id.as_str())
            .bind(user_id.as_str())
            .bind(next)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;
        Ok(())
    }

    async fn remove_reviewer(
        &self,
        pr_id: &PullRequestId,
        user_id: &UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM pr_reviewers WHERE pr_id = ? AND user_id = ?")
            .bind(pr_id.as_str())
            .bind(user_id.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_reviewer(
        &self,
        pr_id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<ReplaceOutcome, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        match status_in_tx(&mut tx, pr_id.as_str()).await? {
            None => return Err(RepositoryError::NotFound),
            Some(PullRequestStatus::Merged) => return Ok(ReplaceOutcome::Merged),
            Some(PullRequestStatus::Open) => {}
        }

        if !is_assigned_in_tx(&mut tx, pr_id.as_str(), old.as_str()).await? {
            return Ok(ReplaceOutcome::NotAssigned);
        }
        if is_assigned_in_tx(&mut tx, pr_id.as_str(), new.as_str()).await? {
            return Ok(ReplaceOutcome::AlreadyAssigned);
        }

        let result =
            sqlx::query("UPDATE pr_reviewers SET user_id = ? WHERE pr_id = ? AND user_id = ?")
                .bind(new.as_str())
                .bind(pr_id.as_str())
                .bind(old.as_str())
                .execute(&mut *tx)
                .await;

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Ok(ReplaceOutcome::AlreadyAssigned),
            Err(e) => return Err(query_error(e)),
        }

        tx.commit().await.map_err(query_error)?;
        Ok(ReplaceOutcome::Replaced)
    }
}
