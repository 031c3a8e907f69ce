use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{RepoError, SubscriptionsRepo};
use crate::domain::entities::SubscriptionRecord;

use super::PostgresRepositories;
use super::util::map_sqlx_error;

#[derive(FromRow)]
struct SubscriptionRow {
    id: Uuid,
    email: String,
    created_at: OffsetDateTime,
}

impl From<SubscriptionRow> for SubscriptionRecord {
    fn from(row: SubscriptionRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

// Under READ COMMITTED the fallback read shares the insert's snapshot. A
// caller that loses a concurrent insert of the same email waits on the
// winner's lock, skips its own insert, and then cannot see the winner's
// row yet, so the whole statement can come back empty.
const GET_OR_CREATE_SQL: &str = r#"
    WITH inserted AS (
        INSERT INTO subscriptions (id, email, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        RETURNING id, email, created_at
    )
    SELECT id, email, created_at FROM inserted
    UNION ALL
    SELECT id, email, created_at FROM subscriptions WHERE email = $2
    LIMIT 1
"#;

const FIND_BY_EMAIL_SQL: &str = r#"
    SELECT id, email, created_at FROM subscriptions WHERE email = $1
"#;

#[async_trait]
impl SubscriptionsRepo for PostgresRepositories {
    async fn get_or_create(&self, email: &str) -> Result<SubscriptionRecord, RepoError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(GET_OR_CREATE_SQL)
            .bind(Uuid::new_v4())
            .bind(email)
            .bind(OffsetDateTime::now_utc())
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if let Some(row) = row {
            return Ok(SubscriptionRecord::from(row));
        }

        // Lost the race. An empty result means a conflicting insert
        // committed, so a fresh statement's snapshot has the row.
        let row = sqlx::query_as::<_, SubscriptionRow>(FIND_BY_EMAIL_SQL)
            .bind(email)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(SubscriptionRecord::from(row))
    }

    async fn list_subscriptions(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<SubscriptionRecord>, RepoError> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, email, created_at
              FROM subscriptions
             WHERE ($1::text IS NULL OR email ILIKE '%' || $1 || '%')
             ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(search)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SubscriptionRecord::from).collect())
    }
}
