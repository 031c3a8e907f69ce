use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::application::repos::{
    CreatePostParams, PostListItem, PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError,
    UpdatePostParams,
};
use crate::domain::entities::PostRecord;

use super::PostgresRepositories;
use super::util::map_sqlx_error;

#[derive(FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    date_posted: OffsetDateTime,
    author_id: Uuid,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            date_posted: row.date_posted,
            author_id: row.author_id,
        }
    }
}

#[derive(FromRow)]
struct PostListRow {
    id: Uuid,
    title: String,
    content: String,
    date_posted: OffsetDateTime,
    author_id: Uuid,
    author_username: String,
}

impl From<PostListRow> for PostListItem {
    fn from(row: PostListRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            date_posted: row.date_posted,
            author_id: row.author_id,
            author_username: row.author_username,
        }
    }
}

// Listing order is date_posted DESC with id DESC as a deterministic
// tie-break for identical timestamps.
const LIST_POSTS_SQL: &str = r#"
    SELECT p.id, p.title, p.content, p.date_posted, p.author_id,
           u.username AS author_username
      FROM posts p
           INNER JOIN users u ON u.id = p.author_id
     WHERE ($1::uuid IS NULL OR p.author_id = $1)
     ORDER BY p.date_posted DESC, p.id DESC
     LIMIT $2 OFFSET $3
"#;

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(
        &self,
        filter: PostQueryFilter,
        page: PageRequest,
    ) -> Result<Vec<PostListItem>, RepoError> {
        let rows = sqlx::query_as::<_, PostListRow>(LIST_POSTS_SQL)
            .bind(filter.author_id)
            .bind(i64::from(page.limit))
            .bind(page.offset as i64)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostListItem::from).collect())
    }

    async fn count_posts(&self, filter: PostQueryFilter) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts p WHERE ($1::uuid IS NULL OR p.author_id = $1)",
        )
        .bind(filter.author_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<PostListItem>, RepoError> {
        self.list_posts(
            PostQueryFilter::default(),
            PageRequest { limit, offset: 0 },
        )
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostListItem>, RepoError> {
        let row = sqlx::query_as::<_, PostListRow>(
            r#"
            SELECT p.id, p.title, p.content, p.date_posted, p.author_id,
                   u.username AS author_username
              FROM posts p
                   INNER JOIN users u ON u.id = p.author_id
             WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostListItem::from))
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            title,
            content,
            author_id,
        } = params;

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, title, content, date_posted, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, content, date_posted, author_id
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(author_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams { id, title, content } = params;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
               SET title = $2,
                   content = $3
             WHERE id = $1
            RETURNING id, title, content, date_posted, author_id
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
