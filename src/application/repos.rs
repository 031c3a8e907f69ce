//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::domain::entities::{PostRecord, SubscriptionRecord, UserRecord};

/// Failures surfaced by the persistence layer. `NotFound` and `Duplicate`
/// carry meaning for callers; everything else is an opaque driver failure.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostQueryFilter {
    pub author_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

/// A post joined with its author's username, as rendered by listings,
/// detail pages, and the admin table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostListItem {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub date_posted: OffsetDateTime,
    pub author_id: Uuid,
    pub author_username: String,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Posts ordered by `date_posted DESC, id DESC`.
    async fn list_posts(
        &self,
        filter: PostQueryFilter,
        page: PageRequest,
    ) -> Result<Vec<PostListItem>, RepoError>;

    async fn count_posts(&self, filter: PostQueryFilter) -> Result<u64, RepoError>;

    /// The `limit` most recent posts, for the sidebar widget.
    async fn list_recent(&self, limit: u32) -> Result<Vec<PostListItem>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostListItem>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    /// Overwrites title and content only; the author column is never touched.
    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, RepoError>;

    /// Resolves a session token to its user, or `None` for unknown tokens.
    async fn user_for_session(&self, token: &str) -> Result<Option<UserRecord>, RepoError>;
}

#[async_trait]
pub trait SubscriptionsRepo: Send + Sync {
    /// Idempotent get-or-create keyed by exact email. A pre-existing row is
    /// returned unchanged; concurrent duplicates collapse to one row.
    async fn get_or_create(&self, email: &str) -> Result<SubscriptionRecord, RepoError>;

    /// Subscriptions ordered by `created_at DESC`, optionally filtered by an
    /// email substring.
    async fn list_subscriptions(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<SubscriptionRecord>, RepoError>;
}
