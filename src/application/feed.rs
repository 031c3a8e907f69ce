//! Read-side services for post listings, post detail, and the sidebar widget.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::{NumberedPage, PaginationError};
use crate::application::repos::{
    PostListItem, PostQueryFilter, PostsRepo, RepoError, UsersRepo,
};
use crate::presentation::views::{
    ListingContext, PostCard, PostDetailContext, SidebarPostView, format_published,
};

/// Fixed page size for every listing surface.
pub const LISTING_PAGE_SIZE: u32 = 5;
/// Default number of posts shown in the sidebar widget.
pub const SIDEBAR_DEFAULT_COUNT: u32 = 5;

#[derive(Debug, Clone)]
pub enum FeedFilter {
    All,
    Author(String),
}

impl FeedFilter {
    fn base_path(&self) -> String {
        match self {
            FeedFilter::All => "/".to_string(),
            FeedFilter::Author(username) => format!("/user/{username}"),
        }
    }

    fn heading(&self) -> Option<String> {
        match self {
            FeedFilter::All => None,
            FeedFilter::Author(username) => Some(format!("Posts by {username}")),
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unknown author")]
    UnknownAuthor,
    #[error(transparent)]
    PageOutOfRange(PaginationError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    users: Arc<dyn UsersRepo>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>, users: Arc<dyn UsersRepo>) -> Self {
        Self { posts, users }
    }

    /// One page of the listing, newest first. Resolving an author filter
    /// fails with [`FeedError::UnknownAuthor`] when the username does not
    /// exist; an existing author with no posts yields an empty page.
    pub async fn page_context(
        &self,
        filter: FeedFilter,
        page_number: u32,
    ) -> Result<ListingContext, FeedError> {
        let query = match &filter {
            FeedFilter::All => PostQueryFilter::default(),
            FeedFilter::Author(username) => {
                let user = self
                    .users
                    .find_by_username(username)
                    .await?
                    .ok_or(FeedError::UnknownAuthor)?;
                PostQueryFilter {
                    author_id: Some(user.id),
                }
            }
        };

        let total = self.posts.count_posts(query).await?;
        let page = NumberedPage::resolve(page_number, LISTING_PAGE_SIZE, total)
            .map_err(FeedError::PageOutOfRange)?;
        let items = self.posts.list_posts(query, page.request()).await?;

        Ok(ListingContext {
            heading: filter.heading(),
            posts: items.into_iter().map(post_card).collect(),
            total_count: total,
            page_number: page.number(),
            page_count: page.page_count(),
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            previous_page: page.number().saturating_sub(1),
            next_page: page.number() + 1,
            base_path: filter.base_path(),
        })
    }

    pub async fn post_detail(&self, id: Uuid) -> Result<Option<PostDetailContext>, FeedError> {
        let Some(item) = self.posts.find_by_id(id).await? else {
            return Ok(None);
        };

        Ok(Some(PostDetailContext {
            id: item.id,
            title: item.title,
            content: item.content,
            author: item.author_username,
            author_id: item.author_id,
            published: format_published(item.date_posted),
            can_edit: false,
        }))
    }

    /// The `count` most recent posts for embedding in any rendered page.
    pub async fn latest_posts(&self, count: u32) -> Result<Vec<SidebarPostView>, FeedError> {
        let items = self.posts.list_recent(count).await?;
        Ok(items
            .into_iter()
            .map(|item| SidebarPostView {
                id: item.id,
                title: item.title,
                published: format_published(item.date_posted),
            })
            .collect())
    }
}

fn post_card(item: PostListItem) -> PostCard {
    PostCard {
        id: item.id,
        title: item.title,
        content: item.content,
        author: item.author_username,
        published: format_published(item.date_posted),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use super::*;
    use crate::application::pagination::PageRequest;
    use crate::domain::entities::UserRecord;

    struct FakePostsRepo {
        items: Vec<PostListItem>,
    }

    #[async_trait]
    impl PostsRepo for FakePostsRepo {
        async fn list_posts(
            &self,
            filter: PostQueryFilter,
            page: PageRequest,
        ) -> Result<Vec<PostListItem>, RepoError> {
            let mut items: Vec<_> = self
                .items
                .iter()
                .filter(|item| filter.author_id.is_none_or(|id| item.author_id == id))
                .cloned()
                .collect();
            items.sort_by(|a, b| b.date_posted.cmp(&a.date_posted));
            Ok(items
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect())
        }

        async fn count_posts(&self, filter: PostQueryFilter) -> Result<u64, RepoError> {
            Ok(self
                .items
                .iter()
                .filter(|item| filter.author_id.is_none_or(|id| item.author_id == id))
                .count() as u64)
        }

        async fn list_recent(&self, limit: u32) -> Result<Vec<PostListItem>, RepoError> {
            self.list_posts(
                PostQueryFilter::default(),
                PageRequest {
                    limit,
                    offset: 0,
                },
            )
            .await
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<PostListItem>, RepoError> {
            Ok(self.items.iter().find(|item| item.id == id).cloned())
        }
    }

    struct FakeUsersRepo {
        users: Vec<UserRecord>,
    }

    #[async_trait]
    impl UsersRepo for FakeUsersRepo {
        async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, RepoError> {
            Ok(self.users.iter().find(|u| u.username == username).cloned())
        }

        async fn user_for_session(&self, _token: &str) -> Result<Option<UserRecord>, RepoError> {
            Ok(None)
        }
    }

    fn author(username: &str) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn item(author: &UserRecord, title: &str, age_minutes: i64) -> PostListItem {
        PostListItem {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: "body".to_string(),
            date_posted: OffsetDateTime::now_utc() - Duration::minutes(age_minutes),
            author_id: author.id,
            author_username: author.username.clone(),
        }
    }

    fn service(items: Vec<PostListItem>, users: Vec<UserRecord>) -> FeedService {
        FeedService::new(
            Arc::new(FakePostsRepo { items }),
            Arc::new(FakeUsersRepo { users }),
        )
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_capped_at_page_size() {
        let user = author("ada");
        let items: Vec<_> = (0..7).map(|n| item(&user, &format!("post-{n}"), n)).collect();
        let feed = service(items, vec![user]);

        let page = feed.page_context(FeedFilter::All, 1).await.unwrap();
        assert_eq!(page.posts.len(), 5);
        assert_eq!(page.posts[0].title, "post-0");
        assert_eq!(page.page_count, 2);
        assert!(page.has_next);

        let second = feed.page_context(FeedFilter::All, 2).await.unwrap();
        assert_eq!(second.posts.len(), 2);
        assert!(second.has_previous);
    }

    #[tokio::test]
    async fn unknown_author_is_rejected_but_empty_author_listing_is_not() {
        let quiet = author("quiet");
        let feed = service(Vec::new(), vec![quiet]);

        let err = feed
            .page_context(FeedFilter::Author("ghost".to_string()), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::UnknownAuthor));

        let page = feed
            .page_context(FeedFilter::Author("quiet".to_string()), 1)
            .await
            .unwrap();
        assert!(page.posts.is_empty());
        assert_eq!(page.page_count, 1);
    }

    #[tokio::test]
    async fn sidebar_respects_requested_count() {
        let user = author("ada");
        let items: Vec<_> = (0..7).map(|n| item(&user, &format!("post-{n}"), n)).collect();
        let feed = service(items, vec![user]);

        let five = feed.latest_posts(SIDEBAR_DEFAULT_COUNT).await.unwrap();
        assert_eq!(five.len(), 5);
        assert_eq!(five[0].title, "post-0");

        let two = feed.latest_posts(2).await.unwrap();
        assert_eq!(two.len(), 2);
    }
}
