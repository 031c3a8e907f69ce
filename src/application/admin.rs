//! Services backing the administrative listener.

use std::sync::Arc;

use crate::application::feed::LISTING_PAGE_SIZE;
use crate::application::pagination::{NumberedPage, PaginationError};
use crate::application::repos::{
    PostListItem, PostQueryFilter, PostsRepo, RepoError, SubscriptionsRepo,
};
use crate::domain::entities::SubscriptionRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminListError {
    #[error(transparent)]
    PageOutOfRange(PaginationError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct AdminPostPage {
    pub items: Vec<PostListItem>,
    pub total: u64,
    pub page_number: u32,
    pub page_count: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Clone)]
pub struct AdminPostService {
    posts: Arc<dyn PostsRepo>,
}

impl AdminPostService {
    pub fn new(posts: Arc<dyn PostsRepo>) -> Self {
        Self { posts }
    }

    pub async fn list(&self, page_number: u32) -> Result<AdminPostPage, AdminListError> {
        let filter = PostQueryFilter::default();
        let total = self.posts.count_posts(filter).await?;
        let page = NumberedPage::resolve(page_number, LISTING_PAGE_SIZE, total)
            .map_err(AdminListError::PageOutOfRange)?;
        let items = self.posts.list_posts(filter, page.request()).await?;

        Ok(AdminPostPage {
            items,
            total,
            page_number: page.number(),
            page_count: page.page_count(),
            has_previous: page.has_previous(),
            has_next: page.has_next(),
        })
    }
}

#[derive(Clone)]
pub struct AdminSubscriptionService {
    subscriptions: Arc<dyn SubscriptionsRepo>,
}

impl AdminSubscriptionService {
    pub fn new(subscriptions: Arc<dyn SubscriptionsRepo>) -> Self {
        Self { subscriptions }
    }

    /// Lists subscriptions, optionally filtered by an email substring.
    /// Blank search input is treated as no filter.
    pub async fn list(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<SubscriptionRecord>, AdminListError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        Ok(self.subscriptions.list_subscriptions(search).await?)
    }
}
