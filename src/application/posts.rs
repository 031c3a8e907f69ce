//! Write-side post operations with ownership checks.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{
    CreatePostParams, PostListItem, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::{PostRecord, UserRecord};

/// Field-level validation outcome for the post form. Mirrors the form's
/// required-field behavior: an invalid submission re-renders the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFormErrors {
    pub title: Option<&'static str>,
    pub content: Option<&'static str>,
}

impl PostFormErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct PostFormInput {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum PostMutationError {
    #[error("post not found")]
    NotFound,
    #[error("caller is not the post's author")]
    NotOwner,
    #[error("form validation failed")]
    Validation(PostFormErrors),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostsRepo>,
    writes: Arc<dyn PostsWriteRepo>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostsRepo>, writes: Arc<dyn PostsWriteRepo>) -> Self {
        Self { posts, writes }
    }

    pub async fn create(
        &self,
        author: &UserRecord,
        input: PostFormInput,
    ) -> Result<PostRecord, PostMutationError> {
        let (title, content) = validate(&input).map_err(PostMutationError::Validation)?;
        let record = self
            .writes
            .create_post(CreatePostParams {
                title,
                content,
                author_id: author.id,
            })
            .await?;
        Ok(record)
    }

    /// Loads a post for editing or deletion, enforcing the ownership rule
    /// against the stored author, never the submitted form.
    pub async fn edit_target(
        &self,
        actor: &UserRecord,
        id: Uuid,
    ) -> Result<PostListItem, PostMutationError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(PostMutationError::NotFound)?;
        if post.author_id != actor.id {
            return Err(PostMutationError::NotOwner);
        }
        Ok(post)
    }

    pub async fn update(
        &self,
        actor: &UserRecord,
        id: Uuid,
        input: PostFormInput,
    ) -> Result<PostRecord, PostMutationError> {
        self.edit_target(actor, id).await?;
        let (title, content) = validate(&input).map_err(PostMutationError::Validation)?;
        let record = self
            .writes
            .update_post(UpdatePostParams { id, title, content })
            .await?;
        Ok(record)
    }

    pub async fn delete(&self, actor: &UserRecord, id: Uuid) -> Result<(), PostMutationError> {
        self.edit_target(actor, id).await?;
        self.writes.delete_post(id).await?;
        Ok(())
    }
}

fn validate(input: &PostFormInput) -> Result<(String, String), PostFormErrors> {
    let title = input.title.trim();
    let content = input.content.trim();

    let errors = PostFormErrors {
        title: title.is_empty().then_some("This field is required."),
        content: content.is_empty().then_some("This field is required."),
    };

    if errors.is_empty() {
        Ok((title.to_string(), content.to_string()))
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use time::OffsetDateTime;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use super::*;
    use crate::application::pagination::PageRequest;
    use crate::application::repos::PostQueryFilter;

    #[derive(Default)]
    struct InMemoryPosts {
        items: Mutex<Vec<PostListItem>>,
    }

    #[async_trait]
    impl PostsRepo for InMemoryPosts {
        async fn list_posts(
            &self,
            _filter: PostQueryFilter,
            _page: PageRequest,
        ) -> Result<Vec<PostListItem>, RepoError> {
            Ok(self.items.lock().await.clone())
        }

        async fn count_posts(&self, _filter: PostQueryFilter) -> Result<u64, RepoError> {
            Ok(self.items.lock().await.len() as u64)
        }

        async fn list_recent(&self, _limit: u32) -> Result<Vec<PostListItem>, RepoError> {
            Ok(self.items.lock().await.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<PostListItem>, RepoError> {
            Ok(self
                .items
                .lock()
                .await
                .iter()
                .find(|item| item.id == id)
                .cloned())
        }
    }

    #[async_trait]
    impl PostsWriteRepo for InMemoryPosts {
        async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
            let record = PostRecord {
                id: Uuid::new_v4(),
                title: params.title,
                content: params.content,
                date_posted: OffsetDateTime::now_utc(),
                author_id: params.author_id,
            };
            self.items.lock().await.push(PostListItem {
                id: record.id,
                title: record.title.clone(),
                content: record.content.clone(),
                date_posted: record.date_posted,
                author_id: record.author_id,
                author_username: "author".to_string(),
            });
            Ok(record)
        }

        async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
            let mut items = self.items.lock().await;
            let item = items
                .iter_mut()
                .find(|item| item.id == params.id)
                .ok_or(RepoError::NotFound)?;
            item.title = params.title;
            item.content = params.content;
            Ok(PostRecord {
                id: item.id,
                title: item.title.clone(),
                content: item.content.clone(),
                date_posted: item.date_posted,
                author_id: item.author_id,
            })
        }

        async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
            self.items.lock().await.retain(|item| item.id != id);
            Ok(())
        }
    }

    fn user(username: &str) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn service() -> (PostService, Arc<InMemoryPosts>) {
        let repo = Arc::new(InMemoryPosts::default());
        (PostService::new(repo.clone(), repo.clone()), repo)
    }

    fn input(title: &str, content: &str) -> PostFormInput {
        PostFormInput {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_without_writing() {
        let (service, repo) = service();
        let author = user("ada");

        let err = service.create(&author, input("  ", "")).await.unwrap_err();
        match err {
            PostMutationError::Validation(errors) => {
                assert!(errors.title.is_some());
                assert!(errors.content.is_some());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(repo.items.lock().await.is_empty());
    }

    #[tokio::test]
    async fn only_the_author_may_update_or_delete() {
        let (service, repo) = service();
        let author = user("ada");
        let intruder = user("mallory");

        let post = service
            .create(&author, input("First", "Hello"))
            .await
            .unwrap();

        let err = service
            .update(&intruder, post.id, input("Hijacked", "Hijacked"))
            .await
            .unwrap_err();
        assert!(matches!(err, PostMutationError::NotOwner));

        let err = service.delete(&intruder, post.id).await.unwrap_err();
        assert!(matches!(err, PostMutationError::NotOwner));

        // The post is unchanged after the rejected attempts.
        let stored = repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "First");

        service
            .update(&author, post.id, input("Revised", "Hello again"))
            .await
            .unwrap();
        let stored = repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Revised");
        assert_eq!(stored.author_id, author.id);

        service.delete(&author, post.id).await.unwrap();
        assert!(repo.find_by_id(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let (service, _repo) = service();
        let actor = user("ada");
        let err = service
            .update(&actor, Uuid::new_v4(), input("a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, PostMutationError::NotFound));
    }
}
