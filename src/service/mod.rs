//! Use-case orchestration over a [`Repository`].

mod responses;

pub use responses::*;

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;

use crate::db::{PostFilter, Repository, SearchCriteria, TopicFilter};
use crate::pagination::PageRequest;

/// Kinds of entity that can be looked up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Forum,
    Topic,
    Post,
    User,
}

impl Entity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forum => "forum",
            Self::Topic => "topic",
            Self::Post => "post",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("{0:#}")]
    Backend(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Forum read operations, one per endpoint.
#[derive(Clone)]
pub struct ForumService {
    repo: Arc<dyn Repository>,
}

impl ForumService {
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns [`ServiceError::Backend`] if the repository query fails.
    pub async fn list_forums(&self, page: PageRequest) -> ServiceResult<ForumListResponse> {
        let listing = self
            .repo
            .list_forums(page)
            .await
            .context("failed to get forums")?;

        Ok(ForumListResponse {
            forums: listing.items,
            pagination: page.paginate(listing.total),
        })
    }

    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no forum has this id.
    pub async fn get_forum(&self, id: i64) -> ServiceResult<crate::db::Forum> {
        self.repo
            .get_forum(id)
            .await
            .context("failed to get forum")?
            .ok_or(ServiceError::NotFound(Entity::Forum))
    }

    /// # Errors
    ///
    /// Returns [`ServiceError::Backend`] if the repository query fails.
    pub async fn list_topics(
        &self,
        filter: &TopicFilter,
        page: PageRequest,
    ) -> ServiceResult<TopicListResponse> {
        let listing = self
            .repo
            .list_topics(filter, page)
            .await
            .context("failed to get topics")?;

        Ok(TopicListResponse {
            topics: listing.items,
            pagination: page.paginate(listing.total),
        })
    }

    /// Fetch a topic and one page of its posts.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no topic has this id.
    pub async fn get_topic(&self, id: i64, page: PageRequest) -> ServiceResult<TopicDetailResponse> {
        let topic = self
            .repo
            .get_topic(id)
            .await
            .context("failed to get topic")?
            .ok_or(ServiceError::NotFound(Entity::Topic))?;

        let posts = self
            .repo
            .list_topic_posts(id, page)
            .await
            .context("failed to get topic posts")?;

        Ok(TopicDetailResponse {
            topic,
            posts: posts.items,
            post_pagination: page.paginate(posts.total),
        })
    }

    /// # Errors
    ///
    /// Returns [`ServiceError::Backend`] if the repository query fails.
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> ServiceResult<PostListResponse> {
        let listing = self
            .repo
            .list_posts(filter, page)
            .await
            .context("failed to get posts")?;

        Ok(PostListResponse {
            posts: listing.items,
            pagination: page.paginate(listing.total),
        })
    }

    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no post has this id.
    pub async fn get_post(&self, id: i64) -> ServiceResult<crate::db::Post> {
        self.repo
            .get_post(id)
            .await
            .context("failed to get post")?
            .ok_or(ServiceError::NotFound(Entity::Post))
    }

    /// # Errors
    ///
    /// Returns [`ServiceError::Backend`] if the repository query fails.
    pub async fn list_users(&self, page: PageRequest) -> ServiceResult<UserListResponse> {
        let listing = self
            .repo
            .list_users(page)
            .await
            .context("failed to get users")?;

        Ok(UserListResponse {
            users: listing.items,
            pagination: page.paginate(listing.total),
        })
    }

    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no user has this id.
    pub async fn get_user(&self, id: i64) -> ServiceResult<crate::db::User> {
        self.repo
            .get_user(id)
            .await
            .context("failed to get user")?
            .ok_or(ServiceError::NotFound(Entity::User))
    }

    /// Search across the requested scopes. Scope failures are reported in
    /// the response rather than failing the call.
    pub async fn search(&self, criteria: SearchCriteria, page: PageRequest) -> SearchResponse {
        let results = self.repo.search(&criteria, page).await;

        SearchResponse {
            results: SearchResultSet {
                topics: results.topics,
                posts: results.posts,
                users: results.users,
            },
            pagination: page.paginate(results.total),
            query: criteria.query,
            total_results: results.total,
            failed_scopes: results.failed_scopes,
        }
    }
}
