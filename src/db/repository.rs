//! Data access seam between the service layer and SQLite.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use super::models::{
    Forum, Listing, Post, PostFilter, SearchCriteria, SearchResults, SearchScope, Topic,
    TopicFilter, User,
};
use super::queries;
use crate::pagination::PageRequest;

/// Read operations over the forum dataset.
///
/// List operations return the requested page together with the number of
/// rows matching the filter. By-id lookups return `Ok(None)` when no row
/// matches and reserve `Err` for query failures.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn list_forums(&self, page: PageRequest) -> Result<Listing<Forum>>;
    async fn get_forum(&self, id: i64) -> Result<Option<Forum>>;

    async fn list_topics(&self, filter: &TopicFilter, page: PageRequest) -> Result<Listing<Topic>>;
    async fn get_topic(&self, id: i64) -> Result<Option<Topic>>;
    async fn list_topic_posts(&self, topic_id: i64, page: PageRequest) -> Result<Listing<Post>>;

    async fn list_posts(&self, filter: &PostFilter, page: PageRequest) -> Result<Listing<Post>>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>>;

    async fn list_users(&self, page: PageRequest) -> Result<Listing<User>>;
    async fn get_user(&self, id: i64) -> Result<Option<User>>;

    async fn search_topics(
        &self,
        criteria: &SearchCriteria,
        page: PageRequest,
    ) -> Result<Listing<Topic>>;
    async fn search_posts(
        &self,
        criteria: &SearchCriteria,
        page: PageRequest,
    ) -> Result<Listing<Post>>;
    async fn search_users(
        &self,
        criteria: &SearchCriteria,
        page: PageRequest,
    ) -> Result<Listing<User>>;

    /// Run every scope the criteria ask for and combine the results.
    ///
    /// Each scope is paged independently with the same `page`. A scope whose
    /// query fails contributes nothing and is recorded in
    /// [`SearchResults::failed_scopes`] instead of failing the whole search.
    async fn search(&self, criteria: &SearchCriteria, page: PageRequest) -> SearchResults {
        let mut results = SearchResults::default();

        if criteria.scope.includes(SearchScope::Topics) {
            match self.search_topics(criteria, page).await {
                Ok(listing) => {
                    results.total += listing.total;
                    results.topics = listing.items;
                }
                Err(e) => {
                    warn!(scope = "topics", query = %criteria.query, "Search scope failed: {e:#}");
                    results.failed_scopes.push(SearchScope::Topics);
                }
            }
        }

        if criteria.scope.includes(SearchScope::Posts) {
            match self.search_posts(criteria, page).await {
                Ok(listing) => {
                    results.total += listing.total;
                    results.posts = listing.items;
                }
                Err(e) => {
                    warn!(scope = "posts", query = %criteria.query, "Search scope failed: {e:#}");
                    results.failed_scopes.push(SearchScope::Posts);
                }
            }
        }

        if criteria.scope.includes(SearchScope::Users) {
            match self.search_users(criteria, page).await {
                Ok(listing) => {
                    results.total += listing.total;
                    results.users = listing.items;
                }
                Err(e) => {
                    warn!(scope = "users", query = %criteria.query, "Search scope failed: {e:#}");
                    results.failed_scopes.push(SearchScope::Users);
                }
            }
        }

        debug!(
            scope = %criteria.scope,
            total = results.total,
            failed = results.failed_scopes.len(),
            "Search complete"
        );
        results
    }
}

/// [`Repository`] backed by a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn list_forums(&self, page: PageRequest) -> Result<Listing<Forum>> {
        let total = queries::count_forums(&self.pool).await?;
        let items = queries::get_forums(&self.pool, page).await?;
        Ok(Listing { items, total })
    }

    async fn get_forum(&self, id: i64) -> Result<Option<Forum>> {
        queries::get_forum(&self.pool, id).await
    }

    async fn list_topics(&self, filter: &TopicFilter, page: PageRequest) -> Result<Listing<Topic>> {
        let total = queries::count_topics(&self.pool, filter).await?;
        let items = queries::get_topics(&self.pool, filter, page).await?;
        Ok(Listing { items, total })
    }

    async fn get_topic(&self, id: i64) -> Result<Option<Topic>> {
        queries::get_topic(&self.pool, id).await
    }

    async fn list_topic_posts(&self, topic_id: i64, page: PageRequest) -> Result<Listing<Post>> {
        let total = queries::count_topic_posts(&self.pool, topic_id).await?;
        let items = queries::get_topic_posts(&self.pool, topic_id, page).await?;
        Ok(Listing { items, total })
    }

    async fn list_posts(&self, filter: &PostFilter, page: PageRequest) -> Result<Listing<Post>> {
        let total = queries::count_posts(&self.pool, filter).await?;
        let items = queries::get_posts(&self.pool, filter, page).await?;
        Ok(Listing { items, total })
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        queries::get_post(&self.pool, id).await
    }

    async fn list_users(&self, page: PageRequest) -> Result<Listing<User>> {
        let total = queries::count_users(&self.pool).await?;
        let items = queries::get_users(&self.pool, page).await?;
        Ok(Listing { items, total })
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        queries::get_user(&self.pool, id).await
    }

    async fn search_topics(
        &self,
        criteria: &SearchCriteria,
        page: PageRequest,
    ) -> Result<Listing<Topic>> {
        let total = queries::count_topic_matches(&self.pool, criteria).await?;
        let items = queries::search_topics(&self.pool, criteria, page).await?;
        Ok(Listing { items, total })
    }

    async fn search_posts(
        &self,
        criteria: &SearchCriteria,
        page: PageRequest,
    ) -> Result<Listing<Post>> {
        let total = queries::count_post_matches(&self.pool, criteria).await?;
        let items = queries::search_posts(&self.pool, criteria, page).await?;
        Ok(Listing { items, total })
    }

    async fn search_users(
        &self,
        criteria: &SearchCriteria,
        page: PageRequest,
    ) -> Result<Listing<User>> {
        let total = queries::count_user_matches(&self.pool, criteria).await?;
        let items = queries::search_users(&self.pool, criteria, page).await?;
        Ok(Listing { items, total })
    }
}
