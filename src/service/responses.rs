use serde::Serialize;

use crate::db::{Forum, Post, SearchScope, Topic, User};
use crate::pagination::Pagination;

#[derive(Debug, Clone, Serialize)]
pub struct ForumListResponse {
    pub forums: Vec<Forum>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicListResponse {
    pub topics: Vec<Topic>,
    pub pagination: Pagination,
}

/// A topic with one page of its posts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDetailResponse {
    #[serde(flatten)]
    pub topic: Topic,
    pub posts: Vec<Post>,
    pub post_pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResultSet {
    pub topics: Vec<Topic>,
    pub posts: Vec<Post>,
    pub users: Vec<User>,
}

/// Search results across scopes.
///
/// `pagination` is computed from `total_results`, the sum of per-scope
/// counts, while each scope's list holds that scope's own page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: SearchResultSet,
    pub pagination: Pagination,
    pub query: String,
    pub total_results: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_scopes: Vec<SearchScope>,
}
