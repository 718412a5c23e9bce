use std::fmt;

use serde::Serialize;

/// A top-level forum category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Forum {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub topic_count: i64,
    pub post_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// A discussion thread, with its forum and author names joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub forum_id: i64,
    pub forum_name: String,
    pub author_id: i64,
    pub author_name: String,
    pub reply_count: i64,
    pub view_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_post_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_post_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A single message in a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub topic_id: i64,
    pub topic_title: String,
    pub author_id: i64,
    pub author_name: String,
    pub content: String,
    pub is_first_post: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A forum member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub post_count: i64,
    pub topic_count: i64,
    pub registered_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<String>,
}

/// One page of rows plus the number of rows matching the filter overall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Ordering for topic listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TopicSort {
    #[default]
    Newest,
    Oldest,
    MostReplies,
    MostViews,
}

impl TopicSort {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::MostReplies => "most_replies",
            Self::MostViews => "most_views",
        }
    }

    /// Parse a sort name, falling back to [`TopicSort::Newest`] for anything
    /// unrecognized.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim() {
            "oldest" => Self::Oldest,
            "most_replies" => Self::MostReplies,
            "most_views" => Self::MostViews,
            _ => Self::Newest,
        }
    }

    /// ORDER BY clause for the `t` topics alias.
    #[must_use]
    pub fn order_by(&self) -> &'static str {
        match self {
            Self::Newest => "t.created_at DESC, t.id DESC",
            Self::Oldest => "t.created_at ASC, t.id ASC",
            Self::MostReplies => "t.reply_count DESC, t.id DESC",
            Self::MostViews => "t.view_count DESC, t.id DESC",
        }
    }
}

/// Filters for topic listings.
#[derive(Debug, Clone, Default)]
pub struct TopicFilter {
    pub forum_id: Option<i64>,
    pub sort: TopicSort,
}

/// Filters for post listings.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub topic_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// Which entity types a search targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    All,
    Topics,
    Posts,
    Users,
}

impl SearchScope {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Topics => "topics",
            Self::Posts => "posts",
            Self::Users => "users",
        }
    }

    /// Parse a scope name, falling back to [`SearchScope::All`].
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim() {
            "topics" => Self::Topics,
            "posts" => Self::Posts,
            "users" => Self::Users,
            _ => Self::All,
        }
    }

    /// Whether results of `kind` should be included for this scope.
    #[must_use]
    pub fn includes(&self, kind: Self) -> bool {
        *self == Self::All || *self == kind
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to search for.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    pub query: String,
    pub scope: SearchScope,
    pub forum_id: Option<i64>,
}

/// Combined results of a multi-scope search.
///
/// Every scope is paged with the same page/limit, so `total` is the sum of
/// per-scope counts rather than the size of one ordered result set.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub topics: Vec<Topic>,
    pub posts: Vec<Post>,
    pub users: Vec<User>,
    pub total: i64,
    /// Scopes whose queries failed and were counted as empty.
    pub failed_scopes: Vec<SearchScope>,
}
