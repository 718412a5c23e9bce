use anyhow::{Context, Result};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::conditions::{match_pattern, Conditions};
use super::models::{Forum, Post, PostFilter, SearchCriteria, Topic, TopicFilter, User};
use crate::pagination::PageRequest;

const FORUM_COLUMNS: &str = r"
    SELECT id, name, COALESCE(description, '') AS description,
           topic_count, post_count, created_at, updated_at
    FROM forums
";

const TOPIC_COLUMNS: &str = r"
    SELECT
        t.id, t.title, t.forum_id, f.name AS forum_name,
        t.author_id, u.username AS author_name,
        t.reply_count, t.view_count,
        t.last_post_id, t.last_post_at,
        t.created_at, t.updated_at
";

const TOPIC_FROM: &str = r"
    FROM topics t
    JOIN forums f ON t.forum_id = f.id
    JOIN users u ON t.author_id = u.id
";

const POST_COLUMNS: &str = r"
    SELECT
        p.id, p.topic_id, t.title AS topic_title,
        p.author_id, u.username AS author_name,
        p.content, p.is_first_post,
        p.created_at, p.updated_at
";

const POST_FROM: &str = r"
    FROM posts p
    JOIN topics t ON p.topic_id = t.id
    JOIN users u ON p.author_id = u.id
";

const USER_COLUMNS: &str = r"
    SELECT id, username, post_count, topic_count, registered_at, last_active_at
    FROM users
";

/// Append `ORDER BY ... LIMIT ? OFFSET ?` for one page.
fn push_page(qb: &mut QueryBuilder<'_, Sqlite>, order_by: &str, page: PageRequest) {
    qb.push(" ORDER BY ")
        .push(order_by)
        .push(" LIMIT ")
        .push_bind(page.limit_i64())
        .push(" OFFSET ")
        .push_bind(page.offset());
}

// ========== Forums ==========

/// Get one page of forums ordered by name.
pub(crate) async fn get_forums(pool: &SqlitePool, page: PageRequest) -> Result<Vec<Forum>> {
    let mut qb = QueryBuilder::<Sqlite>::new(FORUM_COLUMNS);
    push_page(&mut qb, "name ASC, id ASC", page);

    let rows = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .context("Failed to query forums")?;
    Ok(rows)
}

/// Count all forums.
pub(crate) async fn count_forums(pool: &SqlitePool) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM forums")
        .fetch_one(pool)
        .await
        .context("Failed to count forums")
}

/// Get a forum by ID.
pub(crate) async fn get_forum(pool: &SqlitePool, id: i64) -> Result<Option<Forum>> {
    let mut qb = QueryBuilder::<Sqlite>::new(FORUM_COLUMNS);
    Conditions::new(&mut qb).eq("id", id);

    let row = qb
        .build_query_as()
        .fetch_optional(pool)
        .await
        .context("Failed to get forum")?;
    Ok(row)
}

// ========== Topics ==========

fn push_topic_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &TopicFilter) {
    Conditions::new(qb).eq_opt("t.forum_id", filter.forum_id);
}

/// Get one page of topics matching `filter`, in the filter's sort order.
pub(crate) async fn get_topics(
    pool: &SqlitePool,
    filter: &TopicFilter,
    page: PageRequest,
) -> Result<Vec<Topic>> {
    let mut qb = QueryBuilder::<Sqlite>::new(TOPIC_COLUMNS);
    qb.push(TOPIC_FROM);
    push_topic_filter(&mut qb, filter);
    push_page(&mut qb, filter.sort.order_by(), page);

    let rows = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .context("Failed to query topics")?;
    Ok(rows)
}

/// Count topics matching `filter`.
pub(crate) async fn count_topics(pool: &SqlitePool, filter: &TopicFilter) -> Result<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*)");
    qb.push(TOPIC_FROM);
    push_topic_filter(&mut qb, filter);

    let count = qb
        .build_query_scalar()
        .fetch_one(pool)
        .await
        .context("Failed to count topics")?;
    Ok(count)
}

/// Get a topic by ID.
pub(crate) async fn get_topic(pool: &SqlitePool, id: i64) -> Result<Option<Topic>> {
    let mut qb = QueryBuilder::<Sqlite>::new(TOPIC_COLUMNS);
    qb.push(TOPIC_FROM);
    Conditions::new(&mut qb).eq("t.id", id);

    let row = qb
        .build_query_as()
        .fetch_optional(pool)
        .await
        .context("Failed to get topic")?;
    Ok(row)
}

// ========== Posts ==========

fn push_post_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PostFilter) {
    Conditions::new(qb)
        .eq_opt("p.topic_id", filter.topic_id)
        .eq_opt("p.author_id", filter.user_id);
}

async fn fetch_posts(
    pool: &SqlitePool,
    filter: &PostFilter,
    order_by: &str,
    page: PageRequest,
) -> Result<Vec<Post>> {
    let mut qb = QueryBuilder::<Sqlite>::new(POST_COLUMNS);
    qb.push(POST_FROM);
    push_post_filter(&mut qb, filter);
    push_page(&mut qb, order_by, page);

    let rows = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .context("Failed to query posts")?;
    Ok(rows)
}

/// Get one page of posts matching `filter`, newest first.
pub(crate) async fn get_posts(
    pool: &SqlitePool,
    filter: &PostFilter,
    page: PageRequest,
) -> Result<Vec<Post>> {
    fetch_posts(pool, filter, "p.created_at DESC, p.id DESC", page).await
}

/// Count posts matching `filter`.
pub(crate) async fn count_posts(pool: &SqlitePool, filter: &PostFilter) -> Result<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*)");
    qb.push(POST_FROM);
    push_post_filter(&mut qb, filter);

    let count = qb
        .build_query_scalar()
        .fetch_one(pool)
        .await
        .context("Failed to count posts")?;
    Ok(count)
}

/// Get one page of a topic's posts in reading order (oldest first).
pub(crate) async fn get_topic_posts(
    pool: &SqlitePool,
    topic_id: i64,
    page: PageRequest,
) -> Result<Vec<Post>> {
    let filter = PostFilter {
        topic_id: Some(topic_id),
        user_id: None,
    };
    fetch_posts(pool, &filter, "p.created_at ASC, p.id ASC", page).await
}

/// Count a topic's posts.
pub(crate) async fn count_topic_posts(pool: &SqlitePool, topic_id: i64) -> Result<i64> {
    let filter = PostFilter {
        topic_id: Some(topic_id),
        user_id: None,
    };
    count_posts(pool, &filter).await
}

/// Get a post by ID.
pub(crate) async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    let mut qb = QueryBuilder::<Sqlite>::new(POST_COLUMNS);
    qb.push(POST_FROM);
    Conditions::new(&mut qb).eq("p.id", id);

    let row = qb
        .build_query_as()
        .fetch_optional(pool)
        .await
        .context("Failed to get post")?;
    Ok(row)
}

// ========== Users ==========

/// Get one page of users ordered by username.
pub(crate) async fn get_users(pool: &SqlitePool, page: PageRequest) -> Result<Vec<User>> {
    let mut qb = QueryBuilder::<Sqlite>::new(USER_COLUMNS);
    push_page(&mut qb, "username ASC, id ASC", page);

    let rows = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .context("Failed to query users")?;
    Ok(rows)
}

/// Count all users.
pub(crate) async fn count_users(pool: &SqlitePool) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .context("Failed to count users")
}

/// Get a user by ID.
pub(crate) async fn get_user(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let mut qb = QueryBuilder::<Sqlite>::new(USER_COLUMNS);
    Conditions::new(&mut qb).eq("id", id);

    let row = qb
        .build_query_as()
        .fetch_optional(pool)
        .await
        .context("Failed to get user")?;
    Ok(row)
}

// ========== Search ==========

/// Topics match on their title or on the content of any of their posts.
fn push_topic_search(qb: &mut QueryBuilder<'_, Sqlite>, criteria: &SearchCriteria) {
    let pattern = match_pattern(&criteria.query);
    let mut conds = Conditions::new(qb);
    conds
        .next()
        .push("(t.title REGEXP ")
        .push_bind(pattern.clone())
        .push(" OR EXISTS (SELECT 1 FROM posts sp WHERE sp.topic_id = t.id AND sp.content REGEXP ")
        .push_bind(pattern)
        .push("))");
    conds.eq_opt("t.forum_id", criteria.forum_id);
}

fn push_post_search(qb: &mut QueryBuilder<'_, Sqlite>, criteria: &SearchCriteria) {
    Conditions::new(qb)
        .matches("p.content", match_pattern(&criteria.query))
        .eq_opt("t.forum_id", criteria.forum_id);
}

fn push_user_search(qb: &mut QueryBuilder<'_, Sqlite>, criteria: &SearchCriteria) {
    Conditions::new(qb).matches("username", match_pattern(&criteria.query));
}

/// Search topics by title or post content, newest first.
pub(crate) async fn search_topics(
    pool: &SqlitePool,
    criteria: &SearchCriteria,
    page: PageRequest,
) -> Result<Vec<Topic>> {
    let mut qb = QueryBuilder::<Sqlite>::new(TOPIC_COLUMNS);
    qb.push(TOPIC_FROM);
    push_topic_search(&mut qb, criteria);
    push_page(&mut qb, "t.created_at DESC, t.id DESC", page);

    let rows = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .context("Failed to search topics")?;
    Ok(rows)
}

/// Count topics matching a search.
pub(crate) async fn count_topic_matches(pool: &SqlitePool, criteria: &SearchCriteria) -> Result<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*)");
    qb.push(TOPIC_FROM);
    push_topic_search(&mut qb, criteria);

    let count = qb
        .build_query_scalar()
        .fetch_one(pool)
        .await
        .context("Failed to count topic matches")?;
    Ok(count)
}

/// Search posts by content, newest first.
pub(crate) async fn search_posts(
    pool: &SqlitePool,
    criteria: &SearchCriteria,
    page: PageRequest,
) -> Result<Vec<Post>> {
    let mut qb = QueryBuilder::<Sqlite>::new(POST_COLUMNS);
    qb.push(POST_FROM);
    push_post_search(&mut qb, criteria);
    push_page(&mut qb, "p.created_at DESC, p.id DESC", page);

    let rows = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .context("Failed to search posts")?;
    Ok(rows)
}

/// Count posts matching a search.
pub(crate) async fn count_post_matches(pool: &SqlitePool, criteria: &SearchCriteria) -> Result<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*)");
    qb.push(POST_FROM);
    push_post_search(&mut qb, criteria);

    let count = qb
        .build_query_scalar()
        .fetch_one(pool)
        .await
        .context("Failed to count post matches")?;
    Ok(count)
}

/// Search users by username.
pub(crate) async fn search_users(
    pool: &SqlitePool,
    criteria: &SearchCriteria,
    page: PageRequest,
) -> Result<Vec<User>> {
    let mut qb = QueryBuilder::<Sqlite>::new(USER_COLUMNS);
    push_user_search(&mut qb, criteria);
    push_page(&mut qb, "username ASC, id ASC", page);

    let rows = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .context("Failed to search users")?;
    Ok(rows)
}

/// Count users matching a search.
pub(crate) async fn count_user_matches(pool: &SqlitePool, criteria: &SearchCriteria) -> Result<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM users");
    push_user_search(&mut qb, criteria);

    let count = qb
        .build_query_scalar()
        .fetch_one(pool)
        .await
        .context("Failed to count user matches")?;
    Ok(count)
}
