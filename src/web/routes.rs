use axum::extract::State;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::extract::{Path, Query};
use super::AppState;
use crate::db::{Forum, Post, PostFilter, SearchCriteria, SearchScope, TopicFilter, TopicSort, User};
use crate::pagination::PageRequest;
use crate::service::{
    Entity, ForumListResponse, PostListResponse, SearchResponse, TopicDetailResponse,
    TopicListResponse, UserListResponse,
};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/forums", get(list_forums))
        .route("/forums/:id", get(get_forum))
        .route("/topics", get(list_topics))
        .route("/topics/:topic_id", get(get_topic))
        .route("/posts", get(list_posts))
        .route("/posts/:post_id", get(get_post))
        .route("/users", get(list_users))
        .route("/users/:user_id", get(get_user))
        .route("/search", get(search))
}

// ========== Parameter Parsing ==========

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    page: Option<String>,
    limit: Option<String>,
}

impl PageParams {
    fn page_request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.limit.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicListParams {
    page: Option<String>,
    limit: Option<String>,
    sort: Option<String>,
    forum_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListParams {
    page: Option<String>,
    limit: Option<String>,
    topic_id: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    q: Option<String>,
    #[serde(rename = "type")]
    scope: Option<String>,
    forum_id: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

/// Parse a path id, rejecting anything that is not an integer.
fn parse_id(raw: &str, entity: Entity) -> ApiResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid {entity} ID")))
}

/// Parse an optional filter id. Unparsable values are treated as absent.
fn parse_filter_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

// ========== Health ==========

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

// ========== Forums ==========

async fn list_forums(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ForumListResponse>> {
    let response = state.service.list_forums(params.page_request()).await?;
    Ok(Json(response))
}

async fn get_forum(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Forum>> {
    let id = parse_id(&id, Entity::Forum)?;
    let forum = state.service.get_forum(id).await?;
    Ok(Json(forum))
}

// ========== Topics ==========

async fn list_topics(
    State(state): State<AppState>,
    Query(params): Query<TopicListParams>,
) -> ApiResult<Json<TopicListResponse>> {
    let page = PageRequest::parse(params.page.as_deref(), params.limit.as_deref());
    let filter = TopicFilter {
        forum_id: parse_filter_id(params.forum_id.as_deref()),
        sort: params
            .sort
            .as_deref()
            .map(TopicSort::parse_or_default)
            .unwrap_or_default(),
    };

    let response = state.service.list_topics(&filter, page).await?;
    Ok(Json(response))
}

async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<TopicDetailResponse>> {
    let id = parse_id(&id, Entity::Topic)?;
    let response = state.service.get_topic(id, params.page_request()).await?;
    Ok(Json(response))
}

// ========== Posts ==========

async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> ApiResult<Json<PostListResponse>> {
    let page = PageRequest::parse(params.page.as_deref(), params.limit.as_deref());
    let filter = PostFilter {
        topic_id: parse_filter_id(params.topic_id.as_deref()),
        user_id: parse_filter_id(params.user_id.as_deref()),
    };

    let response = state.service.list_posts(&filter, page).await?;
    Ok(Json(response))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Post>> {
    let id = parse_id(&id, Entity::Post)?;
    let post = state.service.get_post(id).await?;
    Ok(Json(post))
}

// ========== Users ==========

async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<UserListResponse>> {
    let response = state.service.list_users(params.page_request()).await?;
    Ok(Json(response))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id, Entity::User)?;
    let user = state.service.get_user(id).await?;
    Ok(Json(user))
}

// ========== Search ==========

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("query parameter 'q' is required".to_string()))?;

    let criteria = SearchCriteria {
        query: query.to_string(),
        scope: params
            .scope
            .as_deref()
            .map(SearchScope::parse_or_default)
            .unwrap_or_default(),
        forum_id: parse_filter_id(params.forum_id.as_deref()),
    };
    let page = PageRequest::parse(params.page.as_deref(), params.limit.as_deref());

    let response = state.service.search(criteria, page).await;
    Ok(Json(response))
}
