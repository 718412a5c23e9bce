//! Shared fixtures for integration tests.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use forum_api::config::Config;
use forum_api::db::Database;
use forum_api::web::{create_app, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

pub async fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");
    let db = Database::new(&db_path)
        .await
        .expect("Failed to create database");
    (db, temp_dir)
}

/// Router with routes mounted at the root.
pub fn test_app(state: AppState) -> Router {
    let config = Config {
        api_prefix: String::new(),
        ..Config::default()
    };
    create_app(state, &config)
}

/// Send a GET request and decode the JSON body (`Null` if it is not JSON).
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed");

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn exec(pool: &SqlitePool, sql: &str) {
    sqlx::query(sql)
        .execute(pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to run `{sql}`: {e}"));
}

/// One forum, user, topic and post.
pub async fn seed_minimal(pool: &SqlitePool) {
    exec(
        pool,
        "INSERT INTO forums (id, name, description) VALUES (1, 'Test Forum', 'Test Description')",
    )
    .await;
    exec(pool, "INSERT INTO users (id, username) VALUES (1, 'testuser')").await;
    exec(
        pool,
        "INSERT INTO topics (id, title, forum_id, author_id, reply_count, view_count) \
         VALUES (1, 'Test Topic', 1, 1, 0, 0)",
    )
    .await;
    exec(
        pool,
        "INSERT INTO posts (id, topic_id, author_id, content, is_first_post) \
         VALUES (1, 1, 1, 'Test post content', 1)",
    )
    .await;
}

/// Two forums, three users, three topics and six posts with fixed
/// timestamps and counters.
///
/// | topic | forum | replies | views | created             |
/// |-------|-------|---------|-------|---------------------|
/// | 1     | 1     | 3       | 100   | 2024-01-01 10:00:00 |
/// | 2     | 1     | 5       | 50    | 2024-01-02 09:00:00 |
/// | 3     | 2     | 0       | 500   | 2024-01-03 12:00:00 |
pub async fn seed_forum(pool: &SqlitePool) {
    for sql in [
        "INSERT INTO forums (id, name, description, topic_count, post_count) \
         VALUES (1, 'General', 'Anything goes', 2, 5)",
        "INSERT INTO forums (id, name, description, topic_count, post_count) \
         VALUES (2, 'Off Topic', NULL, 1, 1)",
        "INSERT INTO users (id, username, post_count, topic_count, last_active_at) \
         VALUES (1, 'alice', 2, 1, '2024-01-02 10:00:00')",
        "INSERT INTO users (id, username, post_count, topic_count) VALUES (2, 'bob', 2, 1)",
        "INSERT INTO users (id, username, post_count, topic_count) VALUES (3, 'carol', 2, 1)",
        "INSERT INTO topics (id, title, forum_id, author_id, reply_count, view_count, \
         last_post_id, last_post_at, created_at, updated_at) \
         VALUES (1, 'Welcome to the forum', 1, 1, 3, 100, 4, '2024-01-03 08:00:00', \
         '2024-01-01 10:00:00', '2024-01-03 08:00:00')",
        "INSERT INTO topics (id, title, forum_id, author_id, reply_count, view_count, \
         last_post_id, last_post_at, created_at, updated_at) \
         VALUES (2, 'Rust tips', 1, 2, 5, 50, 5, '2024-01-02 10:00:00', \
         '2024-01-02 09:00:00', '2024-01-02 10:00:00')",
        "INSERT INTO topics (id, title, forum_id, author_id, reply_count, view_count, \
         created_at, updated_at) \
         VALUES (3, 'Weekend plans', 2, 3, 0, 500, '2024-01-03 12:00:00', '2024-01-03 12:00:00')",
        "INSERT INTO posts (id, topic_id, author_id, content, is_first_post, created_at, updated_at) \
         VALUES (1, 1, 1, 'Hello everyone', 1, '2024-01-01 10:00:00', '2024-01-01 10:00:00')",
        "INSERT INTO posts (id, topic_id, author_id, content, is_first_post, created_at, updated_at) \
         VALUES (2, 1, 2, 'Glad to be here', 0, '2024-01-01 11:00:00', '2024-01-01 11:00:00')",
        "INSERT INTO posts (id, topic_id, author_id, content, is_first_post, created_at, updated_at) \
         VALUES (3, 2, 2, 'Use clippy with pedantic lints', 1, '2024-01-02 09:00:00', '2024-01-02 09:00:00')",
        "INSERT INTO posts (id, topic_id, author_id, content, is_first_post, created_at, updated_at) \
         VALUES (4, 1, 3, 'Discount is 100% real', 0, '2024-01-03 08:00:00', '2024-01-03 08:00:00')",
        "INSERT INTO posts (id, topic_id, author_id, content, is_first_post, created_at, updated_at) \
         VALUES (5, 2, 1, 'Rust borrow checker tricks', 0, '2024-01-02 10:00:00', '2024-01-02 10:00:00')",
        "INSERT INTO posts (id, topic_id, author_id, content, is_first_post, created_at, updated_at) \
         VALUES (6, 3, 3, 'Hiking, maybe', 1, '2024-01-03 12:00:00', '2024-01-03 12:00:00')",
    ] {
        exec(pool, sql).await;
    }
}

/// Mixed-case non-ASCII names and text.
pub async fn seed_accented(pool: &SqlitePool) {
    for sql in [
        "INSERT INTO forums (id, name, description) VALUES (1, 'Allgemein', 'Alles')",
        "INSERT INTO users (id, username) VALUES (1, 'Über')",
        "INSERT INTO topics (id, title, forum_id, author_id) VALUES (1, 'Ärger im Forum', 1, 1)",
        "INSERT INTO posts (id, topic_id, author_id, content, is_first_post) \
         VALUES (1, 1, 1, 'ÉTÉ chaud', 1)",
    ] {
        exec(pool, sql).await;
    }
}

/// Ids of the objects in a JSON array field.
pub fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|v| v["id"].as_i64().expect("expected an integer id"))
        .collect()
}
