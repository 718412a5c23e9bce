//! Tests for the SQLite repository: ordering, filters and search matching.

mod common;

use common::{seed_accented, seed_forum, setup_db};
use forum_api::db::{
    PostFilter, Repository, SearchCriteria, SearchScope, SqliteRepository, TopicFilter, TopicSort,
};
use forum_api::pagination::PageRequest;

fn page(page: u32, limit: u32) -> PageRequest {
    PageRequest::new(page, limit)
}

fn search(query: &str, scope: SearchScope, forum_id: Option<i64>) -> SearchCriteria {
    SearchCriteria {
        query: query.to_string(),
        scope,
        forum_id,
    }
}

async fn seeded() -> (SqliteRepository, tempfile::TempDir) {
    let (db, temp) = setup_db().await;
    seed_forum(db.pool()).await;
    (db.repository(), temp)
}

#[tokio::test]
async fn test_topic_sort_orders() {
    let (repo, _temp) = seeded().await;

    for (sort, expected) in [
        (TopicSort::Newest, vec![3, 2, 1]),
        (TopicSort::Oldest, vec![1, 2, 3]),
        (TopicSort::MostReplies, vec![2, 1, 3]),
        (TopicSort::MostViews, vec![3, 1, 2]),
    ] {
        let filter = TopicFilter {
            forum_id: None,
            sort,
        };
        let listing = repo.list_topics(&filter, page(1, 20)).await.unwrap();
        let ids: Vec<i64> = listing.items.iter().map(|t| t.id).collect();
        assert_eq!(ids, expected, "sort {}", sort.as_str());
        assert_eq!(listing.total, 3);
    }
}

#[tokio::test]
async fn test_topic_count_ignores_paging() {
    let (repo, _temp) = seeded().await;

    let filter = TopicFilter {
        forum_id: Some(1),
        sort: TopicSort::Newest,
    };
    let listing = repo.list_topics(&filter, page(1, 1)).await.unwrap();
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.total, 2);

    let past_end = repo.list_topics(&filter, page(5, 1)).await.unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total, 2);
}

#[tokio::test]
async fn test_topic_joined_fields() {
    let (repo, _temp) = seeded().await;

    let topic = repo.get_topic(1).await.unwrap().unwrap();
    assert_eq!(topic.forum_name, "General");
    assert_eq!(topic.author_name, "alice");
    assert_eq!(topic.last_post_id, Some(4));
    assert_eq!(topic.last_post_at.as_deref(), Some("2024-01-03 08:00:00"));

    let quiet = repo.get_topic(3).await.unwrap().unwrap();
    assert_eq!(quiet.last_post_id, None);
    assert_eq!(quiet.last_post_at, None);

    assert!(repo.get_topic(99).await.unwrap().is_none());
}

#[tokio::test]
async fn test_post_filters() {
    let (repo, _temp) = seeded().await;

    let by_topic = PostFilter {
        topic_id: Some(1),
        user_id: None,
    };
    let listing = repo.list_posts(&by_topic, page(1, 20)).await.unwrap();
    let ids: Vec<i64> = listing.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![4, 2, 1]);

    let by_user = PostFilter {
        topic_id: None,
        user_id: Some(2),
    };
    let listing = repo.list_posts(&by_user, page(1, 20)).await.unwrap();
    let mut ids: Vec<i64> = listing.items.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![2, 3]);
    assert!(listing.items.iter().all(|p| p.author_name == "bob"));

    let both = PostFilter {
        topic_id: Some(1),
        user_id: Some(2),
    };
    let listing = repo.list_posts(&both, page(1, 20)).await.unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.items[0].id, 2);
}

#[tokio::test]
async fn test_topic_posts_oldest_first() {
    let (repo, _temp) = seeded().await;

    let listing = repo.list_topic_posts(1, page(1, 20)).await.unwrap();
    let ids: Vec<i64> = listing.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    assert!(listing.items[0].is_first_post);
    assert!(!listing.items[1].is_first_post);
    assert_eq!(listing.items[0].topic_title, "Welcome to the forum");
}

#[tokio::test]
async fn test_null_forum_description_reads_empty() {
    let (repo, _temp) = seeded().await;

    let forum = repo.get_forum(2).await.unwrap().unwrap();
    assert_eq!(forum.name, "Off Topic");
    assert_eq!(forum.description, "");
}

#[tokio::test]
async fn test_users_by_username() {
    let (repo, _temp) = seeded().await;

    let listing = repo.list_users(page(1, 20)).await.unwrap();
    let names: Vec<&str> = listing.items.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
    assert_eq!(
        listing.items[0].last_active_at.as_deref(),
        Some("2024-01-02 10:00:00")
    );
    assert!(listing.items[1].last_active_at.is_none());
}

#[tokio::test]
async fn test_search_matches_title_and_content() {
    let (repo, _temp) = seeded().await;

    let results = repo
        .search(&search("rust", SearchScope::All, None), page(1, 20))
        .await;
    let topic_ids: Vec<i64> = results.topics.iter().map(|t| t.id).collect();
    let post_ids: Vec<i64> = results.posts.iter().map(|p| p.id).collect();
    assert_eq!(topic_ids, vec![2]);
    assert_eq!(post_ids, vec![5]);
    assert!(results.users.is_empty());
    assert_eq!(results.total, 2);
    assert!(results.failed_scopes.is_empty());
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let (repo, _temp) = seeded().await;

    let results = repo
        .search(&search("HELLO", SearchScope::All, None), page(1, 20))
        .await;
    // Topic 1 matches through its first post, not its title.
    assert_eq!(results.topics.len(), 1);
    assert_eq!(results.topics[0].id, 1);
    assert_eq!(results.posts.len(), 1);
    assert_eq!(results.posts[0].id, 1);
}

#[tokio::test]
async fn test_search_wildcards_match_literally() {
    let (repo, _temp) = seeded().await;

    let percent = repo
        .search_posts(&search("%", SearchScope::Posts, None), page(1, 20))
        .await
        .unwrap();
    assert_eq!(percent.total, 1);
    assert_eq!(percent.items[0].id, 4);

    let underscore = repo
        .search_users(&search("_", SearchScope::Users, None), page(1, 20))
        .await
        .unwrap();
    assert_eq!(underscore.total, 0);

    let dot = repo
        .search_users(&search("b.b", SearchScope::Users, None), page(1, 20))
        .await
        .unwrap();
    assert_eq!(dot.total, 0);
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let (db, _temp) = setup_db().await;
    seed_accented(db.pool()).await;
    let repo = db.repository();

    let users = repo
        .search_users(&search("über", SearchScope::Users, None), page(1, 20))
        .await
        .unwrap();
    assert_eq!(users.total, 1);
    assert_eq!(users.items[0].username, "Über");

    let topics = repo
        .search_topics(&search("ärger", SearchScope::Topics, None), page(1, 20))
        .await
        .unwrap();
    assert_eq!(topics.total, 1);

    let posts = repo
        .search_posts(&search("été", SearchScope::Posts, None), page(1, 20))
        .await
        .unwrap();
    assert_eq!(posts.total, 1);

    // Topic 1 also matches through its post content.
    let all = repo
        .search(&search("ÉtÉ", SearchScope::All, None), page(1, 20))
        .await;
    assert_eq!(all.topics.len(), 1);
    assert_eq!(all.posts.len(), 1);
    assert_eq!(all.total, 2);
}

#[tokio::test]
async fn test_search_forum_filter() {
    let (repo, _temp) = seeded().await;

    let topics = repo
        .search(&search("e", SearchScope::Topics, Some(2)), page(1, 20))
        .await;
    let ids: Vec<i64> = topics.topics.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![3]);

    let posts = repo
        .search(&search("e", SearchScope::Posts, Some(2)), page(1, 20))
        .await;
    assert!(posts.posts.iter().all(|p| p.topic_id == 3));

    // Users are not scoped to a forum.
    let users = repo
        .search(&search("bob", SearchScope::Users, Some(2)), page(1, 20))
        .await;
    assert_eq!(users.total, 1);
}

#[tokio::test]
async fn test_search_pages_each_scope_independently() {
    let (repo, _temp) = seeded().await;

    let results = repo
        .search(&search("o", SearchScope::All, None), page(1, 1))
        .await;
    assert_eq!(results.topics.len(), 1);
    assert_eq!(results.posts.len(), 1);
    assert_eq!(results.users.len(), 1);
    // 2 topics + 3 posts + 2 users
    assert_eq!(results.total, 7);

    let last = repo
        .search(&search("o", SearchScope::All, None), page(3, 1))
        .await;
    assert!(last.topics.is_empty());
    assert_eq!(last.posts.len(), 1);
    assert!(last.users.is_empty());
    assert_eq!(last.total, 7);
}
