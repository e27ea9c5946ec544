//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, mint_access_token, TestServer,
};
use reqwest::StatusCode;
use uuid::Uuid;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Hierarchy Tests
// ============================================================================

#[tokio::test]
async fn test_resolve_unknown_slug_answers_ok_with_null_kind() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get("/api/v1/forum/resolve/no-such-slug-anywhere")
        .await
        .unwrap();
    let context: ForumContextResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(context.kind.is_none());
    assert!(context.breadcrumbs.is_empty());
}

#[tokio::test]
async fn test_create_category_and_resolve() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = mint_access_token(Uuid::new_v4()).unwrap();
    let request = CreateCategoryRequest::unique();

    let response = server
        .post_auth("/api/v1/forum/categories", &token, &request)
        .await
        .unwrap();
    let category: CategoryResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(category.name, request.name);
    assert_eq!(category.slug, request.slug);

    // The slug now resolves to a category context
    let response = server
        .get(&format!("/api/v1/forum/resolve/{}", request.slug))
        .await
        .unwrap();
    let context: ForumContextResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(context.kind.as_deref(), Some("category"));
    assert_eq!(context.breadcrumbs.len(), 1);
    assert_eq!(context.breadcrumbs[0].slug, request.slug);
}

#[tokio::test]
async fn test_create_category_requires_auth() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = CreateCategoryRequest::unique();

    let response = server.post("/api/v1/forum/categories", &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_create_category_duplicate_slug() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = mint_access_token(Uuid::new_v4()).unwrap();
    let request = CreateCategoryRequest::unique();

    // First creation
    let response = server
        .post_auth("/api/v1/forum/categories", &token, &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    // Second creation with the same slug
    let response = server
        .post_auth("/api/v1/forum/categories", &token, &request)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(error.error.code, "SLUG_TAKEN");
}

#[tokio::test]
async fn test_create_category_rejects_bad_slug() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = mint_access_token(Uuid::new_v4()).unwrap();
    let mut request = CreateCategoryRequest::unique();
    request.slug = "Not A Slug!".to_string();

    let response = server
        .post_auth("/api/v1/forum/categories", &token, &request)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST)
        .await
        .unwrap();
    assert_eq!(error.error.code, "INVALID_SLUG");
}

#[tokio::test]
async fn test_create_subcategory_unknown_parent() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = mint_access_token(Uuid::new_v4()).unwrap();
    let request = CreateSubcategoryRequest::child_of(&Uuid::new_v4().to_string());

    let response = server
        .post_auth("/api/v1/forum/subcategories", &token, &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_full_hierarchy_resolution() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = mint_access_token(Uuid::new_v4()).unwrap();

    // Category -> subcategory -> subforum
    let category_req = CreateCategoryRequest::unique();
    let response = server
        .post_auth("/api/v1/forum/categories", &token, &category_req)
        .await
        .unwrap();
    let category: CategoryResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let subcategory_req = CreateSubcategoryRequest::child_of(&category.id);
    let response = server
        .post_auth("/api/v1/forum/subcategories", &token, &subcategory_req)
        .await
        .unwrap();
    let subcategory: SubcategoryResponse =
        assert_json(response, StatusCode::CREATED).await.unwrap();

    let subforum_req = CreateSubforumRequest::child_of(&subcategory.id);
    let response = server
        .post_auth("/api/v1/forum/subforums", &token, &subforum_req)
        .await
        .unwrap();
    let subforum: SubforumResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Subforum slug resolves with the full breadcrumb chain, root first
    let response = server
        .get(&format!("/api/v1/forum/resolve/{}", subforum.slug))
        .await
        .unwrap();
    let context: ForumContextResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(context.kind.as_deref(), Some("subforum"));
    assert_eq!(context.breadcrumbs.len(), 3);
    assert_eq!(context.breadcrumbs[0].slug, category.slug);
    assert_eq!(context.breadcrumbs[1].slug, subcategory.slug);
    assert_eq!(context.breadcrumbs[2].slug, subforum.slug);

    // Subcategory slug lists its subforums
    let response = server
        .get(&format!("/api/v1/forum/resolve/{}", subcategory.slug))
        .await
        .unwrap();
    let context: ForumContextResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(context.kind.as_deref(), Some("subcategory"));
    assert!(context.subforums.iter().any(|s| s.id == subforum.id));
}

// ============================================================================
// Presence Tests
// ============================================================================

#[tokio::test]
async fn test_anonymous_join_heartbeat_leave() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let topic_id = Uuid::new_v4();
    let device_key = format!("device-{}", unique_suffix());

    // Join
    let response = server
        .post_device(&format!("/api/v1/viewing/topic/{topic_id}"), &device_key)
        .await
        .unwrap();
    let session: PresenceSessionResponse =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(session.target_type, "topic");
    assert_eq!(session.target_id, topic_id.to_string());
    assert!(session.ttl_seconds >= session.heartbeat_seconds);

    // Heartbeat
    let response = server
        .put_device(
            &format!("/api/v1/viewing/sessions/{}", session.record_id),
            &device_key,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // Leave
    let response = server
        .delete_device(
            &format!("/api/v1/viewing/sessions/{}", session.record_id),
            &device_key,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_anonymous_rejoin_is_idempotent() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let topic_id = Uuid::new_v4();
    let device_key = format!("device-{}", unique_suffix());
    let path = format!("/api/v1/viewing/topic/{topic_id}");

    let response = server.post_device(&path, &device_key).await.unwrap();
    let first: PresenceSessionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Same device rejoining the same target keeps the same record
    let response = server.post_device(&path, &device_key).await.unwrap();
    let second: PresenceSessionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(first.record_id, second.record_id);

    // And counts once in the viewer list
    let response = server.get(&path).await.unwrap();
    let viewers: ViewerListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(viewers.anonymous_count, 1);
    assert_eq!(viewers.total, 1);
}

#[tokio::test]
async fn test_viewers_list_empty_target() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get(&format!("/api/v1/viewing/subforum/{}", Uuid::new_v4()))
        .await
        .unwrap();
    let viewers: ViewerListResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(viewers.target_type, "subforum");
    assert!(viewers.authenticated.is_empty());
    assert_eq!(viewers.total, 0);
}

#[tokio::test]
async fn test_leave_unknown_session_is_noop() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let device_key = format!("device-{}", unique_suffix());

    let response = server
        .delete_device(
            &format!("/api/v1/viewing/sessions/{}", Uuid::new_v4()),
            &device_key,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_join_rejects_unknown_target_type() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let device_key = format!("device-{}", unique_suffix());

    let response = server
        .post_device(
            &format!("/api/v1/viewing/thread/{}", Uuid::new_v4()),
            &device_key,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Read-state Tests
// ============================================================================

#[tokio::test]
async fn test_mark_read_requires_auth() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = MarkReadRequest { post_number: 3 };

    let response = server
        .post(&format!("/api/v1/topics/{}/read", Uuid::new_v4()), &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_mark_read_unknown_topic() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = mint_access_token(Uuid::new_v4()).unwrap();
    let request = MarkReadRequest { post_number: 3 };

    let response = server
        .post_auth(
            &format!("/api/v1/topics/{}/read", Uuid::new_v4()),
            &token,
            &request,
        )
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.error.code, "UNKNOWN_TOPIC");
}

#[tokio::test]
async fn test_mark_read_rejects_non_positive_post_number() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = mint_access_token(Uuid::new_v4()).unwrap();
    let request = MarkReadRequest { post_number: 0 };

    let response = server
        .post_auth(
            &format!("/api/v1/topics/{}/read", Uuid::new_v4()),
            &token,
            &request,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_topic_unread_without_marker() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = mint_access_token(Uuid::new_v4()).unwrap();

    // An unknown topic has no posts, so nothing is unread
    let response = server
        .get_auth(&format!("/api/v1/topics/{}/unread", Uuid::new_v4()), &token)
        .await
        .unwrap();
    let flag: UnreadResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!flag.unread);
}

#[tokio::test]
async fn test_topic_unread_batch_answers_every_id() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = mint_access_token(Uuid::new_v4()).unwrap();
    let ids: Vec<String> = (0..3).map(|_| Uuid::new_v4().to_string()).collect();
    let request = TopicUnreadBatchRequest {
        topic_ids: ids.clone(),
    };

    let response = server
        .post_auth("/api/v1/topics/unread-batch", &token, &request)
        .await
        .unwrap();
    let batch: UnreadBatchResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(batch.unread.len(), ids.len());
    for id in &ids {
        assert_eq!(batch.unread.get(id), Some(&false));
    }
}

#[tokio::test]
async fn test_unread_batch_rejects_empty_list() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = mint_access_token(Uuid::new_v4()).unwrap();
    let request = TopicUnreadBatchRequest { topic_ids: vec![] };

    let response = server
        .post_auth("/api/v1/topics/unread-batch", &token, &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_subcategory_unread_requires_auth() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get(&format!(
            "/api/v1/subcategories/{}/unread",
            Uuid::new_v4()
        ))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Statistics Tests
// ============================================================================

#[tokio::test]
async fn test_forum_stats() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/stats").await.unwrap();
    let stats: ForumStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(stats.total_topics >= 0);
    assert!(stats.total_posts >= 0);
    assert!(stats.total_users >= 0);
}

#[tokio::test]
async fn test_viewers_record_tracks_current_count() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let device_key = format!("device-{}", unique_suffix());

    // One live viewer guarantees the record is at least 1
    let response = server
        .post_device(
            &format!("/api/v1/viewing/topic/{}", Uuid::new_v4()),
            &device_key,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.get("/api/v1/stats/viewers-record").await.unwrap();
    let record: ViewersRecordResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(record.current_viewers >= 1);
    assert!(record.count >= 1);
    assert!(record.recorded_at.is_some());
}
