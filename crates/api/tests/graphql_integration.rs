//! GraphQL integration tests.
//!
//! These tests drive the router end to end against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use std::collections::BTreeMap;

use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use snapfeed_api::{AppState, Services, router};
use snapfeed_common::{LocalStorage, TokenIssuer, config::AuthConfig};
use snapfeed_db::{entities::post, test_utils};
use tower::ServiceExt;

fn tokens() -> TokenIssuer {
    TokenIssuer::new(&AuthConfig {
        jwt_secret: "integration-secret".to_string(),
        token_ttl_secs: 300,
        refresh_ttl_secs: 3600,
    })
}

fn app(db: DatabaseConnection) -> Router {
    let storage = Arc::new(LocalStorage::new(
        std::env::temp_dir(),
        "/media".to_string(),
    ));
    let services = Services::new(Arc::new(db), storage);
    router().with_state(AppState::new(services, tokens()))
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

async fn graphql(app: Router, query: &str, token: Option<&str>) -> Value {
    let mut request = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app
        .oneshot(
            request
                .body(Body::from(json!({ "query": query }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn error_code(body: &Value) -> Option<&str> {
    body["errors"][0]["extensions"]["code"].as_str()
}

#[tokio::test]
async fn test_health() {
    let response = app(empty_db())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_graphiql_served() {
    let response = app(empty_db())
        .oneshot(Request::get("/graphql").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_guarded_query_requires_authentication() {
    let body = graphql(app(empty_db()), "{ posts { id } }", None).await;

    assert_eq!(error_code(&body), Some("AUTHENTICATION_REQUIRED"));
}

#[tokio::test]
async fn test_invalid_token_is_anonymous() {
    let body = graphql(app(empty_db()), "{ me { id } }", Some("not-a-token")).await;

    assert_eq!(error_code(&body), Some("AUTHENTICATION_REQUIRED"));
}

#[tokio::test]
async fn test_register_is_not_guarded() {
    let body = graphql(
        app(empty_db()),
        r#"mutation { registerUser(username: "alice", email: "alice@example.com", password: "short") { user { id } } }"#,
        None,
    )
    .await;

    assert_eq!(error_code(&body), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_list_posts_with_token() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[
            test_utils::post(2, 1, "second"),
            test_utils::post(1, 1, "first"),
        ]])
        .into_connection();
    let token = tokens().issue(1, "alice").unwrap();

    let body = graphql(app(db), "{ posts { id caption } }", Some(&token)).await;

    assert!(body["errors"].is_null(), "unexpected errors: {body}");
    assert_eq!(body["data"]["posts"][0]["caption"], "second");
    assert_eq!(body["data"]["posts"][1]["id"], "1");
}

#[tokio::test]
async fn test_follow_yourself_is_invalid_actor() {
    let token = tokens().issue(1, "alice").unwrap();

    let body = graphql(
        app(empty_db()),
        r#"mutation { toggleFollow(userId: "1") { applied } }"#,
        Some(&token),
    )
    .await;

    assert_eq!(error_code(&body), Some("INVALID_ACTOR"));
}

#[tokio::test]
async fn test_comment_on_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();
    let token = tokens().issue(1, "alice").unwrap();

    let body = graphql(
        app(db),
        r#"mutation { createComment(text: "nice", targetId: "42") { id } }"#,
        Some(&token),
    )
    .await;

    assert_eq!(error_code(&body), Some("TARGET_NOT_FOUND"));
}

#[tokio::test]
async fn test_reply_on_story_without_target_kind() {
    let mut reply = test_utils::comment(8, 1, "story", 3);
    reply.parent_id = Some(7);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_utils::comment(7, 2, "story", 3)]])
        .append_query_results([[test_utils::story(3, 2)]])
        .append_query_results([[reply]])
        .into_connection();
    let token = tokens().issue(1, "alice").unwrap();

    let body = graphql(
        app(db),
        r#"mutation { createComment(text: "same", targetId: "3", parentId: "7") { id targetKind } }"#,
        Some(&token),
    )
    .await;

    assert!(body["errors"].is_null(), "unexpected errors: {body}");
    assert_eq!(body["data"]["createComment"]["targetKind"], "story");
}

#[tokio::test]
async fn test_liked_by_follows_like_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_utils::post(1, 9, "sunset")]])
        .append_query_results([[test_utils::like(12, 3, 1), test_utils::like(11, 2, 1)]])
        .append_query_results([[test_utils::user(2, "bob"), test_utils::user(3, "carol")]])
        .into_connection();
    let token = tokens().issue(9, "ivy").unwrap();

    let body = graphql(
        app(db),
        r#"{ post(id: "1") { likedBy { username } } }"#,
        Some(&token),
    )
    .await;

    assert!(body["errors"].is_null(), "unexpected errors: {body}");
    let liked_by = &body["data"]["post"]["likedBy"];
    assert_eq!(liked_by[0]["username"], "carol");
    assert_eq!(liked_by[1]["username"], "bob");
}

#[tokio::test]
async fn test_unseen_message_count() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[BTreeMap::from([(
            "num_items",
            sea_orm::Value::BigInt(Some(3)),
        )])]])
        .into_connection();
    let token = tokens().issue(1, "alice").unwrap();

    let body = graphql(app(db), "{ unseenMessageCount }", Some(&token)).await;

    assert!(body["errors"].is_null(), "unexpected errors: {body}");
    assert_eq!(body["data"]["unseenMessageCount"], 3);
}

#[tokio::test]
async fn test_my_reports_requires_authentication() {
    let body = graphql(app(empty_db()), "{ myReports { id } }", None).await;

    assert_eq!(error_code(&body), Some("AUTHENTICATION_REQUIRED"));
}

#[tokio::test]
async fn test_my_reports_lists_own_reports() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_utils::report(4, 1, "post", 2)]])
        .into_connection();
    let token = tokens().issue(1, "alice").unwrap();

    let body = graphql(app(db), "{ myReports { id reason } }", Some(&token)).await;

    assert!(body["errors"].is_null(), "unexpected errors: {body}");
    assert_eq!(body["data"]["myReports"][0]["id"], "4");
}

#[tokio::test]
async fn test_set_avatar_from_path() {
    let existing = test_utils::profile(1, 1);
    let mut updated = existing.clone();
    updated.profile_pic = "profile_pics/me.png".to_string();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[existing], [updated]])
        .into_connection();
    let token = tokens().issue(1, "alice").unwrap();

    let body = graphql(
        app(db),
        r#"mutation { setAvatar(profilePic: "profile_pics/me.png") { profilePic } }"#,
        Some(&token),
    )
    .await;

    assert!(body["errors"].is_null(), "unexpected errors: {body}");
    assert_eq!(body["data"]["setAvatar"]["profilePic"], "profile_pics/me.png");
}

#[tokio::test]
async fn test_set_avatar_without_image() {
    let token = tokens().issue(1, "alice").unwrap();

    let body = graphql(app(empty_db()), "mutation { setAvatar { profilePic } }", Some(&token)).await;

    assert_eq!(error_code(&body), Some("BAD_REQUEST"));
}

#[tokio::test]
async fn test_annotation_target_after_target_deleted() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_utils::comment(7, 2, "post", 1)]])
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();
    let token = tokens().issue(2, "bob").unwrap();

    let body = graphql(
        app(db),
        r#"{ annotationTarget(kind: COMMENT, id: "7") { id } }"#,
        Some(&token),
    )
    .await;

    assert!(body["errors"].is_null(), "unexpected errors: {body}");
    assert!(body["data"]["annotationTarget"].is_null());
}

#[tokio::test]
async fn test_verify_token_round_trip() {
    let token = tokens().issue(5, "erin").unwrap();

    let body = graphql(
        app(empty_db()),
        &format!(r#"mutation {{ verifyToken(token: "{token}") {{ payload }} }}"#),
        None,
    )
    .await;

    assert_eq!(body["data"]["verifyToken"]["payload"]["sub"], "5");
}
