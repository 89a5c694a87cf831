use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use membersearch::{
    config::PagingConfig,
    routes::{self, AppState},
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

mod common;
use common::{seed_members, setup_test_db};

fn setup_test_app(db: &DatabaseConnection, paging: PagingConfig) -> Router {
    let (router, _openapi) = routes::router(AppState::new(db.clone(), paging)).split_for_parts();
    router
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, headers, json)
}

#[tokio::test]
async fn test_v1_filters_by_query_parameters() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_members(&db).await;
    let app = setup_test_app(&db, PagingConfig::default());

    let (status, _, json) = get(app, "/v1/members?team_name=teamB&age_goe=35&age_loe=40").await;

    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "member4");
    assert_eq!(rows[0]["team_name"], "teamB");
}

#[tokio::test]
async fn test_v1_empty_values_are_ignored() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_members(&db).await;
    let app = setup_test_app(&db, PagingConfig::default());

    let (status, _, json) = get(app, "/v1/members?username=&team_name=&age_goe=&age_loe=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_v2_returns_page_and_content_range() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_members(&db).await;
    let app = setup_test_app(&db, PagingConfig::default());

    let (status, headers, json) = get(app, "/v2/members?page=0&size=3&sort=username,desc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("Content-Range").unwrap(), "members 0-2/4");
    assert_eq!(json["total_count"], 4);
    assert_eq!(json["has_next"], true);
    assert_eq!(json["offset"], 0);
    assert_eq!(json["limit"], 3);
    let names: Vec<_> = json["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["member4", "member3", "member2"]);
}

#[tokio::test]
async fn test_v2_clamps_page_size() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_members(&db).await;
    let paging = PagingConfig {
        default_page_size: 2,
        max_page_size: 3,
    };

    let (_, _, json) = get(setup_test_app(&db, paging), "/v2/members").await;
    assert_eq!(json["limit"], 2);

    let (_, _, json) = get(setup_test_app(&db, paging), "/v2/members?size=100").await;
    assert_eq!(json["limit"], 3);
    assert_eq!(json["content"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_v2_rejects_invalid_paging() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_members(&db).await;

    let (status, _, json) = get(setup_test_app(&db, PagingConfig::default()), "/v2/members?page=-1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["details"][0]["field"], "page");

    let (status, _, _) = get(setup_test_app(&db, PagingConfig::default()), "/v2/members?size=0").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_v3_slice_has_no_total() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_members(&db).await;
    let app = setup_test_app(&db, PagingConfig::default());

    let (status, headers, json) = get(app, "/v3/members?size=3").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers.get("Content-Range").is_none());
    assert_eq!(json["total_count"], Value::Null);
    assert_eq!(json["has_next"], true);
    assert_eq!(json["content"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_member_by_id() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_members(&db).await;

    let (status, _, json) = get(setup_test_app(&db, PagingConfig::default()), "/members/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["username"], "member1");
    assert_eq!(json["created_by"], common::ACTOR);

    let (status, _, json) = get(setup_test_app(&db, PagingConfig::default()), "/members/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Member with ID '999' not found");
}

#[tokio::test]
async fn test_malformed_query_is_bad_request() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_members(&db).await;

    let (status, _, json) = get(setup_test_app(&db, PagingConfig::default()), "/v1/members?age_goe=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Failed to deserialize query string"));
}
