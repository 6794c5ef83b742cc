//! Integration tests for the site admin HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use siteadmin_backend::{config::Environment, create_app, AdminStore, AppState, Settings};

const PASSWORD: &str = "correct horse battery staple";

fn test_settings() -> Settings {
    Settings {
        env: Environment::Dev,
        server_addr: "127.0.0.1:0".to_string(),
        cors_allow_origins: vec!["http://localhost:3000".to_string()],
        admin_username: "admin".to_string(),
        admin_password: PASSWORD.to_string(),
        session_secret: "test-secret-that-is-at-least-32-bytes-long".to_string(),
        session_ttl_seconds: 3600,
        default_page_size: 10,
        reply_from: "no-reply@example.com".to_string(),
        reply_delay_ms: 0,
        seed_demo_data: true,
        max_body_bytes: 1024 * 1024,
    }
}

fn setup_test_server() -> TestServer {
    let state = AppState::new(test_settings(), AdminStore::seeded());
    TestServer::new(create_app(state)).unwrap()
}

async fn login(server: &TestServer) -> String {
    let response = server
        .post("/auth/login")
        .json(&json!({ "username": "admin", "password": PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    body["data"]["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public_and_reports_counts() {
    let server = setup_test_server();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["records"]["resource"], 18);
    assert_eq!(body["records"]["page"], 9);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let server = setup_test_server();

    let missing = server.get("/notices").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = missing.json();
    assert_eq!(body["code"], "UNAUTHORIZED");

    let garbage = server.get("/notices").authorization_bearer("not-a-token").await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);

    let wrong_password = server
        .post("/auth/login")
        .json(&json!({ "username": "admin", "password": "guess" }))
        .await;
    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let server = setup_test_server();
    let token = login(&server).await;

    let me = server.get("/auth/me").authorization_bearer(&token).await;
    assert_eq!(me.status_code(), StatusCode::OK);
    let body: Value = me.json();
    assert_eq!(body["data"]["username"], "admin");

    let logout = server.post("/auth/logout").authorization_bearer(&token).await;
    assert_eq!(logout.status_code(), StatusCode::NO_CONTENT);

    let after = server.get("/auth/me").authorization_bearer(&token).await;
    assert_eq!(after.status_code(), StatusCode::UNAUTHORIZED);

    // A fresh login still works
    let token = login(&server).await;
    let me = server.get("/auth/me").authorization_bearer(&token).await;
    assert_eq!(me.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn bulk_archive_twice_reports_unchanged_rows() {
    let server = setup_test_server();
    let token = login(&server).await;

    let inquiries: Value = server
        .get("/inquiries")
        .authorization_bearer(&token)
        .await
        .json();
    let ids: Vec<Value> = inquiries["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].clone())
        .collect();

    server
        .post("/inquiries/bulk")
        .authorization_bearer(&token)
        .json(&json!({ "action": "archive", "ids": ids }))
        .await;
    let again: Value = server
        .post("/inquiries/bulk")
        .authorization_bearer(&token)
        .json(&json!({ "action": "archive", "ids": ids }))
        .await
        .json();

    assert_eq!(again["data"]["affected"].as_array().unwrap().len(), 0);
    assert_eq!(again["data"]["unchanged"].as_array().unwrap().len(), ids.len());
}

#[tokio::test]
async fn list_paginates_with_summary() {
    let server = setup_test_server();
    let token = login(&server).await;

    let response = server
        .get("/resources")
        .add_query_param("page", 2)
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 8);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["pagination"]["summary"], "Showing 11 to 18 of 18 entries");
    assert_eq!(body["pagination"]["has_next"], false);
}

#[tokio::test]
async fn list_search_filter_and_empty_message() {
    let server = setup_test_server();
    let token = login(&server).await;

    let copper = server
        .get("/pages")
        .add_query_param("search", "copper")
        .authorization_bearer(&token)
        .await;
    let body: Value = copper.json();
    assert_eq!(body["pagination"]["total_items"], 3);

    let new_inquiries = server
        .get("/inquiries")
        .add_query_param("status", "new")
        .authorization_bearer(&token)
        .await;
    let body: Value = new_inquiries.json();
    assert_eq!(body["pagination"]["total_items"], 2);

    let nothing = server
        .get("/inquiries")
        .add_query_param("search", "zzz-no-such-text")
        .authorization_bearer(&token)
        .await;
    let body: Value = nothing.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["empty_message"], "No inquiries match the current filters");
}

#[tokio::test]
async fn unknown_list_parameters_are_rejected() {
    let server = setup_test_server();
    let token = login(&server).await;

    let bad_filter = server
        .get("/notices")
        .add_query_param("colour", "red")
        .authorization_bearer(&token)
        .await;
    assert_eq!(bad_filter.status_code(), StatusCode::BAD_REQUEST);

    let bad_order = server
        .get("/notices")
        .add_query_param("sort_by", "title")
        .add_query_param("sort_order", "sideways")
        .authorization_bearer(&token)
        .await;
    assert_eq!(bad_order.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_validates_required_fields() {
    let server = setup_test_server();
    let token = login(&server).await;

    let invalid = server
        .post("/notices")
        .authorization_bearer(&token)
        .json(&json!({
            "title": "   ",
            "description": "Annual plant open day",
            "category": "Community"
        }))
        .await;
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = invalid.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field"], "title");

    let created = server
        .post("/notices")
        .authorization_bearer(&token)
        .json(&json!({
            "title": "Plant open day",
            "description": "Annual plant open day",
            "category": "Community"
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let body: Value = created.json();
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let fetched = server
        .get(&format!("/notices/{}", id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(fetched.status_code(), StatusCode::OK);

    let deleted = server
        .delete(&format!("/notices/{}", id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let gone = server
        .get(&format!("/notices/{}", id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_archive_only_applies_to_submissions() {
    let server = setup_test_server();
    let token = login(&server).await;

    let notices: Value = server.get("/notices").authorization_bearer(&token).await.json();
    let notice_id = notices["data"][0]["id"].clone();
    let refused = server
        .post("/notices/bulk")
        .authorization_bearer(&token)
        .json(&json!({ "action": "archive", "ids": [notice_id] }))
        .await;
    assert_eq!(refused.status_code(), StatusCode::BAD_REQUEST);

    let inquiries: Value = server
        .get("/inquiries")
        .add_query_param("status", "new")
        .authorization_bearer(&token)
        .await
        .json();
    let ids: Vec<Value> = inquiries["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].clone())
        .collect();

    let archived = server
        .post("/inquiries/bulk")
        .authorization_bearer(&token)
        .json(&json!({ "action": "archive", "ids": ids }))
        .await;
    assert_eq!(archived.status_code(), StatusCode::OK);
    let body: Value = archived.json();
    assert_eq!(body["data"]["affected"].as_array().unwrap().len(), 2);

    let remaining: Value = server
        .get("/inquiries")
        .add_query_param("status", "new")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(remaining["pagination"]["total_items"], 0);
}

#[tokio::test]
async fn reply_marks_inquiry_replied_and_is_audited() {
    let server = setup_test_server();
    let token = login(&server).await;

    let inquiries: Value = server
        .get("/inquiries")
        .add_query_param("status", "new")
        .authorization_bearer(&token)
        .await
        .json();
    let id = inquiries["data"][0]["id"].as_str().unwrap().to_string();

    let blank = server
        .post(&format!("/inquiries/{}/reply", id))
        .authorization_bearer(&token)
        .json(&json!({ "message": "" }))
        .await;
    assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);

    let replied = server
        .post(&format!("/inquiries/{}/reply", id))
        .authorization_bearer(&token)
        .json(&json!({ "message": "Quote attached." }))
        .await;
    assert_eq!(replied.status_code(), StatusCode::OK);
    let body: Value = replied.json();
    assert_eq!(body["data"]["record"]["status"], "replied");

    let audit: Value = server
        .get("/audit-logs")
        .add_query_param("action", "reply")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(audit["pagination"]["total_items"], 1);
}

#[tokio::test]
async fn view_commands_drive_selection_and_bulk_actions() {
    let server = setup_test_server();
    let token = login(&server).await;

    let filtered = server
        .post("/inquiries/view")
        .authorization_bearer(&token)
        .json(&json!({ "command": "set_filter", "field": "status", "value": "new" }))
        .await;
    assert_eq!(filtered.status_code(), StatusCode::OK);
    let body: Value = filtered.json();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    let selected: Value = server
        .post("/inquiries/view")
        .authorization_bearer(&token)
        .json(&json!({ "command": "toggle_select_page" }))
        .await
        .json();
    assert_eq!(selected["data"]["page_selected"], true);
    assert_eq!(selected["data"]["selected"].as_array().unwrap().len(), 2);

    let archived: Value = server
        .post("/inquiries/view")
        .authorization_bearer(&token)
        .json(&json!({ "command": "bulk", "action": "archive" }))
        .await
        .json();
    assert_eq!(archived["data"]["bulk_result"]["affected"].as_array().unwrap().len(), 2);
    assert_eq!(archived["data"]["selected"].as_array().unwrap().len(), 0);
    assert_eq!(archived["data"]["items"].as_array().unwrap().len(), 0);

    // The view state survives between requests
    let current: Value = server
        .get("/inquiries/view")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(current["data"]["filters"]["status"], "new");
}

#[tokio::test]
async fn gallery_serves_placeholder_for_broken_images() {
    let server = setup_test_server();
    let token = login(&server).await;

    let albums: Value = server
        .get("/gallery")
        .add_query_param("search", "science fair")
        .authorization_bearer(&token)
        .await
        .json();
    let album = &albums["data"][0];
    let broken = album["images"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["url"] == "fair-2.jpg")
        .unwrap();
    assert!(broken["display_url"].as_str().unwrap().starts_with("data:image/svg+xml"));

    let id = album["id"].as_str().unwrap();
    let bad_order = server
        .put(&format!("/gallery/{}/images/order", id))
        .authorization_bearer(&token)
        .json(&json!({ "image_ids": [] }))
        .await;
    assert_eq!(bad_order.status_code(), StatusCode::BAD_REQUEST);

    let added = server
        .post(&format!("/gallery/{}/images", id))
        .authorization_bearer(&token)
        .json(&json!({ "url": "https://cdn.example.com/fair-3.jpg", "caption": "Prize giving" }))
        .await;
    assert_eq!(added.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn backup_restore_brings_back_deleted_records() {
    let server = setup_test_server();
    let token = login(&server).await;

    let backup = server
        .post("/backups")
        .authorization_bearer(&token)
        .json(&json!({ "label": "Before cleanup" }))
        .await;
    assert_eq!(backup.status_code(), StatusCode::CREATED);
    let backup: Value = backup.json();
    let backup_id = backup["data"]["id"].as_str().unwrap().to_string();

    let download = server
        .get(&format!("/backups/{}/download", backup_id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(download.status_code(), StatusCode::OK);
    let snapshot: Value = download.json();
    assert_eq!(snapshot["notices"].as_array().unwrap().len(), 6);

    let notices: Value = server.get("/notices").authorization_bearer(&token).await.json();
    let notice_id = notices["data"][0]["id"].as_str().unwrap().to_string();
    server
        .delete(&format!("/notices/{}", notice_id))
        .authorization_bearer(&token)
        .await;

    let restored = server
        .post(&format!("/backups/{}/restore", backup_id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(restored.status_code(), StatusCode::OK);

    let back = server
        .get(&format!("/notices/{}", notice_id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(back.status_code(), StatusCode::OK);

    let malformed = server
        .post("/backups")
        .authorization_bearer(&token)
        .content_type("application/json")
        .bytes("{\"label\": ".into())
        .await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

    let unlabelled = server.post("/backups").authorization_bearer(&token).await;
    assert_eq!(unlabelled.status_code(), StatusCode::CREATED);
    let unlabelled: Value = unlabelled.json();
    assert!(unlabelled["data"]["label"].as_str().unwrap().starts_with("Backup "));

    let missing = server
        .post(&format!("/backups/{}/restore", uuid::Uuid::new_v4()))
        .authorization_bearer(&token)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_summarises_activity() {
    let server = setup_test_server();
    let token = login(&server).await;

    let response = server.get("/dashboard").authorization_bearer(&token).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["data"]["counts"]["new_inquiries"], 2);
    assert_eq!(body["data"]["counts"]["upcoming_deadlines"], 2);
    assert_eq!(body["data"]["top_pages"].as_array().unwrap().len(), 5);
    // The login itself is the latest activity
    assert_eq!(body["data"]["recent_activity"][0]["action"], "login");
}

#[tokio::test]
async fn closing_a_tender_twice_conflicts() {
    let server = setup_test_server();
    let token = login(&server).await;

    let tenders: Value = server
        .get("/tenders")
        .add_query_param("status", "published")
        .authorization_bearer(&token)
        .await
        .json();
    let id = tenders["data"][0]["id"].as_str().unwrap().to_string();

    let closed = server
        .post(&format!("/tenders/{}/close", id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(closed.status_code(), StatusCode::OK);
    let body: Value = closed.json();
    assert_eq!(body["data"]["status"], "closed");

    let again = server
        .post(&format!("/tenders/{}/close", id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(again.status_code(), StatusCode::CONFLICT);
}
