//! Integration tests for license apply / return / renew over HTTP.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use sam_entity::license::LicenseStatus;

#[tokio::test]
async fn test_apply_rejects_level_below_limit() {
    let app = helpers::TestApp::new();
    app.license(5, Some(3)).await;
    let junior = app.user("E002", 2).await;

    let response = app.apply(&junior.token, 5, 30).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
    assert_eq!(app.license_status(5).await, LicenseStatus::Available);
}

#[tokio::test]
async fn test_apply_at_limit_creates_record() {
    let app = helpers::TestApp::new();
    app.license(5, Some(3)).await;
    let user = app.user("E003", 3).await;

    let response = app.apply(&user.token, 5, 30).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["LicenseID"], 5);
    assert_eq!(response.body["UserID"], user.id().get());
    assert_eq!(response.body["Duration_Days"], 30);
    assert!(response.body["Actually_Return_Time"].is_null());
    assert_eq!(response.body["is_expired"], false);
    assert_eq!(
        response.time("Return_Time") - response.time("Checkout_time"),
        Duration::days(30)
    );
    assert_eq!(app.license_status(5).await, LicenseStatus::InUse);
}

#[tokio::test]
async fn test_apply_conflicts_while_in_use() {
    let app = helpers::TestApp::new();
    app.license(5, Some(3)).await;
    let holder = app.user("E003", 3).await;
    let other = app.user("E004", 4).await;

    assert_eq!(app.apply(&holder.token, 5, 30).await.status, StatusCode::CREATED);

    let second = app.apply(&other.token, 5, 30).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.error_code(), "CONFLICT");

    let again = app.apply(&holder.token, 5, 30).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_apply_unknown_license_is_not_found() {
    let app = helpers::TestApp::new();
    let user = app.user("E001", 5).await;

    let response = app.apply(&user.token, 999, 30).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_apply_validates_duration() {
    let app = helpers::TestApp::new();
    app.license(5, None).await;
    let user = app.user("E001", 1).await;

    let zero = app.apply(&user.token, 5, 0).await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
    assert_eq!(zero.error_code(), "VALIDATION_ERROR");

    let too_long = app.apply(&user.token, 5, 100_000).await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
    assert_eq!(too_long.error_code(), "VALIDATION_ERROR");

    assert_eq!(app.license_status(5).await, LicenseStatus::Available);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = helpers::TestApp::new();
    let user = app.user("E001", 1).await;

    let response = app
        .request(
            "POST",
            "/licenses_usage_records/apply",
            Some(json!({ "LicenseID": "five" })),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "BAD_REQUEST");
}

#[tokio::test]
async fn test_return_releases_license_once() {
    let app = helpers::TestApp::new();
    app.license(5, None).await;
    let user = app.user("E001", 1).await;
    let applied = app.apply(&user.token, 5, 30).await;

    let returned = app.return_license(&user.token, 5).await;

    assert_eq!(returned.status, StatusCode::OK);
    assert_eq!(returned.body["RecordID"], applied.body["RecordID"]);
    assert!(returned.body["Actually_Return_Time"].is_string());
    assert_eq!(returned.body["is_expired"], true);
    assert_eq!(app.license_status(5).await, LicenseStatus::Available);

    let second = app.return_license(&user.token, 5).await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert_eq!(app.license_status(5).await, LicenseStatus::Available);
}

#[tokio::test]
async fn test_return_by_other_user_is_forbidden() {
    let app = helpers::TestApp::new();
    app.license(5, None).await;
    let holder = app.user("E001", 1).await;
    let other = app.user("E002", 5).await;
    app.apply(&holder.token, 5, 30).await;

    let response = app.return_license(&other.token, 5).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.license_status(5).await, LicenseStatus::InUse);
}

#[tokio::test]
async fn test_license_can_be_reapplied_after_return() {
    let app = helpers::TestApp::new();
    app.license(5, None).await;
    let first = app.user("E001", 1).await;
    let second = app.user("E002", 1).await;

    app.apply(&first.token, 5, 30).await;
    app.return_license(&first.token, 5).await;
    let response = app.apply(&second.token, 5, 7).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["UserID"], second.id().get());
}

#[tokio::test]
async fn test_renew_extends_due_date_only() {
    let app = helpers::TestApp::new();
    app.license(5, None).await;
    let user = app.user("E001", 1).await;
    let applied = app.apply(&user.token, 5, 30).await;

    let renewed = app
        .request(
            "POST",
            "/licenses_usage_records/renew",
            Some(json!({ "RecordID": applied.body["RecordID"], "Renew_Days": 10 })),
            Some(&user.token),
        )
        .await;

    assert_eq!(renewed.status, StatusCode::OK);
    assert_eq!(
        renewed.time("Return_Time") - applied.time("Return_Time"),
        Duration::days(10)
    );
    assert_eq!(renewed.body["Checkout_time"], applied.body["Checkout_time"]);
    assert_eq!(app.license_status(5).await, LicenseStatus::InUse);
}

#[tokio::test]
async fn test_renew_by_license_id() {
    let app = helpers::TestApp::new();
    app.license(5, None).await;
    let user = app.user("E001", 1).await;
    let applied = app.apply(&user.token, 5, 30).await;

    let renewed = app
        .request(
            "POST",
            "/licenses_usage_records/renew",
            Some(json!({ "LicenseID": 5, "Renew_Days": 10 })),
            Some(&user.token),
        )
        .await;

    assert_eq!(renewed.status, StatusCode::OK);
    assert_eq!(renewed.body["RecordID"], applied.body["RecordID"]);
}

#[tokio::test]
async fn test_renew_by_other_user_is_forbidden() {
    let app = helpers::TestApp::new();
    app.license(5, None).await;
    let holder = app.user("E001", 1).await;
    let other = app.user("E002", 1).await;
    let applied = app.apply(&holder.token, 5, 30).await;

    let response = app
        .request(
            "POST",
            "/licenses_usage_records/renew",
            Some(json!({ "RecordID": applied.body["RecordID"], "Renew_Days": 10 })),
            Some(&other.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_renew_needs_exactly_one_target() {
    let app = helpers::TestApp::new();
    let user = app.user("E001", 1).await;

    let response = app
        .request(
            "POST",
            "/licenses_usage_records/renew",
            Some(json!({ "Renew_Days": 10 })),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_renew_returned_record_is_rejected() {
    let app = helpers::TestApp::new();
    app.license(5, None).await;
    let user = app.user("E001", 1).await;
    let applied = app.apply(&user.token, 5, 30).await;
    app.return_license(&user.token, 5).await;

    let response = app
        .request(
            "POST",
            "/licenses_usage_records/renew",
            Some(json!({ "RecordID": applied.body["RecordID"], "Renew_Days": 10 })),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "BAD_REQUEST");
}

#[tokio::test]
async fn test_my_records_and_dashboard() {
    let app = helpers::TestApp::new();
    app.license(1, None).await;
    app.license(2, None).await;
    app.license(3, Some(5)).await;
    let user = app.user("E001", 2).await;

    app.apply(&user.token, 1, 3).await;
    app.apply(&user.token, 2, 30).await;
    app.return_license(&user.token, 2).await;

    let all = app
        .request("GET", "/licenses_usage_records/me", None, Some(&user.token))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["total_items"], 2);

    let active = app
        .request(
            "GET",
            "/licenses_usage_records/me?active=true",
            None,
            Some(&user.token),
        )
        .await;
    assert_eq!(active.body["total_items"], 1);
    assert_eq!(active.body["items"][0]["LicenseID"], 1);

    let dashboard = app
        .request("GET", "/dashboard", None, Some(&user.token))
        .await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(dashboard.body["used_licenses"], 1);
    assert_eq!(dashboard.body["approching_expired_licenses"], 1);
    // License 2 is free again; license 3 needs level 5.
    assert_eq!(dashboard.body["apllicable_licenses"], 1);
}

#[tokio::test]
async fn test_my_records_page_past_the_end_is_empty() {
    let app = helpers::TestApp::new();
    app.license(1, None).await;
    let user = app.user("E001", 2).await;
    app.apply(&user.token, 1, 3).await;

    let response = app
        .request(
            "GET",
            "/licenses_usage_records/me?page=18446744073709551615&per_page=100",
            None,
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"], json!([]));
    assert_eq!(response.body["total_items"], 1);
}

#[tokio::test]
async fn test_license_history_is_admin_only() {
    let app = helpers::TestApp::new();
    app.license(5, None).await;
    let user = app.user("E001", 1).await;
    let admin = app.admin("A001").await;
    app.apply(&user.token, 5, 30).await;

    let forbidden = app
        .request(
            "GET",
            "/licenses_usage_records/license/5",
            None,
            Some(&user.token),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let history = app
        .request(
            "GET",
            "/licenses_usage_records/license/5?per_page=10",
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.body["total_items"], 1);
    assert_eq!(history.body["per_page"], 10);

    let missing = app
        .request(
            "GET",
            "/licenses_usage_records/license/404",
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
