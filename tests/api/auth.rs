use crate::helpers::{ADMIN_PHONE, spawn_run};
use api_smoke::domain::{Service, TestAccount};
use api_smoke::suites::{login, register_or_login};
use claims::{assert_none, assert_some};
use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn existing_users_fall_back_to_login() {
    // Arrange
    let run = spawn_run().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "message": "用户已存在"
        })))
        .expect(1)
        .mount(&run.services)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_partial_json(json!({"phone": ADMIN_PHONE, "password": ADMIN_PHONE})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "existing-token"})))
        .expect(1)
        .mount(&run.services)
        .await;
    let harness = run.harness();
    let mut client = harness.client(Service::AppUser).expect("Failed to build client.");
    let account = TestAccount::new(ADMIN_PHONE, ADMIN_PHONE, None);

    // Act
    let signed_in = register_or_login(&mut client, &account).await;

    // Assert
    assert!(signed_in);
    let token = assert_some!(client.token());
    assert_eq!(token.expose_secret(), "existing-token");
    let trace = run.trace();
    assert!(trace.contains("ℹ️ User already exists, logging in..."));
    assert!(trace.contains("🔄 [AppUser] POST /api/v1/auth/login"));
}

#[tokio::test]
async fn english_already_exists_messages_also_fall_back() {
    let run = spawn_run().await;
    Mock::given(path("/api/v1/auth/register"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"error": "User Already Exists"})),
        )
        .mount(&run.services)
        .await;
    Mock::given(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t"})))
        .expect(1)
        .mount(&run.services)
        .await;
    let harness = run.harness();
    let mut client = harness.client(Service::OaUser).expect("Failed to build client.");

    let signed_in = register_or_login(
        &mut client,
        &TestAccount::new(ADMIN_PHONE, ADMIN_PHONE, Some("admin")),
    )
    .await;

    assert!(signed_in);
}

#[tokio::test]
async fn login_against_a_non_json_error_page_fails_cleanly() {
    let run = spawn_run().await;
    Mock::given(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(1)
        .mount(&run.services)
        .await;
    let harness = run.harness();
    let mut client = harness.client(Service::OaUser).expect("Failed to build client.");

    let signed_in = login(&mut client, &TestAccount::new(ADMIN_PHONE, ADMIN_PHONE, None)).await;

    assert!(!signed_in);
    assert_none!(client.token());
    assert!(run.trace().contains("📥 Response: Bad Gateway"));
}
