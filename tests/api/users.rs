use crate::helpers::{TestRun, accept_sign_in, respond, spawn_run};
use api_smoke::suites::Suite;
use claims::{assert_ok, assert_some};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_user_service(run: &TestRun, expected_lifecycles: u64) {
    respond(
        &run.services,
        "GET",
        "/api/v1/user/info",
        200,
        json!({"user_info": {
            "phone": "13452552490",
            "name": "旧名字",
            "status": 1,
            "role": "admin"
        }}),
    )
    .await;
    for (verb, endpoint) in [
        ("PUT", "/api/v1/user/info"),
        ("POST", "/api/v1/auth/password"),
        ("POST", "/api/v1/auth/logout"),
        ("POST", "/api/v1/user/delete"),
    ] {
        Mock::given(method(verb))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
            .expect(expected_lifecycles)
            .mount(&run.services)
            .await;
    }
}

async fn bodies_sent_to(run: &TestRun, verb: &str, endpoint: &str) -> Vec<Value> {
    run.services
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == endpoint)
        .map(|r| r.body_json::<Value>().expect("Body is not JSON."))
        .collect()
}

#[tokio::test]
async fn every_account_goes_through_the_full_lifecycle() {
    // Arrange
    let run = spawn_run().await;
    accept_sign_in(&run.services, "token").await;
    mount_user_service(&run, 3).await;
    // Two status changes per back-office account
    Mock::given(method("PUT"))
        .and(path("/api/v1/user/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(4)
        .mount(&run.services)
        .await;

    // Act
    let outcome = run.run(Suite::Users).await;

    // Assert
    assert_ok!(outcome);
    assert!(
        run.trace()
            .contains("✅ Back-office user tests finished, 2 account(s) exercised")
    );
}

#[tokio::test]
async fn consumer_profile_updates_drop_back_office_fields() {
    let run = spawn_run().await;
    accept_sign_in(&run.services, "token").await;
    mount_user_service(&run, 3).await;
    respond(&run.services, "PUT", "/api/v1/user/status", 200, json!({"code": 0})).await;

    assert_ok!(run.run(Suite::Users).await);

    let updates = bodies_sent_to(&run, "PUT", "/api/v1/user/info").await;
    assert_eq!(updates.len(), 3);
    let consumer = assert_some!(updates[0]["user_info"].as_object());
    assert!(!consumer.contains_key("status"));
    assert!(!consumer.contains_key("role"));
    assert_eq!(consumer["occupation"], "软件工程师");

    let operator = assert_some!(updates[2]["user_info"].as_object());
    assert_eq!(operator["role"], "operator");
    assert_eq!(operator["name"], "管理员-2491");
    assert_eq!(operator["status"], 1);

    let statuses = bodies_sent_to(&run, "PUT", "/api/v1/user/status").await;
    let values: Vec<&Value> = statuses.iter().map(|b| &b["status"]).collect();
    assert_eq!(values, vec![&json!(2), &json!(1), &json!(2), &json!(1)]);
}

#[tokio::test]
async fn rejected_new_password_falls_back_to_the_original_one() {
    let run = spawn_run().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_partial_json(json!({"password": "new_password_123"})))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "密码错误"})))
        .expect(1)
        .mount(&run.services)
        .await;
    accept_sign_in(&run.services, "token").await;
    mount_user_service(&run, 3).await;
    respond(&run.services, "PUT", "/api/v1/user/status", 200, json!({"code": 0})).await;

    assert_ok!(run.run(Suite::Users).await);

    assert!(
        run.trace()
            .contains("Login with the new password failed, deleting with the original one")
    );
    let passwords: Vec<Value> = bodies_sent_to(&run, "POST", "/api/v1/auth/password")
        .await
        .into_iter()
        .map(|b| b["new_password"].clone())
        .collect();
    assert_eq!(
        passwords,
        vec![
            json!("new_password_123"),
            json!("new_13452552490"),
            json!("new_13452552491")
        ]
    );
}

#[tokio::test]
async fn accounts_that_cannot_sign_in_are_skipped() {
    let run = spawn_run().await;
    respond(
        &run.services,
        "POST",
        "/api/v1/auth/register",
        500,
        json!({"message": "database unavailable"}),
    )
    .await;
    Mock::given(path("/api/v1/user/delete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&run.services)
        .await;

    assert_ok!(run.run(Suite::Users).await);

    assert!(
        run.trace()
            .contains("✅ Back-office user tests finished, 0 account(s) exercised")
    );
}
