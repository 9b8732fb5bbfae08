use crate::helpers::{TestRun, accept_sign_in, respond, spawn_run};
use api_smoke::suites::{FullRunOptions, Suite, SuiteError};
use claims::{assert_matches, assert_ok};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn mount_sign_in(run: &TestRun) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .and(body_partial_json(json!({"role": "admin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "admin-token"})))
        .mount(&run.services)
        .await;
    accept_sign_in(&run.services, "user-token").await;
    respond(
        &run.services,
        "GET",
        "/api/v1/user/info",
        200,
        json!({"user_info": {"phone": "13452552490", "name": "测试用户", "status": 1}}),
    )
    .await;
}

async fn mount_product_listings(run: &TestRun, lease: Value, loan: Value) {
    respond(&run.services, "GET", "/api/v1/leaseproduct/products", 200, json!({ "list": lease })).await;
    respond(&run.services, "GET", "/api/v1/loanproduct/products", 200, json!({ "list": loan })).await;
}

async fn mount_product_creation(run: &TestRun, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/leaseproduct/products"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 31}})))
        .expect(expected_calls)
        .mount(&run.services)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/loanproduct/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 21}})))
        .expect(expected_calls)
        .mount(&run.services)
        .await;
}

async fn mount_application_creation(run: &TestRun) {
    respond(&run.services, "POST", "/api/v1/lease/applications", 200, json!({"application_id": "LA1"})).await;
    respond(&run.services, "POST", "/api/v1/loan/applications", 200, json!({"application_id": "LN1"})).await;
}

fn active_products() -> (Value, Value) {
    (
        json!([
            {"id": 10, "product_code": "LPOFF001", "status": 2},
            {"id": 11, "product_code": "LPEXIST1", "status": 1}
        ]),
        json!([{"id": 12, "product_code": "LNEXIST1", "status": 1}]),
    )
}

#[tokio::test]
async fn setup_reuses_active_products() {
    // Arrange
    let run = spawn_run().await;
    mount_sign_in(&run).await;
    let (lease, loan) = active_products();
    mount_product_listings(&run, lease, loan).await;
    mount_product_creation(&run, 0).await;
    mount_application_creation(&run).await;

    // Act
    let outcome = run.run(Suite::All(FullRunOptions::default())).await;

    // Assert
    assert_ok!(outcome);
    let trace = run.trace();
    assert!(trace.contains("Reusing existing lease product, ID: 11, code: LPEXIST1"));
    assert!(trace.contains("Reusing existing loan product, ID: 12, code: LNEXIST1"));
    assert!(trace.contains("- Lease product: ID=11, code=LPEXIST1"));
    assert!(trace.contains("- Approval flow applications: lease=LA1, loan=LN1"));
    assert!(trace.contains("🎉 All tests finished!"));
}

#[tokio::test]
async fn setup_creates_products_when_none_is_active() {
    let run = spawn_run().await;
    mount_sign_in(&run).await;
    mount_product_listings(
        &run,
        json!([{"id": 10, "product_code": "LPOFF001", "status": 2}]),
        json!([]),
    )
    .await;
    mount_product_creation(&run, 1).await;
    mount_application_creation(&run).await;

    let outcome = run.run(Suite::All(FullRunOptions::default())).await;

    assert_ok!(outcome);
    let trace = run.trace();
    assert!(trace.contains("- Lease product: ID=31, code=LP"));
    assert!(trace.contains("- Loan product: ID=21, code=LN"));
}

#[tokio::test]
async fn business_flows_use_the_matching_tokens() {
    let run = spawn_run().await;
    mount_sign_in(&run).await;
    let (lease, loan) = active_products();
    mount_product_listings(&run, lease, loan).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/lease/applications"))
        .and(header("Authorization", "Bearer user-token"))
        .and(body_partial_json(json!({"product_id": 11, "product_code": "LPEXIST1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"application_id": "LA1"})))
        .expect(2)
        .mount(&run.services)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/lease/applications/LA1/approve"))
        .and(header("Authorization", "Bearer admin-token"))
        .and(body_partial_json(json!({"action": "approve", "approved_duration": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&run.services)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/lease/applications/LA1/approvals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": []})))
        .expect(1)
        .mount(&run.services)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/admin/loanproduct/products/12/status"))
        .and(header("Authorization", "Bearer admin-token"))
        .and(body_partial_json(json!({"status": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&run.services)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/loan/applications/LN1/approvals"))
        .and(query_param("application_id", "LN1"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": []})))
        .expect(1)
        .mount(&run.services)
        .await;
    mount_application_creation(&run).await;

    let outcome = run.run(Suite::All(FullRunOptions::default())).await;

    assert_ok!(outcome);
}

#[tokio::test]
async fn missing_application_id_stops_only_that_flow() {
    // Arrange
    let run = spawn_run().await;
    mount_sign_in(&run).await;
    let (lease, loan) = active_products();
    mount_product_listings(&run, lease, loan).await;
    respond(
        &run.services,
        "POST",
        "/api/v1/lease/applications",
        400,
        json!({"code": 400, "message": "租赁时间冲突"}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/v1/lease/applications/.+/cancel$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&run.services)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/loan/applications/LN1/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&run.services)
        .await;
    mount_application_creation(&run).await;

    // Act
    let outcome = run.run(Suite::All(FullRunOptions::default())).await;

    // Assert
    match outcome {
        Err(SuiteError::PhasesFailed(phases)) => assert_eq!(phases, vec!["lease business"]),
        other => panic!("Expected the lease phase to fail, got {:?}", other),
    }
    let trace = run.trace();
    assert!(trace.contains("❌ Lease application creation failed"));
    assert!(trace.contains("- Cancel flow applications: lease=None, loan=LN1"));
}

#[tokio::test]
async fn failed_setup_aborts_before_touching_products() {
    let run = spawn_run().await;
    respond(
        &run.services,
        "POST",
        "/api/v1/auth/register",
        500,
        json!({"message": "internal error"}),
    )
    .await;
    Mock::given(path("/api/v1/leaseproduct/products"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&run.services)
        .await;

    let outcome = run.run(Suite::All(FullRunOptions::default())).await;

    assert_matches!(outcome, Err(SuiteError::StepFailed(_)));
    assert!(run.trace().contains("Setup failed, stopping the run"));
}

#[tokio::test]
async fn cleanup_deletes_the_prepared_products() {
    let run = spawn_run().await;
    mount_sign_in(&run).await;
    let (lease, loan) = active_products();
    mount_product_listings(&run, lease, loan).await;
    mount_application_creation(&run).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/admin/leaseproduct/products/LPEXIST1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&run.services)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/admin/loanproduct/products/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0})))
        .expect(1)
        .mount(&run.services)
        .await;

    let outcome = run.run(Suite::All(FullRunOptions { cleanup: true })).await;

    assert_ok!(outcome);
    assert!(run.trace().contains("✅ Removed lease product LPEXIST1"));
}

#[tokio::test]
async fn products_are_kept_without_the_cleanup_flag() {
    let run = spawn_run().await;
    mount_sign_in(&run).await;
    let (lease, loan) = active_products();
    mount_product_listings(&run, lease, loan).await;
    mount_application_creation(&run).await;

    let outcome = run.run(Suite::All(FullRunOptions::default())).await;

    assert_ok!(outcome);
    let deletes = run
        .services
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .count();
    assert_eq!(deletes, 0);
}
