use crate::helpers::spawn_run;
use api_smoke::domain::Service;
use api_smoke::suites::{ServiceHealth, Suite, SuiteError, check_service_health};
use claims::assert_ok;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{any, body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn any_http_answer_counts_as_healthy() {
    // Arrange
    let run = spawn_run().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({"phone": "", "password": ""})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "手机号不能为空"})))
        .expect(2)
        .mount(&run.services)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(401))
        .expect(4)
        .mount(&run.services)
        .await;

    // Act
    let outcome = run.run(Suite::Health).await;

    // Assert
    assert_ok!(outcome);
    let trace = run.trace();
    assert!(trace.contains("✅ appuser: healthy"));
    assert!(trace.contains("✅ loan: healthy"));
    assert!(trace.contains("🎉 All services are running"));
    assert!(!trace.contains("🔄"), "health requests should not be traced");
    let paths = run.received_paths().await;
    assert_eq!(paths.len(), 6);
    assert!(paths.iter().any(|p| p == "/api/v1/leaseproduct/products"));
    assert!(paths.iter().any(|p| p == "/api/v1/loan/applications"));
}

#[tokio::test]
async fn unreachable_services_are_reported_with_start_hints() {
    let mut run = spawn_run().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&run.services)
        .await;
    // Nothing listens on port 9 locally
    run.settings.services.loan = "http://127.0.0.1:9".into();

    let outcome = run.run(Suite::Health).await;

    match outcome {
        Err(SuiteError::ServicesDown(down)) => assert_eq!(down, vec!["loan"]),
        other => panic!("Expected the loan service to be down, got {:?}", other),
    }
    let trace = run.trace();
    assert!(trace.contains("❌ loan: unavailable"));
    assert!(trace.contains("./scripts/start.sh start loan-rpc"));
    assert!(trace.contains("./scripts/start.sh start loan-api"));
    assert!(!trace.contains("start appuser-rpc"));
}

#[tokio::test]
async fn slow_services_are_reported_as_timed_out() {
    let mut run = spawn_run().await;
    run.settings.http.timeout_seconds = 1;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)))
        .mount(&run.services)
        .await;

    let health = check_service_health(&run.harness(), Service::LeaseProduct).await;

    assert_eq!(health, ServiceHealth::TimedOut);
    assert!(run.trace().contains("⏰ LeaseProduct timed out"));
}

#[tokio::test]
async fn malformed_error_bodies_keep_the_real_status() {
    let run = spawn_run().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503).set_body_raw("{oops", "application/json"))
        .expect(1)
        .mount(&run.services)
        .await;

    let health = check_service_health(&run.harness(), Service::Lease).await;

    assert_eq!(health, ServiceHealth::Up(StatusCode::SERVICE_UNAVAILABLE));
    assert!(run.trace().contains("✅ Lease is running (status: 503)"));
}
