use super::{Harness, SuiteError};
use crate::api_client::{ApiClient, ApiError, ApiRequest, error_chain_message};
use crate::domain::Service;
use crate::endpoints::{
    AUTH_LOGIN, LEASE_APPLICATIONS, LEASE_PRODUCTS, LOAN_APPLICATIONS, LOAN_PRODUCTS,
};
use crate::report::Reporter;
use reqwest::StatusCode;
use serde_json::json;

/// Result of probing one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceHealth {
    /// Some HTTP response came back, whatever its status.
    Up(StatusCode),
    Unreachable,
    TimedOut,
    Failed(String),
}

impl ServiceHealth {
    pub fn is_up(&self) -> bool {
        matches!(self, ServiceHealth::Up(_))
    }
}

fn probe_request(service: Service) -> ApiRequest {
    match service {
        // Empty credentials are rejected, which is enough to prove the service answers.
        Service::AppUser | Service::OaUser => {
            ApiRequest::post(AUTH_LOGIN).json(json!({"phone": "", "password": ""}))
        }
        Service::LeaseProduct => ApiRequest::get(LEASE_PRODUCTS),
        Service::Lease => ApiRequest::get(LEASE_APPLICATIONS),
        Service::LoanProduct => ApiRequest::get(LOAN_PRODUCTS),
        Service::Loan => ApiRequest::get(LOAN_APPLICATIONS),
    }
}

/// Send one probe request to `service` and classify the outcome.
#[tracing::instrument(name = "Checking service health", skip(harness, service), fields(service = %service))]
pub async fn check_service_health(harness: &Harness, service: Service) -> ServiceHealth {
    let reporter = harness.reporter();
    let base_url = harness.settings().services.base_url(service);
    reporter.line(format!("\n🔍 Checking {} ({})...", service.label(), service.description()));
    reporter.line(format!("📍 Address: {}", base_url));

    // The probe's own request trace is noise next to the verdict.
    let quiet = Reporter::new(std::io::sink());
    let outcome = match ApiClient::new(service.label(), base_url, harness.settings().http.timeout(), quiet) {
        Ok(client) => client.send(probe_request(service)).await,
        Err(e) => Err(e),
    };

    let health = match outcome {
        Ok(response) => match response.status() {
            Some(status) => ServiceHealth::Up(status),
            None => ServiceHealth::Failed("no HTTP status".into()),
        },
        Err(ApiError::Connect { .. }) => ServiceHealth::Unreachable,
        Err(ApiError::Timeout { .. }) => ServiceHealth::TimedOut,
        // A garbled body still means something is listening.
        Err(ApiError::Decode { status, .. }) => ServiceHealth::Up(status),
        Err(e) => ServiceHealth::Failed(error_chain_message(&e)),
    };

    match &health {
        ServiceHealth::Up(status) => reporter.success(format!(
            "{} is running (status: {})",
            service.label(),
            status.as_u16()
        )),
        ServiceHealth::Unreachable => reporter.failure(format!(
            "{} refused the connection, it is probably not started",
            service.label()
        )),
        ServiceHealth::TimedOut => reporter.line(format!("⏰ {} timed out", service.label())),
        ServiceHealth::Failed(message) => reporter.warning(format!(
            "{} check failed unexpectedly: {}",
            service.label(),
            message
        )),
    }
    health
}

/// Probe every service, print a summary and start-up hints for the ones down.
#[tracing::instrument(name = "Running health check", skip(harness))]
pub async fn run_health_check(harness: &Harness) -> Result<(), SuiteError> {
    let reporter = harness.reporter();
    reporter.line("🚀 Starting service health check");
    reporter.line("=".repeat(50));

    let mut results = Vec::with_capacity(Service::ALL.len());
    for service in Service::ALL {
        let health = check_service_health(harness, service).await;
        results.push((service, health));
    }

    reporter.section("📊 Health check results:");
    for (service, health) in &results {
        if health.is_up() {
            reporter.success(format!("{}: healthy", service.key()));
        } else {
            reporter.failure(format!("{}: unavailable", service.key()));
        }
    }

    let down: Vec<Service> = results
        .iter()
        .filter(|(_, health)| !health.is_up())
        .map(|(service, _)| *service)
        .collect();
    if down.is_empty() {
        reporter.line("\n🎉 All services are running, the API tests can start.");
        reporter.line("💡 Run the tests: api-smoke all");
        return Ok(());
    }

    reporter.warning("Some services are not running, start them before testing.");
    reporter.line("💡 Start commands:");
    for service in &down {
        reporter.line(format!("   ./scripts/start.sh start {}-rpc", service.key()));
        reporter.line(format!("   ./scripts/start.sh start {}-api", service.key()));
    }
    Err(SuiteError::ServicesDown(
        down.iter().map(|s| s.key().to_string()).collect(),
    ))
}
