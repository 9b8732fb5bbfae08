mod auth;
mod full_run;
mod health;
mod lease_products;
mod users;

pub use auth::{change_password, login, logout, register_or_login};
pub use full_run::{FullRunOptions, run_all_modules};
pub use health::{ServiceHealth, check_service_health, run_health_check};
pub use lease_products::run_lease_product_suite;
pub use users::{
    delete_user, fetch_user_info, run_user_suite, update_user_info, update_user_status,
};

use crate::api_client::{ApiClient, ApiError};
use crate::configuration::Settings;
use crate::domain::Service;
use crate::pacing::Pacer;
use crate::report::Reporter;

#[derive(thiserror::Error, Debug)]
pub enum SuiteError {
    #[error("{0} failed")]
    StepFailed(String),
    #[error("No {0} account is configured")]
    MissingAccount(&'static str),
    #[error("Services unavailable: {}", .0.join(", "))]
    ServicesDown(Vec<String>),
    #[error("Phases failed: {}", .0.join(", "))]
    PhasesFailed(Vec<String>),
    #[error("Run interrupted")]
    Interrupted,
    #[error(transparent)]
    Client(#[from] ApiError),
}

impl SuiteError {
    pub fn step(step: impl Into<String>) -> Self {
        SuiteError::StepFailed(step.into())
    }
}

/// Which scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Health,
    Users,
    LeaseProducts,
    All(FullRunOptions),
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Suite::Health => "health",
            Suite::Users => "users",
            Suite::LeaseProducts => "lease-products",
            Suite::All(_) => "all",
        };
        write!(f, "{}", name)
    }
}

impl Suite {
    pub async fn run(self, harness: &Harness) -> Result<(), SuiteError> {
        match self {
            Suite::Health => run_health_check(harness).await,
            Suite::Users => run_user_suite(harness).await,
            Suite::LeaseProducts => run_lease_product_suite(harness).await,
            Suite::All(options) => run_all_modules(harness, options).await,
        }
    }
}

/// What every suite needs: settings, the report sink and pacing.
#[derive(Clone, Debug)]
pub struct Harness {
    settings: Settings,
    reporter: Reporter,
    pacer: Pacer,
}

impl Harness {
    pub fn new(settings: Settings, reporter: Reporter) -> Self {
        let pacer = settings.http.pacer();
        Self {
            settings,
            reporter,
            pacer,
        }
    }

    pub fn with_pacer(self, pacer: Pacer) -> Self {
        Self { pacer, ..self }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// A fresh, unauthenticated client for `service`.
    pub fn client(&self, service: Service) -> Result<ApiClient, ApiError> {
        ApiClient::new(
            service.label(),
            self.settings.services.base_url(service),
            self.settings.http.timeout(),
            self.reporter.clone(),
        )
    }
}
