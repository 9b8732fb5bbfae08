use crate::domain::{Service, TestAccount};
use crate::pacing::Pacer;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub services: ServiceSettings,
    pub http: HttpSettings,
    pub accounts: AccountSettings,
}

/// Base URLs of the six services under test.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct ServiceSettings {
    pub appuser: String,
    pub oauser: String,
    pub leaseproduct: String,
    pub lease: String,
    pub loanproduct: String,
    pub loan: String,
}

impl ServiceSettings {
    pub fn base_url(&self, service: Service) -> &str {
        match service {
            Service::AppUser => &self.appuser,
            Service::OaUser => &self.oauser,
            Service::LeaseProduct => &self.leaseproduct,
            Service::Lease => &self.lease,
            Service::LoanProduct => &self.loanproduct,
            Service::Loan => &self.loan,
        }
    }

    /// Point every service at the same address, handy for a single gateway.
    pub fn all_at(base_url: &str) -> Self {
        Self {
            appuser: base_url.to_string(),
            oauser: base_url.to_string(),
            leaseproduct: base_url.to_string(),
            lease: base_url.to_string(),
            loanproduct: base_url.to_string(),
            loan: base_url.to_string(),
        }
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct HttpSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_delay_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub phase_delay_milliseconds: u64,
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn pacer(&self) -> Pacer {
        Pacer::new(
            Duration::from_millis(self.request_delay_milliseconds),
            Duration::from_millis(self.phase_delay_milliseconds),
        )
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct AccountSettings {
    /// Consumer account used for C-side flows and for submitting applications.
    pub app_user: TestAccount,
    /// Back-office accounts; the first one acts as the administrator.
    pub oa_users: Vec<TestAccount>,
}

impl AccountSettings {
    pub fn admin(&self) -> Option<&TestAccount> {
        self.oa_users.first()
    }
}

/// The possible runtime environment for the smoke tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    get_configuration_from(&base_path.join("configuration"), environment)
}

pub fn get_configuration_from(
    configuration_directory: &Path,
    environment: Environment,
) -> Result<Settings, config::ConfigError> {
    let environment_filename = format!("{}.yaml", environment.as_str());
    let environment_file: PathBuf = configuration_directory.join(environment_filename);
    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(environment_file).required(false))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_SERVICES__LEASE=http://10.0.0.4:10004` would set `Settings.services.lease`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
