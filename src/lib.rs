pub mod api_client;
pub mod configuration;
pub mod domain;
pub mod endpoints;
pub mod pacing;
pub mod report;
pub mod run_state;
pub mod startup;
pub mod suites;
pub mod telemetry;
