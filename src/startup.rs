use crate::configuration::Settings;
use crate::pacing::Pacer;
use crate::report::Reporter;
use crate::suites::{Harness, Suite, SuiteError};
use tracing::Instrument;
use uuid::Uuid;

pub struct Application {
    harness: Harness,
}

impl Application {
    pub fn build(configuration: Settings, reporter: Reporter) -> Self {
        Self {
            harness: Harness::new(configuration, reporter),
        }
    }

    /// Replace the configured pauses, e.g. with [`Pacer::immediate`] in tests.
    pub fn with_pacer(self, pacer: Pacer) -> Self {
        Self {
            harness: self.harness.with_pacer(pacer),
        }
    }

    pub fn harness(&self) -> &Harness {
        &self.harness
    }

    /// Run `suite` to completion, or until Ctrl-C is pressed.
    pub async fn run_until_stopped(self, suite: Suite) -> Result<(), SuiteError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("Smoke test run", %run_id, %suite);
        let reporter = self.harness.reporter().clone();

        let outcome = tokio::select! {
            outcome = suite.run(&self.harness).instrument(span) => outcome,
            _ = tokio::signal::ctrl_c() => {
                reporter.line("\n⚠️ Run interrupted by user");
                Err(SuiteError::Interrupted)
            }
        };
        match &outcome {
            Ok(()) => tracing::info!(%run_id, %suite, "Smoke test run finished"),
            Err(e) => tracing::error!(%run_id, %suite, error.cause_chain = ?e, "Smoke test run failed"),
        }
        outcome
    }
}
