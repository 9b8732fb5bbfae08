use anyhow::Context;
use api_smoke::configuration::get_configuration;
use api_smoke::report::Reporter;
use api_smoke::startup::Application;
use api_smoke::suites::{FullRunOptions, Suite};
use api_smoke::telemetry::{LogFormat, get_subscriber, init_subscriber};
use clap::{Parser, Subcommand};

/// Smoke tests for the user, product, lease and loan services.
#[derive(Parser, Debug)]
#[command(name = "api-smoke", version, about)]
struct Cli {
    /// Format of the diagnostic logs written to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, env = "API_SMOKE_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that every service answers HTTP requests.
    Health,
    /// Consumer and back-office account lifecycles.
    Users,
    /// Create, inspect, update and delete a lease product.
    LeaseProducts,
    /// Setup, users, products, lease and loan business flows.
    All {
        /// Delete the products prepared by setup at the end of the run.
        #[arg(long)]
        cleanup: bool,
    },
}

impl From<Command> for Suite {
    fn from(command: Command) -> Self {
        match command {
            Command::Health => Suite::Health,
            Command::Users => Suite::Users,
            Command::LeaseProducts => Suite::LeaseProducts,
            Command::All { cleanup } => Suite::All(FullRunOptions { cleanup }),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = get_subscriber("api-smoke".into(), "warn".into(), cli.log_format, std::io::stderr);
    init_subscriber(subscriber)?;

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let application = Application::build(configuration, Reporter::stdout());
    application.run_until_stopped(cli.command.into()).await?;
    Ok(())
}
