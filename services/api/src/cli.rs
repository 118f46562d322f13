use crate::report::{run_forecast_report, run_lifecycle_check, ForecastArgs, LifecycleArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use retail_compliance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Retail Compliance Forecaster",
    about = "Forecast site compliance risk from audits, fire risk assessments, actions and incidents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Forecast risk for every site in a CSV site register
    Forecast(ForecastArgs),
    /// Show the fire risk assessment lifecycle state for a completion date
    Lifecycle(LifecycleArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Forecast(args) => run_forecast_report(args),
        Command::Lifecycle(args) => run_lifecycle_check(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn forecast_command_parses_dates_and_flags() {
        let cli = Cli::try_parse_from([
            "retail-compliance-api",
            "forecast",
            "--sites",
            "register.csv",
            "--today",
            "2025-07-15",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Forecast(args)) => {
                assert_eq!(args.sites.to_string_lossy(), "register.csv");
                assert_eq!(args.today, NaiveDate::from_ymd_opt(2025, 7, 15));
                assert!(args.json);
            }
            other => panic!("expected forecast command, got {other:?}"),
        }
    }

    #[test]
    fn lifecycle_command_rejects_malformed_dates() {
        let result = Cli::try_parse_from([
            "retail-compliance-api",
            "lifecycle",
            "--completed",
            "last spring",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["retail-compliance-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
