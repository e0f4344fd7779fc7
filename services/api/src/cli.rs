use crate::demo::{run_demo, run_profit_report, DemoArgs, ProfitReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use staybook::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Staybook Insights Service",
    about = "Serve computed marketplace views and run host reports from the command line",
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
    /// Generate host reports from exported booking data
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
    /// Run an end-to-end CLI demo covering search, booking, and notifications
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Compute the trailing profit window from a bookings JSON export
    Profit(ProfitReportArgs),
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
        Command::Report {
            command: ReportCommand::Profit(args),
        } => run_profit_report(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
