use crate::report::{run_replay, run_report, ReplayArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use park_rating::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Park Rating Inspector",
    about = "Break a park's rating down into the influences that make it up",
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
    /// Rate a recorded park once and print the breakdown
    Report(ReportArgs),
    /// Feed recorded frames through the polling inspector and print each redraw
    Replay(ReplayArgs),
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
        Command::Report(args) => run_report(args),
        Command::Replay(args) => run_replay(args),
    }
}
