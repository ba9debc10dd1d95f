use crate::demo::{run_demo, run_leaderboard, DemoArgs, LeaderboardArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use waste_ops::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Waste Dispatch Service",
    about = "Rank sanitation workers and assign citizen complaints from the command line or over HTTP",
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
    /// Rank workers from a CSV export of the worker table
    Leaderboard(LeaderboardArgs),
    /// Run an end-to-end demo covering recommendation and assignment
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory store with a demo worker roster
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Leaderboard(args) => run_leaderboard(args),
        Command::Demo(args) => run_demo(args),
    }
}
