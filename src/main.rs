use clap::Parser;
use civic_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve::run().await,
        Command::City { name } => cli::lookup::city(&name).await,
        Command::Lines { line_id, refresh } => cli::lookup::lines(line_id.as_deref(), refresh).await,
    }
}
