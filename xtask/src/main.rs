use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Tasks for the project", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the workspace
    Build,
    /// Run all tests
    Test,
    /// Replay a fixture through the service
    Replay {
        /// Fixture file
        #[arg(default_value = "demos/enrollment.toml")]
        fixture: String,
    },
}

fn cargo(args: &[&str], what: &str) -> Result<()> {
    println!("{what}...");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{what} failed");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Build => cargo(&["build", "--workspace"], "Building workspace")?,
        Commands::Test => cargo(&["test", "--workspace"], "Running tests")?,
        Commands::Replay { fixture } => cargo(
            &["run", "-p", "syncml-cli", "--", fixture.as_str()],
            "Replaying fixture",
        )?,
    }

    Ok(())
}
