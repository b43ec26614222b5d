use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{artifacts, checkout, diff, lint, probe, provision, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "netcheck")]
#[command(version = VERSION)]
#[command(about = "Post-generation verification for network configuration workflows")]
struct Cli {
    /// Path to the pipeline config file (default: ./netcheck.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the workspace root from the config
    #[arg(long, global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full verification pipeline (checkout, provision, lint,
    /// artifact check, reachability probe)
    Run(run::RunArgs),
    /// Sync the workspace with its source repository
    Checkout(checkout::CheckoutArgs),
    /// Install the lint tool to the user-scoped bin dir
    Provision(provision::ProvisionArgs),
    /// Lint template files
    Lint(lint::LintArgs),
    /// Verify generated configuration artifacts exist
    Artifacts(artifacts::ArtifactsArgs),
    /// Ping the device named by the newest artifact
    Probe(probe::ProbeArgs),
    /// Compare the newest artifact against its golden config
    Diff(diff::DiffArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        config: cli.config,
        workspace: cli.workspace,
    };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
