use std::path::PathBuf;

use netcheck::config::PipelineConfig;

pub type CmdResult<T> = netcheck::Result<(T, i32)>;

pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub workspace: Option<PathBuf>,
}

/// Load the pipeline config honoring the global `--config` and
/// `--workspace` flags.
pub fn load_config(global: &GlobalArgs) -> netcheck::Result<PipelineConfig> {
    let mut config = PipelineConfig::load(global.config.as_deref())?;
    if let Some(workspace) = &global.workspace {
        config.workspace_root = workspace.clone();
    }
    Ok(config)
}

pub mod artifacts;
pub mod checkout;
pub mod diff;
pub mod lint;
pub mod probe;
pub mod provision;
pub mod run;

pub fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (netcheck::Result<serde_json::Value>, i32) {
    use crate::output::map_cmd_result_to_json;

    match command {
        crate::Commands::Run(args) => map_cmd_result_to_json(run::run_json(args, global)),
        crate::Commands::Checkout(args) => {
            map_cmd_result_to_json(checkout::run_json(args, global))
        }
        crate::Commands::Provision(args) => {
            map_cmd_result_to_json(provision::run_json(args, global))
        }
        crate::Commands::Lint(args) => map_cmd_result_to_json(lint::run_json(args, global)),
        crate::Commands::Artifacts(args) => {
            map_cmd_result_to_json(artifacts::run_json(args, global))
        }
        crate::Commands::Probe(args) => map_cmd_result_to_json(probe::run_json(args, global)),
        crate::Commands::Diff(args) => map_cmd_result_to_json(diff::run_json(args, global)),
    }
}
