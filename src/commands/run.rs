use clap::Args;

use netcheck::artifact::FsLister;
use netcheck::checkout::GitSource;
use netcheck::lint::CommandLinter;
use netcheck::pipeline::{self, RunReport, RunStatus, StageSet};
use netcheck::probe::PingProber;
use netcheck::provision::PipInstaller;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct RunArgs {}

pub fn run_json(_args: RunArgs, global: &GlobalArgs) -> CmdResult<RunReport> {
    let config = super::load_config(global)?;

    let set = StageSet {
        source: &GitSource,
        installer: &PipInstaller,
        linter: &CommandLinter,
        lister: &FsLister,
        prober: &PingProber,
    };

    let report = pipeline::run(&config, &set);
    let exit_code = match report.status {
        RunStatus::Success => 0,
        RunStatus::Failed => 20,
    };

    Ok((report, exit_code))
}
