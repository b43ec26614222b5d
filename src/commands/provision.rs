use clap::Args;

use netcheck::provision::{Installer, PipInstaller, ProvisionOutcome};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ProvisionArgs {}

pub fn run_json(_args: ProvisionArgs, global: &GlobalArgs) -> CmdResult<ProvisionOutcome> {
    let config = super::load_config(global)?;
    let outcome = PipInstaller.install(&config)?;
    Ok((outcome, 0))
}
