use clap::Args;

use netcheck::checkout::{CheckoutOutcome, GitSource, SourceControl};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct CheckoutArgs {}

pub fn run_json(_args: CheckoutArgs, global: &GlobalArgs) -> CmdResult<CheckoutOutcome> {
    let config = super::load_config(global)?;
    let outcome = GitSource.sync(&config)?;
    Ok((outcome, 0))
}
