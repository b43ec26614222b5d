use clap::Args;

use netcheck::artifact::{self, DirectoryLister, FsLister};
use netcheck::diff::{self, DiffOutcome};
use netcheck::Error;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct DiffArgs {}

pub fn run_json(_args: DiffArgs, global: &GlobalArgs) -> CmdResult<DiffOutcome> {
    let config = super::load_config(global)?;
    let dir = config.artifact_dir_abs();

    let candidates = FsLister.list(&dir, &config.artifact_suffix);
    let newest = artifact::newest(candidates).ok_or_else(|| Error::NoArtifacts {
        dir: dir.display().to_string(),
    })?;

    let outcome = diff::compare(&config, &newest)?;
    Ok((outcome, 0))
}
