use clap::Args;
use serde::Serialize;

use netcheck::artifact::{self, FsLister};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ArtifactsArgs {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactsOutput {
    pub directory: String,
    pub count: usize,
    /// File names, newest first.
    pub files: Vec<String>,
}

pub fn run_json(_args: ArtifactsArgs, global: &GlobalArgs) -> CmdResult<ArtifactsOutput> {
    let config = super::load_config(global)?;
    let dir = config.artifact_dir_abs();
    let found = artifact::require_artifacts(&FsLister, &dir, &config.artifact_suffix)?;

    Ok((
        ArtifactsOutput {
            directory: dir.display().to_string(),
            count: found.len(),
            files: found.iter().map(|a| a.file_name()).collect(),
        },
        0,
    ))
}
