use clap::Args;
use serde::Serialize;

use netcheck::lint::{self, CommandLinter};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct LintArgs {}

#[derive(Serialize)]
pub struct LintOutput {
    pub status: &'static str,
    pub tool: String,
    pub files: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

pub fn run_json(_args: LintArgs, global: &GlobalArgs) -> CmdResult<LintOutput> {
    let config = super::load_config(global)?;
    let outcome = lint::run(&config, &CommandLinter)?;

    Ok((
        LintOutput {
            status: "passed",
            tool: outcome.tool,
            files: outcome.files,
            stdout: outcome.stdout,
            stderr: outcome.stderr,
        },
        0,
    ))
}
