//! Static validation stage.
//!
//! Runs the lint tool against every template file matching the configured
//! glob. The tool's diagnostics pass through verbatim; only its exit status
//! decides the stage. The user-scoped tool bin dir is prepended to PATH on
//! the child process only.

use std::env;
use std::path::PathBuf;

use serde::Serialize;

use crate::command;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintOutcome {
    pub tool: String,
    pub files: usize,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

pub trait Linter {
    fn lint(&self, config: &PipelineConfig, files: &[PathBuf]) -> Result<LintOutcome>;
}

/// Real implementation spawning the configured lint tool as a subprocess.
pub struct CommandLinter;

impl Linter for CommandLinter {
    fn lint(&self, config: &PipelineConfig, files: &[PathBuf]) -> Result<LintOutcome> {
        let args: Vec<String> = files
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();

        let path_env = prepend_path(&config.tool_bin_dir_expanded());
        let output = command::capture(
            &config.lint_tool,
            &args,
            None,
            &[("PATH", path_env)],
            "lint",
        )?;

        Ok(LintOutcome {
            tool: config.lint_tool.clone(),
            files: files.len(),
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Expand the template glob into the file list passed to the linter.
pub fn expand_templates(config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    let pattern = config.template_glob_abs();
    let entries: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| Error::Lint(format!("Invalid template glob '{}': {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();

    Ok(entries)
}

/// Run the lint stage: expand the glob and invoke the linter. A non-zero
/// tool exit or an empty template set fails the stage.
pub fn run(config: &PipelineConfig, linter: &dyn Linter) -> Result<LintOutcome> {
    let files = expand_templates(config)?;
    if files.is_empty() {
        return Err(Error::Lint(format!(
            "No template files match '{}'",
            config.template_glob_abs()
        )));
    }

    log_status!("lint", "Linting {} template file(s)", files.len());

    let outcome = linter.lint(config, &files)?;
    if outcome.exit_code != 0 {
        let diagnostics = if outcome.stderr.trim().is_empty() {
            outcome.stdout.trim()
        } else {
            outcome.stderr.trim()
        };
        return Err(Error::Lint(format!(
            "{} exited {}: {}",
            outcome.tool, outcome.exit_code, diagnostics
        )));
    }

    Ok(outcome)
}

fn prepend_path(bin_dir: &str) -> String {
    match env::var("PATH") {
        Ok(path) if !path.is_empty() => format!("{}:{}", bin_dir, path),
        _ => bin_dir.to_string(),
    }
}
