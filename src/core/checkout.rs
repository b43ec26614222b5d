//! Source checkout stage.
//!
//! Synchronizes the workspace with its source-control reference: pull when
//! the workspace is already a checkout, clone when a repo URL is configured.
//! Any git failure is terminal for the run.

use std::path::Path;
use std::process::Command;

use serde::Serialize;

use crate::command;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    pub action: CheckoutAction,
    pub workspace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutAction {
    Cloned,
    Pulled,
}

pub trait SourceControl {
    fn sync(&self, config: &PipelineConfig) -> Result<CheckoutOutcome>;
}

/// Real implementation backed by the `git` binary.
pub struct GitSource;

impl SourceControl for GitSource {
    fn sync(&self, config: &PipelineConfig) -> Result<CheckoutOutcome> {
        let root = &config.workspace_root;

        if root.join(".git").exists() {
            pull(root)?;
            return Ok(CheckoutOutcome {
                action: CheckoutAction::Pulled,
                workspace: root.display().to_string(),
                revision: head_revision(root),
            });
        }

        let url = config.repo_url.as_deref().ok_or_else(|| {
            Error::Checkout(format!(
                "{} is not a checkout and no repoUrl is configured",
                root.display()
            ))
        })?;

        clone(url, config.branch.as_deref(), root)?;
        Ok(CheckoutOutcome {
            action: CheckoutAction::Cloned,
            workspace: root.display().to_string(),
            revision: head_revision(root),
        })
    }
}

/// Clone a git repository to a target directory.
fn clone(url: &str, branch: Option<&str>, target_dir: &Path) -> Result<()> {
    let target = target_dir.to_string_lossy().to_string();
    let mut args = vec!["clone"];
    if let Some(branch) = branch {
        args.push("--branch");
        args.push(branch);
    }
    args.push(url);
    args.push(&target);

    let output = Command::new("git")
        .args(&args)
        .output()
        .map_err(|e| Error::Checkout(format!("Failed to run git clone: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Checkout(format!(
            "git clone failed: {}",
            command::error_text(&output)
        )));
    }

    Ok(())
}

/// Pull latest changes in a git repository.
fn pull(repo_dir: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["pull"])
        .current_dir(repo_dir)
        .output()
        .map_err(|e| Error::Checkout(format!("Failed to run git pull: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Checkout(format!(
            "git pull failed: {}",
            command::error_text(&output)
        )));
    }

    Ok(())
}

fn head_revision(repo_dir: &Path) -> Option<String> {
    command::run_in_optional(repo_dir, "git", &["rev-parse", "--short", "HEAD"])
}
