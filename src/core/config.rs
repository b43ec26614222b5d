//! Pipeline configuration.
//!
//! Every stage takes an explicit immutable `PipelineConfig` instead of
//! reading ambient environment state. The config is loaded from a JSON file
//! with per-field defaults, so a missing file means "all defaults".

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "netcheck.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// Checkout target and base for all relative paths below.
    pub workspace_root: PathBuf,

    /// Clone source when the workspace is not yet a checkout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,

    /// Branch to clone; the remote default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// User-scoped install location for the lint tool. Tilde-expanded.
    pub tool_bin_dir: String,

    pub lint_tool: String,

    /// Glob of template files to lint, relative to the workspace root.
    pub template_glob: String,

    /// Directory holding generated configuration artifacts.
    pub artifact_dir: PathBuf,

    /// File extension artifacts must carry, including the dot.
    pub artifact_suffix: String,

    /// Character separating the device identifier from the rest of an
    /// artifact's file name.
    pub delimiter: char,

    /// Number of echo requests per reachability probe.
    pub probe_count: u32,

    /// Directory holding golden reference configs, one per device.
    pub golden_dir: PathBuf,

    /// Where drift reports from golden-config comparison are written.
    pub diff_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("."),
            repo_url: None,
            branch: None,
            tool_bin_dir: "~/.local/bin".to_string(),
            lint_tool: "yamllint".to_string(),
            template_glob: "templates/*.j2".to_string(),
            artifact_dir: PathBuf::from("configs"),
            artifact_suffix: ".yaml".to_string(),
            delimiter: '_',
            probe_count: 4,
            golden_dir: PathBuf::from("golden-configs"),
            diff_dir: PathBuf::from("diffs"),
        }
    }
}

impl PipelineConfig {
    /// Load config from an explicit path, or from `netcheck.json` in the
    /// current directory. A missing default file yields the defaults; an
    /// explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!("Invalid config {}: {}", path.display(), e))
        })
    }

    /// Template glob anchored at the workspace root.
    pub fn template_glob_abs(&self) -> String {
        self.workspace_root
            .join(&self.template_glob)
            .to_string_lossy()
            .to_string()
    }

    /// Artifact directory anchored at the workspace root.
    pub fn artifact_dir_abs(&self) -> PathBuf {
        self.workspace_root.join(&self.artifact_dir)
    }

    /// Golden-config directory anchored at the workspace root.
    pub fn golden_dir_abs(&self) -> PathBuf {
        self.workspace_root.join(&self.golden_dir)
    }

    /// Drift-report directory anchored at the workspace root.
    pub fn diff_dir_abs(&self) -> PathBuf {
        self.workspace_root.join(&self.diff_dir)
    }

    /// Tool bin dir with `~` expanded.
    pub fn tool_bin_dir_expanded(&self) -> String {
        shellexpand::tilde(&self.tool_bin_dir).to_string()
    }
}
