//! Tool provisioning stage.
//!
//! Installs the lint tool to a user-scoped location via pip. Re-running on a
//! host that already has the tool is a no-op for pip and succeeds here too.

use serde::Serialize;

use crate::command;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionOutcome {
    pub tool: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

pub trait Installer {
    fn install(&self, config: &PipelineConfig) -> Result<ProvisionOutcome>;
}

/// Real implementation backed by `pip3 install --user`.
pub struct PipInstaller;

impl Installer for PipInstaller {
    fn install(&self, config: &PipelineConfig) -> Result<ProvisionOutcome> {
        let args = vec![
            "install".to_string(),
            "--user".to_string(),
            config.lint_tool.clone(),
        ];

        let output = command::capture("pip3", &args, None, &[], "pip3 install")
            .map_err(|e| Error::Provision(e.to_string()))?;

        if !output.success {
            return Err(Error::Provision(format!(
                "pip3 install --user {} exited {}: {}",
                config.lint_tool,
                output.exit_code,
                if output.stderr.trim().is_empty() {
                    output.stdout.trim()
                } else {
                    output.stderr.trim()
                }
            )));
        }

        log_status!("provision", "Installed {}", config.lint_tool);

        Ok(ProvisionOutcome {
            tool: config.lint_tool.clone(),
            detail: output.stdout.trim().to_string(),
        })
    }
}
