//! Reachability probe stage.
//!
//! Selects the newest generated artifact, derives the device identifier from
//! its file name, and pings it. The probe tool's own success threshold is
//! not overridden; exit status decides the stage.

use serde::Serialize;

use crate::artifact::{self, DirectoryLister};
use crate::command;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    pub host: String,
    pub count: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub artifact: String,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

pub trait Prober {
    fn probe(&self, host: &str, count: u32) -> Result<command::CommandOutput>;
}

/// Real implementation backed by the system `ping` binary.
pub struct PingProber;

impl Prober for PingProber {
    fn probe(&self, host: &str, count: u32) -> Result<command::CommandOutput> {
        let args = vec!["-c".to_string(), count.to_string(), host.to_string()];
        command::capture("ping", &args, None, &[], "ping")
    }
}

/// Run the probe stage end to end. The artifact directory is re-listed here
/// rather than reusing the existence check's result, so a listing race
/// between the two stages surfaces as an identifier error.
pub fn run(
    config: &PipelineConfig,
    lister: &dyn DirectoryLister,
    prober: &dyn Prober,
) -> Result<ProbeOutcome> {
    let dir = config.artifact_dir_abs();
    let candidates = lister.list(&dir, &config.artifact_suffix);

    let selected = artifact::newest(candidates).ok_or_else(|| {
        Error::Identifier(format!(
            "no artifact matching '*{}' in {}",
            config.artifact_suffix,
            dir.display()
        ))
    })?;

    let host = artifact::derive_identifier(&selected.path, config.delimiter)?;

    log_status!(
        "probe",
        "Pinging {} ({} echoes) from {}",
        host,
        config.probe_count,
        selected.file_name()
    );

    let output = prober.probe(&host, config.probe_count)?;
    if !output.success {
        return Err(Error::Probe {
            host,
            detail: if output.stderr.trim().is_empty() {
                output.stdout.trim().to_string()
            } else {
                output.stderr.trim().to_string()
            },
        });
    }

    Ok(ProbeOutcome {
        host,
        count: config.probe_count,
        artifact: selected.file_name(),
        exit_code: output.exit_code,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
