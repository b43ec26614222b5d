//! Golden-config comparison.
//!
//! Compares the newest generated artifact against the golden reference for
//! the same device and records any drift as a unified diff file. Drift is a
//! finding, not a run failure; only unreadable files or an underivable
//! device name are errors.

use std::fs;
use std::path::Path;

use serde::Serialize;
use similar::TextDiff;

use crate::artifact::{self, ArtifactRef};
use crate::config::PipelineConfig;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Compliant,
    Drift,
    NoGolden,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffOutcome {
    pub device: String,
    pub artifact: String,
    pub golden: String,
    pub status: DiffStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_file: Option<String>,
}

/// Normalize a config body for comparison: trim each line and drop blank
/// ones, so whitespace and newline conventions never count as drift.
pub fn normalize(config: &str) -> Vec<String> {
    config
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Compare one artifact against its golden reference
/// (`<goldenDir>/<device><artifactSuffix>`). Drift writes
/// `<diffDir>/<device>_diff.txt` and names it in the outcome.
pub fn compare(config: &PipelineConfig, candidate: &ArtifactRef) -> Result<DiffOutcome> {
    let device = artifact::derive_identifier(&candidate.path, config.delimiter)?;
    let golden_path = config
        .golden_dir_abs()
        .join(format!("{}{}", device, config.artifact_suffix));

    if !golden_path.exists() {
        log_status!("diff", "No golden config for {}, skipping comparison", device);
        return Ok(DiffOutcome {
            device,
            artifact: candidate.file_name(),
            golden: golden_path.display().to_string(),
            status: DiffStatus::NoGolden,
            diff_file: None,
        });
    }

    let current = normalize(&fs::read_to_string(&candidate.path)?).join("\n");
    let golden = normalize(&fs::read_to_string(&golden_path)?).join("\n");

    if current == golden {
        log_status!("diff", "{} matches its golden config", device);
        return Ok(DiffOutcome {
            device,
            artifact: candidate.file_name(),
            golden: golden_path.display().to_string(),
            status: DiffStatus::Compliant,
            diff_file: None,
        });
    }

    let rendered = TextDiff::from_lines(golden.as_str(), current.as_str())
        .unified_diff()
        .header("Golden Config", "Current Config")
        .to_string();

    let diff_file = write_drift_report(&config.diff_dir_abs(), &device, &rendered)?;
    log_status!("diff", "Drift found for {}, wrote {}", device, diff_file);

    Ok(DiffOutcome {
        device,
        artifact: candidate.file_name(),
        golden: golden_path.display().to_string(),
        status: DiffStatus::Drift,
        diff_file: Some(diff_file),
    })
}

fn write_drift_report(diff_dir: &Path, device: &str, rendered: &str) -> Result<String> {
    fs::create_dir_all(diff_dir)?;
    let path = diff_dir.join(format!("{}_diff.txt", device));
    fs::write(&path, rendered)?;
    Ok(path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn write_file(path: &Path, body: &str) {
        let mut f = File::create(path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
    }

    fn workspace() -> (TempDir, PipelineConfig) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("configs")).unwrap();
        std::fs::create_dir(dir.path().join("golden-configs")).unwrap();
        let config = PipelineConfig {
            workspace_root: dir.path().to_path_buf(),
            ..Default::default()
        };
        (dir, config)
    }

    fn artifact_ref(config: &PipelineConfig, name: &str, body: &str) -> ArtifactRef {
        let path = config.artifact_dir_abs().join(name);
        write_file(&path, body);
        ArtifactRef {
            path,
            modified: SystemTime::now(),
        }
    }

    #[test]
    fn normalize_trims_and_drops_blank_lines() {
        let lines = normalize("hostname r3  \n\n  interface eth0\n   \n");
        assert_eq!(lines, ["hostname r3", "interface eth0"]);
    }

    #[test]
    fn whitespace_only_differences_are_compliant() {
        let (_dir, config) = workspace();
        let candidate = artifact_ref(&config, "r3_core.yaml", "hostname: r3\n\nrole: core\n");
        write_file(
            &config.golden_dir_abs().join("r3.yaml"),
            "  hostname: r3\nrole: core  \n",
        );

        let outcome = compare(&config, &candidate).unwrap();
        assert_eq!(outcome.status, DiffStatus::Compliant);
        assert_eq!(outcome.device, "r3");
        assert!(outcome.diff_file.is_none());
    }

    #[test]
    fn drift_writes_report_with_changed_lines() {
        let (_dir, config) = workspace();
        let candidate = artifact_ref(&config, "r3_core.yaml", "hostname: r3\nrole: edge\n");
        write_file(
            &config.golden_dir_abs().join("r3.yaml"),
            "hostname: r3\nrole: core\n",
        );

        let outcome = compare(&config, &candidate).unwrap();
        assert_eq!(outcome.status, DiffStatus::Drift);

        let report_path = PathBuf::from(outcome.diff_file.unwrap());
        assert!(report_path.ends_with("diffs/r3_diff.txt"));
        let report = std::fs::read_to_string(&report_path).unwrap();
        assert!(report.contains("Golden Config"));
        assert!(report.contains("-role: core"));
        assert!(report.contains("+role: edge"));
    }

    #[test]
    fn missing_golden_skips_comparison() {
        let (_dir, config) = workspace();
        let candidate = artifact_ref(&config, "r9_core.yaml", "hostname: r9\n");

        let outcome = compare(&config, &candidate).unwrap();
        assert_eq!(outcome.status, DiffStatus::NoGolden);
        assert!(outcome.diff_file.is_none());
        assert!(!config.diff_dir_abs().exists());
    }

    #[test]
    fn underivable_device_name_is_an_error() {
        let (_dir, config) = workspace();
        let candidate = artifact_ref(&config, "gatewayA.yaml", "hostname: gatewayA\n");

        let err = compare(&config, &candidate).unwrap_err();
        assert_eq!(err.code(), "IDENTIFIER_UNDERIVABLE");
    }
}
