//! Sequential fail-fast stage driver.
//!
//! The five stages run in a fixed order on one thread. The first failure
//! halts the run; later stages are reported as skipped. There are no
//! retries and no partial-failure semantics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::artifact::{self, DirectoryLister};
use crate::checkout::SourceControl;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::lint::{self, Linter};
use crate::probe::{self, Prober};
use crate::provision::Installer;

pub const STAGE_CHECKOUT: &str = "checkout";
pub const STAGE_PROVISION: &str = "provision";
pub const STAGE_LINT: &str = "lint";
pub const STAGE_ARTIFACTS: &str = "artifacts";
pub const STAGE_PROBE: &str = "probe";

/// Injected external collaborators, one per stage, so tests can substitute
/// fakes returning controlled exit codes and listings.
pub struct StageSet<'a> {
    pub source: &'a dyn SourceControl,
    pub installer: &'a dyn Installer,
    pub linter: &'a dyn Linter,
    pub lister: &'a dyn DirectoryLister,
    pub prober: &'a dyn Prober,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReport {
    pub stage: &'static str,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub status: RunStatus,
    pub stages: Vec<StageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<&'static str>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Run all five stages against `config`, stopping at the first failure.
pub fn run(config: &PipelineConfig, set: &StageSet) -> RunReport {
    let started_at = Utc::now();

    type StageFn<'a> = Box<dyn FnOnce() -> Result<String> + 'a>;
    let stages: Vec<(&'static str, StageFn)> = vec![
        (
            STAGE_CHECKOUT,
            Box::new(|| {
                let outcome = set.source.sync(config)?;
                Ok(format!("{:?} {}", outcome.action, outcome.workspace))
            }),
        ),
        (
            STAGE_PROVISION,
            Box::new(|| {
                let outcome = set.installer.install(config)?;
                Ok(outcome.tool)
            }),
        ),
        (
            STAGE_LINT,
            Box::new(|| {
                let outcome = lint::run(config, set.linter)?;
                Ok(format!("{} file(s) clean", outcome.files))
            }),
        ),
        (
            STAGE_ARTIFACTS,
            Box::new(|| {
                let found = artifact::require_artifacts(
                    set.lister,
                    &config.artifact_dir_abs(),
                    &config.artifact_suffix,
                )?;
                // Raw listing text; parsing happens only in the probe stage.
                Ok(found
                    .iter()
                    .map(|a| a.file_name())
                    .collect::<Vec<_>>()
                    .join("\n"))
            }),
        ),
        (
            STAGE_PROBE,
            Box::new(|| {
                let outcome = probe::run(config, set.lister, set.prober)?;
                Ok(format!("{} reachable", outcome.host))
            }),
        ),
    ];

    let mut reports = Vec::with_capacity(stages.len());
    let mut failure: Option<(&'static str, Error)> = None;

    for (name, stage_fn) in stages {
        if failure.is_some() {
            reports.push(StageReport {
                stage: name,
                status: StageStatus::Skipped,
                detail: None,
                error_code: None,
                error: None,
            });
            continue;
        }

        match stage_fn() {
            Ok(detail) => {
                log_status!("run", "Stage '{}' passed", name);
                reports.push(StageReport {
                    stage: name,
                    status: StageStatus::Passed,
                    detail: if detail.is_empty() { None } else { Some(detail) },
                    error_code: None,
                    error: None,
                });
            }
            Err(err) => {
                log_status!("run", "Stage '{}' failed: {}", name, err);
                reports.push(StageReport {
                    stage: name,
                    status: StageStatus::Failed,
                    detail: None,
                    error_code: Some(err.code().to_string()),
                    error: Some(err.to_string()),
                });
                failure = Some((name, err));
            }
        }
    }

    let finished_at = Utc::now();

    match &failure {
        None => log_status!("run", "Pipeline finished: all checks passed"),
        Some((stage, err)) => {
            log_status!("run", "Pipeline failed at stage '{}': {}", stage, err)
        }
    }

    RunReport {
        status: if failure.is_none() {
            RunStatus::Success
        } else {
            RunStatus::Failed
        },
        stages: reports,
        failed_stage: failure.map(|(stage, _)| stage),
        started_at,
        finished_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactRef;
    use crate::checkout::{CheckoutAction, CheckoutOutcome};
    use crate::provision::ProvisionOutcome;
    use crate::utils::command::CommandOutput;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::time::{Duration, SystemTime};

    struct FakeSource;
    impl SourceControl for FakeSource {
        fn sync(&self, config: &PipelineConfig) -> Result<CheckoutOutcome> {
            Ok(CheckoutOutcome {
                action: CheckoutAction::Pulled,
                workspace: config.workspace_root.display().to_string(),
                revision: Some("abc1234".to_string()),
            })
        }
    }

    struct FakeInstaller;
    impl Installer for FakeInstaller {
        fn install(&self, config: &PipelineConfig) -> Result<ProvisionOutcome> {
            Ok(ProvisionOutcome {
                tool: config.lint_tool.clone(),
                detail: String::new(),
            })
        }
    }

    struct FakeLinter {
        exit_code: i32,
    }
    impl Linter for FakeLinter {
        fn lint(
            &self,
            config: &PipelineConfig,
            files: &[PathBuf],
        ) -> Result<crate::lint::LintOutcome> {
            Ok(crate::lint::LintOutcome {
                tool: config.lint_tool.clone(),
                files: files.len(),
                exit_code: self.exit_code,
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    struct FakeLister {
        names: Vec<&'static str>,
        calls: RefCell<usize>,
    }
    impl FakeLister {
        fn new(names: Vec<&'static str>) -> Self {
            Self {
                names,
                calls: RefCell::new(0),
            }
        }
    }
    impl DirectoryLister for FakeLister {
        fn list(&self, dir: &Path, _suffix: &str) -> Vec<ArtifactRef> {
            *self.calls.borrow_mut() += 1;
            self.names
                .iter()
                .enumerate()
                .map(|(i, name)| ArtifactRef {
                    path: dir.join(name),
                    modified: SystemTime::UNIX_EPOCH + Duration::from_secs(i as u64),
                })
                .collect()
        }
    }

    struct FakeProber {
        exit_code: i32,
        calls: RefCell<usize>,
    }
    impl FakeProber {
        fn new(exit_code: i32) -> Self {
            Self {
                exit_code,
                calls: RefCell::new(0),
            }
        }
    }
    impl Prober for FakeProber {
        fn probe(&self, _host: &str, _count: u32) -> Result<CommandOutput> {
            *self.calls.borrow_mut() += 1;
            Ok(CommandOutput {
                stdout: String::new(),
                stderr: String::new(),
                success: self.exit_code == 0,
                exit_code: self.exit_code,
            })
        }
    }

    fn workspace_with_templates() -> (tempfile::TempDir, PipelineConfig) {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("templates")).unwrap();
        std::fs::File::create(dir.path().join("templates").join("r1.j2")).unwrap();
        let config = PipelineConfig {
            workspace_root: dir.path().to_path_buf(),
            ..Default::default()
        };
        (dir, config)
    }

    #[test]
    fn all_stages_pass_in_order() {
        let (_dir, config) = workspace_with_templates();
        let lister = FakeLister::new(vec!["r3_core.yaml"]);
        let prober = FakeProber::new(0);
        let set = StageSet {
            source: &FakeSource,
            installer: &FakeInstaller,
            linter: &FakeLinter { exit_code: 0 },
            lister: &lister,
            prober: &prober,
        };

        let report = run(&config, &set);
        assert_eq!(report.status, RunStatus::Success);
        assert_eq!(report.failed_stage, None);
        assert_eq!(
            report
                .stages
                .iter()
                .map(|s| s.stage)
                .collect::<Vec<_>>(),
            [
                STAGE_CHECKOUT,
                STAGE_PROVISION,
                STAGE_LINT,
                STAGE_ARTIFACTS,
                STAGE_PROBE
            ]
        );
        assert!(report
            .stages
            .iter()
            .all(|s| s.status == StageStatus::Passed));
        // Existence check and probe each list independently
        assert_eq!(*lister.calls.borrow(), 2);
        assert_eq!(*prober.calls.borrow(), 1);
    }

    #[test]
    fn lint_failure_skips_artifact_check_and_probe() {
        let (_dir, config) = workspace_with_templates();
        let lister = FakeLister::new(vec!["r3_core.yaml"]);
        let prober = FakeProber::new(0);
        let set = StageSet {
            source: &FakeSource,
            installer: &FakeInstaller,
            linter: &FakeLinter { exit_code: 1 },
            lister: &lister,
            prober: &prober,
        };

        let report = run(&config, &set);
        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.failed_stage, Some(STAGE_LINT));
        assert_eq!(report.stages[2].status, StageStatus::Failed);
        assert_eq!(report.stages[2].error_code.as_deref(), Some("LINT_FAILED"));
        assert_eq!(report.stages[3].status, StageStatus::Skipped);
        assert_eq!(report.stages[4].status, StageStatus::Skipped);
        assert_eq!(*lister.calls.borrow(), 0);
        assert_eq!(*prober.calls.borrow(), 0);
    }

    #[test]
    fn empty_artifact_dir_halts_before_probe() {
        let (_dir, config) = workspace_with_templates();
        let lister = FakeLister::new(vec![]);
        let prober = FakeProber::new(0);
        let set = StageSet {
            source: &FakeSource,
            installer: &FakeInstaller,
            linter: &FakeLinter { exit_code: 0 },
            lister: &lister,
            prober: &prober,
        };

        let report = run(&config, &set);
        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.failed_stage, Some(STAGE_ARTIFACTS));
        assert_eq!(
            report.stages[3].error_code.as_deref(),
            Some("NO_ARTIFACTS")
        );
        assert_eq!(report.stages[4].status, StageStatus::Skipped);
        assert_eq!(*prober.calls.borrow(), 0);
    }

    #[test]
    fn unreachable_host_fails_the_run() {
        let (_dir, config) = workspace_with_templates();
        let lister = FakeLister::new(vec!["r3_core.yaml"]);
        let prober = FakeProber::new(1);
        let set = StageSet {
            source: &FakeSource,
            installer: &FakeInstaller,
            linter: &FakeLinter { exit_code: 0 },
            lister: &lister,
            prober: &prober,
        };

        let report = run(&config, &set);
        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.failed_stage, Some(STAGE_PROBE));
        assert_eq!(report.stages[4].error_code.as_deref(), Some("PROBE_FAILED"));
    }

    #[test]
    fn rerun_with_unchanged_state_is_idempotent() {
        let (_dir, config) = workspace_with_templates();
        let lister = FakeLister::new(vec!["r3_core.yaml"]);
        let prober = FakeProber::new(0);
        let set = StageSet {
            source: &FakeSource,
            installer: &FakeInstaller,
            linter: &FakeLinter { exit_code: 0 },
            lister: &lister,
            prober: &prober,
        };

        let first = run(&config, &set);
        let second = run(&config, &set);
        assert_eq!(first.status, second.status);
        assert_eq!(
            first
                .stages
                .iter()
                .map(|s| s.status.clone())
                .collect::<Vec<_>>(),
            second
                .stages
                .iter()
                .map(|s| s.status.clone())
                .collect::<Vec<_>>()
        );
    }
}
