use clap::Args;

use netcheck::artifact::FsLister;
use netcheck::probe::{self, PingProber, ProbeOutcome, Prober};
use netcheck::Error;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ProbeArgs {
    /// Probe this host instead of deriving one from the newest artifact
    #[arg(long)]
    pub host: Option<String>,
}

pub fn run_json(args: ProbeArgs, global: &GlobalArgs) -> CmdResult<ProbeOutcome> {
    let config = super::load_config(global)?;

    let outcome = match args.host {
        Some(host) => {
            let output = PingProber.probe(&host, config.probe_count)?;
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
            ProbeOutcome {
                host,
                count: config.probe_count,
                artifact: String::new(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            }
        }
        None => probe::run(&config, &FsLister, &PingProber)?,
    };

    Ok((outcome, 0))
}
