//! One lifecycle run and its report.

use std::fmt;
use tenx_msg::{Cmd, CmdResult, Data};
use tenx_runtime::{DriverError, LifecycleDriver, Phase};
use tenx_types::ErrorCode;

/// What to do between start and stop.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    /// Commands to dispatch, in order.
    pub cmds: Vec<String>,
    /// Data messages to dispatch, in order.
    pub data: Vec<String>,
    /// Go straight from the messages to deinit.
    pub skip_stop: bool,
}

#[derive(Debug)]
enum Outcome {
    Done,
    Skipped,
    Answered(CmdResult),
    NoResult,
    Failed(DriverError),
}

#[derive(Debug)]
struct Step {
    label: String,
    outcome: Outcome,
}

/// Result of [`run`].
#[derive(Debug, Default)]
pub struct Report {
    steps: Vec<Step>,
}

impl Report {
    fn push(&mut self, label: impl Into<String>, outcome: Outcome) {
        self.steps.push(Step {
            label: label.into(),
            outcome,
        });
    }

    /// Returns the first failure, if any step failed.
    #[must_use]
    pub fn failure(&self) -> Option<&DriverError> {
        self.steps.iter().find_map(|s| match &s.outcome {
            Outcome::Failed(e) => Some(e),
            _ => None,
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "  {:<16} ", step.label)?;
            match &step.outcome {
                Outcome::Done => writeln!(f, "ok")?,
                Outcome::Skipped => writeln!(f, "skipped")?,
                Outcome::NoResult => writeln!(f, "no result")?,
                Outcome::Answered(r) => match r.detail() {
                    Some(detail) => writeln!(f, "{} ({detail})", r.status())?,
                    None => writeln!(f, "{}", r.status())?,
                },
                Outcome::Failed(e) => {
                    let code = e.extension_error().map_or(e.code(), ErrorCode::code);
                    writeln!(f, "FAILED [{code}] {e}")?;
                }
            }
        }
        Ok(())
    }
}

/// Runs configure → init → start → messages → stop → deinit.
///
/// A failed stop does not skip deinit: the host still tears the
/// extension down and deinit reports what it finds.
pub async fn run(driver: &mut LifecycleDriver, scenario: &Scenario) -> Report {
    let mut report = Report::default();

    for phase in [Phase::Configure, Phase::Init, Phase::Start] {
        match driver.run_phase(phase).await {
            Ok(()) => report.push(phase.as_str(), Outcome::Done),
            Err(e) => {
                report.push(phase.as_str(), Outcome::Failed(e));
                return report;
            }
        }
    }

    for name in &scenario.cmds {
        let label = format!("cmd {name}");
        match driver.dispatch_cmd(Cmd::new(name.as_str())).await {
            Ok(Some(result)) => report.push(label, Outcome::Answered(result)),
            Ok(None) => report.push(label, Outcome::NoResult),
            Err(e) => report.push(label, Outcome::Failed(e)),
        }
    }

    for name in &scenario.data {
        driver.dispatch_data(Data::new(name.as_str()));
        report.push(format!("data {name}"), Outcome::Done);
    }

    if scenario.skip_stop {
        report.push(Phase::Stop.as_str(), Outcome::Skipped);
    } else {
        let outcome = driver.stop().await.map_or_else(Outcome::Failed, |()| Outcome::Done);
        report.push(Phase::Stop.as_str(), outcome);
    }

    let outcome = driver
        .deinit()
        .await
        .map_or_else(Outcome::Failed, |()| Outcome::Done);
    report.push(Phase::Deinit.as_str(), outcome);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tenx_runtime::config::{DriverConfig, RuntimeConfig};
    use tenx_runtime::{instantiate, ReplyMode, ScriptedRouter};

    fn driver(addon: &str, stop_reply: ReplyMode) -> LifecycleDriver {
        let config = RuntimeConfig::default();
        let ext = instantiate(addon, "t", &config).unwrap();
        let router = Arc::new(ScriptedRouter::new(ReplyMode::Ok).with_reply("stop", stop_reply));
        let driver_config = DriverConfig {
            phase_timeout_ms: 2_000,
            cmd_timeout_ms: 100,
        };
        LifecycleDriver::new(ext, router, &driver_config)
    }

    #[tokio::test]
    async fn clean_run_has_no_failure() {
        let mut driver = driver("graceful_stop", ReplyMode::Ok);
        let scenario = Scenario {
            cmds: vec!["start".into()],
            ..Scenario::default()
        };

        let report = run(&mut driver, &scenario).await;

        assert!(report.failure().is_none());
        let text = report.to_string();
        assert!(text.contains("cmd start"));
        assert!(text.contains("deinit"));
    }

    #[tokio::test]
    async fn refused_stop_still_deinits() {
        let mut driver = driver("graceful_stop", ReplyMode::Error("no".into()));

        let report = run(&mut driver, &Scenario::default()).await;

        let text = report.to_string();
        assert!(text.contains("EXTENSION_STOP_FAILED"));
        assert!(text.contains("EXTENSION_NOT_STOPPED"));
        assert!(report.failure().is_some());
    }

    #[tokio::test]
    async fn skipped_stop_is_reported() {
        let mut driver = driver("bridge", ReplyMode::Ok);
        let scenario = Scenario {
            data: vec!["frame".into()],
            skip_stop: true,
            ..Scenario::default()
        };

        let report = run(&mut driver, &scenario).await;

        assert!(report.failure().is_none());
        assert!(report.to_string().contains("skipped"));
    }
}
