//! Pipeline state machine.

use serde::Serialize;
use std::fmt;

/// One unit of work in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStep {
    /// Platform and configuration checks; no external process runs.
    Preflight,
    Compile,
    Finalize,
    Package,
    Archive,
    /// Measuring and hashing the produced artifacts.
    Report,
}

impl BuildStep {
    /// Every step in execution order.
    pub const ALL: [BuildStep; 6] = [
        BuildStep::Preflight,
        BuildStep::Compile,
        BuildStep::Finalize,
        BuildStep::Package,
        BuildStep::Archive,
        BuildStep::Report,
    ];

    /// State the pipeline is in once this step has succeeded.
    pub fn completed_state(self) -> BuildState {
        match self {
            BuildStep::Preflight => BuildState::Start,
            BuildStep::Compile => BuildState::Compiled,
            BuildStep::Finalize => BuildState::Finalized,
            BuildStep::Package => BuildState::Packaged,
            BuildStep::Archive => BuildState::Archived,
            BuildStep::Report => BuildState::Done,
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStep::Preflight => "preflight",
            BuildStep::Compile => "compile",
            BuildStep::Finalize => "finalize",
            BuildStep::Package => "package",
            BuildStep::Archive => "archive",
            BuildStep::Report => "report",
        };
        f.write_str(name)
    }
}

/// Where a build is in `Start → Compiled → Finalized → Packaged → Archived → Done`.
///
/// `Failed` is terminal and records the step that failed. There are no
/// backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum BuildState {
    Start,
    Compiled,
    Finalized,
    Packaged,
    Archived,
    Done,
    Failed { step: BuildStep },
}

impl BuildState {
    /// True for `Done` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildState::Done | BuildState::Failed { .. })
    }

    /// Step that failed, if any.
    pub fn failed_step(&self) -> Option<BuildStep> {
        match self {
            BuildState::Failed { step } => Some(*step),
            _ => None,
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildState::Start => f.write_str("start"),
            BuildState::Compiled => f.write_str("compiled"),
            BuildState::Finalized => f.write_str("finalized"),
            BuildState::Packaged => f.write_str("packaged"),
            BuildState::Archived => f.write_str("archived"),
            BuildState::Done => f.write_str("done"),
            BuildState::Failed { step } => write!(f, "failed ({})", step),
        }
    }
}
