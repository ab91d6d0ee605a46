//! Daily mission outcome state machine.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl MissionStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of asking the state machine to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: MissionStatus,
    pub to: MissionStatus,
}

impl Transition {
    #[must_use]
    pub fn changed(self) -> bool {
        self.from != self.to
    }

    /// A fresh terminal outcome opens the reflection recorder.
    #[must_use]
    pub fn prompts_reflection(self) -> bool {
        self.changed() && self.to.is_terminal()
    }
}

/// Outcome for the current mission-day.
///
/// `Completed` and `Failed` are terminal until [`MissionOutcome::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MissionOutcome {
    status: MissionStatus,
}

impl MissionOutcome {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: MissionStatus::Pending,
        }
    }

    #[must_use]
    pub const fn status(&self) -> MissionStatus {
        self.status
    }

    pub fn complete(&mut self) -> Transition {
        self.settle(MissionStatus::Completed)
    }

    pub fn fail(&mut self) -> Transition {
        self.settle(MissionStatus::Failed)
    }

    /// Return to `Pending`. Reflections already recorded are unaffected.
    pub fn cancel(&mut self) -> Transition {
        let from = self.status;
        self.status = MissionStatus::Pending;
        if from.is_terminal() {
            log::debug!("mission outcome reset from {from}");
        }
        Transition {
            from,
            to: self.status,
        }
    }

    fn settle(&mut self, to: MissionStatus) -> Transition {
        let from = self.status;
        if from.is_terminal() {
            log::debug!("ignoring {to} request, outcome already {from}");
            return Transition { from, to: from };
        }
        self.status = to;
        log::info!("mission outcome {from} -> {to}");
        Transition { from, to }
    }
}
