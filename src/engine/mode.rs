//! Run mode selection.

use std::fmt;

/// The behavior selected for one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Gate on inhibitors, then update.
    #[default]
    Normal,
    /// Skip inhibitors and update.
    Force,
    /// Evaluate inhibitors and exit.
    CheckOnly,
    /// Report whether an update is available.
    UpdateCheckOnly,
    /// Wait for package-manager transactions and exit.
    WaitOnly,
}

impl RunMode {
    /// Select a mode from the CLI flags.
    ///
    /// When several flags are given, `wait` beats `updatecheck`, which
    /// beats `force`, which beats `check`.
    pub fn from_flags(force: bool, check: bool, updatecheck: bool, wait: bool) -> Self {
        if wait {
            RunMode::WaitOnly
        } else if updatecheck {
            RunMode::UpdateCheckOnly
        } else if force {
            RunMode::Force
        } else if check {
            RunMode::CheckOnly
        } else {
            RunMode::Normal
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunMode::Normal => "normal",
            RunMode::Force => "force",
            RunMode::CheckOnly => "check",
            RunMode::UpdateCheckOnly => "updatecheck",
            RunMode::WaitOnly => "wait",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_is_normal() {
        assert_eq!(RunMode::from_flags(false, false, false, false), RunMode::Normal);
        assert_eq!(RunMode::default(), RunMode::Normal);
    }

    #[test]
    fn single_flags() {
        assert_eq!(RunMode::from_flags(true, false, false, false), RunMode::Force);
        assert_eq!(RunMode::from_flags(false, true, false, false), RunMode::CheckOnly);
        assert_eq!(
            RunMode::from_flags(false, false, true, false),
            RunMode::UpdateCheckOnly
        );
        assert_eq!(RunMode::from_flags(false, false, false, true), RunMode::WaitOnly);
    }

    #[test]
    fn wait_wins_over_everything() {
        assert_eq!(RunMode::from_flags(true, true, true, true), RunMode::WaitOnly);
    }

    #[test]
    fn updatecheck_beats_force_and_check() {
        assert_eq!(
            RunMode::from_flags(true, true, true, false),
            RunMode::UpdateCheckOnly
        );
    }

    #[test]
    fn force_beats_check() {
        assert_eq!(RunMode::from_flags(true, true, false, false), RunMode::Force);
    }

    #[test]
    fn display_matches_flag_names() {
        assert_eq!(RunMode::CheckOnly.to_string(), "check");
        assert_eq!(RunMode::UpdateCheckOnly.to_string(), "updatecheck");
    }
}
