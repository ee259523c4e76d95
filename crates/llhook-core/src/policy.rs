//! Consumer policy flags and the chain decision table.
//!
//! After subscribers have seen an event, the relay reads the two flags once
//! and maps them to a [`ChainAction`]:
//!
//! | `suppress_event` | `break_chain` | action                          |
//! |------------------|---------------|---------------------------------|
//! | true             | true          | [`ChainAction::Swallow`]        |
//! | true             | false         | [`ChainAction::InformAndSwallow`] |
//! | false            | true          | [`ChainAction::Halt`]           |
//! | false            | false         | [`ChainAction::Forward`]        |
//!
//! The two flags are independent on purpose; there is no merged "block" flag.

use serde::{Deserialize, Serialize};

/// Result the hook procedure returns to swallow an event.
pub const SWALLOW_RESULT: isize = 1;
/// Result returned when halting the chain without swallowing.
pub const HALT_RESULT: isize = 0;

/// Per-controller policy for the current event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFlags {
    /// Keep the event away from every application.
    #[serde(default)]
    pub suppress_event: bool,
    /// Do not let hooks installed before this one see the event.
    #[serde(default)]
    pub break_chain: bool,
}

/// What the relay does with an event once subscribers have returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainAction {
    /// Forward with the owning handle and return the chain's result.
    Forward,
    /// Forward with the null anchor so other hooks are informed, then return
    /// [`SWALLOW_RESULT`] regardless of what the chain answered.
    InformAndSwallow,
    /// Return [`SWALLOW_RESULT`] without forwarding.
    Swallow,
    /// Return [`HALT_RESULT`] without forwarding.
    Halt,
}

impl ChainAction {
    pub fn for_flags(flags: PolicyFlags) -> Self {
        match (flags.suppress_event, flags.break_chain) {
            (true, true) => ChainAction::Swallow,
            (true, false) => ChainAction::InformAndSwallow,
            (false, true) => ChainAction::Halt,
            (false, false) => ChainAction::Forward,
        }
    }

    /// `true` when the next hook is called.
    pub fn forwards(self) -> bool {
        matches!(self, ChainAction::Forward | ChainAction::InformAndSwallow)
    }
}

impl From<PolicyFlags> for ChainAction {
    fn from(flags: PolicyFlags) -> Self {
        Self::for_flags(flags)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(suppress_event: bool, break_chain: bool) -> PolicyFlags {
        PolicyFlags {
            suppress_event,
            break_chain,
        }
    }

    #[test]
    fn test_default_flags_forward() {
        assert_eq!(ChainAction::from(PolicyFlags::default()), ChainAction::Forward);
    }

    #[test]
    fn test_full_decision_table() {
        assert_eq!(ChainAction::for_flags(flags(true, true)), ChainAction::Swallow);
        assert_eq!(ChainAction::for_flags(flags(true, false)), ChainAction::InformAndSwallow);
        assert_eq!(ChainAction::for_flags(flags(false, true)), ChainAction::Halt);
        assert_eq!(ChainAction::for_flags(flags(false, false)), ChainAction::Forward);
    }

    #[test]
    fn test_only_forward_and_inform_call_next_hook() {
        assert!(ChainAction::Forward.forwards());
        assert!(ChainAction::InformAndSwallow.forwards());
        assert!(!ChainAction::Swallow.forwards());
        assert!(!ChainAction::Halt.forwards());
    }
}
