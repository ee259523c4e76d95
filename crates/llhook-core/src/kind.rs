//! Hook chain types (`WH_*` identifiers).
//!
//! A [`HookKind`] selects which OS chain a hook procedure is registered in.
//! Only the two low-level kinds deliver the typed keyboard/mouse records this
//! crate decodes; the legacy kinds are kept so a generic hook can still be
//! installed into any chain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a raw hook id does not name a known chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KindError {
    #[error("unknown hook id: {0}")]
    Unknown(i32),
}

/// Closed enumeration of OS hook chain types.
///
/// The discriminant is the raw id passed to `SetWindowsHookEx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum HookKind {
    /// `WH_MSGFILTER`: dialog box, menu and scroll bar input messages.
    MsgFilter = -1,
    /// `WH_JOURNALRECORD`: records system queue input (removed in modern Windows).
    JournalRecord = 0,
    /// `WH_JOURNALPLAYBACK`: replays recorded input (removed in modern Windows).
    JournalPlayback = 1,
    /// `WH_KEYBOARD`: keystroke messages on a thread's queue.
    Keyboard = 2,
    /// `WH_GETMESSAGE`: messages posted to a message queue.
    GetMessage = 3,
    /// `WH_CALLWNDPROC`: messages before the window procedure sees them.
    CallWndProc = 4,
    /// `WH_CBT`: computer-based-training notifications.
    Cbt = 5,
    /// `WH_SYSMSGFILTER`: like `MsgFilter`, for every application on the desktop.
    SysMsgFilter = 6,
    /// `WH_MOUSE`: mouse messages on a thread's queue.
    Mouse = 7,
    /// `WH_HARDWARE`: non-keyboard, non-mouse hardware messages.
    Hardware = 8,
    /// `WH_DEBUG`: invoked before any other hook procedure.
    Debug = 9,
    /// `WH_SHELL`: shell notifications.
    Shell = 10,
    /// `WH_FOREGROUNDIDLE`: the foreground thread is about to go idle.
    ForegroundIdle = 11,
    /// `WH_CALLWNDPROCRET`: messages after the window procedure handled them.
    CallWndProcRet = 12,
    /// `WH_KEYBOARD_LL`: system-wide raw keyboard input.
    KeyboardLowLevel = 13,
    /// `WH_MOUSE_LL`: system-wide raw mouse input.
    MouseLowLevel = 14,
}

impl HookKind {
    /// Returns the raw `WH_*` id.
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Returns `true` for the two system-wide low-level chains.
    pub fn is_low_level(self) -> bool {
        matches!(self, HookKind::KeyboardLowLevel | HookKind::MouseLowLevel)
    }
}

impl TryFrom<i32> for HookKind {
    type Error = KindError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            -1 => HookKind::MsgFilter,
            0 => HookKind::JournalRecord,
            1 => HookKind::JournalPlayback,
            2 => HookKind::Keyboard,
            3 => HookKind::GetMessage,
            4 => HookKind::CallWndProc,
            5 => HookKind::Cbt,
            6 => HookKind::SysMsgFilter,
            7 => HookKind::Mouse,
            8 => HookKind::Hardware,
            9 => HookKind::Debug,
            10 => HookKind::Shell,
            11 => HookKind::ForegroundIdle,
            12 => HookKind::CallWndProcRet,
            13 => HookKind::KeyboardLowLevel,
            14 => HookKind::MouseLowLevel,
            other => return Err(KindError::Unknown(other)),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
