//! Typed low-level mouse events.
//!
//! The `mouseData` word is mode-dependent: for `WM_MOUSEWHEEL` it carries the
//! wheel delta, for `WM_XBUTTON*` it carries the side-button identity in the
//! high word, and for every other message it is meaningless.  The decoders
//! below check the message id first and return `None` outside their mode.

use serde::{Deserialize, Serialize};

use crate::message::WindowsMessage;
use crate::record::{MouseRecord, RawEventRecord};

/// `LLMHF_*` bit flags from the mouse record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MouseFlags(pub u32);

impl MouseFlags {
    pub const INJECTED: u32 = 0x01;
    pub const LOWER_IL_INJECTED: u32 = 0x02;

    pub fn injected(self) -> bool {
        self.0 & Self::INJECTED != 0
    }

    pub fn lower_il_injected(self) -> bool {
        self.0 & Self::LOWER_IL_INJECTED != 0
    }
}

/// Vertical wheel rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WheelDirection {
    /// Rotated forward, away from the user.
    Up,
    /// Rotated backward, toward the user.
    Down,
}

impl WheelDirection {
    /// Decodes the sign of a wheel `mouseData` word.
    ///
    /// The word is read as a signed 32-bit value, so both the OS encoding
    /// (delta in the high word) and a bare delta decode the same way.
    pub fn from_mouse_data(mouse_data: u32) -> Self {
        if mouse_data as i32 > 0 {
            WheelDirection::Up
        } else {
            WheelDirection::Down
        }
    }
}

/// Side-button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum XButton {
    /// `XBUTTON1` in the high word (`0x0001_0000`).
    X1 = 0x0001_0000,
    /// `XBUTTON2` in the high word (`0x0002_0000`).
    X2 = 0x0002_0000,
}

impl XButton {
    /// Looks up the high word of an X-button `mouseData` word.
    pub fn from_mouse_data(mouse_data: u32) -> Option<Self> {
        match (mouse_data >> 16) as u16 {
            1 => Some(XButton::X1),
            2 => Some(XButton::X2),
            _ => None,
        }
    }
}

/// One low-level mouse event, copied out of the OS record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    code: i32,
    message_id: u32,
    record: MouseRecord,
}

impl MouseEvent {
    pub fn new(code: i32, message_id: u32, record: MouseRecord) -> Self {
        Self {
            code,
            message_id,
            record,
        }
    }

    /// Copies the `MSLLHOOKSTRUCT` behind `raw.lparam`.
    ///
    /// Returns `None` when the record pointer is null.
    ///
    /// # Safety
    ///
    /// `raw.lparam` must be null or point to a valid `MSLLHOOKSTRUCT`, which
    /// holds for the arguments of a `WH_MOUSE_LL` hook procedure.
    pub unsafe fn from_raw(raw: &RawEventRecord) -> Option<Self> {
        raw.read::<MouseRecord>()
            .map(|record| Self::new(raw.code, raw.message_id(), record))
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn x(&self) -> i32 {
        self.record.pt.x
    }

    pub fn y(&self) -> i32 {
        self.record.pt.y
    }

    pub fn mouse_data(&self) -> u32 {
        self.record.mouse_data
    }

    pub fn time(&self) -> u32 {
        self.record.time
    }

    pub fn extra_info(&self) -> usize {
        self.record.extra_info
    }

    pub fn flags(&self) -> MouseFlags {
        MouseFlags(self.record.flags)
    }

    pub fn is_injected(&self) -> bool {
        self.flags().injected()
    }

    pub fn is_lower_il_injected(&self) -> bool {
        self.flags().lower_il_injected()
    }

    pub fn windows_message(&self) -> WindowsMessage {
        WindowsMessage::from(self.message_id)
    }

    /// Wheel direction; `None` unless the message is `WM_MOUSEWHEEL`.
    pub fn wheel_direction(&self) -> Option<WheelDirection> {
        (self.windows_message() == WindowsMessage::MouseWheel)
            .then(|| WheelDirection::from_mouse_data(self.record.mouse_data))
    }

    /// Side button; `None` unless the message is `WM_XBUTTONDOWN` / `WM_XBUTTONUP`.
    pub fn x_button(&self) -> Option<XButton> {
        match self.windows_message() {
            WindowsMessage::XButtonDown | WindowsMessage::XButtonUp => {
                XButton::from_mouse_data(self.record.mouse_data)
            }
            _ => None,
        }
    }

    pub fn is_button_down(&self) -> bool {
        self.windows_message().is_button_down()
    }

    pub fn is_button_up(&self) -> bool {
        self.windows_message().is_button_up()
    }

    /// The copied native record.
    pub fn record(&self) -> &MouseRecord {
        &self.record
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
