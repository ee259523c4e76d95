//! Window message identifiers delivered as the hook's `wParam`.
//!
//! Low-level keyboard hooks see the four key messages; low-level mouse hooks
//! see the `0x200..=0x20E` mouse range.  Anything else is carried through as
//! [`WindowsMessage::Other`] so decoding never fails.

/// A decoded `WM_*` message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowsMessage {
    KeyDown,
    KeyUp,
    SysKeyDown,
    SysKeyUp,
    MouseMove,
    LButtonDown,
    LButtonUp,
    LButtonDblClk,
    RButtonDown,
    RButtonUp,
    RButtonDblClk,
    MButtonDown,
    MButtonUp,
    MButtonDblClk,
    MouseWheel,
    XButtonDown,
    XButtonUp,
    XButtonDblClk,
    MouseHWheel,
    /// Any identifier not listed above.
    Other(u32),
}

impl WindowsMessage {
    pub const WM_KEYDOWN: u32 = 0x0100;
    pub const WM_KEYUP: u32 = 0x0101;
    pub const WM_SYSKEYDOWN: u32 = 0x0104;
    pub const WM_SYSKEYUP: u32 = 0x0105;
    pub const WM_MOUSEMOVE: u32 = 0x0200;
    pub const WM_LBUTTONDOWN: u32 = 0x0201;
    pub const WM_LBUTTONUP: u32 = 0x0202;
    pub const WM_LBUTTONDBLCLK: u32 = 0x0203;
    pub const WM_RBUTTONDOWN: u32 = 0x0204;
    pub const WM_RBUTTONUP: u32 = 0x0205;
    pub const WM_RBUTTONDBLCLK: u32 = 0x0206;
    pub const WM_MBUTTONDOWN: u32 = 0x0207;
    pub const WM_MBUTTONUP: u32 = 0x0208;
    pub const WM_MBUTTONDBLCLK: u32 = 0x0209;
    pub const WM_MOUSEWHEEL: u32 = 0x020A;
    pub const WM_XBUTTONDOWN: u32 = 0x020B;
    pub const WM_XBUTTONUP: u32 = 0x020C;
    pub const WM_XBUTTONDBLCLK: u32 = 0x020D;
    pub const WM_MOUSEHWHEEL: u32 = 0x020E;

    /// Decodes a `wParam` value.  Only the low 32 bits carry the message id.
    pub fn from_wparam(wparam: usize) -> Self {
        Self::from(wparam as u32)
    }

    /// Returns the raw numeric identifier.
    pub fn raw(self) -> u32 {
        match self {
            WindowsMessage::KeyDown => Self::WM_KEYDOWN,
            WindowsMessage::KeyUp => Self::WM_KEYUP,
            WindowsMessage::SysKeyDown => Self::WM_SYSKEYDOWN,
            WindowsMessage::SysKeyUp => Self::WM_SYSKEYUP,
            WindowsMessage::MouseMove => Self::WM_MOUSEMOVE,
            WindowsMessage::LButtonDown => Self::WM_LBUTTONDOWN,
            WindowsMessage::LButtonUp => Self::WM_LBUTTONUP,
            WindowsMessage::LButtonDblClk => Self::WM_LBUTTONDBLCLK,
            WindowsMessage::RButtonDown => Self::WM_RBUTTONDOWN,
            WindowsMessage::RButtonUp => Self::WM_RBUTTONUP,
            WindowsMessage::RButtonDblClk => Self::WM_RBUTTONDBLCLK,
            WindowsMessage::MButtonDown => Self::WM_MBUTTONDOWN,
            WindowsMessage::MButtonUp => Self::WM_MBUTTONUP,
            WindowsMessage::MButtonDblClk => Self::WM_MBUTTONDBLCLK,
            WindowsMessage::MouseWheel => Self::WM_MOUSEWHEEL,
            WindowsMessage::XButtonDown => Self::WM_XBUTTONDOWN,
            WindowsMessage::XButtonUp => Self::WM_XBUTTONUP,
            WindowsMessage::XButtonDblClk => Self::WM_XBUTTONDBLCLK,
            WindowsMessage::MouseHWheel => Self::WM_MOUSEHWHEEL,
            WindowsMessage::Other(raw) => raw,
        }
    }

    /// `true` for the keyboard message family.
    pub fn is_keyboard(self) -> bool {
        matches!(
            self,
            WindowsMessage::KeyDown
                | WindowsMessage::KeyUp
                | WindowsMessage::SysKeyDown
                | WindowsMessage::SysKeyUp
        )
    }

    /// `true` for any button press (including double clicks).
    pub fn is_button_down(self) -> bool {
        matches!(
            self,
            WindowsMessage::LButtonDown
                | WindowsMessage::LButtonDblClk
                | WindowsMessage::RButtonDown
                | WindowsMessage::RButtonDblClk
                | WindowsMessage::MButtonDown
                | WindowsMessage::MButtonDblClk
                | WindowsMessage::XButtonDown
                | WindowsMessage::XButtonDblClk
        )
    }

    /// `true` for any button release.
    pub fn is_button_up(self) -> bool {
        matches!(
            self,
            WindowsMessage::LButtonUp
                | WindowsMessage::RButtonUp
                | WindowsMessage::MButtonUp
                | WindowsMessage::XButtonUp
        )
    }
}

impl From<u32> for WindowsMessage {
    fn from(raw: u32) -> Self {
        match raw {
            Self::WM_KEYDOWN => WindowsMessage::KeyDown,
            Self::WM_KEYUP => WindowsMessage::KeyUp,
            Self::WM_SYSKEYDOWN => WindowsMessage::SysKeyDown,
            Self::WM_SYSKEYUP => WindowsMessage::SysKeyUp,
            Self::WM_MOUSEMOVE => WindowsMessage::MouseMove,
            Self::WM_LBUTTONDOWN => WindowsMessage::LButtonDown,
            Self::WM_LBUTTONUP => WindowsMessage::LButtonUp,
            Self::WM_LBUTTONDBLCLK => WindowsMessage::LButtonDblClk,
            Self::WM_RBUTTONDOWN => WindowsMessage::RButtonDown,
            Self::WM_RBUTTONUP => WindowsMessage::RButtonUp,
            Self::WM_RBUTTONDBLCLK => WindowsMessage::RButtonDblClk,
            Self::WM_MBUTTONDOWN => WindowsMessage::MButtonDown,
            Self::WM_MBUTTONUP => WindowsMessage::MButtonUp,
            Self::WM_MBUTTONDBLCLK => WindowsMessage::MButtonDblClk,
            Self::WM_MOUSEWHEEL => WindowsMessage::MouseWheel,
            Self::WM_XBUTTONDOWN => WindowsMessage::XButtonDown,
            Self::WM_XBUTTONUP => WindowsMessage::XButtonUp,
            Self::WM_XBUTTONDBLCLK => WindowsMessage::XButtonDblClk,
            Self::WM_MOUSEHWHEEL => WindowsMessage::MouseHWheel,
            other => WindowsMessage::Other(other),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_and_from_agree_for_known_range() {
        for raw in [0x100, 0x101, 0x104, 0x105]
            .into_iter()
            .chain(0x200..=0x20E)
        {
            let msg = WindowsMessage::from(raw);
            assert!(!matches!(msg, WindowsMessage::Other(_)), "0x{raw:X} must be known");
            assert_eq!(msg.raw(), raw);
        }
    }

    #[test]
    fn test_unknown_message_is_carried_as_other() {
        assert_eq!(WindowsMessage::from(0x0010), WindowsMessage::Other(0x0010));
        assert_eq!(WindowsMessage::Other(0x0010).raw(), 0x0010);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_from_wparam_ignores_high_bits() {
        let wparam: usize = 0xDEAD_0000_0000_0100;
        assert_eq!(WindowsMessage::from_wparam(wparam), WindowsMessage::KeyDown);
    }

    #[test]
    fn test_button_classification() {
        assert!(WindowsMessage::LButtonDown.is_button_down());
        assert!(WindowsMessage::XButtonDblClk.is_button_down());
        assert!(WindowsMessage::RButtonUp.is_button_up());
        assert!(!WindowsMessage::MouseWheel.is_button_down());
        assert!(!WindowsMessage::MouseMove.is_button_up());
    }

    #[test]
    fn test_keyboard_classification() {
        assert!(WindowsMessage::SysKeyUp.is_keyboard());
        assert!(!WindowsMessage::MouseMove.is_keyboard());
    }
}
