//! Typed low-level keyboard events.

use crate::message::WindowsMessage;
use crate::record::{KeyboardRecord, RawEventRecord};

/// `LLKHF_*` bit flags from the keyboard record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyboardFlags(pub u32);

impl KeyboardFlags {
    pub const EXTENDED: u32 = 0x01;
    pub const LOWER_IL_INJECTED: u32 = 0x02;
    pub const INJECTED: u32 = 0x10;
    pub const ALT_DOWN: u32 = 0x20;
    pub const UP: u32 = 0x80;

    fn has(self, bit: u32) -> bool {
        self.0 & bit == bit
    }

    /// Extended key (right-hand Ctrl/Alt, arrow cluster, numpad Enter, ...).
    pub fn extended(self) -> bool {
        self.has(Self::EXTENDED)
    }

    /// Synthesized by software rather than a physical keyboard.
    pub fn injected(self) -> bool {
        self.has(Self::INJECTED)
    }

    /// Injected by a process running at a lower integrity level.
    pub fn lower_il_injected(self) -> bool {
        self.has(Self::LOWER_IL_INJECTED)
    }

    /// Alt is held (context code).
    pub fn alt_down(self) -> bool {
        self.has(Self::ALT_DOWN)
    }

    /// Transition state: set on release.
    pub fn up(self) -> bool {
        self.has(Self::UP)
    }
}

/// One low-level keyboard event, copied out of the OS record.
///
/// All accessors are pure functions of the copied record and the message id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    code: i32,
    message_id: u32,
    record: KeyboardRecord,
}

impl KeyboardEvent {
    /// Builds an event from an already-copied record.
    pub fn new(code: i32, message_id: u32, record: KeyboardRecord) -> Self {
        Self {
            code,
            message_id,
            record,
        }
    }

    /// Copies the `KBDLLHOOKSTRUCT` behind `raw.lparam`.
    ///
    /// Returns `None` when the record pointer is null.
    ///
    /// # Safety
    ///
    /// `raw.lparam` must be null or point to a valid `KBDLLHOOKSTRUCT`, which
    /// holds for the arguments of a `WH_KEYBOARD_LL` hook procedure.
    pub unsafe fn from_raw(raw: &RawEventRecord) -> Option<Self> {
        raw.read::<KeyboardRecord>()
            .map(|record| Self::new(raw.code, raw.message_id(), record))
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn virtual_key_code(&self) -> u32 {
        self.record.vk_code
    }

    pub fn scan_code(&self) -> u32 {
        self.record.scan_code
    }

    /// Milliseconds since system start.
    pub fn time(&self) -> u32 {
        self.record.time
    }

    pub fn extra_info(&self) -> usize {
        self.record.extra_info
    }

    pub fn flags(&self) -> KeyboardFlags {
        KeyboardFlags(self.record.flags)
    }

    pub fn is_extended_key(&self) -> bool {
        self.flags().extended()
    }

    pub fn is_injected(&self) -> bool {
        self.flags().injected()
    }

    pub fn is_lower_il_injected(&self) -> bool {
        self.flags().lower_il_injected()
    }

    pub fn is_alt_down(&self) -> bool {
        self.flags().alt_down()
    }

    pub fn is_key_up(&self) -> bool {
        self.flags().up()
    }

    pub fn windows_message(&self) -> WindowsMessage {
        WindowsMessage::from(self.message_id)
    }

    /// The copied native record.
    pub fn record(&self) -> &KeyboardRecord {
        &self.record
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_flags(flags: u32) -> KeyboardEvent {
        KeyboardEvent::new(
            0,
            WindowsMessage::WM_KEYDOWN,
            KeyboardRecord {
                vk_code: 0x41,
                scan_code: 0x1E,
                flags,
                time: 1234,
                extra_info: 0,
            },
        )
    }

    #[test]
    fn test_extended_flag_only() {
        let e = event_with_flags(0x01);
        assert!(e.is_extended_key());
        assert!(!e.is_injected());
        assert!(!e.is_alt_down());
        assert!(!e.is_key_up());
    }

    #[test]
    fn test_up_flag_only() {
        let e = event_with_flags(0x80);
        assert!(e.is_key_up());
        assert!(!e.is_extended_key());
        assert!(!e.is_injected());
        assert!(!e.is_alt_down());
    }

    #[test]
    fn test_combined_up_injected_extended() {
        let e = event_with_flags(0x80 | 0x10 | 0x01);
        assert!(e.is_key_up());
        assert!(e.is_injected());
        assert!(e.is_extended_key());
        assert!(!e.is_alt_down());
        assert!(!e.is_lower_il_injected());
    }

    #[test]
    fn test_alt_and_lower_il_flags() {
        let e = event_with_flags(0x20 | 0x02);
        assert!(e.is_alt_down());
        assert!(e.is_lower_il_injected());
        assert!(!e.is_injected());
    }

    #[test]
    fn test_direct_fields_and_message() {
        let e = event_with_flags(0);
        assert_eq!(e.virtual_key_code(), 0x41);
        assert_eq!(e.scan_code(), 0x1E);
        assert_eq!(e.time(), 1234);
        assert_eq!(e.windows_message(), WindowsMessage::KeyDown);
    }

    #[test]
    fn test_from_raw_reads_native_record() {
        // Arrange
        let native = KeyboardRecord {
            vk_code: 0x5B,
            scan_code: 0x5B,
            flags: 0x01,
            time: 42,
            extra_info: 0xFEED,
        };
        let raw = RawEventRecord::pointing_to(0, WindowsMessage::WM_SYSKEYUP as usize, &native);

        // Act
        // SAFETY: `native` outlives the call.
        let e = unsafe { KeyboardEvent::from_raw(&raw) }.expect("non-null record");

        // Assert
        assert_eq!(e.virtual_key_code(), 0x5B);
        assert_eq!(e.extra_info(), 0xFEED);
        assert!(e.is_extended_key());
        assert_eq!(e.windows_message(), WindowsMessage::SysKeyUp);
    }

    #[test]
    fn test_accessors_are_idempotent() {
        let e = event_with_flags(0x91);
        assert_eq!(e.is_key_up(), e.is_key_up());
        assert_eq!(e.flags(), KeyboardFlags(0x91));
        assert_eq!(e.record().flags, 0x91);
    }
}
