//! Raw hook arguments and the native record layouts they point at.
//!
//! # Lifetime of native data
//!
//! The record behind `lParam` is owned by the OS and only valid while the
//! hook procedure runs.  Typed events therefore copy the record out exactly
//! once ([`RawEventRecord::read`]) and never keep the pointer.

use std::ptr;

/// `WPARAM`: pointer-sized unsigned message identifier.
pub type WParam = usize;
/// `LPARAM`: pointer-sized signed data word (here: pointer to a native record).
pub type LParam = isize;
/// `LRESULT`: pointer-sized signed hook procedure result.
pub type LResult = isize;

/// The three primitive values a hook procedure receives for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEventRecord {
    /// Processing code (`nCode`).  Negative codes carry no payload.
    pub code: i32,
    /// Message identifier (`wParam`).
    pub wparam: WParam,
    /// Address of the native record (`lParam`).
    pub lparam: LParam,
}

impl RawEventRecord {
    pub fn new(code: i32, wparam: WParam, lparam: LParam) -> Self {
        Self {
            code,
            wparam,
            lparam,
        }
    }

    /// Builds a record whose `lParam` is the address of `native`.
    ///
    /// Used to synthesize events in tests and benchmarks.  The returned value
    /// must not outlive `native` if it is going to be [`read`](Self::read).
    pub fn pointing_to<T>(code: i32, wparam: WParam, native: &T) -> Self {
        Self::new(code, wparam, native as *const T as LParam)
    }

    /// `false` when the OS asks the hook to pass the event along untouched.
    pub fn is_actionable(&self) -> bool {
        self.code >= 0
    }

    /// Message identifier as a `u32`.
    pub fn message_id(&self) -> u32 {
        self.wparam as u32
    }

    /// Copies the native record out of `lParam`.
    ///
    /// Returns `None` when `lParam` is null.
    ///
    /// # Safety
    ///
    /// A non-null `lParam` must point to a valid, initialized `T` for the
    /// duration of this call.  Inside a low-level hook procedure that is the
    /// OS's guarantee for `T = KeyboardRecord` / `T = MouseRecord`.
    pub unsafe fn read<T: Copy>(&self) -> Option<T> {
        if self.lparam == 0 {
            tracing::trace!(code = self.code, wparam = self.wparam, "null record pointer");
            return None;
        }
        // SAFETY: non-null and valid per the caller's contract.  The OS
        // guarantees natural alignment; read_unaligned keeps synthesized
        // records from packed buffers sound as well.
        Some(ptr::read_unaligned(self.lparam as *const T))
    }
}

/// Screen coordinates (`POINT`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Layout of the OS `KBDLLHOOKSTRUCT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardRecord {
    /// Virtual key code (1..=254).
    pub vk_code: u32,
    /// Hardware scan code.
    pub scan_code: u32,
    /// `LLKHF_*` bit flags.
    pub flags: u32,
    /// Milliseconds since system start.
    pub time: u32,
    /// `dwExtraInfo` (`ULONG_PTR`).
    pub extra_info: usize,
}

/// Layout of the OS `MSLLHOOKSTRUCT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseRecord {
    /// Cursor position in per-monitor-aware screen coordinates.
    pub pt: Point,
    /// Wheel delta or X-button identity in the high word, depending on the message.
    pub mouse_data: u32,
    /// `LLMHF_*` bit flags.
    pub flags: u32,
    /// Milliseconds since system start.
    pub time: u32,
    /// `dwExtraInfo` (`ULONG_PTR`).
    pub extra_info: usize,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_code_is_not_actionable() {
        assert!(!RawEventRecord::new(-1, 0, 0).is_actionable());
        assert!(RawEventRecord::new(0, 0, 0).is_actionable());
    }

    #[test]
    fn test_read_null_pointer_returns_none() {
        let raw = RawEventRecord::new(0, 0x100, 0);
        // SAFETY: null is handled without dereferencing.
        let rec: Option<KeyboardRecord> = unsafe { raw.read() };
        assert!(rec.is_none());
    }

    #[test]
    fn test_read_copies_the_record() {
        // Arrange
        let mut native = KeyboardRecord {
            vk_code: 0x41,
            scan_code: 0x1E,
            flags: 0,
            time: 99,
            extra_info: 7,
        };
        let raw = RawEventRecord::pointing_to(0, 0x100, &native);

        // Act
        // SAFETY: `native` is alive and initialized.
        let copy: KeyboardRecord = unsafe { raw.read() }.expect("non-null");
        native.vk_code = 0x42;

        // Assert: the copy is independent of the native memory.
        assert_eq!(copy.vk_code, 0x41);
        assert_eq!(copy.extra_info, 7);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_native_layout_sizes_match_winuser() {
        assert_eq!(std::mem::size_of::<KeyboardRecord>(), 24);
        assert_eq!(std::mem::size_of::<MouseRecord>(), 32);
    }
}
