//! Window-query collaborator: desktop/foreground windows, window geometry,
//! and scoped device-context access.
//!
//! Each platform implements [`WindowQuery`]; the Win32 one is re-exported as
//! `NativeWindowQuery`.  [`MockWindowQuery`] is always compiled so the RAII
//! guard can be tested anywhere.
//!
//! | Module    | OS      | API used                                                    |
//! |-----------|---------|-------------------------------------------------------------|
//! | `windows` | Windows | `GetDesktopWindow`, `GetForegroundWindow`, `GetWindowRect`, `GetWindowDC` / `ReleaseDC` |

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

/// Opaque window handle (`HWND`).  Zero means "no window".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub const NULL: WindowHandle = WindowHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Opaque device-context handle (`HDC`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DcHandle(pub isize);

/// Screen-space rectangle, right/bottom exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Error type for window queries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    /// No window currently has the foreground.
    #[error("no foreground window")]
    NoForegroundWindow,

    /// `GetWindowRect` failed for the window.
    #[error("could not read rectangle of window {window:#x} (os error {code})")]
    RectUnavailable { window: isize, code: u32 },

    /// No device context could be obtained for the window.
    #[error("could not acquire device context for window {0:#x}")]
    DcUnavailable(isize),
}

/// Queries about top-level windows.
pub trait WindowQuery {
    /// Handle of the desktop window.
    fn desktop_window(&self) -> WindowHandle;

    /// Handle of the window with keyboard focus.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::NoForegroundWindow`] when no window is active,
    /// e.g. while the secure desktop is shown.
    fn foreground_window(&self) -> Result<WindowHandle, WindowError>;

    /// Bounding rectangle of `window` in screen coordinates.
    fn window_rect(&self, window: WindowHandle) -> Result<Rect, WindowError>;

    /// Raw DC acquisition.  Prefer [`DeviceContext::acquire`].
    fn acquire_dc(&self, window: WindowHandle) -> Result<DcHandle, WindowError>;

    /// Raw DC release.  Returns `false` if the OS refused.
    fn release_dc(&self, window: WindowHandle, dc: DcHandle) -> bool;
}

/// A device context that is released when dropped.
pub struct DeviceContext<'q, Q: WindowQuery + ?Sized> {
    query: &'q Q,
    window: WindowHandle,
    dc: DcHandle,
}

impl<'q, Q: WindowQuery + ?Sized> DeviceContext<'q, Q> {
    /// Acquires the whole-window DC for `window`.
    ///
    /// # Errors
    ///
    /// Propagates [`WindowError::DcUnavailable`] from the query.
    pub fn acquire(query: &'q Q, window: WindowHandle) -> Result<Self, WindowError> {
        let dc = query.acquire_dc(window)?;
        Ok(Self { query, window, dc })
    }

    pub fn handle(&self) -> DcHandle {
        self.dc
    }

    pub fn window(&self) -> WindowHandle {
        self.window
    }
}

impl<Q: WindowQuery + ?Sized> Drop for DeviceContext<'_, Q> {
    fn drop(&mut self) {
        if !self.query.release_dc(self.window, self.dc) {
            warn!(window = self.window.0, dc = self.dc.0, "ReleaseDC failed");
        }
    }
}

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::Win32WindowQuery as NativeWindowQuery;

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// In-memory window table with DC bookkeeping.
#[derive(Debug, Default)]
pub struct MockWindowQuery {
    pub desktop: WindowHandle,
    pub foreground: Option<WindowHandle>,
    rects: HashMap<isize, Rect>,
    outstanding: RefCell<Vec<DcHandle>>,
    next_dc: Cell<isize>,
    acquired: Cell<usize>,
    released: Cell<usize>,
}

impl MockWindowQuery {
    /// A single 1920×1080 desktop window that is also in the foreground.
    pub fn single_1080p() -> Self {
        let desktop = WindowHandle(0x10010);
        let mut query = Self {
            desktop,
            foreground: Some(desktop),
            ..Self::default()
        };
        query.insert(
            desktop,
            Rect {
                left: 0,
                top: 0,
                right: 1920,
                bottom: 1080,
            },
        );
        query
    }

    pub fn insert(&mut self, window: WindowHandle, rect: Rect) {
        self.rects.insert(window.0, rect);
    }

    pub fn acquired(&self) -> usize {
        self.acquired.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    /// DCs handed out and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding.borrow().len()
    }
}

impl WindowQuery for MockWindowQuery {
    fn desktop_window(&self) -> WindowHandle {
        self.desktop
    }

    fn foreground_window(&self) -> Result<WindowHandle, WindowError> {
        self.foreground.ok_or(WindowError::NoForegroundWindow)
    }

    fn window_rect(&self, window: WindowHandle) -> Result<Rect, WindowError> {
        self.rects
            .get(&window.0)
            .copied()
            .ok_or(WindowError::RectUnavailable {
                window: window.0,
                code: 1400, // ERROR_INVALID_WINDOW_HANDLE
            })
    }

    fn acquire_dc(&self, window: WindowHandle) -> Result<DcHandle, WindowError> {
        if !self.rects.contains_key(&window.0) {
            return Err(WindowError::DcUnavailable(window.0));
        }
        let dc = DcHandle(0x2000 + self.next_dc.get());
        self.next_dc.set(self.next_dc.get() + 1);
        self.acquired.set(self.acquired.get() + 1);
        self.outstanding.borrow_mut().push(dc);
        Ok(dc)
    }

    fn release_dc(&self, _window: WindowHandle, dc: DcHandle) -> bool {
        let mut outstanding = self.outstanding.borrow_mut();
        match outstanding.iter().position(|d| *d == dc) {
            Some(index) => {
                outstanding.remove(index);
                self.released.set(self.released.get() + 1);
                true
            }
            None => false,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
