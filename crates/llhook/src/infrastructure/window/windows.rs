//! Win32 window queries.

#![cfg(target_os = "windows")]

use std::ffi::c_void;

use windows::Win32::Foundation::{GetLastError, HWND, RECT};
use windows::Win32::Graphics::Gdi::{GetWindowDC, ReleaseDC, HDC};
use windows::Win32::UI::WindowsAndMessaging::{
    GetDesktopWindow, GetForegroundWindow, GetWindowRect,
};

use super::{DcHandle, Rect, WindowError, WindowHandle, WindowQuery};

fn to_hwnd(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut c_void)
}

/// [`WindowQuery`] backed by `user32` / `gdi32`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32WindowQuery;

impl Win32WindowQuery {
    pub fn new() -> Self {
        Self
    }
}

impl WindowQuery for Win32WindowQuery {
    fn desktop_window(&self) -> WindowHandle {
        // SAFETY: no preconditions.
        WindowHandle(unsafe { GetDesktopWindow() }.0 as isize)
    }

    fn foreground_window(&self) -> Result<WindowHandle, WindowError> {
        // SAFETY: no preconditions; a null result means no foreground window.
        let hwnd = unsafe { GetForegroundWindow() };
        let window = WindowHandle(hwnd.0 as isize);
        if window.is_null() {
            Err(WindowError::NoForegroundWindow)
        } else {
            Ok(window)
        }
    }

    fn window_rect(&self, window: WindowHandle) -> Result<Rect, WindowError> {
        let mut rect = RECT::default();
        // SAFETY: `rect` is a valid out-pointer for the duration of the call.
        match unsafe { GetWindowRect(to_hwnd(window), &mut rect) } {
            Ok(()) => Ok(Rect {
                left: rect.left,
                top: rect.top,
                right: rect.right,
                bottom: rect.bottom,
            }),
            Err(_) => Err(WindowError::RectUnavailable {
                window: window.0,
                // SAFETY: reads the calling thread's last-error value.
                code: unsafe { GetLastError() }.0,
            }),
        }
    }

    fn acquire_dc(&self, window: WindowHandle) -> Result<DcHandle, WindowError> {
        // SAFETY: an invalid window yields a null DC, which is checked below.
        let hdc = unsafe { GetWindowDC(Some(to_hwnd(window))) };
        if hdc.is_invalid() {
            return Err(WindowError::DcUnavailable(window.0));
        }
        Ok(DcHandle(hdc.0 as isize))
    }

    fn release_dc(&self, window: WindowHandle, dc: DcHandle) -> bool {
        // SAFETY: `dc` was obtained from GetWindowDC for `window`.
        unsafe { ReleaseDC(Some(to_hwnd(window)), HDC(dc.0 as *mut c_void)) == 1 }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
