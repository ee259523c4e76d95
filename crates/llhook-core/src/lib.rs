//! # llhook-core
//!
//! OS-independent half of the llhook input interception stack.
//!
//! Windows delivers every low-level input event to a hook procedure as three
//! primitive values: a processing code, a message identifier, and a pointer
//! to an OS-owned record.  This crate owns everything that can be said about
//! those values without calling the OS:
//!
//! - **`record`** – The raw triplet ([`RawEventRecord`]) and `#[repr(C)]`
//!   mirrors of the native `KBDLLHOOKSTRUCT` / `MSLLHOOKSTRUCT` layouts.
//!
//! - **`keyboard`** / **`mouse`** – Typed events copied out of the native
//!   record once, with side-effect-free accessors for every decoded field
//!   (extended key, injected, alt-down, key-up, wheel direction, X-button).
//!
//! - **`message`** – The `WM_*` message identifiers a low-level hook sees.
//!
//! - **`kind`** – The closed set of hook chain types (`WH_*`).
//!
//! - **`policy`** – The two consumer flags and the pure table that turns them
//!   into a chain action.  The relay in the `llhook` crate applies it.
//!
//! Nothing here touches the OS, so the whole crate builds and tests on any
//! platform.

pub mod keyboard;
pub mod kind;
pub mod message;
pub mod mouse;
pub mod policy;
pub mod record;

pub use keyboard::{KeyboardEvent, KeyboardFlags};
pub use kind::{HookKind, KindError};
pub use message::WindowsMessage;
pub use mouse::{MouseEvent, MouseFlags, WheelDirection, XButton};
pub use policy::{ChainAction, PolicyFlags, HALT_RESULT, SWALLOW_RESULT};
pub use record::{
    KeyboardRecord, LParam, LResult, MouseRecord, Point, RawEventRecord, WParam,
};
