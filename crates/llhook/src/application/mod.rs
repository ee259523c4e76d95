//! Application layer: the hook lifecycle and the callback relay.
//!
//! Nothing in this layer calls the OS directly.  Every OS primitive goes
//! through the [`hook_api::HookApi`] trait, which the infrastructure layer
//! implements for Win32 and for tests.
//!
//! # Sub-modules
//!
//! - **`hook_api`**    – The OS primitive seam and the error taxonomy.
//! - **`controller`**  – `HookController`: install/uninstall state machine,
//!   policy flags, and the relay body that applies them.
//! - **`relay`**       – Per-thread trampoline slots and `dispatch`, the entry
//!   point every OS trampoline calls.
//! - **`subscribers`** – Subscriber lists that tolerate registration while
//!   an event is being published.
//! - **`variants`**    – Keyboard, mouse and generic hook flavours.
//! - **`monitor`**     – Suppression rules and logging for `llhook-monitor`.

pub mod controller;
pub mod hook_api;
pub mod monitor;
pub mod relay;
pub mod subscribers;
pub mod variants;
