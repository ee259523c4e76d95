//! llhook library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the `llhook-monitor` binary share the same module tree.

pub mod application;
pub mod infrastructure;

pub use application::controller::{HookController, HookVariant, Policy};
pub use application::hook_api::{HookApi, HookError, HookHandle, ModuleBase};
pub use application::variants::{
    GenericHook, GenericVariant, KeyboardHook, KeyboardVariant, MouseHook, MouseVariant,
};
pub use llhook_core as core;
