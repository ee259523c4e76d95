//! Monitor use case: log every intercepted event and apply suppression rules.
//!
//! This is what `llhook-monitor` wires onto its hooks.  The rules are plain
//! data so they can be built from configuration and unit tested without any
//! OS hook installed.

use std::collections::HashSet;

use llhook_core::{KeyboardEvent, MouseEvent, PolicyFlags, WindowsMessage};
use tracing::{debug, info};

use crate::application::controller::Policy;
use crate::application::hook_api::HookApi;
use crate::application::variants::{KeyboardHook, MouseHook};

/// Suppression rules evaluated for every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorRules {
    suppress_keys: HashSet<u32>,
    suppress_wheel: bool,
    break_chain: bool,
}

impl MonitorRules {
    pub fn new(
        suppress_keys: impl IntoIterator<Item = u32>,
        suppress_wheel: bool,
        break_chain: bool,
    ) -> Self {
        Self {
            suppress_keys: suppress_keys.into_iter().collect(),
            suppress_wheel,
            break_chain,
        }
    }

    /// Policy for a keyboard event: suppress listed virtual keys, both on
    /// press and release so no application sees half a keystroke.
    pub fn key_policy(&self, event: &KeyboardEvent) -> PolicyFlags {
        PolicyFlags {
            suppress_event: self.suppress_keys.contains(&event.virtual_key_code()),
            break_chain: self.break_chain,
        }
    }

    /// Policy for a mouse event: optionally suppress vertical wheel events.
    pub fn mouse_policy(&self, event: &MouseEvent) -> PolicyFlags {
        PolicyFlags {
            suppress_event: self.suppress_wheel && event.wheel_direction().is_some(),
            break_chain: self.break_chain,
        }
    }
}

/// Subscribes the monitor's logger and rules to a keyboard hook.
pub fn attach_keyboard<A: HookApi + 'static>(hook: &KeyboardHook<A>, rules: MonitorRules) {
    hook.on_key(move |event, policy: &Policy| {
        let flags = rules.key_policy(event);
        policy.set_flags(flags);
        info!(
            vk = event.virtual_key_code(),
            scan = event.scan_code(),
            message = ?event.windows_message(),
            up = event.is_key_up(),
            extended = event.is_extended_key(),
            injected = event.is_injected(),
            alt = event.is_alt_down(),
            suppressed = flags.suppress_event,
            "key"
        );
        Ok(())
    });
}

/// Subscribes the monitor's logger and rules to a mouse hook.
pub fn attach_mouse<A: HookApi + 'static>(hook: &MouseHook<A>, rules: MonitorRules) {
    hook.on_mouse(move |event, policy: &Policy| {
        let flags = rules.mouse_policy(event);
        policy.set_flags(flags);
        if event.windows_message() == WindowsMessage::MouseMove {
            debug!(x = event.x(), y = event.y(), injected = event.is_injected(), "mouse move");
        } else {
            info!(
                x = event.x(),
                y = event.y(),
                message = ?event.windows_message(),
                wheel = ?event.wheel_direction(),
                xbutton = ?event.x_button(),
                injected = event.is_injected(),
                suppressed = flags.suppress_event,
                "mouse"
            );
        }
        Ok(())
    });
}

// ── Tests ─────────────────────────────────────────────────────────────────────
