//! Integration tests for the hook lifecycle and callback relay.
//!
//! These tests drive controllers through their public API against
//! [`RecordingHookApi`], then feed synthesized events to the controller's
//! trampoline slot via `relay::dispatch`, exactly as the OS trampoline would.
//! The recording API captures every chain-forwarding call so the tests can
//! assert on the precise handle each event was forwarded with.
//!
//! Each `#[test]` runs on its own thread, so every test starts with an empty
//! slot table.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use llhook::application::monitor::{attach_keyboard, MonitorRules};
use llhook::application::relay::{dispatch, occupied_slots, MAX_HOOK_SLOTS};
use llhook::core::{
    HookKind, KeyboardRecord, LResult, MouseRecord, Point, RawEventRecord, WheelDirection,
    WindowsMessage,
};
use llhook::infrastructure::os_hooks::mock::{RecordingHookApi, MOCK_MODULE_BASE};
use llhook::{GenericHook, HookController, HookError, HookHandle, KeyboardHook, MouseHook};

type Api = Rc<RecordingHookApi>;

fn key_record(vk_code: u32, flags: u32) -> KeyboardRecord {
    KeyboardRecord {
        vk_code,
        scan_code: 0x1E,
        flags,
        time: 1_000,
        extra_info: 0,
    }
}

fn send_key(slot: usize, message: u32, native: &KeyboardRecord) -> Option<LResult> {
    let raw = RawEventRecord::pointing_to(0, message as usize, native);
    // SAFETY: `native` outlives the dispatch and matches the keyboard chain.
    unsafe { dispatch(slot, raw.code, raw.wparam, raw.lparam) }
}

fn installed_keyboard(api: &Api) -> KeyboardHook<Api> {
    let hook = HookController::keyboard(Rc::clone(api));
    hook.install().expect("install keyboard hook");
    hook
}

fn slot_of<V: llhook::HookVariant>(hook: &HookController<V, Api>) -> usize {
    hook.slot().expect("installed hook holds a slot")
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn test_install_registers_low_level_keyboard_hook() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = HookController::keyboard(Rc::clone(&api));

    // Act
    hook.install().expect("install");

    // Assert
    assert!(hook.is_installed());
    let installs = api.installs();
    assert_eq!(installs.len(), 1);
    assert_eq!(installs[0].kind, HookKind::KeyboardLowLevel);
    assert_eq!(installs[0].module, MOCK_MODULE_BASE);
    assert_eq!(installs[0].thread_id, 0);
    assert_eq!(Some(installs[0].slot), hook.slot());
}

#[test]
fn test_mouse_hook_joins_the_mouse_chain() {
    let api = Rc::new(RecordingHookApi::new());
    let hook: MouseHook<Api> = HookController::mouse(Rc::clone(&api));

    hook.install().expect("install");

    assert_eq!(api.installs()[0].kind, HookKind::MouseLowLevel);
}

#[test]
fn test_generic_hook_uses_requested_kind() {
    let api = Rc::new(RecordingHookApi::new());
    let hook: GenericHook<Api> = HookController::generic(HookKind::Cbt, Rc::clone(&api));

    hook.install().expect("install");

    assert_eq!(hook.kind(), HookKind::Cbt);
    assert_eq!(api.installs()[0].kind, HookKind::Cbt);
}

#[test]
fn test_second_install_fails_and_leaves_hook_uninstalled() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = installed_keyboard(&api);
    let first = hook.handle();

    // Act
    let result = hook.install();

    // Assert
    assert_eq!(result, Err(HookError::AlreadyInstalled));
    assert_eq!(hook.handle(), HookHandle::NULL);
    assert_eq!(hook.slot(), None);
    assert_eq!(api.unhooks(), vec![first]);
    assert_eq!(api.live_hooks(), 0);
    assert_eq!(api.installs().len(), 1);
}

#[test]
fn test_uninstall_without_install_reports_failure() {
    let api = Rc::new(RecordingHookApi::new());
    let hook = HookController::keyboard(Rc::clone(&api));

    assert!(!hook.uninstall());
    assert!(!hook.uninstall());
    assert_eq!(api.unhooks(), vec![HookHandle::NULL, HookHandle::NULL]);
}

#[test]
fn test_uninstall_removes_hook_and_frees_slot() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = installed_keyboard(&api);
    let slot = slot_of(&hook);

    // Act
    let removed = hook.uninstall();

    // Assert
    assert!(removed);
    assert!(!hook.is_installed());
    assert_eq!(occupied_slots(), 0);
    assert_eq!(send_key(slot, WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0)), None);
}

#[test]
fn test_os_refusal_reports_code_and_frees_slot() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    api.fail_installs_with(Some(5));
    let hook = HookController::keyboard(Rc::clone(&api));

    // Act
    let result = hook.install();

    // Assert
    assert_eq!(
        result,
        Err(HookError::InstallFailed {
            kind: HookKind::KeyboardLowLevel,
            code: 5
        })
    );
    assert!(!hook.is_installed());
    assert_eq!(occupied_slots(), 0);
}

#[test]
fn test_base_address_failure_skips_registration() {
    let api = Rc::new(RecordingHookApi::new());
    api.fail_module_base_with(Some(126));
    let hook = HookController::keyboard(Rc::clone(&api));

    assert_eq!(hook.install(), Err(HookError::BaseAddressUnavailable(126)));
    assert!(api.installs().is_empty());
}

#[test]
fn test_slot_exhaustion_fails_without_os_call() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hooks: Vec<GenericHook<Api>> = (0..MAX_HOOK_SLOTS)
        .map(|_| {
            let hook = HookController::generic(HookKind::MouseLowLevel, Rc::clone(&api));
            hook.install().expect("install");
            hook
        })
        .collect();
    let extra = HookController::generic(HookKind::MouseLowLevel, Rc::clone(&api));

    // Act
    let result = extra.install();

    // Assert
    assert_eq!(result, Err(HookError::NoFreeSlot(MAX_HOOK_SLOTS)));
    assert_eq!(api.installs().len(), MAX_HOOK_SLOTS);
    drop(hooks);
    assert_eq!(occupied_slots(), 0);
    extra.install().expect("slot available again");
}

#[test]
fn test_dropping_controller_uninstalls() {
    let api = Rc::new(RecordingHookApi::new());
    {
        let _hook = installed_keyboard(&api);
        assert_eq!(api.live_hooks(), 1);
    }
    assert_eq!(api.live_hooks(), 0);
    assert_eq!(occupied_slots(), 0);
}

// ── Relay decisions ───────────────────────────────────────────────────────────

#[test]
fn test_negative_code_forwards_without_notifying() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    api.set_next_result(7);
    let hook = installed_keyboard(&api);
    hook.set_suppress_event(true);
    hook.set_break_chain(true);
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    hook.on_processing(move |_, _| {
        seen.set(seen.get() + 1);
        Ok(())
    });
    let native = key_record(0x41, 0);
    let raw = RawEventRecord::pointing_to(-1, WindowsMessage::WM_KEYDOWN as usize, &native);

    // Act
    // SAFETY: `native` outlives the dispatch.
    let result = unsafe { dispatch(slot_of(&hook), raw.code, raw.wparam, raw.lparam) };

    // Assert
    assert_eq!(result, Some(7));
    assert_eq!(calls.get(), 0);
    let forwards = api.forwards();
    assert_eq!(forwards.len(), 1);
    assert_eq!(forwards[0].handle, hook.handle());
    assert_eq!(forwards[0].code, -1);
    assert_eq!(forwards[0].lparam, raw.lparam);
}

#[test]
fn test_policy_table_for_every_flag_combination() {
    let cases = [
        // (suppress, break, result, forwarded, anchored on own handle)
        (false, false, 42, true, true),
        (true, false, 1, true, false),
        (true, true, 1, false, false),
        (false, true, 0, false, false),
    ];

    for (suppress, break_chain, expected, forwarded, own_handle) in cases {
        // Arrange
        let api = Rc::new(RecordingHookApi::new());
        api.set_next_result(42);
        let hook = installed_keyboard(&api);
        hook.set_suppress_event(suppress);
        hook.set_break_chain(break_chain);

        // Act
        let result = send_key(slot_of(&hook), WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));

        // Assert
        assert_eq!(result, Some(expected), "suppress={suppress} break={break_chain}");
        let forwards = api.forwards();
        assert_eq!(forwards.len(), usize::from(forwarded));
        if forwarded {
            let anchor = if own_handle { hook.handle() } else { HookHandle::NULL };
            assert_eq!(forwards[0].handle, anchor);
            assert_eq!(forwards[0].code, 0);
            assert_eq!(forwards[0].wparam, WindowsMessage::WM_KEYDOWN as usize);
        }
    }
}

#[test]
fn test_keyboard_passthrough_delivers_decoded_event() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = installed_keyboard(&api);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    hook.on_key(move |event, _| {
        sink.borrow_mut().push((
            event.virtual_key_code(),
            event.is_extended_key(),
            event.is_key_up(),
            event.is_injected(),
        ));
        Ok(())
    });

    // Act
    let native = key_record(0x0D, 0x91);
    let result = send_key(slot_of(&hook), WindowsMessage::WM_KEYUP, &native);

    // Assert
    assert_eq!(result, Some(0));
    assert_eq!(*seen.borrow(), vec![(0x0D, true, true, true)]);
    assert_eq!(api.forwards()[0].handle, hook.handle());
}

#[test]
fn test_generic_notification_precedes_typed_notification() {
    let api = Rc::new(RecordingHookApi::new());
    let hook = installed_keyboard(&api);
    let order = Rc::new(RefCell::new(Vec::new()));
    let typed = Rc::clone(&order);
    hook.on_key(move |_, _| {
        typed.borrow_mut().push("key");
        Ok(())
    });
    let generic = Rc::clone(&order);
    hook.on_processing(move |raw, _| {
        generic.borrow_mut().push("processing");
        assert_eq!(raw.message_id(), WindowsMessage::WM_KEYDOWN);
        Ok(())
    });

    send_key(slot_of(&hook), WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));

    assert_eq!(*order.borrow(), vec!["processing", "key"]);
}

#[test]
fn test_subscriber_sets_policy_per_event() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = installed_keyboard(&api);
    hook.on_key(|event, policy| {
        policy.set_suppress_event(event.virtual_key_code() == 0x5B);
        Ok(())
    });
    let slot = slot_of(&hook);

    // Act
    let win_key = send_key(slot, WindowsMessage::WM_KEYDOWN, &key_record(0x5B, 0x01));
    let letter = send_key(slot, WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));

    // Assert
    assert_eq!(win_key, Some(1));
    assert_eq!(letter, Some(0));
    let forwards = api.forwards();
    assert_eq!(forwards.len(), 2);
    assert_eq!(forwards[0].handle, HookHandle::NULL);
    assert_eq!(forwards[1].handle, hook.handle());
}

#[test]
fn test_null_record_skips_typed_subscribers_but_applies_policy() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = installed_keyboard(&api);
    hook.set_suppress_event(true);
    hook.set_break_chain(true);
    let typed = Rc::new(Cell::new(0));
    let generic = Rc::new(Cell::new(0));
    let t = Rc::clone(&typed);
    hook.on_key(move |_, _| {
        t.set(t.get() + 1);
        Ok(())
    });
    let g = Rc::clone(&generic);
    hook.on_processing(move |_, _| {
        g.set(g.get() + 1);
        Ok(())
    });

    // Act
    // SAFETY: a null record pointer is part of the dispatch contract.
    let result = unsafe { dispatch(slot_of(&hook), 0, WindowsMessage::WM_KEYDOWN as usize, 0) };

    // Assert
    assert_eq!(result, Some(1));
    assert_eq!(typed.get(), 0);
    assert_eq!(generic.get(), 1);
}

#[test]
fn test_mouse_wheel_reaches_mouse_subscribers() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = HookController::mouse(Rc::clone(&api));
    hook.install().expect("install");
    let seen = Rc::new(Cell::new(None));
    let sink = Rc::clone(&seen);
    hook.on_mouse(move |event, _| {
        sink.set(Some((event.x(), event.y(), event.wheel_direction())));
        Ok(())
    });
    let native = MouseRecord {
        pt: Point { x: 640, y: 480 },
        mouse_data: (-120i32 << 16) as u32,
        flags: 0,
        time: 9,
        extra_info: 0,
    };
    let raw = RawEventRecord::pointing_to(0, WindowsMessage::WM_MOUSEWHEEL as usize, &native);

    // Act
    // SAFETY: `native` outlives the dispatch and matches the mouse chain.
    unsafe { dispatch(slot_of(&hook), raw.code, raw.wparam, raw.lparam) };

    // Assert
    assert_eq!(seen.get(), Some((640, 480, Some(WheelDirection::Down))));
}

// ── Subscriber faults ─────────────────────────────────────────────────────────

#[test]
fn test_subscriber_error_forces_passthrough() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = installed_keyboard(&api);
    hook.set_suppress_event(true);
    hook.set_break_chain(true);
    let later = Rc::new(Cell::new(false));
    let flag = Rc::clone(&later);
    hook.on_key(|_, _| anyhow::bail!("subscriber failed"));
    hook.on_key(move |_, _| {
        flag.set(true);
        Ok(())
    });

    // Act
    let result = send_key(slot_of(&hook), WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));

    // Assert
    assert_eq!(result, Some(0));
    assert!(!later.get(), "notification stops at the failing subscriber");
    assert_eq!(api.forwards()[0].handle, hook.handle());
    assert!(hook.suppress_event());
    assert!(hook.break_chain());
}

#[test]
fn test_subscriber_panic_forces_passthrough_and_hook_survives() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = installed_keyboard(&api);
    hook.set_break_chain(true);
    let armed = Rc::new(Cell::new(true));
    let trigger = Rc::clone(&armed);
    hook.on_key(move |_, _| {
        if trigger.replace(false) {
            panic!("subscriber blew up");
        }
        Ok(())
    });
    let slot = slot_of(&hook);

    // Act
    let faulted = send_key(slot, WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));
    let forwarded_on_fault = api.forwards();
    api.clear_forwards();
    let normal = send_key(slot, WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));

    // Assert
    assert_eq!(faulted, Some(0));
    assert_eq!(forwarded_on_fault.len(), 1);
    assert_eq!(forwarded_on_fault[0].handle, hook.handle());
    assert_eq!(normal, Some(0), "break_chain without suppress halts");
    assert!(api.forwards().is_empty());
}

#[test]
fn test_reentrant_dispatch_passes_inner_event_through() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    api.set_next_result(3);
    let hook = installed_keyboard(&api);
    hook.set_suppress_event(true);
    hook.set_break_chain(true);
    let slot = slot_of(&hook);
    let inner = Rc::new(Cell::new(None));
    let sink = Rc::clone(&inner);
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    hook.on_key(move |_, _| {
        counter.set(counter.get() + 1);
        if counter.get() == 1 {
            let native = key_record(0x42, 0);
            sink.set(send_key(slot, WindowsMessage::WM_KEYDOWN, &native));
        }
        Ok(())
    });

    // Act
    let outer = send_key(slot, WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));

    // Assert
    assert_eq!(calls.get(), 1);
    assert_eq!(inner.get(), Some(3));
    assert_eq!(outer, Some(1));
    let forwards = api.forwards();
    assert_eq!(forwards.len(), 1);
    assert_eq!(forwards[0].handle, hook.handle());
}

// ── Multiple controllers ──────────────────────────────────────────────────────

#[test]
fn test_each_controller_forwards_with_its_own_handle() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let first = installed_keyboard(&api);
    let second = installed_keyboard(&api);

    // Act
    send_key(slot_of(&first), WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));
    send_key(slot_of(&second), WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));

    // Assert
    assert_ne!(first.handle(), second.handle());
    assert_ne!(first.slot(), second.slot());
    let forwards = api.forwards();
    assert_eq!(forwards[0].handle, first.handle());
    assert_eq!(forwards[1].handle, second.handle());
}

#[test]
fn test_subscriber_may_uninstall_its_own_hook() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = Rc::new(installed_keyboard(&api));
    let owned = hook.handle();
    let slot = slot_of(&hook);
    let weak: Weak<KeyboardHook<Api>> = Rc::downgrade(&hook);
    hook.on_key(move |_, _| {
        if let Some(hook) = weak.upgrade() {
            hook.uninstall();
        }
        Ok(())
    });

    // Act
    let result = send_key(slot, WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));

    // Assert
    assert_eq!(result, Some(0));
    assert!(!hook.is_installed());
    assert_eq!(api.unhooks(), vec![owned]);
    assert_eq!(api.forwards()[0].handle, HookHandle::NULL);
    assert_eq!(send_key(slot, WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0)), None);
}

#[test]
fn test_subscriber_may_install_another_hook() {
    let api = Rc::new(RecordingHookApi::new());
    let hook = installed_keyboard(&api);
    let spawned: Rc<RefCell<Option<KeyboardHook<Api>>>> = Rc::new(RefCell::new(None));
    let slot_holder = Rc::clone(&spawned);
    let factory = Rc::clone(&api);
    hook.on_key(move |_, _| {
        let extra = HookController::keyboard(Rc::clone(&factory));
        extra.install()?;
        *slot_holder.borrow_mut() = Some(extra);
        Ok(())
    });

    let result = send_key(slot_of(&hook), WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));

    assert_eq!(result, Some(0));
    assert_eq!(occupied_slots(), 2);
    assert!(spawned.borrow().as_ref().is_some_and(|h| h.is_installed()));
}

// ── Monitor rules ─────────────────────────────────────────────────────────────

#[test]
fn test_monitor_rules_swallow_listed_keys_only() {
    // Arrange
    let api = Rc::new(RecordingHookApi::new());
    let hook = installed_keyboard(&api);
    attach_keyboard(&hook, MonitorRules::new([0x5B], false, false));
    let slot = slot_of(&hook);

    // Act
    let blocked = send_key(slot, WindowsMessage::WM_KEYDOWN, &key_record(0x5B, 0x01));
    let passed = send_key(slot, WindowsMessage::WM_KEYDOWN, &key_record(0x41, 0));

    // Assert
    assert_eq!(blocked, Some(1));
    assert_eq!(passed, Some(0));
    let forwards = api.forwards();
    assert_eq!(forwards[0].handle, HookHandle::NULL);
    assert_eq!(forwards[1].handle, hook.handle());
}
