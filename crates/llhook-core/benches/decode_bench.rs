//! Criterion benchmarks for the per-event decode path.
//!
//! Every intercepted event is copied out of its native record and queried on
//! the OS dispatch thread, so these numbers bound what a subscriber pays
//! before doing any work of its own.
//!
//! Run with:
//! ```bash
//! cargo bench --package llhook-core --bench decode_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use llhook_core::{
    ChainAction, KeyboardEvent, KeyboardRecord, MouseEvent, MouseRecord, Point, PolicyFlags,
    RawEventRecord, WindowsMessage,
};

fn bench_keyboard_decode(c: &mut Criterion) {
    let native = KeyboardRecord {
        vk_code: 0x41,
        scan_code: 0x1E,
        flags: 0x91,
        time: 1,
        extra_info: 0,
    };
    let raw = RawEventRecord::pointing_to(0, WindowsMessage::WM_KEYDOWN as usize, &native);

    let mut group = c.benchmark_group("decode_keyboard");
    group.bench_function("copy_and_query_flags", |b| {
        b.iter(|| {
            // SAFETY: `native` outlives the benchmark.
            let e = unsafe { KeyboardEvent::from_raw(black_box(&raw)) };
            e.map(|e| (e.is_key_up(), e.is_injected(), e.is_extended_key(), e.windows_message()))
        })
    });
    group.finish();
}

fn bench_mouse_decode(c: &mut Criterion) {
    let native = MouseRecord {
        pt: Point { x: 100, y: 200 },
        mouse_data: (120i32 << 16) as u32,
        flags: 0,
        time: 1,
        extra_info: 0,
    };
    let raw = RawEventRecord::pointing_to(0, WindowsMessage::WM_MOUSEWHEEL as usize, &native);

    let mut group = c.benchmark_group("decode_mouse");
    group.bench_function("copy_and_query_wheel", |b| {
        b.iter(|| {
            // SAFETY: `native` outlives the benchmark.
            let e = unsafe { MouseEvent::from_raw(black_box(&raw)) };
            e.map(|e| (e.x(), e.y(), e.wheel_direction(), e.x_button()))
        })
    });
    group.finish();
}

fn bench_chain_decision(c: &mut Criterion) {
    c.bench_function("chain_action_for_flags", |b| {
        b.iter(|| {
            ChainAction::for_flags(black_box(PolicyFlags {
                suppress_event: true,
                break_chain: false,
            }))
        })
    });
}

criterion_group!(
    benches,
    bench_keyboard_decode,
    bench_mouse_decode,
    bench_chain_decision
);
criterion_main!(benches);
