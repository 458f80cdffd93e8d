//! Tracker hot-path benchmarks: accumulate, churn, sweep.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fracture_core::{
    BlockPos, CrackBroadcast, CrackTracker, CrackUpdate, TimeSource, TrackerConfig, WorldAccess,
};

struct OpenWorld;

impl WorldAccess for OpenWorld {
    fn is_crackable(&self, _position: BlockPos) -> bool {
        true
    }

    fn break_block(&self, _position: BlockPos) {}
}

struct NullBroadcast;

impl CrackBroadcast for NullBroadcast {
    fn send_crack(&self, _update: CrackUpdate) {}
}

struct FixedClock(u64);

impl TimeSource for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

fn bench_apply_same_position(c: &mut Criterion) {
    let tracker = CrackTracker::new(
        TrackerConfig::default(),
        OpenWorld,
        NullBroadcast,
        FixedClock(0),
    );
    let pos = BlockPos::new(0, 64, 0);

    c.bench_function("apply_damage_same_position", |b| {
        b.iter(|| tracker.apply_damage(black_box(pos), black_box(1)));
    });
}

fn bench_apply_across_positions(c: &mut Criterion) {
    let config = TrackerConfig {
        max_tracked: 4096,
        ..TrackerConfig::default()
    };
    let tracker = CrackTracker::new(config, OpenWorld, NullBroadcast, FixedClock(0));
    let mut i = 0i32;

    c.bench_function("apply_damage_fresh_positions", |b| {
        b.iter(|| {
            i = i.wrapping_add(1);
            tracker.apply_damage(black_box(BlockPos::new(i, 64, -i)), black_box(1));
        });
    });
}

fn bench_sweep_full_set(c: &mut Criterion) {
    let config = TrackerConfig {
        max_tracked: 1024,
        regen_millis: 1_000_000,
        ..TrackerConfig::default()
    };
    let tracker = CrackTracker::new(config, OpenWorld, NullBroadcast, FixedClock(0));
    for i in 0..1024i32 {
        tracker.apply_damage(BlockPos::new(i, 0, 0), 1);
    }

    // Nothing is old enough to expire; this measures the scan itself.
    c.bench_function("sweep_1024_live_records", |b| {
        b.iter(|| tracker.sweep_expired(black_box(500_000)));
    });
}

criterion_group!(
    benches,
    bench_apply_same_position,
    bench_apply_across_positions,
    bench_sweep_full_set
);
criterion_main!(benches);
