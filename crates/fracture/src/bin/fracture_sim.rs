//! Self-contained crack-lifecycle scenario.
//!
//! Wires the full stack against a synthetic world, fires a burst of
//! projectile and explosion events, waits out the regen window, and
//! reports what observers would have seen. Run with:
//!
//! ```text
//! RUST_LOG=debug cargo run --bin fracture_sim --features sim
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use fracture::{ChannelBroadcast, FractureConfig, ImpactRouter, ProjectileKind, RegenScheduler, WorldEvent};
use fracture_core::{BlockPos, CrackTracker, CrackUpdate, WallClock, WorldAccess};

/// Flat synthetic terrain: solid ground below y = 64, air above.
struct QuarryWorld;

impl WorldAccess for QuarryWorld {
    fn is_crackable(&self, position: BlockPos) -> bool {
        position.y < 64
    }

    fn break_block(&self, position: BlockPos) {
        info!(%position, "block broken by crack damage");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = FractureConfig::default();
    config.regen.seconds = 2;
    config.regen.check_ticks = 5;

    let (feed, observer) = ChannelBroadcast::new(4096);
    let tracker = Arc::new(CrackTracker::new(
        config.tracker_config(),
        QuarryWorld,
        feed,
        WallClock,
    ));
    let router = ImpactRouter::new(config, Arc::clone(&tracker));
    let scheduler = RegenScheduler::start(Arc::clone(&tracker), config.sweep_interval());

    // Deterministic event burst
    let mut rng = StdRng::seed_from_u64(0x0f2a_c7u64);
    let kinds = [ProjectileKind::Arrow, ProjectileKind::Egg, ProjectileKind::Snowball];

    for _ in 0..200 {
        let position = BlockPos::new(rng.gen_range(-20..20), rng.gen_range(60..68), rng.gen_range(-20..20));
        let kind = kinds[rng.gen_range(0..kinds.len())];
        router.route(&WorldEvent::ProjectileImpact {
            kind,
            shooter_is_player: rng.gen_range(0..10) > 0,
            position,
        });
    }

    for _ in 0..3 {
        let origin = BlockPos::new(rng.gen_range(-20..20), 62, rng.gen_range(-20..20));
        let directive = router.route(&WorldEvent::Explosion {
            origin,
            destroyed: vec![origin],
        });
        info!(%origin, ?directive, "explosion routed");
    }

    info!(
        tracked = tracker.tracked_count(),
        dropped = tracker.dropped_count(),
        "event burst complete"
    );

    // Let every crack run out its regen window
    thread::sleep(Duration::from_millis(config.regen_millis() + 1000));
    scheduler.stop();

    let mut progress_updates = 0u64;
    let mut clears = 0u64;
    for update in observer.try_iter() {
        if CrackUpdate::is_clear(&update) {
            clears += 1;
        } else {
            progress_updates += 1;
        }
    }

    info!(
        progress_updates,
        clears,
        still_tracked = tracker.tracked_count(),
        "simulation finished"
    );
    assert_eq!(tracker.tracked_count(), 0, "all cracks should have regenerated");

    tracker.clear();
}
