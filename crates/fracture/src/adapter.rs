//! Event adapters: policy dispatch between world occurrences and the
//! tracker.
//!
//! Everything here is filtering and amount selection. The tracker owns the
//! actual state transitions; the world port owns the is-this-crackable
//! judgment.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use fracture_core::{BlockPos, CrackBroadcast, CrackTracker, TimeSource, WorldAccess};

use crate::config::FractureConfig;
use crate::events::{ProjectileKind, WorldEvent};

/// What the host should do with an explosion's own destruction.
///
/// Returned from the explosion path so the crack overlay and the real
/// destruction stay independently configurable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExplosionDirective {
    /// `true`: let the explosion destroy its block list as usual.
    /// `false`: the host should cancel the destruction.
    pub destroy_blocks: bool,
}

/// Routes world occurrences into [`CrackTracker::apply_damage`] calls.
pub struct ImpactRouter<W, B, C> {
    config: FractureConfig,
    tracker: Arc<CrackTracker<W, B, C>>,
}

impl<W, B, C> ImpactRouter<W, B, C>
where
    W: WorldAccess,
    B: CrackBroadcast,
    C: TimeSource,
{
    /// Creates a router over a shared tracker.
    pub fn new(config: FractureConfig, tracker: Arc<CrackTracker<W, B, C>>) -> Self {
        Self { config, tracker }
    }

    /// Dispatches one event. Returns a directive only for explosions.
    pub fn route(&self, event: &WorldEvent) -> Option<ExplosionDirective> {
        match event {
            WorldEvent::ProjectileImpact {
                kind,
                shooter_is_player,
                position,
            } => {
                self.on_projectile_impact(*kind, *shooter_is_player, *position);
                None
            }
            WorldEvent::Explosion { origin, destroyed } => {
                Some(self.on_explosion(*origin, destroyed))
            }
        }
    }

    /// Projectile path: player-launched, allowed kinds crack the hit block
    /// with their configured damage.
    pub fn on_projectile_impact(
        &self,
        kind: ProjectileKind,
        shooter_is_player: bool,
        position: BlockPos,
    ) {
        if !shooter_is_player {
            trace!(kind = kind.label(), "ignoring non-player projectile");
            return;
        }
        let policy = self.config.projectile(kind);
        if !policy.allowed {
            trace!(kind = kind.label(), "projectile kind not allowed");
            return;
        }
        self.tracker.apply_damage(position, policy.damage);
    }

    /// Explosion path: cracks every block strictly inside the configured
    /// sphere and tells the host whether its own destruction proceeds.
    ///
    /// Blocks in `destroyed` are skipped when the destruction goes ahead
    /// (they will not exist to show a crack on). When the destruction is
    /// suppressed nothing is destroyed, so the whole sphere is considered.
    pub fn on_explosion(&self, origin: BlockPos, destroyed: &[BlockPos]) -> ExplosionDirective {
        let cfg = &self.config.explosion;
        let directive = ExplosionDirective {
            destroy_blocks: cfg.destroy_blocks,
        };

        if !cfg.allowed {
            trace!(%origin, "explosion cracking not allowed");
            return directive;
        }

        let skip: HashSet<BlockPos> = if cfg.destroy_blocks {
            destroyed.iter().copied().collect()
        } else {
            HashSet::new()
        };

        let radius = cfg.radius;
        let radius_squared = i64::from(radius) * i64::from(radius);

        for x in (origin.x - radius)..(origin.x + radius) {
            for y in (origin.y - radius)..(origin.y + radius) {
                for z in (origin.z - radius)..(origin.z + radius) {
                    let position = BlockPos::new(x, y, z);
                    if skip.contains(&position) {
                        continue;
                    }
                    if position.distance_squared(origin) >= radius_squared {
                        continue;
                    }
                    self.tracker.apply_damage(position, cfg.damage);
                }
            }
        }

        debug!(%origin, radius, destroy = directive.destroy_blocks, "explosion processed");
        directive
    }
}
