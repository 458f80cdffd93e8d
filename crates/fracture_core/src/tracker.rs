//! The crack tracker: one record per position, bounded, eventually clean.
//!
//! ## Mutation discipline
//!
//! All record state lives behind a single `parking_lot::Mutex`. Every
//! insert, update, and remove is mutually exclusive with every other, so
//! the one-record-per-position invariant holds trivially: a sweep removing
//! a record and a concurrent hit re-creating it for the same position are
//! serialized, and the re-created record gets a fresh id.
//!
//! Port calls are issued while the lock is held. Ports are contractually
//! short, non-blocking, and never re-enter the tracker, and keeping them
//! under the lock serializes a position's broadcasts with its mutations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::port::{CrackBroadcast, TimeSource, WorldAccess};
use crate::position::BlockPos;
use crate::record::{CrackRecord, CrackUpdate, MAX_STAGE};

/// Tunables consumed by the tracker. Values come from the host's
/// configuration layer; the tracker only reads them.
#[derive(Clone, Copy, Debug)]
pub struct TrackerConfig {
    /// Upper bound on simultaneously tracked positions. Once reached, hits
    /// on new positions are dropped; existing records still accumulate.
    pub max_tracked: usize,
    /// When `true`, damage past the maximum stage breaks the block instead
    /// of clamping.
    pub break_on_cap: bool,
    /// Age in milliseconds after which an unresolved crack regenerates.
    pub regen_millis: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_tracked: 100,
            break_on_cap: false,
            regen_millis: 20_000,
        }
    }
}

/// Tracks transient block damage and drives observer broadcasts.
///
/// `W` supplies world queries and the break side effect, `B` renders crack
/// state to observers, and `C` supplies creation timestamps. All three are
/// injected; see [`crate::port`].
pub struct CrackTracker<W, B, C> {
    config: TrackerConfig,
    world: W,
    broadcast: B,
    clock: C,
    records: Mutex<HashMap<BlockPos, CrackRecord>>,
    /// Identity source for records. Owned by the tracker instance, not the
    /// process, so independent trackers never share id space.
    next_id: AtomicU64,
    /// Hits dropped because the tracked set was full. Observability only;
    /// saturation never changes tracker behavior.
    dropped: AtomicU64,
}

impl<W, B, C> CrackTracker<W, B, C>
where
    W: WorldAccess,
    B: CrackBroadcast,
    C: TimeSource,
{
    /// Creates a tracker with the given policy and collaborators.
    pub fn new(config: TrackerConfig, world: W, broadcast: B, clock: C) -> Self {
        Self {
            config,
            world,
            broadcast,
            clock,
            records: Mutex::new(HashMap::with_capacity(config.max_tracked)),
            next_id: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Applies `amount` crack damage at `position`.
    ///
    /// Creates a record on the first hit, accumulates on repeats, and
    /// broadcasts the new stage. Damage past [`MAX_STAGE`] either breaks
    /// the block (break-on-cap) or clamps. Uncrackable positions and hits
    /// beyond capacity are silent no-ops; nothing here is an error.
    pub fn apply_damage(&self, position: BlockPos, amount: u32) {
        if !self.world.is_crackable(position) {
            trace!(%position, "ignoring damage to uncrackable position");
            return;
        }

        let mut records = self.records.lock();

        if !records.contains_key(&position) && records.len() >= self.config.max_tracked {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            debug!(%position, capacity = self.config.max_tracked, "tracked set full, dropping damage");
            return;
        }

        let record = records.entry(position).or_insert_with(|| {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            CrackRecord::new(id, position, self.clock.now_millis())
        });

        let total = u32::from(record.damage).saturating_add(amount);
        if total > u32::from(MAX_STAGE) {
            if self.config.break_on_cap {
                let broken = *record;
                records.remove(&position);
                // The break is the terminal visual; no clear broadcast.
                self.world.break_block(position);
                debug!(%position, id = broken.id, "crack exceeded cap, block broken");
                return;
            }
            record.damage = MAX_STAGE;
        } else {
            #[allow(clippy::cast_possible_truncation)]
            {
                record.damage = total as u8;
            }
        }

        let update = CrackUpdate::progress(record);
        self.broadcast.send_crack(update);
    }

    /// Removes every record whose age has reached the regen window and
    /// broadcasts one clear per removed record.
    ///
    /// Returns the cleared positions (informative; callers may ignore it).
    /// Calling twice with the same `now` clears nothing the second time.
    pub fn sweep_expired(&self, now_millis: u64) -> Vec<BlockPos> {
        let mut records = self.records.lock();

        let expired: Vec<CrackRecord> = records
            .values()
            .filter(|record| now_millis.saturating_sub(record.created_at_millis) >= self.config.regen_millis)
            .copied()
            .collect();

        let mut cleared = Vec::with_capacity(expired.len());
        for record in expired {
            records.remove(&record.position);
            self.broadcast.send_crack(CrackUpdate::clear(&record));
            cleared.push(record.position);
        }
        drop(records);

        if !cleared.is_empty() {
            debug!(count = cleared.len(), "expired cracks regenerated");
        }
        cleared
    }

    /// Sweeps using the tracker's own clock. Convenience for the scheduler.
    pub fn sweep_now(&self) -> Vec<BlockPos> {
        self.sweep_expired(self.clock.now_millis())
    }

    /// Discards all records without broadcasting.
    ///
    /// Shutdown path: observers expire stale overlays on their own after
    /// disconnection, so the terminal clears are skipped. This is an
    /// accepted eventual-consistency gap, not a bug.
    pub fn clear(&self) {
        let mut records = self.records.lock();
        let count = records.len();
        records.clear();
        drop(records);
        if count > 0 {
            debug!(count, "discarded tracked cracks without broadcast");
        }
    }

    /// Number of currently tracked positions.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.records.lock().len()
    }

    /// Damage stage currently tracked at `position`, if any.
    #[must_use]
    pub fn damage_at(&self, position: BlockPos) -> Option<u8> {
        self.records.lock().get(&position).map(|record| record.damage)
    }

    /// Total hits dropped due to capacity saturation.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
