//! Ports the host implements for the tracker.
//!
//! The tracker never talks to a concrete world, renderer, or clock. The
//! host injects one implementation of each trait at construction time and
//! the tracker stays agnostic to server versions, transports, and test
//! harnesses.
//!
//! All three ports are fire-and-forget: none of them returns a result, and
//! a port's internal failures are the port's problem. Tracker state is
//! authoritative once mutated, whether or not an outbound call succeeded.
//!
//! Implementations must be short and non-blocking, and must never call
//! back into the tracker.

use crate::position::BlockPos;
use crate::record::CrackUpdate;
use std::time::{SystemTime, UNIX_EPOCH};

/// Access to the world the tracked blocks live in.
pub trait WorldAccess: Send + Sync {
    /// Whether a crack overlay may be applied at `position`.
    ///
    /// The host decides what is exempt; typical exclusions are empty,
    /// liquid, passable, and indestructible cells. The tracker treats a
    /// `false` answer as a silent no-op, never an error.
    fn is_crackable(&self, position: BlockPos) -> bool;

    /// Destroys the block at `position`.
    ///
    /// Invoked only under the break-on-cap policy, when accumulated damage
    /// would exceed the maximum crack stage. The break itself is the
    /// terminal visual signal; no clear broadcast follows it.
    fn break_block(&self, position: BlockPos);
}

/// Outbound channel rendering crack state to nearby observers.
pub trait CrackBroadcast: Send + Sync {
    /// Renders or clears the crack overlay described by `update`.
    ///
    /// A stage in `[0, 9]` draws crack progress at the position; a
    /// [`CLEAR_STAGE`](crate::record::CLEAR_STAGE) stage removes the
    /// overlay previously associated with the update's id.
    fn send_crack(&self, update: CrackUpdate);
}

/// Source of wall-clock time, injected so tests control expiry.
pub trait TimeSource: Send + Sync {
    /// Current time in milliseconds.
    fn now_millis(&self) -> u64;
}

/// Production [`TimeSource`] backed by the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl TimeSource for WallClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
