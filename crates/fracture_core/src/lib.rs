//! # FRACTURE Core Engine
//!
//! Transient block-damage tracking: projectile impacts and area effects
//! crack blocks, observers see the crack progress, and unresolved cracks
//! regenerate after a configurable window.
//!
//! ## Invariants
//!
//! 1. **One record per position** - removal and insertion for a key are
//!    mutually exclusive under a single lock
//! 2. **Bounded memory** - the tracked set never exceeds its configured
//!    capacity; overflow hits are dropped, not queued
//! 3. **Eventual visual consistency** - every record is cleared exactly
//!    once, either by the break side effect or by the expiry sweep
//!
//! ## Example
//!
//! ```rust,ignore
//! use fracture_core::{CrackTracker, TrackerConfig, WallClock};
//!
//! let tracker = CrackTracker::new(TrackerConfig::default(), world, feed, WallClock);
//! tracker.apply_damage(pos, 3);        // event path
//! tracker.sweep_now();                 // scheduler path
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod port;
pub mod position;
pub mod record;
pub mod tracker;

pub use port::{CrackBroadcast, TimeSource, WallClock, WorldAccess};
pub use position::BlockPos;
pub use record::{CrackRecord, CrackUpdate, CLEAR_STAGE, MAX_STAGE};
pub use tracker::{CrackTracker, TrackerConfig};
