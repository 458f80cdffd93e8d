//! Crack records and the snapshots observers receive.

use crate::position::BlockPos;

/// Highest crack stage shown to observers. Damage accumulating past this
/// value either clamps here or breaks the block, depending on policy.
pub const MAX_STAGE: u8 = 9;

/// Sentinel stage telling observers to remove the crack overlay.
pub const CLEAR_STAGE: i8 = -1;

/// Tracked state of one cracked block.
///
/// At most one record exists per position. The record is created on the
/// first damage applied to an undamaged position and mutated in place on
/// every subsequent hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrackRecord {
    /// Identity used by observers to correlate updates with the later
    /// clear for the same crack. Unique for the process lifetime.
    pub id: u64,
    /// The block this record tracks.
    pub position: BlockPos,
    /// Accumulated crack stage, always in `[0, MAX_STAGE]`.
    pub damage: u8,
    /// Wall-clock creation time in milliseconds.
    pub created_at_millis: u64,
}

impl CrackRecord {
    /// Creates a fresh, undamaged record.
    #[must_use]
    pub const fn new(id: u64, position: BlockPos, created_at_millis: u64) -> Self {
        Self {
            id,
            position,
            damage: 0,
            created_at_millis,
        }
    }
}

/// Read-only snapshot handed to the observer broadcast port.
///
/// `stage` is the crack progress in `[0, 9]`, or [`CLEAR_STAGE`] when the
/// overlay should be removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrackUpdate {
    /// Identity of the crack this update belongs to.
    pub id: u64,
    /// The block the overlay is attached to.
    pub position: BlockPos,
    /// Crack stage, or [`CLEAR_STAGE`].
    pub stage: i8,
}

impl CrackUpdate {
    /// Snapshot of a record's current progress.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn progress(record: &CrackRecord) -> Self {
        Self {
            id: record.id,
            position: record.position,
            stage: record.damage as i8,
        }
    }

    /// Terminal snapshot removing the overlay for a record.
    #[must_use]
    pub const fn clear(record: &CrackRecord) -> Self {
        Self {
            id: record.id,
            position: record.position,
            stage: CLEAR_STAGE,
        }
    }

    /// Whether this update removes the overlay rather than advancing it.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.stage == CLEAR_STAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_snapshot() {
        let mut record = CrackRecord::new(7, BlockPos::new(1, 2, 3), 1000);
        record.damage = 4;
        let update = CrackUpdate::progress(&record);
        assert_eq!(update.id, 7);
        assert_eq!(update.position, BlockPos::new(1, 2, 3));
        assert_eq!(update.stage, 4);
        assert!(!update.is_clear());
    }

    #[test]
    fn test_clear_snapshot() {
        let record = CrackRecord::new(7, BlockPos::new(1, 2, 3), 1000);
        let update = CrackUpdate::clear(&record);
        assert_eq!(update.stage, CLEAR_STAGE);
        assert!(update.is_clear());
    }
}
