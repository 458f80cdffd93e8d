//! Channel-backed observer broadcast.
//!
//! The tracker's outbound port feeds a bounded crossbeam channel; the
//! host's render or network layer drains the receiver at its own pace. A
//! full or disconnected channel drops the update - transport problems are
//! never the tracker's problem.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{trace, warn};

use fracture_core::{CrackBroadcast, CrackUpdate};

/// [`CrackBroadcast`] implementation over a bounded channel.
pub struct ChannelBroadcast {
    sender: Sender<CrackUpdate>,
}

impl ChannelBroadcast {
    /// Creates the broadcast side and the receiver the host drains.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, Receiver<CrackUpdate>) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl CrackBroadcast for ChannelBroadcast {
    fn send_crack(&self, update: CrackUpdate) {
        match self.sender.try_send(update) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                warn!(id = dropped.id, %dropped.position, "crack feed full, update dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                trace!("crack feed disconnected");
            }
        }
    }
}
