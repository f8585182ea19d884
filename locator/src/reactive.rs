use std::sync::{Mutex, PoisonError};

use async_channel::{Receiver, Sender, unbounded};
use log::debug;

use crate::LocationSnapshot;

/// Fan-out of state snapshots to UI consumers.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Mutex<Vec<Sender<LocationSnapshot>>>,
}

impl Subscribers {
    /// Registers a consumer; the receiver starts with `current`.
    pub(crate) fn subscribe(&self, current: LocationSnapshot) -> Receiver<LocationSnapshot> {
        let (sender, receiver) = unbounded();
        // Cannot fail: the receiver is alive and the channel is unbounded.
        let _ = sender.try_send(current);
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    pub(crate) fn publish(&self, snapshot: &LocationSnapshot) {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        let before = senders.len();
        senders.retain(|sender| sender.try_send(snapshot.clone()).is_ok());
        if senders.len() < before {
            debug!("dropped {} closed location subscribers", before - senders.len());
        }
    }
}
