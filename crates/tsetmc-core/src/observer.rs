//! Hand-off queue between live fetchers and a consumer.
//!
//! Snapshots of one instrument taken on one day usually carry equal static records.
//! The observer keeps one record per `(instrument_id, date)` and points every snapshot
//! it hands out at that shared record, as long as the price thresholds still match.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::{Instrument, StaticInstrumentInfo};

const POLL_INTERVAL: Duration = Duration::from_secs(1);

type InternKey = (String, String);

/// Multi-producer queue of live snapshots with static-record interning.
pub struct Observer {
    sender: Sender<Instrument>,
    receiver: Receiver<Instrument>,
    interned: Mutex<HashMap<InternKey, Arc<StaticInstrumentInfo>>>,
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer {
    /// Unbounded queue.
    pub fn new() -> Self {
        Self::from_channel(channel::unbounded())
    }

    /// Queue holding at most `capacity` snapshots; [`put`](Self::put) blocks when full.
    pub fn bounded(capacity: usize) -> Self {
        Self::from_channel(channel::bounded(capacity))
    }

    fn from_channel((sender, receiver): (Sender<Instrument>, Receiver<Instrument>)) -> Self {
        Self {
            sender,
            receiver,
            interned: Mutex::new(HashMap::new()),
        }
    }

    pub fn put(&self, instrument: Instrument) {
        // Both channel ends live in `self`, so the channel cannot be disconnected here.
        let _ = self.sender.send(instrument);
    }

    /// Blocks until a snapshot is available.
    pub fn get(&self) -> Instrument {
        loop {
            if let Some(instrument) = self.get_timeout(POLL_INTERVAL) {
                return instrument;
            }
            tracing::debug!("observer queue empty");
        }
    }

    /// Waits up to `timeout` for a snapshot.
    pub fn get_timeout(&self, timeout: Duration) -> Option<Instrument> {
        match self.receiver.recv_timeout(timeout) {
            Ok(instrument) => Some(self.intern(instrument)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Number of distinct static records currently interned.
    pub fn interned_len(&self) -> usize {
        self.interned.lock().len()
    }

    fn intern(&self, mut instrument: Instrument) -> Instrument {
        let key = (
            instrument.static_data.instrument_id.clone(),
            instrument.static_data.date.clone(),
        );

        let mut interned = self.interned.lock();
        let shared = interned
            .get(&key)
            .filter(|shared| same_thresholds(shared, &instrument.static_data))
            .cloned();
        match shared {
            Some(shared) => instrument.static_data = shared,
            None => {
                interned.insert(key, Arc::clone(&instrument.static_data));
            }
        }
        instrument
    }
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("queued", &self.len())
            .field("interned", &self.interned_len())
            .finish()
    }
}

fn same_thresholds(left: &StaticInstrumentInfo, right: &StaticInstrumentInfo) -> bool {
    left.low_threshold == right.low_threshold && left.high_threshold == right.high_threshold
}
