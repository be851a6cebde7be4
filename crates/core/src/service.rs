//! A lot shared between concurrent callers.
//!
//! All commands, reads included, go through one exclusive lock. `park` must
//! read the free-slot set and write the chosen slot atomically, and the store
//! must see changes in the order the lot applied them, so the lock is held
//! until the change has been persisted.

use crate::error::Result;
use crate::processor::{CommandProcessor, Reply};
use crate::store::{LotSnapshot, LotStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// A [`CommandProcessor`] behind a lock, with a [`LotStore`] behind it.
pub struct LotService {
    processor: Mutex<CommandProcessor>,
    store: Arc<dyn LotStore>,
}

impl LotService {
    /// Restore the last stored lot (if any) and wrap it for shared use.
    pub async fn open(store: Arc<dyn LotStore>) -> Result<Self> {
        let processor = match store.load().await? {
            Some(snapshot) => {
                let lot = snapshot.into_lot()?;
                info!(
                    store = store.name(),
                    capacity = lot.capacity(),
                    occupied = lot.occupied(),
                    "Restored parking lot"
                );
                CommandProcessor::with_lot(lot)
            }
            None => {
                info!(store = store.name(), "No stored parking lot, starting empty");
                CommandProcessor::new()
            }
        };

        Ok(Self {
            processor: Mutex::new(processor),
            store,
        })
    }

    /// Run one command line and persist whatever it changed.
    ///
    /// The command runs against a copy of the lot, which replaces the live
    /// lot only once the store has accepted the change. On a store failure
    /// the error is returned and the lot is left as it was.
    pub async fn execute(&self, line: &str) -> Result<Reply> {
        let mut processor = self.processor.lock().await;
        let mut staged = CommandProcessor::with_lot(processor.lot().clone());
        let dispatch = staged.dispatch(line);
        if let Some(change) = &dispatch.change {
            if let Err(e) = self.store.apply(change).await {
                error!(store = self.store.name(), error = %e, "Failed to persist lot change");
                return Err(e.into());
            }
            *processor = staged;
        }
        Ok(dispatch.reply)
    }

    /// A consistent copy of the current lot state.
    pub async fn snapshot(&self) -> LotSnapshot {
        LotSnapshot::of(self.processor.lock().await.lot())
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }
}
