//! Persistence trait — how a caller keeps lot state across runs.
//!
//! The core never writes anything durable itself. Every successful mutation
//! produces a [`LotChange`], and a [`LotStore`] implementation decides how to
//! record it. On startup, [`LotStore::load`] hands back a [`LotSnapshot`]
//! that rebuilds the in-memory [`Lot`].

use crate::error::StoreError;
use crate::lot::{Lot, ParkingRecord, SlotId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single state transition of the lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LotChange {
    /// The lot was (re)created; all previous occupancy is gone.
    Created { capacity: u32 },
    /// A vehicle took a slot.
    Parked(ParkingRecord),
    /// The vehicle in `slot_id` left.
    Left { slot_id: SlotId },
}

/// Full lot state: capacity plus active records in slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSnapshot {
    pub capacity: u32,

    #[serde(default)]
    pub records: Vec<ParkingRecord>,
}

impl LotSnapshot {
    pub fn of(lot: &Lot) -> Self {
        Self {
            capacity: lot.capacity(),
            records: lot.records().cloned().collect(),
        }
    }

    /// Fold a change into this snapshot.
    pub fn apply(&mut self, change: &LotChange) {
        match change {
            LotChange::Created { capacity } => {
                self.capacity = *capacity;
                self.records.clear();
            }
            LotChange::Parked(record) => {
                let at = self
                    .records
                    .partition_point(|existing| existing.slot_id < record.slot_id);
                self.records.insert(at, record.clone());
            }
            LotChange::Left { slot_id } => {
                self.records.retain(|record| record.slot_id != *slot_id);
            }
        }
    }

    /// Rebuild the lot, rejecting snapshots that break a lot invariant.
    pub fn into_lot(self) -> Result<Lot, StoreError> {
        Lot::restore(self.capacity, self.records.into_iter().filter(|r| r.active))
            .map_err(|e| StoreError::Corrupt(e.to_string()))
    }
}

/// The core LotStore trait.
///
/// Implementations: none (ephemeral), JSON file, SQLite.
#[async_trait]
pub trait LotStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "file", "none").
    fn name(&self) -> &str;

    /// Load the last recorded state, or `None` if no lot was ever created.
    async fn load(&self) -> Result<Option<LotSnapshot>, StoreError>;

    /// Record one change.
    async fn apply(&self, change: &LotChange) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tracks_changes() {
        let mut snapshot = LotSnapshot::default();
        snapshot.apply(&LotChange::Created { capacity: 3 });
        snapshot.apply(&LotChange::Parked(ParkingRecord::new(SlotId(2), "B", "Red")));
        snapshot.apply(&LotChange::Parked(ParkingRecord::new(SlotId(1), "A", "Red")));
        snapshot.apply(&LotChange::Parked(ParkingRecord::new(SlotId(3), "C", "Red")));
        snapshot.apply(&LotChange::Left { slot_id: SlotId(2) });

        assert_eq!(snapshot.capacity, 3);
        let slots: Vec<u32> = snapshot.records.iter().map(|r| r.slot_id.0).collect();
        assert_eq!(slots, vec![1, 3]);

        snapshot.apply(&LotChange::Created { capacity: 5 });
        assert!(snapshot.records.is_empty());
    }

    #[test]
    fn snapshot_rebuilds_lot() {
        let mut lot = Lot::new(4);
        lot.park("A", "Red").unwrap();
        lot.park("B", "Blue").unwrap();
        lot.unpark(SlotId(1));

        let rebuilt = LotSnapshot::of(&lot).into_lot().unwrap();
        assert_eq!(rebuilt.capacity(), 4);
        assert_eq!(rebuilt.occupied(), 1);
        assert_eq!(rebuilt.records().next().unwrap().registration_number, "B");
    }

    #[test]
    fn corrupt_snapshot_is_rejected() {
        let snapshot = LotSnapshot {
            capacity: 1,
            records: vec![ParkingRecord::new(SlotId(2), "A", "Red")],
        };
        assert!(matches!(snapshot.into_lot(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn change_serialization() {
        let json = serde_json::to_string(&LotChange::Created { capacity: 6 }).unwrap();
        assert!(json.contains("created"));
        assert!(json.contains('6'));

        let json = serde_json::to_string(&LotChange::Left { slot_id: SlotId(4) }).unwrap();
        assert!(json.contains("left"));
    }
}
