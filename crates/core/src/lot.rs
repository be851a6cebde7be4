//! Slot allocation — the lot state and its create/park/unpark operations.
//!
//! A [`Lot`] owns the capacity and the table of active parking records.
//! Three invariants hold after every operation:
//! - at most one active record per slot;
//! - at most one active record per registration number;
//! - every occupied slot id lies in `1..=capacity`.
//!
//! Slot choice is always the lowest free slot id, regardless of the order
//! in which slots were freed.

use crate::error::LotError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, info};

/// A slot number. Valid ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub u32);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A vehicle occupying (or, in stored history, having occupied) a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingRecord {
    pub slot_id: SlotId,

    pub registration_number: String,

    pub colour: String,

    /// `false` only for departed vehicles kept as history by a store.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl ParkingRecord {
    pub fn new(slot_id: SlotId, registration_number: &str, colour: &str) -> Self {
        Self {
            slot_id,
            registration_number: registration_number.to_string(),
            colour: colour.to_string(),
            active: true,
        }
    }
}

/// In-memory lot state: capacity plus the active-occupancy table.
///
/// A lot that was never created has capacity 0 and accepts no vehicles.
#[derive(Debug, Clone, Default)]
pub struct Lot {
    capacity: u32,
    occupancy: BTreeMap<SlotId, ParkingRecord>,
    by_registration: HashMap<String, SlotId>,
}

impl Lot {
    /// A freshly created lot with `capacity` empty slots.
    pub fn new(capacity: u32) -> Self {
        let mut lot = Self::default();
        lot.create(capacity);
        lot
    }

    /// Reset the lot to `capacity` empty slots, discarding all occupancy.
    ///
    /// Returns the capacity for confirmation.
    pub fn create(&mut self, capacity: u32) -> u32 {
        let discarded = self.occupancy.len();
        self.capacity = capacity;
        self.occupancy.clear();
        self.by_registration.clear();
        info!(capacity, discarded, "Parking lot created");
        capacity
    }

    /// Park a vehicle in the lowest free slot.
    pub fn park(&mut self, registration_number: &str, colour: &str) -> Result<SlotId, LotError> {
        if self.by_registration.contains_key(registration_number) {
            debug!(registration_number, "Rejected repeated parking");
            return Err(LotError::RepeatedParking(registration_number.to_string()));
        }

        let slot_id = self.lowest_free_slot().ok_or(LotError::LotFull)?;
        self.insert(ParkingRecord::new(slot_id, registration_number, colour));
        debug!(%slot_id, registration_number, colour, "Vehicle parked");
        Ok(slot_id)
    }

    /// Free `slot_id`. Returns `false` only when the lot has no such slot;
    /// freeing an empty slot is a successful no-op.
    pub fn unpark(&mut self, slot_id: SlotId) -> bool {
        self.release(slot_id).is_ok()
    }

    /// Free `slot_id` and hand back the record that occupied it, if any.
    pub fn release(&mut self, slot_id: SlotId) -> Result<Option<ParkingRecord>, LotError> {
        if !self.contains_slot(slot_id) {
            return Err(LotError::InvalidSlot(slot_id));
        }

        let record = self.occupancy.remove(&slot_id);
        if let Some(record) = &record {
            self.by_registration.remove(&record.registration_number);
            debug!(%slot_id, registration_number = %record.registration_number, "Vehicle left");
        }
        Ok(record)
    }

    /// Rebuild a lot from stored records, checking every invariant.
    pub fn restore(
        capacity: u32,
        records: impl IntoIterator<Item = ParkingRecord>,
    ) -> Result<Self, LotError> {
        let mut lot = Self {
            capacity,
            ..Self::default()
        };
        for record in records {
            if !lot.contains_slot(record.slot_id) {
                return Err(LotError::InvalidSlot(record.slot_id));
            }
            if lot.by_registration.contains_key(&record.registration_number)
                || lot.occupancy.contains_key(&record.slot_id)
            {
                return Err(LotError::RepeatedParking(record.registration_number));
            }
            lot.insert(record);
        }
        Ok(lot)
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of currently parked vehicles.
    pub fn occupied(&self) -> usize {
        self.occupancy.len()
    }

    pub fn is_full(&self) -> bool {
        self.lowest_free_slot().is_none()
    }

    pub fn contains_slot(&self, slot_id: SlotId) -> bool {
        (1..=self.capacity).contains(&slot_id.0)
    }

    /// Active records in ascending slot order.
    pub fn records(&self) -> impl Iterator<Item = &ParkingRecord> {
        self.occupancy.values()
    }

    pub(crate) fn slot_of(&self, registration_number: &str) -> Option<SlotId> {
        self.by_registration.get(registration_number).copied()
    }

    fn insert(&mut self, mut record: ParkingRecord) {
        record.active = true;
        self.by_registration
            .insert(record.registration_number.clone(), record.slot_id);
        self.occupancy.insert(record.slot_id, record);
    }

    /// Walk occupied ids in order; the first gap is the lowest free slot.
    fn lowest_free_slot(&self) -> Option<SlotId> {
        let mut candidate: u32 = 1;
        for slot_id in self.occupancy.keys() {
            if slot_id.0 != candidate {
                break;
            }
            candidate = candidate.checked_add(1)?;
        }
        (candidate <= self.capacity).then_some(SlotId(candidate))
    }
}
