//! Read-only views over a [`Lot`].

use crate::error::LotError;
use crate::lot::{Lot, SlotId};
use serde::{Deserialize, Serialize};

/// One line of the status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    pub slot_id: SlotId,
    pub registration_number: String,
    pub colour: String,
}

/// Which attribute of a matching record to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    RegistrationNumber,
    SlotId,
}

/// A projected attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    RegistrationNumber(String),
    SlotId(SlotId),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::RegistrationNumber(reg) => f.write_str(reg),
            FieldValue::SlotId(slot_id) => write!(f, "{slot_id}"),
        }
    }
}

/// Queries borrow the lot; they never mutate it.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    lot: &'a Lot,
}

impl<'a> QueryEngine<'a> {
    pub fn new(lot: &'a Lot) -> Self {
        Self { lot }
    }

    /// All parked vehicles, ascending by slot id.
    pub fn status(&self) -> Vec<StatusRow> {
        self.lot
            .records()
            .map(|record| StatusRow {
                slot_id: record.slot_id,
                registration_number: record.registration_number.clone(),
                colour: record.colour.clone(),
            })
            .collect()
    }

    /// Vehicles whose colour matches case-insensitively, ascending by slot id.
    pub fn vehicles_by_colour(&self, colour: &str, projection: Projection) -> Vec<FieldValue> {
        let wanted = colour.to_lowercase();
        self.lot
            .records()
            .filter(|record| record.colour.to_lowercase() == wanted)
            .map(|record| match projection {
                Projection::RegistrationNumber => {
                    FieldValue::RegistrationNumber(record.registration_number.clone())
                }
                Projection::SlotId => FieldValue::SlotId(record.slot_id),
            })
            .collect()
    }

    /// Slot of the vehicle with exactly this registration number.
    pub fn slot_for_registration(&self, registration_number: &str) -> Result<SlotId, LotError> {
        self.lot
            .slot_of(registration_number)
            .ok_or(LotError::NotFound)
    }
}
