//! Command dispatch and reply rendering.
//!
//! This is the only layer that produces user-facing text. Every input line
//! yields exactly one [`Reply`]: either a message to print or the signal to
//! stop reading input.

use crate::command::{parse_command, Command};
use crate::error::{CommandError, LotError};
use crate::lot::{Lot, ParkingRecord, SlotId};
use crate::query::{FieldValue, Projection, QueryEngine, StatusRow};
use crate::store::LotChange;
use tracing::{debug, warn};

pub const REPEATED_PARKING: &str = "This is a repeated parking. Car already in parking.";
pub const LOT_FULL: &str = "Sorry, parking lot is full";
pub const SLOT_INACTIVE: &str = "The parking slot is inactive";
pub const LOT_EMPTY: &str = "Parking Lot is empty";
pub const NOT_FOUND: &str = "Not found";
pub const INVALID_COMMAND: &str = "Invalid Command";
pub const STATUS_HEADER: &str = "Slot No.    Registration No    Colour";

/// What the driver should do with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text.
    Text(String),
    /// Stop processing input.
    Exit,
}

impl Reply {
    fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }
}

/// The outcome of one line: the reply, plus the state change to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub reply: Reply,
    pub change: Option<LotChange>,
}

impl Dispatch {
    fn reply(reply: Reply) -> Self {
        Self {
            reply,
            change: None,
        }
    }

    fn changed(reply: Reply, change: LotChange) -> Self {
        Self {
            reply,
            change: Some(change),
        }
    }
}

/// Parses lines and runs them against the lot it owns.
#[derive(Debug, Default)]
pub struct CommandProcessor {
    lot: Lot,
}

impl CommandProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from an existing lot (e.g. one restored from a store).
    pub fn with_lot(lot: Lot) -> Self {
        Self { lot }
    }

    pub fn lot(&self) -> &Lot {
        &self.lot
    }

    /// Process one line and return the reply.
    pub fn process(&mut self, line: &str) -> Reply {
        self.dispatch(line).reply
    }

    /// Process one line, also reporting any state change it caused.
    pub fn dispatch(&mut self, line: &str) -> Dispatch {
        match parse_command(line) {
            Ok(command) => {
                debug!(verb = command.verb(), "Dispatching command");
                self.execute(command)
            }
            Err(CommandError::InvalidCommand(input)) => {
                debug!(%input, "Invalid command");
                Dispatch::reply(Reply::text(INVALID_COMMAND))
            }
            Err(e @ CommandError::InvalidArgument { .. }) => {
                warn!(error = %e, "Rejected command argument");
                Dispatch::reply(Reply::text(INVALID_COMMAND))
            }
        }
    }

    /// Run an already-parsed command.
    pub fn execute(&mut self, command: Command) -> Dispatch {
        match command {
            Command::Exit => Dispatch::reply(Reply::Exit),

            Command::CreateParkingLot { capacity } => {
                let capacity = self.lot.create(capacity);
                Dispatch::changed(
                    Reply::Text(format!("Created a parking lot with {capacity} slots")),
                    LotChange::Created { capacity },
                )
            }

            Command::Park {
                registration_number,
                colour,
            } => match self.lot.park(&registration_number, &colour) {
                Ok(slot_id) => Dispatch::changed(
                    Reply::Text(format!("Allocated slot number: {slot_id}")),
                    LotChange::Parked(ParkingRecord::new(slot_id, &registration_number, &colour)),
                ),
                Err(e) => Dispatch::reply(Reply::text(park_failure_text(&e))),
            },

            Command::Leave { slot_id } => {
                let Ok(slot) = u32::try_from(slot_id).map(SlotId) else {
                    return Dispatch::reply(Reply::text(SLOT_INACTIVE));
                };
                let freed = Reply::Text(format!("Slot number {slot_id} is free"));
                match self.lot.release(slot) {
                    Ok(Some(_)) => Dispatch::changed(freed, LotChange::Left { slot_id: slot }),
                    Ok(None) => Dispatch::reply(freed),
                    Err(_) => Dispatch::reply(Reply::text(SLOT_INACTIVE)),
                }
            }

            Command::Status => Dispatch::reply(Reply::Text(render_status(&self.queries().status()))),

            Command::RegistrationNumbersForColour { colour } => {
                let values = self
                    .queries()
                    .vehicles_by_colour(&colour, Projection::RegistrationNumber);
                Dispatch::reply(Reply::Text(render_list(&values)))
            }

            Command::SlotNumbersForColour { colour } => {
                let values = self.queries().vehicles_by_colour(&colour, Projection::SlotId);
                Dispatch::reply(Reply::Text(render_list(&values)))
            }

            Command::SlotNumberForRegistration {
                registration_number,
            } => {
                let text = match self.queries().slot_for_registration(&registration_number) {
                    Ok(slot_id) => slot_id.to_string(),
                    Err(_) => NOT_FOUND.to_string(),
                };
                Dispatch::reply(Reply::Text(text))
            }
        }
    }

    fn queries(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.lot)
    }
}

/// Reply text for a rejected `park`.
fn park_failure_text(error: &LotError) -> &'static str {
    match error {
        LotError::RepeatedParking(_) => REPEATED_PARKING,
        LotError::LotFull => LOT_FULL,
        LotError::InvalidSlot(_) | LotError::NotFound => {
            warn!(%error, "Unexpected allocator error while parking");
            INVALID_COMMAND
        }
    }
}

/// Render the status table, or the empty-lot message.
pub fn render_status(rows: &[StatusRow]) -> String {
    if rows.is_empty() {
        return LOT_EMPTY.to_string();
    }
    let mut out = String::from(STATUS_HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(&format!(
            "{}           {}      {}",
            row.slot_id, row.registration_number, row.colour
        ));
    }
    out
}

fn render_list(values: &[FieldValue]) -> String {
    if values.is_empty() {
        return NOT_FOUND.to_string();
    }
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
