//! Command line grammar.
//!
//! ```text
//! line    = verb (WS arg)*
//! verb    = "create_parking_lot" | "park" | "leave" | "status"
//!         | "registration_numbers_for_cars_with_colour"
//!         | "slot_numbers_for_cars_with_colour"
//!         | "slot_number_for_registration_number"
//!         | "exit"
//! ```
//!
//! An empty (or all-whitespace) line parses as [`Command::Exit`]. Every verb
//! takes a fixed number of arguments; any other count is an invalid command.

use crate::error::CommandError;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateParkingLot { capacity: u32 },
    Park { registration_number: String, colour: String },
    /// Slot ids are kept signed here so that out-of-range integers reach the
    /// allocator as an unknown slot rather than failing to parse.
    Leave { slot_id: i64 },
    Status,
    RegistrationNumbersForColour { colour: String },
    SlotNumbersForColour { colour: String },
    SlotNumberForRegistration { registration_number: String },
    Exit,
}

impl Command {
    /// The protocol keyword for this command.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::CreateParkingLot { .. } => "create_parking_lot",
            Command::Park { .. } => "park",
            Command::Leave { .. } => "leave",
            Command::Status => "status",
            Command::RegistrationNumbersForColour { .. } => {
                "registration_numbers_for_cars_with_colour"
            }
            Command::SlotNumbersForColour { .. } => "slot_numbers_for_cars_with_colour",
            Command::SlotNumberForRegistration { .. } => "slot_number_for_registration_number",
            Command::Exit => "exit",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = tokens.split_first() else {
            return Ok(Command::Exit);
        };

        let command = match (verb, args) {
            ("exit", []) => Command::Exit,
            ("status", []) => Command::Status,
            ("create_parking_lot", [capacity]) => Command::CreateParkingLot {
                capacity: parse_int(verb, capacity)?,
            },
            ("park", [registration_number, colour]) => Command::Park {
                registration_number: registration_number.to_string(),
                colour: colour.to_string(),
            },
            ("leave", [slot_id]) => Command::Leave {
                slot_id: parse_int(verb, slot_id)?,
            },
            ("registration_numbers_for_cars_with_colour", [colour]) => {
                Command::RegistrationNumbersForColour {
                    colour: colour.to_string(),
                }
            }
            ("slot_numbers_for_cars_with_colour", [colour]) => Command::SlotNumbersForColour {
                colour: colour.to_string(),
            },
            ("slot_number_for_registration_number", [registration_number]) => {
                Command::SlotNumberForRegistration {
                    registration_number: registration_number.to_string(),
                }
            }
            _ => return Err(CommandError::InvalidCommand(line.trim().to_string())),
        };
        Ok(command)
    }
}

/// Parse a line of input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    line.parse()
}

fn parse_int<T: FromStr>(verb: &str, value: &str) -> Result<T, CommandError> {
    value.parse().map_err(|_| CommandError::InvalidArgument {
        verb: verb.to_string(),
        value: value.to_string(),
    })
}
