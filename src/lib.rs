pub mod constants;
pub mod error;
pub mod material;
pub mod thermal_cell;
pub mod thermometer;
pub mod heater;
pub mod room;
pub mod config;
pub mod sim;
pub mod sim_op;

pub use error::{RoomError, RoomResult};
pub use room::{CellParams, HeaterSettings, Room, StepReport};
