//! Configuration errors raised while building a room.
//!
//! Every variant is detected at construction, initialisation or attachment
//! time. A fully built room steps without failing.

use std::error::Error;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum RoomError {
    /// Interior width and height must both be at least one cell.
    InvalidDimensions { width: usize, height: usize },
    /// Seconds per tick must be finite and positive.
    InvalidTimeStep(f64),
    /// Thermal capacity must be finite and positive.
    InvalidCapacity { x: usize, y: usize, capacity: f64 },
    /// Thermal resistance must be finite and positive.
    InvalidResistance { x: usize, y: usize, resistance: f64 },
    /// Noise standard deviation must be finite and non-negative.
    InvalidNoise(f64),
    /// Controller gains and setpoint must be finite.
    InvalidGain { name: &'static str, value: f64 },
    /// Cells were already allocated for this room.
    AlreadyInitialized,
    /// No cell exists at the given coordinate.
    NoSuchCell { x: usize, y: usize },
    DuplicateHeater { x: usize, y: usize },
    DuplicateSensor { x: usize, y: usize },
    /// Heaters cannot inject into a fixed-temperature reservoir.
    HeaterOnHeatSink { x: usize, y: usize },
    NoSuchSensor(usize),
    NoSuchHeater(usize),
    Config(String),
    Serialization(String),
}

pub type RoomResult<T> = Result<T, RoomError>;

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid room dimensions {width}x{height}")
            }
            Self::InvalidTimeStep(dt) => write!(f, "invalid time step {dt}s"),
            Self::InvalidCapacity { x, y, capacity } => {
                write!(f, "invalid capacity {capacity} J/K at ({x}, {y})")
            }
            Self::InvalidResistance { x, y, resistance } => {
                write!(f, "invalid resistance {resistance} K/W at ({x}, {y})")
            }
            Self::InvalidNoise(std) => write!(f, "invalid noise standard deviation {std}"),
            Self::InvalidGain { name, value } => write!(f, "invalid heater {name}: {value}"),
            Self::AlreadyInitialized => write!(f, "room cells are already initialised"),
            Self::NoSuchCell { x, y } => write!(f, "no cell at ({x}, {y})"),
            Self::DuplicateHeater { x, y } => write!(f, "a heater already sits at ({x}, {y})"),
            Self::DuplicateSensor { x, y } => write!(f, "a sensor already sits at ({x}, {y})"),
            Self::HeaterOnHeatSink { x, y } => {
                write!(f, "cannot place a heater on the heat sink at ({x}, {y})")
            }
            Self::NoSuchSensor(id) => write!(f, "no sensor with id {id}"),
            Self::NoSuchHeater(id) => write!(f, "no heater with id {id}"),
            Self::Config(reason) => write!(f, "configuration error: {reason}"),
            Self::Serialization(reason) => write!(f, "serialization error: {reason}"),
        }
    }
}

impl Error for RoomError {}

impl From<serde_json::Error> for RoomError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
