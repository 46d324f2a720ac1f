pub mod simulation;

pub use simulation::{OpTiming, RoomSimulation, SimProps};
