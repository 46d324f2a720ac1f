// Operators run by the room simulation after every step
pub mod history_recorder_op;
pub mod temperature_reporting_op;

pub use history_recorder_op::HistoryRecorderOp;
pub use temperature_reporting_op::TemperatureReportingOp;

use crate::sim::simulation::RoomSimulation;
use std::any::Any;

/// An observer plugged into `RoomSimulation`. Each hook receives the whole
/// simulation, so an operator can read the room or reach into it.
pub trait SimOp {
    /// Label used in timing output and for lookup
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    /// Before the first room step.
    fn init_sim(&mut self, _sim: &mut RoomSimulation) {}

    /// After each room step; `sim.step` is already advanced.
    fn update_sim(&mut self, _sim: &mut RoomSimulation) {}

    /// After the last room step.
    fn after_sim(&mut self, _sim: &mut RoomSimulation) {}
}

/// Boxed operator handed to `SimProps`.
pub struct SimOpHandle {
    pub op: Box<dyn SimOp>,
}

impl SimOpHandle {
    pub fn new(op: Box<dyn SimOp>) -> Self {
        SimOpHandle { op }
    }
}
