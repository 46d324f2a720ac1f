use crate::sim::simulation::RoomSimulation;
use crate::sim_op::{SimOp, SimOpHandle};
use std::any::Any;

/// Records per-step series of the room for charting and analysis.
///
/// Sensor values are the noise-free temperatures under each sensor, so
/// recording never disturbs the room's random stream.
pub struct HistoryRecorderOp {
    /// Keep a full temperature map every this many steps (0 = never)
    pub map_interval: u64,
    pub mean_interior: Vec<f64>,
    pub sensor_temperatures: Vec<Vec<f64>>,
    pub heater_powers: Vec<Vec<f64>>,
    pub total_energy: Vec<f64>,
    pub temperature_maps: Vec<(u64, Vec<Vec<f64>>)>,
}

impl HistoryRecorderOp {
    pub fn new(map_interval: u64) -> Self {
        Self {
            map_interval,
            mean_interior: Vec::new(),
            sensor_temperatures: Vec::new(),
            heater_powers: Vec::new(),
            total_energy: Vec::new(),
            temperature_maps: Vec::new(),
        }
    }

    pub fn handle(map_interval: u64) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new(map_interval)))
    }

    pub fn len(&self) -> usize {
        self.mean_interior.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean_interior.is_empty()
    }

    /// Power series of one heater across all recorded steps.
    pub fn heater_series(&self, heater: usize) -> Vec<f64> {
        self.heater_powers
            .iter()
            .filter_map(|powers| powers.get(heater).copied())
            .collect()
    }

    /// Mean power of a heater over the last `window` recorded steps.
    pub fn steady_state_power(&self, heater: usize, window: usize) -> Option<f64> {
        let series = self.heater_series(heater);
        if series.is_empty() || window == 0 {
            return None;
        }
        let tail = &series[series.len().saturating_sub(window)..];
        Some(tail.iter().sum::<f64>() / tail.len() as f64)
    }

    /// Spread (max - min) of a heater's power over the last `window` steps.
    pub fn power_variation(&self, heater: usize, window: usize) -> Option<f64> {
        let series = self.heater_series(heater);
        if series.is_empty() || window == 0 {
            return None;
        }
        let tail = &series[series.len().saturating_sub(window)..];
        let max = tail.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = tail.iter().cloned().fold(f64::INFINITY, f64::min);
        Some(max - min)
    }

    fn record(&mut self, sim: &RoomSimulation) {
        let room = &sim.room;
        self.mean_interior.push(room.mean_interior_temperature());
        self.sensor_temperatures.push(
            (0..room.sensors().len())
                .filter_map(|id| room.sensor_true_temperature(id).ok())
                .collect(),
        );
        self.heater_powers
            .push(room.heaters().iter().map(|h| h.power()).collect());
        self.total_energy.push(room.total_thermal_energy());

        if self.map_interval > 0 && sim.step % self.map_interval == 0 {
            self.temperature_maps.push((sim.step, room.temperature_map()));
        }
    }
}

impl SimOp for HistoryRecorderOp {
    fn name(&self) -> &str {
        "HistoryRecorder"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn init_sim(&mut self, sim: &mut RoomSimulation) {
        let capacity = sim.sim_steps as usize;
        self.mean_interior.reserve(capacity);
        self.heater_powers.reserve(capacity);
        self.total_energy.reserve(capacity);
    }

    fn update_sim(&mut self, sim: &mut RoomSimulation) {
        self.record(sim);
    }
}
