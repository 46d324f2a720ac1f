//! Heater actuator driven by a proportional-integral controller.

use crate::constants::{HEATER_MAX_POWER_W, HEATER_MIN_POWER_W};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heater {
    pub x: usize,
    pub y: usize,
    cell: usize,
    /// Index of the thermometer this heater regulates on
    sensor: usize,
    pub p: f64,
    pub i: f64,
    /// Target temperature in Kelvin
    pub setpoint: f64,
    integral: f64,
    /// Output in Watts, always within the heater's power range
    power: f64,
}

impl Heater {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        x: usize,
        y: usize,
        cell: usize,
        sensor: usize,
        power: f64,
        p: f64,
        i: f64,
        setpoint: f64,
    ) -> Self {
        Self {
            x,
            y,
            cell,
            sensor,
            p,
            i,
            setpoint,
            integral: 0.0,
            power: power.clamp(HEATER_MIN_POWER_W, HEATER_MAX_POWER_W),
        }
    }

    pub fn cell_id(&self) -> usize {
        self.cell
    }

    pub fn sensor_id(&self) -> usize {
        self.sensor
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Joules delivered over one tick at the current power.
    pub fn heat_for(&self, time_step: f64) -> f64 {
        self.power * time_step
    }

    /// One controller update from a fresh sensor reading.
    ///
    /// The integral is not limited while the output is saturated, so it can
    /// wind up; only the output is clamped.
    pub fn update(&mut self, measured: f64, time_step: f64) -> f64 {
        let error = self.setpoint - measured;
        self.integral += error * time_step;
        let raw = self.p * error + self.i * self.integral;
        self.power = raw.clamp(HEATER_MIN_POWER_W, HEATER_MAX_POWER_W);
        self.power
    }
}
