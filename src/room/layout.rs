// Read-only views of a room for rendering and export.

use super::Room;
use crate::error::RoomResult;
use crate::thermal_cell::CellKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub id: usize,
    pub x: usize,
    pub y: usize,
    pub kind: CellKind,
    pub temperature: f64,
    pub resistance: f64,
    pub capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaterView {
    pub x: usize,
    pub y: usize,
    pub sensor: usize,
    pub power: f64,
    pub p: f64,
    pub i: f64,
    pub setpoint: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorView {
    pub x: usize,
    pub y: usize,
    pub noise_std: f64,
}

/// Snapshot of the whole room. There is no loader; the shape may change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomLayout {
    pub width: usize,
    pub height: usize,
    pub time_step: f64,
    pub step: u64,
    pub cells: Vec<CellView>,
    pub heaters: Vec<HeaterView>,
    pub sensors: Vec<SensorView>,
}

impl RoomLayout {
    pub fn to_json(&self) -> RoomResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Room {
    /// Enumerates every cell with its id, coordinate, kind and temperature.
    pub fn cell_views(&self) -> Vec<CellView> {
        self.cells
            .iter()
            .map(|c| CellView {
                id: c.id(),
                x: c.x(),
                y: c.y(),
                kind: c.kind(),
                temperature: c.temperature,
                resistance: c.resistance(),
                capacity: c.capacity(),
            })
            .collect()
    }

    pub fn layout(&self) -> RoomLayout {
        RoomLayout {
            width: self.width,
            height: self.height,
            time_step: self.time_step,
            step: self.step,
            cells: self.cell_views(),
            heaters: self
                .heaters
                .iter()
                .map(|h| HeaterView {
                    x: h.x,
                    y: h.y,
                    sensor: h.sensor_id(),
                    power: h.power(),
                    p: h.p,
                    i: h.i,
                    setpoint: h.setpoint,
                })
                .collect(),
            sensors: self
                .sensors
                .iter()
                .map(|s| SensorView {
                    x: s.x,
                    y: s.y,
                    noise_std: s.noise_std(),
                })
                .collect(),
        }
    }
}
