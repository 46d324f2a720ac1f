//! Thermal cell: the atomic unit of the room grid
//!
//! A cell holds a temperature, a resistance to its neighbors and a heat
//! capacity. Neighbors are stored as ids into the owning room's cell
//! vector, never as references.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Fixed ambient reservoir: computes exchanges but never absorbs them.
    HeatSink,
    /// Temperature follows the heat it exchanges.
    Conductor,
}

impl CellKind {
    /// Whether joules computed by `exchange_heat` are committed to the cell.
    pub fn absorbs_heat(&self) -> bool {
        matches!(self, CellKind::Conductor)
    }
}

/// Initial description of a cell, before construction noise is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSpec {
    pub temperature: f64,
    pub resistance: f64,
    pub capacity: f64,
    pub kind: CellKind,
}

/// One directional heat movement recorded during a transfer pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatTransfer {
    pub from: usize,
    pub to: usize,
    pub joules: f64,
}

#[derive(Debug, Clone)]
pub struct ThermalCell {
    id: usize,
    x: usize,
    y: usize,
    /// Kelvin
    pub temperature: f64,
    /// Kelvin per Watt
    resistance: f64,
    /// Joules per Kelvin
    capacity: f64,
    kind: CellKind,
    neighbors: Vec<usize>,
}

impl ThermalCell {
    /// Capacity must be positive; the room validates specs before building cells.
    pub fn new(id: usize, x: usize, y: usize, spec: CellSpec) -> Self {
        Self {
            id,
            x,
            y,
            temperature: spec.temperature,
            resistance: spec.resistance,
            capacity: spec.capacity,
            kind: spec.kind,
            neighbors: Vec::with_capacity(4),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    pub(crate) fn link(&mut self, neighbor: usize) {
        self.neighbors.push(neighbor);
    }

    /// Stored thermal energy relative to 0 K, in Joules.
    pub fn thermal_energy(&self) -> f64 {
        self.temperature * self.capacity
    }

    pub fn inject_heat(&mut self, joules: f64) {
        self.temperature += joules / self.capacity;
    }

    /// Conducts heat into this cell from a warmer source through the two
    /// resistances in series.
    ///
    /// Returns the joules that left the source. Nothing flows uphill: a
    /// source colder than this cell yields 0. Heat sinks report the joules
    /// but keep their temperature.
    pub fn exchange_heat(
        &mut self,
        time_step: f64,
        source_temp: f64,
        source_resistance: f64,
    ) -> f64 {
        if source_temp < self.temperature {
            return 0.0;
        }
        let joules =
            (source_temp - self.temperature) / (source_resistance + self.resistance) * time_step;
        if self.kind.absorbs_heat() {
            self.inject_heat(joules);
        }
        joules
    }
}
