//! Room grid: owns the thermal cells, sensors and heaters and runs the
//! per-tick diffusion and actuation pass.
//!
//! The full grid is `(width + 4) x (height + 4)` cells: an outer ring of
//! heat sinks for the ambient, a ring of wall, then the interior. Cell ids
//! are row-major, `id = y * (width + 4) + x`.
pub mod layout;

use crate::constants::{
    BORDER_CELLS, CELL_TEMPERATURE_NOISE_STD_K, OUTER_RING_WIDTH, WALL_RING_WIDTH,
};
use crate::error::{RoomError, RoomResult};
use crate::heater::Heater;
use crate::material::ThermalProperties;
use crate::thermal_cell::{CellKind, CellSpec, HeatTransfer, ThermalCell};
use crate::thermometer::Thermometer;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which ring of the room a coordinate falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Outer,
    Wall,
    Interior,
}

/// Inputs for building the walled room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellParams {
    pub inner_temp: f64,
    pub inner: ThermalProperties,
    pub wall: ThermalProperties,
    pub outer_temp: f64,
    pub outer: ThermalProperties,
}

impl CellParams {
    /// Initial wall temperature, a fixed steady-state estimate kept as-is.
    pub fn wall_temperature(&self) -> f64 {
        (self.inner_temp - self.outer_temp) * self.wall.resistance
            / (self.inner_temp + 2.0 * self.wall.resistance)
    }
}

/// Controller settings for a new heater.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaterSettings {
    /// Starting output in Watts
    pub power: f64,
    pub p: f64,
    pub i: f64,
    /// Kelvin
    pub setpoint: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub step: u64,
    pub heater_powers: Vec<f64>,
    pub total_energy: f64,
}

#[derive(Debug, Clone)]
pub struct Room {
    width: usize,
    height: usize,
    time_step: f64,
    cells: Vec<ThermalCell>,
    heaters: Vec<Heater>,
    sensors: Vec<Thermometer>,
    /// cell id -> heater index
    heater_cells: HashMap<usize, usize>,
    rng: ChaCha8Rng,
    cell_noise_std: f64,
    step: u64,
}

fn region_of(x: usize, y: usize, full_width: usize, full_height: usize) -> Region {
    let edge = |v: usize, full: usize, ring: usize| v < ring || v >= full - ring;
    if edge(x, full_width, OUTER_RING_WIDTH) || edge(y, full_height, OUTER_RING_WIDTH) {
        Region::Outer
    } else if edge(x, full_width, OUTER_RING_WIDTH + WALL_RING_WIDTH)
        || edge(y, full_height, OUTER_RING_WIDTH + WALL_RING_WIDTH)
    {
        Region::Wall
    } else {
        Region::Interior
    }
}

fn check_finite(name: &'static str, value: f64) -> RoomResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RoomError::InvalidGain { name, value })
    }
}

fn check_noise(std: f64) -> RoomResult<()> {
    if std.is_finite() && std >= 0.0 {
        Ok(())
    } else {
        Err(RoomError::InvalidNoise(std))
    }
}

impl Room {
    /// Creates an empty room drawing all randomness from `rng`.
    ///
    /// The bordered grid must be addressable: `(width + 4) * (height + 4)`
    /// has to fit in a `usize`.
    pub fn new(width: usize, height: usize, time_step: f64, rng: ChaCha8Rng) -> RoomResult<Self> {
        let cell_count = width
            .checked_add(BORDER_CELLS)
            .zip(height.checked_add(BORDER_CELLS))
            .and_then(|(w, h)| w.checked_mul(h));
        if width == 0 || height == 0 || cell_count.is_none() {
            return Err(RoomError::InvalidDimensions { width, height });
        }
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(RoomError::InvalidTimeStep(time_step));
        }
        Ok(Self {
            width,
            height,
            time_step,
            cells: Vec::new(),
            heaters: Vec::new(),
            sensors: Vec::new(),
            heater_cells: HashMap::new(),
            rng,
            cell_noise_std: CELL_TEMPERATURE_NOISE_STD_K,
            step: 0,
        })
    }

    pub fn with_seed(width: usize, height: usize, time_step: f64, seed: u64) -> RoomResult<Self> {
        Self::new(width, height, time_step, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Sets the construction noise applied to every cell temperature.
    pub fn with_cell_noise(mut self, std: f64) -> RoomResult<Self> {
        check_noise(std)?;
        if self.is_initialized() {
            return Err(RoomError::AlreadyInitialized);
        }
        self.cell_noise_std = std;
        Ok(self)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn full_width(&self) -> usize {
        self.width + BORDER_CELLS
    }

    pub fn full_height(&self) -> usize {
        self.height + BORDER_CELLS
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn steps_taken(&self) -> u64 {
        self.step
    }

    pub fn is_initialized(&self) -> bool {
        !self.cells.is_empty()
    }

    pub fn region(&self, x: usize, y: usize) -> Option<Region> {
        self.contains(x, y)
            .then(|| region_of(x, y, self.full_width(), self.full_height()))
    }

    fn contains(&self, x: usize, y: usize) -> bool {
        x < self.full_width() && y < self.full_height()
    }

    /// Id of the allocated cell at `(x, y)`.
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        let id = y * self.full_width() + x;
        (id < self.cells.len()).then_some(id)
    }

    fn cell_id(&self, x: usize, y: usize) -> RoomResult<usize> {
        self.index_of(x, y).ok_or(RoomError::NoSuchCell { x, y })
    }

    // === Initialisation ===

    /// Builds the walled room: heat sink ring outside, wall ring, interior.
    pub fn init_cells(&mut self, params: &CellParams) -> RoomResult<()> {
        let wall_temp = params.wall_temperature();
        let (full_width, full_height) = (self.full_width(), self.full_height());
        let params = *params;

        self.init_cells_with(|x, y| match region_of(x, y, full_width, full_height) {
            Region::Outer => CellSpec {
                temperature: params.outer_temp,
                resistance: params.outer.resistance,
                capacity: params.outer.capacity,
                kind: CellKind::HeatSink,
            },
            Region::Wall => CellSpec {
                temperature: wall_temp,
                resistance: params.wall.resistance,
                capacity: params.wall.capacity,
                kind: CellKind::Conductor,
            },
            Region::Interior => CellSpec {
                temperature: params.inner_temp,
                resistance: params.inner.resistance,
                capacity: params.inner.capacity,
                kind: CellKind::Conductor,
            },
        })
    }

    /// Allocates every cell from `spec_for(x, y)`, perturbs each starting
    /// temperature once with construction noise, then links grid neighbors.
    pub fn init_cells_with<F>(&mut self, mut spec_for: F) -> RoomResult<()>
    where
        F: FnMut(usize, usize) -> CellSpec,
    {
        if self.is_initialized() {
            return Err(RoomError::AlreadyInitialized);
        }
        let noise = if self.cell_noise_std > 0.0 {
            let std = self.cell_noise_std;
            Some(Normal::new(0.0, std).map_err(|_| RoomError::InvalidNoise(std))?)
        } else {
            None
        };

        let (full_width, full_height) = (self.full_width(), self.full_height());
        let mut cells = Vec::with_capacity(full_width * full_height);

        for y in 0..full_height {
            for x in 0..full_width {
                let mut spec = spec_for(x, y);
                if !(spec.capacity.is_finite() && spec.capacity > 0.0) {
                    return Err(RoomError::InvalidCapacity {
                        x,
                        y,
                        capacity: spec.capacity,
                    });
                }
                if !(spec.resistance.is_finite() && spec.resistance > 0.0) {
                    return Err(RoomError::InvalidResistance {
                        x,
                        y,
                        resistance: spec.resistance,
                    });
                }
                if let Some(normal) = &noise {
                    spec.temperature += normal.sample(&mut self.rng);
                }
                cells.push(ThermalCell::new(cells.len(), x, y, spec));
            }
        }

        // second pass: every cell exists before any link is made
        for id in 0..cells.len() {
            let (x, y) = (cells[id].x(), cells[id].y());
            if x > 0 {
                cells[id].link(id - 1);
            }
            if x + 1 < full_width {
                cells[id].link(id + 1);
            }
            if y > 0 {
                cells[id].link(id - full_width);
            }
            if y + 1 < full_height {
                cells[id].link(id + full_width);
            }
        }

        self.cells = cells;
        Ok(())
    }

    // === Sensors and heaters ===

    pub fn add_sensor(&mut self, x: usize, y: usize) -> RoomResult<usize> {
        self.add_noisy_sensor(x, y, 0.0)
    }

    /// Attaches a thermometer whose every read carries fresh Gaussian noise.
    pub fn add_noisy_sensor(&mut self, x: usize, y: usize, noise_std: f64) -> RoomResult<usize> {
        check_noise(noise_std)?;
        let cell = self.cell_id(x, y)?;
        if self.sensors.iter().any(|s| s.cell_id() == cell) {
            return Err(RoomError::DuplicateSensor { x, y });
        }
        self.sensors.push(Thermometer::new(x, y, cell, noise_std));
        Ok(self.sensors.len() - 1)
    }

    /// Attaches a PI-controlled heater regulating on an existing sensor.
    pub fn add_heater(
        &mut self,
        x: usize,
        y: usize,
        settings: HeaterSettings,
        sensor: usize,
    ) -> RoomResult<usize> {
        let cell = self.cell_id(x, y)?;
        if self.cells[cell].kind() == CellKind::HeatSink {
            return Err(RoomError::HeaterOnHeatSink { x, y });
        }
        if self.heater_cells.contains_key(&cell) {
            return Err(RoomError::DuplicateHeater { x, y });
        }
        if sensor >= self.sensors.len() {
            return Err(RoomError::NoSuchSensor(sensor));
        }
        check_finite("power", settings.power)?;
        check_finite("p", settings.p)?;
        check_finite("i", settings.i)?;
        check_finite("setpoint", settings.setpoint)?;

        self.heaters.push(Heater::new(
            x,
            y,
            cell,
            sensor,
            settings.power,
            settings.p,
            settings.i,
            settings.setpoint,
        ));
        let id = self.heaters.len() - 1;
        self.heater_cells.insert(cell, id);
        Ok(id)
    }

    // === Stepping ===

    /// Advances the room by one tick.
    ///
    /// Heaters update from their sensors first. Cells are then visited
    /// hottest first; a heater's heat is injected into its cell just before
    /// that cell pushes heat to its neighbors.
    pub fn step(&mut self) -> StepReport {
        for heater in &mut self.heaters {
            let sensor = &self.sensors[heater.sensor_id()];
            if let Some(measured) = sensor.read(&self.cells, &mut self.rng) {
                heater.update(measured, self.time_step);
            }
        }

        for id in self.ranking() {
            if let Some(&heater) = self.heater_cells.get(&id) {
                let joules = self.heaters[heater].heat_for(self.time_step);
                self.cells[id].inject_heat(joules);
            }
            self.push_heat(id, |_| {});
        }

        self.step += 1;
        StepReport {
            step: self.step,
            heater_powers: self.heaters.iter().map(Heater::power).collect(),
            total_energy: self.total_thermal_energy(),
        }
    }

    pub fn run(&mut self, steps: u64) -> Option<StepReport> {
        let mut last = None;
        for _ in 0..steps {
            last = Some(self.step());
        }
        last
    }

    /// Cell ids ordered hottest first; ties keep ascending id.
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.cells.len()).collect();
        order.sort_by(|&a, &b| {
            self.cells[b]
                .temperature
                .total_cmp(&self.cells[a].temperature)
        });
        order
    }

    /// Lets one cell push heat to each neighbor in a fresh random order,
    /// deducting each transfer before the next neighbor is tried.
    pub fn transfer_heat(&mut self, id: usize) -> RoomResult<Vec<HeatTransfer>> {
        if id >= self.cells.len() {
            return Err(RoomError::Config(format!("no cell with id {id}")));
        }
        let mut transfers = Vec::with_capacity(4);
        self.push_heat(id, |t| transfers.push(t));
        Ok(transfers)
    }

    fn push_heat<F: FnMut(HeatTransfer)>(&mut self, id: usize, mut record: F) {
        let mut order = self.cells[id].neighbors().to_vec();
        order.shuffle(&mut self.rng);

        for neighbor in order {
            let source_temp = self.cells[id].temperature;
            let source_resistance = self.cells[id].resistance();
            let joules =
                self.cells[neighbor].exchange_heat(self.time_step, source_temp, source_resistance);
            self.cells[id].inject_heat(-joules);
            record(HeatTransfer {
                from: id,
                to: neighbor,
                joules,
            });
        }
    }

    // === Queries ===

    pub fn cells(&self) -> &[ThermalCell] {
        &self.cells
    }

    pub fn cell(&self, id: usize) -> Option<&ThermalCell> {
        self.cells.get(id)
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Option<&ThermalCell> {
        self.index_of(x, y).map(|id| &self.cells[id])
    }

    pub fn heaters(&self) -> &[Heater] {
        &self.heaters
    }

    pub fn heater(&self, id: usize) -> RoomResult<&Heater> {
        self.heaters.get(id).ok_or(RoomError::NoSuchHeater(id))
    }

    pub fn heater_power(&self, id: usize) -> RoomResult<f64> {
        self.heater(id).map(Heater::power)
    }

    pub fn sensors(&self) -> &[Thermometer] {
        &self.sensors
    }

    /// Reads a sensor the way a heater does, noise included.
    pub fn read_sensor(&mut self, id: usize) -> RoomResult<f64> {
        let sensor = self.sensors.get(id).ok_or(RoomError::NoSuchSensor(id))?;
        sensor
            .read(&self.cells, &mut self.rng)
            .ok_or(RoomError::NoSuchCell {
                x: sensor.x,
                y: sensor.y,
            })
    }

    /// Noise-free temperature under a sensor; draws nothing from the rng.
    pub fn sensor_true_temperature(&self, id: usize) -> RoomResult<f64> {
        let sensor = self.sensors.get(id).ok_or(RoomError::NoSuchSensor(id))?;
        sensor.true_temperature(&self.cells).ok_or(RoomError::NoSuchCell {
            x: sensor.x,
            y: sensor.y,
        })
    }

    pub fn temperature_at(&self, x: usize, y: usize) -> Option<f64> {
        self.cell_at(x, y).map(|c| c.temperature)
    }

    /// Snapshot indexed `[y][x]`.
    pub fn temperature_map(&self) -> Vec<Vec<f64>> {
        if self.cells.is_empty() {
            return Vec::new();
        }
        self.cells
            .chunks(self.full_width())
            .map(|row| row.iter().map(|c| c.temperature).collect())
            .collect()
    }

    /// Mean over the interior only; wall and outer rings are excluded.
    pub fn mean_interior_temperature(&self) -> f64 {
        let inset = OUTER_RING_WIDTH + WALL_RING_WIDTH;
        let mut total = 0.0;
        let mut count = 0;
        for y in inset..inset + self.height {
            for x in inset..inset + self.width {
                if let Some(temp) = self.temperature_at(x, y) {
                    total += temp;
                    count += 1;
                }
            }
        }
        if count > 0 { total / count as f64 } else { 0.0 }
    }

    /// Sum of temperature times capacity over every cell, in Joules.
    pub fn total_thermal_energy(&self) -> f64 {
        self.cells.iter().map(ThermalCell::thermal_energy).sum()
    }

    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.cells.iter().map(|c| c.temperature).fold(None, |range, t| match range {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SENSOR_NOISE_STD_K;
    use crate::material::ThermalMaterial;
    use approx::assert_abs_diff_eq;

    fn params() -> CellParams {
        CellParams {
            inner_temp: 21.0,
            inner: ThermalMaterial::Air.properties(),
            wall: ThermalMaterial::BrickWall.properties(),
            outer_temp: 0.0,
            outer: ThermalMaterial::Ambient.properties(),
        }
    }

    fn quiet_room(width: usize, height: usize) -> Room {
        let mut room = Room::with_seed(width, height, 10.0, 1)
            .and_then(|r| r.with_cell_noise(0.0))
            .unwrap();
        room.init_cells(&params()).unwrap();
        room
    }

    #[test]
    fn rejects_bad_construction() {
        assert_eq!(
            Room::with_seed(0, 3, 10.0, 1).unwrap_err(),
            RoomError::InvalidDimensions { width: 0, height: 3 }
        );
        assert!(matches!(
            Room::with_seed(3, 3, 0.0, 1),
            Err(RoomError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            Room::with_seed(3, 3, f64::NAN, 1),
            Err(RoomError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            Room::with_seed(3, 3, 1.0, 1).unwrap().with_cell_noise(-0.1),
            Err(RoomError::InvalidNoise(_))
        ));
    }

    #[test]
    fn rejects_dimensions_that_overflow_the_border() {
        assert_eq!(
            Room::with_seed(usize::MAX, 1, 10.0, 1).unwrap_err(),
            RoomError::InvalidDimensions {
                width: usize::MAX,
                height: 1
            }
        );
        assert!(matches!(
            Room::with_seed(1, usize::MAX - 3, 10.0, 1),
            Err(RoomError::InvalidDimensions { .. })
        ));
        // each bordered side fits, their product does not
        let side = usize::MAX / 2;
        assert!(matches!(
            Room::with_seed(side, side, 10.0, 1),
            Err(RoomError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn far_coordinates_are_missing_cells() {
        let mut room = quiet_room(1, 1);
        assert_eq!(
            room.add_sensor(3, usize::MAX),
            Err(RoomError::NoSuchCell {
                x: 3,
                y: usize::MAX
            })
        );
        assert_eq!(
            room.add_noisy_sensor(usize::MAX, 0, 0.05),
            Err(RoomError::NoSuchCell {
                x: usize::MAX,
                y: 0
            })
        );
        assert_eq!(room.index_of(usize::MAX, usize::MAX), None);
        assert_eq!(room.temperature_at(0, usize::MAX), None);
        assert!(room.cell_at(usize::MAX, 2).is_none());
        assert_eq!(room.region(usize::MAX, usize::MAX), None);

        let sensor = room.add_sensor(2, 2).unwrap();
        let settings = HeaterSettings {
            power: 0.0,
            p: 30.0,
            i: 0.03,
            setpoint: 21.0,
        };
        assert_eq!(
            room.add_heater(usize::MAX, usize::MAX, settings, sensor),
            Err(RoomError::NoSuchCell {
                x: usize::MAX,
                y: usize::MAX
            })
        );
    }

    #[test]
    fn warm_sink_only_changes_by_pushing() {
        let mut room = Room::with_seed(1, 1, 10.0, 11)
            .and_then(|r| r.with_cell_noise(0.0))
            .unwrap();
        room.init_cells_with(|x, y| CellSpec {
            temperature: if (x, y) == (0, 2) { 50.0 } else { 10.0 },
            resistance: 0.1,
            capacity: 200.0,
            kind: if (x, y) == (0, 2) {
                CellKind::HeatSink
            } else {
                CellKind::Conductor
            },
        })
        .unwrap();
        let sink = room.index_of(0, 2).unwrap();
        let conductor = room.index_of(1, 2).unwrap();

        // the sink pushes into all three colder neighbors and pays for it
        let transfers = room.transfer_heat(sink).unwrap();
        assert_eq!(transfers.len(), 3);
        assert!(transfers.iter().all(|t| t.from == sink && t.joules > 0.0));
        let sent: f64 = transfers.iter().map(|t| t.joules).sum();
        let after_push = room.cells()[sink].temperature;
        assert_abs_diff_eq!(after_push, 50.0 - sent / 200.0, epsilon = 1e-9);
        assert!(after_push < 50.0);
        for t in &transfers {
            assert!(room.cells()[t.to].temperature > 10.0);
        }

        // a hotter conductor pushing into the sink leaves it untouched
        room.cells[conductor].temperature = 100.0;
        let transfers = room.transfer_heat(conductor).unwrap();
        let into_sink = transfers.iter().find(|t| t.to == sink).unwrap();
        assert!(into_sink.joules > 0.0);
        assert_eq!(room.cells()[sink].temperature, after_push);
        assert!(room.cells()[conductor].temperature < 100.0);
    }

    #[test]
    fn rings_have_expected_kinds_and_temperatures() {
        let room = quiet_room(5, 7);
        assert_eq!(room.cells().len(), 9 * 11);
        let wall_temp = params().wall_temperature();
        assert_abs_diff_eq!(wall_temp, 21.0 * 3.0 / 27.0, epsilon = 1e-12);

        for cell in room.cells() {
            match room.region(cell.x(), cell.y()).unwrap() {
                Region::Outer => {
                    assert_eq!(cell.kind(), CellKind::HeatSink);
                    assert_eq!(cell.temperature, 0.0);
                    assert_eq!(cell.capacity(), 200.0);
                }
                Region::Wall => {
                    assert_eq!(cell.kind(), CellKind::Conductor);
                    assert_eq!(cell.temperature, wall_temp);
                    assert_eq!(cell.resistance(), 3.0);
                    assert_eq!(cell.capacity(), 100.0);
                }
                Region::Interior => {
                    assert_eq!(cell.kind(), CellKind::Conductor);
                    assert_eq!(cell.temperature, 21.0);
                }
            }
        }
        assert_eq!(room.region(0, 5), Some(Region::Outer));
        assert_eq!(room.region(8, 10), Some(Region::Outer));
        assert_eq!(room.region(1, 1), Some(Region::Wall));
        assert_eq!(room.region(7, 9), Some(Region::Wall));
        assert_eq!(room.region(2, 2), Some(Region::Interior));
        assert_eq!(room.region(6, 8), Some(Region::Interior));
        assert_eq!(room.region(9, 0), None);
    }

    #[test]
    fn ids_match_coordinates() {
        let room = quiet_room(2, 3);
        for (id, cell) in room.cells().iter().enumerate() {
            assert_eq!(cell.id(), id);
            assert_eq!(room.index_of(cell.x(), cell.y()), Some(id));
        }
        assert_eq!(room.index_of(6, 0), None);
    }

    #[test]
    fn construction_noise_applied_once() {
        let mut room = Room::with_seed(3, 3, 10.0, 4).unwrap();
        room.init_cells(&params()).unwrap();
        let interior: Vec<f64> = room
            .cells()
            .iter()
            .filter(|c| room.region(c.x(), c.y()) == Some(Region::Interior))
            .map(|c| c.temperature)
            .collect();
        assert!(interior.iter().any(|&t| t != 21.0));
        assert!(interior.iter().all(|&t| (t - 21.0).abs() < 1.0));
        // reads do not re-draw
        assert_eq!(room.temperature_at(3, 3), room.temperature_at(3, 3));
    }

    #[test]
    fn second_init_is_rejected() {
        let mut room = quiet_room(1, 1);
        assert_eq!(room.init_cells(&params()), Err(RoomError::AlreadyInitialized));
    }

    #[test]
    fn non_positive_capacity_is_rejected() {
        let mut room = Room::with_seed(1, 1, 10.0, 1).unwrap();
        let mut bad = params();
        bad.wall.capacity = 0.0;
        assert!(matches!(
            room.init_cells(&bad),
            Err(RoomError::InvalidCapacity { x: 1, .. })
        ));
        assert!(!room.is_initialized());

        bad = params();
        bad.inner.capacity = -5.0;
        assert!(matches!(
            room.init_cells(&bad),
            Err(RoomError::InvalidCapacity { x: 2, y: 2, .. })
        ));
    }

    #[test]
    fn attachment_errors() {
        let mut room = quiet_room(1, 1);
        let settings = HeaterSettings {
            power: 0.0,
            p: 30.0,
            i: 0.03,
            setpoint: 21.0,
        };

        assert_eq!(room.add_sensor(5, 5), Err(RoomError::NoSuchCell { x: 5, y: 5 }));
        let sensor = room.add_sensor(2, 2).unwrap();
        assert_eq!(room.add_sensor(2, 2), Err(RoomError::DuplicateSensor { x: 2, y: 2 }));

        assert_eq!(
            room.add_heater(9, 1, settings, sensor),
            Err(RoomError::NoSuchCell { x: 9, y: 1 })
        );
        assert_eq!(
            room.add_heater(0, 0, settings, sensor),
            Err(RoomError::HeaterOnHeatSink { x: 0, y: 0 })
        );
        assert_eq!(room.add_heater(2, 2, settings, 3), Err(RoomError::NoSuchSensor(3)));

        let heater = room.add_heater(2, 2, settings, sensor).unwrap();
        assert_eq!(heater, 0);
        assert_eq!(
            room.add_heater(2, 2, settings, sensor),
            Err(RoomError::DuplicateHeater { x: 2, y: 2 })
        );

        // heaters may sit in the wall ring
        let wall_sensor = room.add_sensor(1, 2).unwrap();
        assert!(room.add_heater(1, 2, settings, wall_sensor).is_ok());

        let nan = HeaterSettings { p: f64::NAN, ..settings };
        assert!(matches!(
            room.add_heater(3, 2, nan, sensor),
            Err(RoomError::InvalidGain { name: "p", .. })
        ));
    }

    #[test]
    fn sensor_reads() {
        let mut room = quiet_room(2, 2);
        let exact = room.add_sensor(2, 2).unwrap();
        let noisy = room.add_noisy_sensor(3, 3, SENSOR_NOISE_STD_K).unwrap();

        assert_eq!(room.read_sensor(exact), Ok(21.0));
        assert_eq!(room.sensor_true_temperature(noisy), Ok(21.0));
        let readings: Vec<f64> = (0..10).map(|_| room.read_sensor(noisy).unwrap()).collect();
        assert!(readings.iter().any(|&r| r != 21.0));
        assert!(readings.iter().all(|&r| (r - 21.0).abs() < 1.0));

        assert_eq!(room.read_sensor(7), Err(RoomError::NoSuchSensor(7)));
        assert_eq!(
            room.add_noisy_sensor(2, 3, f64::INFINITY),
            Err(RoomError::InvalidNoise(f64::INFINITY))
        );
    }

    #[test]
    fn attaching_before_init_fails() {
        let mut room = Room::with_seed(1, 1, 10.0, 1).unwrap();
        assert_eq!(room.add_sensor(2, 2), Err(RoomError::NoSuchCell { x: 2, y: 2 }));
    }

    #[test]
    fn ranking_is_hottest_first() {
        let mut room = quiet_room(2, 2);
        let hot = room.index_of(3, 3).unwrap();
        room.cells[hot].temperature = 50.0;
        let ranking = room.ranking();
        assert_eq!(ranking.len(), room.cells().len());
        assert_eq!(ranking[0], hot);
        for pair in ranking.windows(2) {
            let (a, b) = (&room.cells()[pair[0]], &room.cells()[pair[1]]);
            assert!(a.temperature >= b.temperature);
            if a.temperature == b.temperature {
                assert!(pair[0] < pair[1]);
            }
        }
    }

    #[test]
    fn transfer_pushes_only_downhill() {
        let mut room = quiet_room(1, 1);
        let centre = room.index_of(2, 2).unwrap();
        let before = room.cells()[centre].temperature;

        let transfers = room.transfer_heat(centre).unwrap();
        assert_eq!(transfers.len(), 4);
        let mut neighbors: Vec<usize> = transfers.iter().map(|t| t.to).collect();
        neighbors.sort();
        let mut expected = room.cells()[centre].neighbors().to_vec();
        expected.sort();
        assert_eq!(neighbors, expected);

        let sent: f64 = transfers.iter().map(|t| t.joules).sum();
        assert!(transfers.iter().all(|t| t.from == centre && t.joules > 0.0));
        assert_abs_diff_eq!(
            room.cells()[centre].temperature,
            before - sent / room.cells()[centre].capacity(),
            epsilon = 1e-9
        );

        // a heat sink colder than all its neighbors pushes nothing
        let corner = room.index_of(0, 0).unwrap();
        let transfers = room.transfer_heat(corner).unwrap();
        assert!(transfers.iter().all(|t| t.joules == 0.0));
        assert_eq!(room.cells()[corner].temperature, 0.0);

        assert!(room.transfer_heat(1000).is_err());
    }

    #[test]
    fn heater_heat_enters_its_cell() {
        let mut room = Room::with_seed(1, 1, 10.0, 3)
            .and_then(|r| r.with_cell_noise(0.0))
            .unwrap();
        // interior only, all neighbors at the same temperature: no exchange
        room.init_cells_with(|_, _| CellSpec {
            temperature: 20.0,
            resistance: 0.1,
            capacity: 200.0,
            kind: CellKind::Conductor,
        })
        .unwrap();
        let sensor = room.add_sensor(0, 0).unwrap();
        room.add_heater(
            2,
            2,
            HeaterSettings {
                power: 0.0,
                p: 10.0,
                i: 0.0,
                setpoint: 21.0,
            },
            sensor,
        )
        .unwrap();

        let energy_before = room.total_thermal_energy();
        let report = room.step();
        // 10 W for 10 s
        assert_eq!(report.step, 1);
        assert_eq!(report.heater_powers, vec![10.0]);
        assert_abs_diff_eq!(report.total_energy, energy_before + 100.0, epsilon = 1e-9);
    }

    #[test]
    fn aggregates() {
        let room = quiet_room(2, 3);
        assert_abs_diff_eq!(room.mean_interior_temperature(), 21.0, epsilon = 1e-12);

        let wall_cells = 4 * 5 - 2 * 3;
        let sink_cells = 6 * 7 - 4 * 5;
        let expected = 6.0 * 21.0 * 200.0
            + wall_cells as f64 * params().wall_temperature() * 100.0
            + sink_cells as f64 * 0.0;
        assert_abs_diff_eq!(room.total_thermal_energy(), expected, epsilon = 1e-9);

        let map = room.temperature_map();
        assert_eq!(map.len(), 7);
        assert!(map.iter().all(|row| row.len() == 6));
        assert_eq!(map[3][2], room.temperature_at(2, 3).unwrap());
        assert_eq!(room.temperature_range(), Some((0.0, 21.0)));
    }

    #[test]
    fn empty_room_queries() {
        let mut room = Room::with_seed(2, 2, 1.0, 1).unwrap();
        assert!(room.temperature_map().is_empty());
        assert_eq!(room.mean_interior_temperature(), 0.0);
        assert_eq!(room.total_thermal_energy(), 0.0);
        assert_eq!(room.temperature_range(), None);
        assert_eq!(room.step().step, 1);
    }
}
