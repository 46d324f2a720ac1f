//! Room description loaded from JSON.
//!
//! A `RoomConfig` captures everything needed to build a ready-to-step room:
//! geometry, seed, cell properties and the attached sensors and heaters.
//! Missing fields fall back to the reference room.

use crate::constants::{
    CELL_TEMPERATURE_NOISE_STD_K, REFERENCE_HEATER_I, REFERENCE_HEATER_P,
    REFERENCE_INNER_TEMP_K, REFERENCE_OUTER_TEMP_K, REFERENCE_ROOM_HEIGHT,
    REFERENCE_ROOM_WIDTH, REFERENCE_SEED, REFERENCE_SETPOINT_K, REFERENCE_TIME_STEP_S,
};
use crate::error::{RoomError, RoomResult};
use crate::material::ThermalMaterial;
use crate::room::{CellParams, HeaterSettings, Room};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub x: usize,
    pub y: usize,
    #[serde(default)]
    pub noise_std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterConfig {
    pub x: usize,
    pub y: usize,
    /// Index into `RoomConfig::sensors`
    pub sensor: usize,
    #[serde(flatten)]
    pub settings: HeaterSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub width: usize,
    pub height: usize,
    pub time_step: f64,
    pub seed: u64,
    pub cell_noise_std: f64,
    pub cells: CellParams,
    pub sensors: Vec<SensorConfig>,
    pub heaters: Vec<HeaterConfig>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        let width = REFERENCE_ROOM_WIDTH;
        let height = REFERENCE_ROOM_HEIGHT;
        Self {
            width,
            height,
            time_step: REFERENCE_TIME_STEP_S,
            seed: REFERENCE_SEED,
            cell_noise_std: CELL_TEMPERATURE_NOISE_STD_K,
            cells: CellParams {
                inner_temp: REFERENCE_INNER_TEMP_K,
                inner: ThermalMaterial::Air.properties(),
                wall: ThermalMaterial::BrickWall.properties(),
                outer_temp: REFERENCE_OUTER_TEMP_K,
                outer: ThermalMaterial::Ambient.properties(),
            },
            // near the top wall, centred
            sensors: vec![SensorConfig {
                x: width / 2 + 2,
                y: 2,
                noise_std: 0.0,
            }],
            heaters: vec![HeaterConfig {
                x: width / 2 + 2,
                y: height / 2 + 2,
                sensor: 0,
                settings: HeaterSettings {
                    power: 0.0,
                    p: REFERENCE_HEATER_P,
                    i: REFERENCE_HEATER_I,
                    setpoint: REFERENCE_SETPOINT_K,
                },
            }],
        }
    }
}

impl RoomConfig {
    pub fn from_json_str(json: &str) -> RoomResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| RoomError::Config(format!("Failed to parse JSON: {}", e)))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RoomResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            RoomError::Config(format!("Failed to read file {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> RoomResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds and initialises the room, then attaches sensors and heaters
    /// in list order.
    pub fn build(&self) -> RoomResult<Room> {
        let mut room = Room::with_seed(self.width, self.height, self.time_step, self.seed)?
            .with_cell_noise(self.cell_noise_std)?;
        room.init_cells(&self.cells)?;

        for sensor in &self.sensors {
            room.add_noisy_sensor(sensor.x, sensor.y, sensor.noise_std)?;
        }
        for heater in &self.heaters {
            room.add_heater(heater.x, heater.y, heater.settings, heater.sensor)?;
        }
        Ok(room)
    }
}
