// Grid geometry: one ring of ambient heat sinks, one ring of wall.
pub const OUTER_RING_WIDTH: usize = 1;
pub const WALL_RING_WIDTH: usize = 1;
pub const BORDER_CELLS: usize = 2 * (OUTER_RING_WIDTH + WALL_RING_WIDTH);

// Noise applied once to every cell at construction (Kelvin)
pub const CELL_TEMPERATURE_NOISE_STD_K: f64 = 0.1;
// Reference per-read thermometer noise (Kelvin)
pub const SENSOR_NOISE_STD_K: f64 = 0.05;

pub const HEATER_MIN_POWER_W: f64 = 0.0;
pub const HEATER_MAX_POWER_W: f64 = 1000.0;

// === Reference room ===

pub const REFERENCE_ROOM_WIDTH: usize = 5;
pub const REFERENCE_ROOM_HEIGHT: usize = 7;
pub const REFERENCE_TIME_STEP_S: f64 = 10.0;
pub const REFERENCE_INNER_TEMP_K: f64 = 21.0;
pub const REFERENCE_OUTER_TEMP_K: f64 = 0.0;
pub const REFERENCE_SETPOINT_K: f64 = 21.0;
pub const REFERENCE_HEATER_P: f64 = 30.0;
pub const REFERENCE_HEATER_I: f64 = 0.03;
pub const REFERENCE_SEED: u64 = 0x5eed;
