use crate::thermal_cell::ThermalCell;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Point temperature sensor attached to one room cell.
///
/// The sensor keeps only its coordinate and the id of the cell it watches;
/// readings are looked up in the room's cells on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thermometer {
    pub x: usize,
    pub y: usize,
    cell: usize,
    /// Standard deviation of per-read Gaussian noise in Kelvin (0 = exact)
    noise_std: f64,
}

impl Thermometer {
    pub(crate) fn new(x: usize, y: usize, cell: usize, noise_std: f64) -> Self {
        Self {
            x,
            y,
            cell,
            noise_std,
        }
    }

    pub fn cell_id(&self) -> usize {
        self.cell
    }

    pub fn noise_std(&self) -> f64 {
        self.noise_std
    }

    pub fn true_temperature(&self, cells: &[ThermalCell]) -> Option<f64> {
        cells.get(self.cell).map(|c| c.temperature)
    }

    /// Reads the watched cell, adding a fresh noise draw when noise is enabled.
    pub fn read<R: Rng + ?Sized>(&self, cells: &[ThermalCell], rng: &mut R) -> Option<f64> {
        let temperature = self.true_temperature(cells)?;
        if self.noise_std > 0.0 {
            // noise_std is validated finite and non-negative on attachment
            let normal = Normal::new(0.0, self.noise_std).ok()?;
            Some(temperature + normal.sample(rng))
        } else {
            Some(temperature)
        }
    }
}
