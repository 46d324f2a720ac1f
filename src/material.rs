// src/material.rs - Thermal material presets for room cells

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resistance and capacity of one cell's worth of material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalProperties {
    /// Kelvin per Watt
    pub resistance: f64,
    /// Joules per Kelvin
    pub capacity: f64,
}

impl ThermalProperties {
    pub fn new(resistance: f64, capacity: f64) -> Self {
        Self {
            resistance,
            capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThermalMaterial {
    Air,
    BrickWall,
    Ambient,
}

impl ThermalMaterial {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThermalMaterial::Air => "air",
            ThermalMaterial::BrickWall => "brick_wall",
            ThermalMaterial::Ambient => "ambient",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "air" => Some(ThermalMaterial::Air),
            "brick_wall" => Some(ThermalMaterial::BrickWall),
            "ambient" => Some(ThermalMaterial::Ambient),
            _ => None,
        }
    }

    pub fn properties(&self) -> ThermalProperties {
        // every variant is inserted below
        MATERIAL_PROPERTIES[self]
    }
}

// Illustrative values, not a validated building material model.
pub static MATERIAL_PROPERTIES: Lazy<HashMap<ThermalMaterial, ThermalProperties>> =
    Lazy::new(|| {
        use ThermalMaterial::*;
        let mut m = HashMap::new();

        m.insert(Air, ThermalProperties::new(0.1, 200.0));
        m.insert(BrickWall, ThermalProperties::new(3.0, 100.0));
        // outside air seen as a reservoir; the heat sink kind keeps it fixed
        m.insert(Ambient, ThermalProperties::new(0.1, 200.0));

        m
    });
