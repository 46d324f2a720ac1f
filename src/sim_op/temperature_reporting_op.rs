//! Temperature reporting operation
//! Reports room temperatures and heater output every 10% of the simulation cycle
use crate::sim::simulation::RoomSimulation;
use crate::sim_op::{SimOp, SimOpHandle};
use colored::Colorize;
use std::any::Any;

pub struct TemperatureReportingOp {
    pub report_frequency_percent: f64,
    last_reported_step: Option<u64>,
    reports: usize,
}

/// Values printed by one report line
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSummary {
    pub step: u64,
    pub mean_interior_k: f64,
    pub min_k: f64,
    pub max_k: f64,
    pub heater_powers_w: Vec<f64>,
    pub total_energy_j: f64,
}

impl Default for TemperatureReportingOp {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureReportingOp {
    pub fn new() -> Self {
        Self::with_frequency(10.0) // Report every 10% of simulation
    }

    pub fn with_frequency(report_frequency_percent: f64) -> Self {
        Self {
            report_frequency_percent,
            last_reported_step: None,
            reports: 0,
        }
    }

    pub fn handle(report_frequency_percent: f64) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::with_frequency(report_frequency_percent)))
    }

    pub fn reports_made(&self) -> usize {
        self.reports
    }

    fn milestone(&self, step: u64, sim_steps: u64) -> i64 {
        let progress_percent = step as f64 / sim_steps as f64 * 100.0;
        (progress_percent / self.report_frequency_percent).floor() as i64
    }

    fn should_report(&self, sim: &RoomSimulation) -> bool {
        if sim.sim_steps == 0 || self.report_frequency_percent <= 0.0 {
            return false;
        }
        let last = match self.last_reported_step {
            Some(step) => self.milestone(step, sim.sim_steps),
            None => -1,
        };
        self.milestone(sim.step, sim.sim_steps) > last
    }

    pub fn summarize(sim: &RoomSimulation) -> TemperatureSummary {
        let room = &sim.room;
        let (min_k, max_k) = room.temperature_range().unwrap_or((0.0, 0.0));
        TemperatureSummary {
            step: sim.step,
            mean_interior_k: room.mean_interior_temperature(),
            min_k,
            max_k,
            heater_powers_w: room.heaters().iter().map(|h| h.power()).collect(),
            total_energy_j: room.total_thermal_energy(),
        }
    }

    fn print_summary(summary: &TemperatureSummary, progress_percent: f64) {
        let powers = summary
            .heater_powers_w
            .iter()
            .map(|p| format!("{:.1}W", p))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "🌡️  {} step {:>6} | interior {:>7.3}K | range {:>7.3}K..{:>7.3}K \
             | heaters [{}] | energy {:.3e}J",
            format!("{:>5.1}%", progress_percent).cyan(),
            summary.step,
            summary.mean_interior_k,
            summary.min_k,
            summary.max_k,
            powers.yellow(),
            summary.total_energy_j
        );
    }
}

impl SimOp for TemperatureReportingOp {
    fn name(&self) -> &str {
        "TemperatureReporting"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn init_sim(&mut self, sim: &mut RoomSimulation) {
        let summary = Self::summarize(sim);
        println!(
            "{} initial interior {:.3}K, {} cells, {} heaters",
            "🚀".bold(),
            summary.mean_interior_k,
            sim.room.cells().len(),
            sim.room.heaters().len()
        );
    }

    fn update_sim(&mut self, sim: &mut RoomSimulation) {
        if self.should_report(sim) {
            Self::print_summary(&Self::summarize(sim), sim.progress_percent());
            self.last_reported_step = Some(sim.step);
            self.reports += 1;
        }
    }

    fn after_sim(&mut self, sim: &mut RoomSimulation) {
        let summary = Self::summarize(sim);
        println!(
            "{} final interior {:.3}K after {} steps",
            "🏁".bold(),
            summary.mean_interior_k,
            summary.step
        );
    }
}
