use crate::error::{RoomError, RoomResult};
use crate::room::{Room, StepReport};
use crate::sim_op::{SimOp, SimOpHandle};
use colored::Colorize;
use std::time::{Duration, Instant};

/// Hook phases of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Step,
    End,
}

/// Wall-clock time one operator spent in its hooks.
#[derive(Debug, Clone, Default)]
pub struct OpTiming {
    pub op_name: String,
    pub init_time: Duration,
    pub step_time: Duration,
    pub step_calls: u32,
    pub end_time: Duration,
}

impl OpTiming {
    pub fn new(op_name: String) -> Self {
        Self {
            op_name,
            ..Self::default()
        }
    }

    pub fn mean_step_time(&self) -> Duration {
        self.step_time.checked_div(self.step_calls).unwrap_or_default()
    }

    pub fn total_time(&self) -> Duration {
        self.init_time + self.step_time + self.end_time
    }
}

/// Drives a room for a fixed number of steps, handing the room to each
/// operator after every step.
pub struct RoomSimulation {
    pub room: Room,
    pub ops: Vec<Box<dyn SimOp>>,
    pub step: u64,
    pub sim_steps: u64,
    pub name: String,
    pub debug: bool,
    pub op_timings: Vec<OpTiming>,
    /// Time spent inside `Room::step` during `run`
    pub room_time: Duration,
    pub last_report: Option<StepReport>,
    has_run: bool,
}

pub struct SimProps {
    pub room: Room,
    pub name: &'static str,
    pub ops: Vec<SimOpHandle>,
    pub sim_steps: u64,
    pub debug: bool,
}

impl RoomSimulation {
    pub fn new(props: SimProps) -> RoomSimulation {
        let ops: Vec<Box<dyn SimOp>> = props.ops.into_iter().map(|handle| handle.op).collect();
        let op_timings = ops
            .iter()
            .map(|op| OpTiming::new(op.name().to_string()))
            .collect();

        RoomSimulation {
            room: props.room,
            ops,
            step: 0,
            sim_steps: props.sim_steps,
            name: props.name.to_string(),
            debug: props.debug,
            op_timings,
            room_time: Duration::ZERO,
            last_report: None,
            has_run: false,
        }
    }

    pub fn current_step(&self) -> u64 {
        self.step
    }

    /// Fraction of the run completed, in percent.
    pub fn progress_percent(&self) -> f64 {
        if self.sim_steps == 0 {
            100.0
        } else {
            self.step as f64 / self.sim_steps as f64 * 100.0
        }
    }

    /// Looks up an owned operator by concrete type.
    pub fn find_op<T: SimOp + 'static>(&self) -> Option<&T> {
        self.ops.iter().find_map(|op| op.as_any().downcast_ref::<T>())
    }

    /// Runs a single room step followed by the given operators (for testing).
    pub fn step_with_ops(&mut self, ops: &mut [&mut dyn SimOp]) -> StepReport {
        let report = self.room.step();
        self.step += 1;
        self.last_report = Some(report.clone());

        for op in ops {
            op.update_sim(self);
        }
        report
    }

    pub fn run(&mut self) -> RoomResult<()> {
        if self.has_run {
            return Err(RoomError::Config(
                "RoomSimulation.run can only execute once".to_string(),
            ));
        }
        self.has_run = true;

        if self.debug {
            println!(
                "{} {} ({} steps of {}s)",
                "🏠".bold(),
                self.name.bold(),
                self.sim_steps,
                self.room.time_step()
            );
        }

        self.run_hooks(Phase::Init);
        while self.step < self.sim_steps {
            let started = Instant::now();
            let report = self.room.step();
            self.room_time += started.elapsed();
            self.step += 1;
            self.last_report = Some(report);
            self.run_hooks(Phase::Step);
        }
        self.run_hooks(Phase::End);

        if self.debug {
            self.print_timing_report();
        }
        Ok(())
    }

    /// Hands the simulation to every owned operator for one phase.
    fn run_hooks(&mut self, phase: Phase) {
        let mut ops = std::mem::take(&mut self.ops);

        for (i, op) in ops.iter_mut().enumerate() {
            let started = Instant::now();
            match phase {
                Phase::Init => op.init_sim(self),
                Phase::Step => op.update_sim(self),
                Phase::End => op.after_sim(self),
            }
            let elapsed = started.elapsed();

            let timing = &mut self.op_timings[i];
            match phase {
                Phase::Init => timing.init_time = elapsed,
                Phase::Step => {
                    timing.step_time += elapsed;
                    timing.step_calls += 1;
                }
                Phase::End => timing.end_time = elapsed,
            }
        }
        self.ops = ops;
    }

    pub fn print_timing_report(&self) {
        let ms = |d: Duration| d.as_secs_f64() * 1e3;
        let cells = self.room.cells().len();

        println!(
            "\n⏱️  {} timing, {} steps of {}s",
            self.name.bold(),
            self.step,
            self.room.time_step()
        );
        println!(
            "   room step    {:>9.3}ms total, {:>7.4}ms per step over {} cells",
            ms(self.room_time),
            ms(self.room_time) / self.step.max(1) as f64,
            cells
        );
        for timing in &self.op_timings {
            println!(
                "   {:<12} {:>9.3}ms total, {:>7.4}ms per step (init {:.3}ms, end {:.3}ms)",
                timing.op_name,
                ms(timing.total_time()),
                ms(timing.mean_step_time()),
                ms(timing.init_time),
                ms(timing.end_time)
            );
        }
    }
}
