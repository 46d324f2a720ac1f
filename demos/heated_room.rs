use room_thermal_rust::config::RoomConfig;
use room_thermal_rust::sim::{RoomSimulation, SimProps};
use room_thermal_rust::sim_op::{HistoryRecorderOp, TemperatureReportingOp};

/// Heated room demo
/// Runs the reference room (or a JSON room passed as the first argument)
/// for ten simulated minutes' worth of steps and prints the outcome.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => RoomConfig::from_json_file(path)?,
        None => RoomConfig::default(),
    };
    let room = config.build()?;

    println!("🏠 Heated Room Simulation");
    println!("=========================");
    println!(
        "📐 {}x{} interior, {}s per step, seed {}",
        config.width, config.height, config.time_step, config.seed
    );

    let mut sim = RoomSimulation::new(SimProps {
        room,
        name: "heated_room",
        ops: vec![
            HistoryRecorderOp::handle(10),
            TemperatureReportingOp::handle(10.0),
        ],
        sim_steps: 600,
        debug: true,
    });
    sim.run()?;

    if let Some(history) = sim.find_op::<HistoryRecorderOp>() {
        for heater in 0..sim.room.heaters().len() {
            if let Some(power) = history.steady_state_power(heater, 100) {
                println!("🔥 Heater {} steady state power: {:.2}W", heater, power);
            }
        }
        println!("🗺️  Recorded {} temperature maps", history.temperature_maps.len());
    }

    println!("\n🌡️  Final temperature map (K):");
    for row in sim.room.temperature_map() {
        let line: Vec<String> = row.iter().map(|t| format!("{:>6.2}", t)).collect();
        println!("   {}", line.join(" "));
    }

    Ok(())
}
