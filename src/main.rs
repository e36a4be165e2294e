use std::io;
use std::sync::Arc;

use depotsim::console;
use depotsim::core::event_sink::LogSink;
use depotsim::core::execution::SimulationEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let config = console::read_config(&mut input, &mut output)?;

    println!(
        "Warehouse capacity: {} units.\n\nProduction cycle started.\n",
        config.warehouse_capacity()?
    );

    let engine = SimulationEngine::new(config, Arc::new(LogSink))?;
    let report = engine.run()?;

    println!("\n{}", report);
    Ok(())
}
