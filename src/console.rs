//! Interactive input for the `depotsim` binary.
//!
//! Readers and writers are generic so the prompts can be driven from tests.

use std::io::{self, BufRead, Write};

use crate::core::execution::config::{limits, SimulationConfig};

/// Ask until a whole number within `min..=max` is entered
pub fn prompt_in_range<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    min: u64,
    max: u64,
) -> io::Result<u64> {
    let mut line = String::new();
    loop {
        writeln!(output, "{}", prompt)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a value was entered",
            ));
        }

        match line.trim().parse::<u64>() {
            Ok(value) if (min..=max).contains(&value) => return Ok(value),
            _ => writeln!(
                output,
                "Invalid input. Please enter a number from {} to {}.",
                min, max
            )?,
        }
    }
}

/// Build a run configuration from prompts, in the order the values depend on each other.
///
/// Truck minimums are derived from the rates and fleet size entered before them.
pub fn read_config<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<SimulationConfig> {
    // Re-ask the production values until the capacity they imply is representable
    let mut config = loop {
        let base_rate = prompt_in_range(
            input,
            output,
            &format!(
                "Enter the base production per hour (n, at least {}):",
                limits::MIN_BASE_RATE
            ),
            limits::MIN_BASE_RATE,
            limits::UNBOUNDED,
        )?;
        let multiplier = prompt_in_range(
            input,
            output,
            &format!(
                "Enter the warehouse capacity multiplier (M, at least {}):",
                limits::MIN_CAPACITY_MULTIPLIER
            ),
            limits::MIN_CAPACITY_MULTIPLIER,
            limits::UNBOUNDED,
        )?;
        let factory_count = prompt_in_range(
            input,
            output,
            &format!(
                "Enter the number of factories (at least {}):",
                limits::MIN_FACTORIES
            ),
            limits::MIN_FACTORIES,
            limits::UNBOUNDED,
        )?;

        let config = SimulationConfig::new()
            .with_base_rate(base_rate)
            .with_capacity_multiplier(multiplier)
            .with_factory_count(factory_count as usize);
        match config.min_truck_capacity_for(1) {
            Ok(_) => break config,
            Err(err) => writeln!(output, "{}. Please enter smaller values.", err)?,
        }
    };

    let truck_count = prompt_in_range(
        input,
        output,
        &format!("Enter the number of trucks (at least {}):", limits::MIN_TRUCKS),
        limits::MIN_TRUCKS,
        limits::UNBOUNDED,
    )?;

    let min_capacity = config
        .min_truck_capacity_for(truck_count as usize)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?
        .max(1);
    let mut capacities = Vec::with_capacity(truck_count as usize);
    for i in 0..truck_count {
        capacities.push(prompt_in_range(
            input,
            output,
            &format!(
                "Enter the capacity of truck {} (at least {}):",
                i + 1,
                min_capacity
            ),
            min_capacity,
            limits::UNBOUNDED,
        )?);
    }

    let days = prompt_in_range(
        input,
        output,
        &format!(
            "Enter the number of days ({} to {}):",
            limits::MIN_DAYS,
            limits::MAX_DAYS
        ),
        limits::MIN_DAYS,
        limits::MAX_DAYS,
    )?;
    let hours = prompt_in_range(
        input,
        output,
        &format!(
            "Enter the number of hours per day ({} to {}):",
            limits::MIN_HOURS,
            limits::MAX_HOURS
        ),
        limits::MIN_HOURS,
        limits::MAX_HOURS,
    )?;

    config = config
        .with_truck_capacities(capacities)
        .with_horizon(days as u32, hours as u32);
    Ok(config)
}
