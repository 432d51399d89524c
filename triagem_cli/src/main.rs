//! # Triagem CLI Application
//!
//! Prompt-driven front-end for the sizing engine.
//!
//! ## Usage
//!
//! ```text
//! triagem [PROFILE]
//! ```
//!
//! `PROFILE` is a built-in profile name (`fixed-press`, `user-press`) or a
//! path to a TOML calibration file. Set `RUST_LOG=debug` to trace the run.

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing_subscriber::EnvFilter;

use triagem_core::trucks::clamp_custom_volume;
use triagem_core::{
    builtin_profile, CalcResult, CalculatorEngine, CalibrationProfile, ScenarioRecord, SimulationInput,
    SimulationResult, TruckType,
};

fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    Some(input.trim().to_string())
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    read_line(prompt)
        .and_then(|s| s.replace(',', ".").parse().ok())
        .unwrap_or(default)
}

fn prompt_u64(prompt: &str, default: u64) -> u64 {
    read_line(prompt)
        .and_then(|s| s.replace(['.', '_'], "").parse().ok())
        .unwrap_or(default)
}

fn prompt_optional_f64(prompt: &str) -> Option<f64> {
    read_line(prompt).and_then(|s| s.replace(',', ".").parse().ok())
}

fn resolve_profile(arg: Option<String>) -> CalcResult<CalibrationProfile> {
    match arg {
        None => Ok(CalibrationProfile::default()),
        Some(arg) if arg.ends_with(".toml") => CalibrationProfile::load(Path::new(&arg)),
        Some(name) => builtin_profile(&name),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    println!("Triagem CLI - Recycling Sorting Sizing Calculator");
    println!("=================================================");
    println!();

    let profile = match resolve_profile(std::env::args().nth(1)) {
        Ok(profile) => profile,
        Err(e) => {
            print_error(&e);
            std::process::exit(2);
        }
    };
    let engine = match CalculatorEngine::try_new(profile) {
        Ok(engine) => engine,
        Err(e) => {
            print_error(&e);
            std::process::exit(2);
        }
    };
    println!("Calibration profile: {}", engine.profile().name);
    println!();

    let population = prompt_u64("Population [100000]: ", 100_000);
    let coverage_pct = prompt_f64("Coverage % [100]: ", 100.0);
    let truck_type = read_line("Truck type (Compactador/Bau/Gaiola) [Compactador]: ")
        .filter(|s| !s.is_empty())
        .map(|s| TruckType::from_str_or_default(&s))
        .unwrap_or_default();
    let custom_volume_m3 = prompt_optional_f64("Custom body volume m³ (blank for preset): ").map(clamp_custom_volume);
    let press_capacity_tons = prompt_optional_f64("Press capacity t/day (blank for default): ");

    let input = SimulationInput {
        population,
        coverage_pct,
        truck_type,
        custom_volume_m3,
        press_capacity_tons,
    };

    println!();
    match engine.calculate(&input) {
        Ok(result) => {
            print_report(&result);

            println!();
            println!("JSON Output:");
            if let Ok(json) = serde_json::to_string_pretty(&result) {
                println!("{}", json);
            }

            println!();
            println!("Scenario record:");
            if let Ok(json) = serde_json::to_string_pretty(&ScenarioRecord::new(&input, &result)) {
                println!("{}", json);
            }
        }
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    }
}

fn print_report(result: &SimulationResult) {
    let p = &result.production;
    let s = &result.staff;
    let i = &result.infrastructure;
    let truck = match result.inputs.custom_volume_m3.and_then(TruckType::matching_preset) {
        Some(preset) => preset.display_name().to_string(),
        None if result.inputs.custom_volume_m3.is_some() => {
            format!("{} (custom)", result.inputs.truck_type.display_name())
        }
        None => result.inputs.truck_type.display_name().to_string(),
    };

    println!("═══════════════════════════════════════");
    println!("  SIZING RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Population: {} ({:.1}% served)", result.inputs.population, result.inputs.coverage_pct);
    println!("  Truck:      {} ({:.0} m³ × {:.0} kg/m³)", truck,
        result.defaults_used.truck_volume_m3,
        result.defaults_used.truck_density_kg_m3
    );
    println!("  Press:      {:.1} t/day per unit", result.defaults_used.press_capacity_tons);
    println!();
    println!("Production:");
    println!("  Collected:  {:.2} t/day, {:.1} t/month", p.daily_collection_tons, p.monthly_collection_tons);
    println!("  Sorted:     {:.1} t/month ({:.0}% efficiency)", p.monthly_sorted_tons(), p.efficiency_pct);
    println!("  To press:   {:.2} t/day", p.material_to_press_tons);
    println!();
    println!("Staff:");
    println!("  Admin:           {}", s.admin);
    println!("  Drivers:         {}", s.drivers);
    println!("  Helpers:         {}", s.helpers);
    println!("  Sorters:         {}", s.sorters);
    println!("  Press operators: {}", s.press_operators);
    println!("  Forklift:        {}", s.forklift);
    println!("  Displacement:    {}", s.displacement);
    println!("  TOTAL:           {}", s.total);
    println!();
    println!("Infrastructure:");
    println!("  Trucks:     {}", i.trucks);
    println!("  Presses:    {}", i.presses);
    println!("  Forklifts:  {}", i.forklifts);
    println!("  Scales:     {}", i.scales);
    println!("═══════════════════════════════════════");
}

fn print_error(e: &triagem_core::CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}
