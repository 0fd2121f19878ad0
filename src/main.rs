//! depot-sim entry point — CLI wiring and config-driven scheduling runs.

use std::path::Path;
use std::process;

use depot_sim::config::ScenarioConfig;
use depot_sim::fleet::{AvailabilityGrid, PriceTable};
use depot_sim::io::export::{export_costs_csv, export_schedule_csv, export_soc_csv};
use depot_sim::reporting;
use depot_sim::sim::needs::derive_energy_needs;
use depot_sim::sim::report::FulfillmentReport;
use depot_sim::sim::scheduler::schedule_charging;
use depot_sim::sim::simulator::simulate;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    ports_override: Option<usize>,
    availability_path: Option<String>,
    prices_path: Option<String>,
    schedule_out: Option<String>,
    costs_out: Option<String>,
    soc_out: Option<String>,
}

fn print_help() {
    eprintln!("depot-sim — depot-scale EV charging port scheduler and cost simulator");
    eprintln!();
    eprintln!("Usage: depot-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, port_crunch, weekend_lull)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --ports <n>              Override charging port count");
    eprintln!("  --availability <path>    Load availability grid from CSV instead of generating it");
    eprintln!("  --prices <path>          Load hourly prices from CSV instead of the config pattern");
    eprintln!("  --schedule-out <path>    Export the charging schedule to CSV");
    eprintln!("  --costs-out <path>       Export per-vehicle costs to CSV");
    eprintln!("  --soc-out <path>         Export per-vehicle SoC traces to CSV");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        ports_override: None,
        availability_path: None,
        prices_path: None,
        schedule_out: None,
        costs_out: None,
        soc_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--ports" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --ports requires a count argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<usize>() {
                    cli.ports_override = Some(p);
                } else {
                    eprintln!("error: --ports value \"{}\" is not a valid count", args[i]);
                    process::exit(1);
                }
            }
            "--availability" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --availability requires a path argument");
                    process::exit(1);
                }
                cli.availability_path = Some(args[i].clone());
            }
            "--prices" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --prices requires a path argument");
                    process::exit(1);
                }
                cli.prices_path = Some(args[i].clone());
            }
            "--schedule-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --schedule-out requires a path argument");
                    process::exit(1);
                }
                cli.schedule_out = Some(args[i].clone());
            }
            "--costs-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --costs-out requires a path argument");
                    process::exit(1);
                }
                cli.costs_out = Some(args[i].clone());
            }
            "--soc-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --soc-out requires a path argument");
                    process::exit(1);
                }
                cli.soc_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply overrides
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(ports) = cli.ports_override {
        scenario.simulation.num_ports = ports;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Build inputs
    let sim_config = scenario.sim_config();
    let fleet = scenario.fleet();

    let needs = match derive_energy_needs(&fleet, &scenario.requirement_specs(), sim_config.initial_soc)
    {
        Ok(needs) => needs,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let grid = if let Some(ref path) = cli.availability_path {
        match AvailabilityGrid::from_csv_file(Path::new(path), &fleet) {
            Ok(grid) => grid,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        scenario.availability_grid(&fleet)
    };

    let prices = if let Some(ref path) = cli.prices_path {
        match PriceTable::from_csv_file(Path::new(path), scenario.prices.fallback_eur_per_kwh) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        scenario.price_table()
    };

    // Schedule, then replay for SoC and cost
    let scheduled = schedule_charging(&fleet, &needs, &grid, &sim_config);
    let result = simulate(&fleet, &needs, &scheduled.schedule, &prices, &sim_config);
    let fulfillment = FulfillmentReport::from_schedule(&fleet, &needs, &scheduled.schedule);

    // Print the run report
    reporting::print_schedule(&fleet, &scheduled.schedule);
    reporting::print_final_soc(&fleet, &result.final_soc);
    reporting::print_soc_simulation(&fleet, &result.soc_traces);
    reporting::print_cost_summary(&fleet, &result.cost_records, &scheduled.schedule, &prices);
    reporting::print_fulfillment(&fulfillment);

    // Export CSVs if requested
    if let Some(ref path) = cli.schedule_out {
        if let Err(e) = export_schedule_csv(&fleet, &scheduled.schedule, Path::new(path)) {
            eprintln!("error: failed to write schedule CSV: {e}");
            process::exit(1);
        }
        eprintln!("Schedule written to {path}");
    }
    if let Some(ref path) = cli.costs_out {
        if let Err(e) = export_costs_csv(&fleet, &result.cost_records, Path::new(path)) {
            eprintln!("error: failed to write cost CSV: {e}");
            process::exit(1);
        }
        eprintln!("Costs written to {path}");
    }
    if let Some(ref path) = cli.soc_out {
        if let Err(e) = export_soc_csv(&fleet, &result.soc_traces, Path::new(path)) {
            eprintln!("error: failed to write SoC CSV: {e}");
            process::exit(1);
        }
        eprintln!("SoC traces written to {path}");
    }
}
