//! Console rendering of run results.

use crate::fleet::{Fleet, PriceTable};
use crate::sim::report::FulfillmentReport;
use crate::sim::types::{
    CostRecord, HORIZON_START_HOUR, HOURS_PER_DAY, LAST_SERVICE_DAY, Schedule, SocSample,
};

fn formatted_hour(hour: usize) -> String {
    format!("{:02}:00", hour % HOURS_PER_DAY)
}

/// Prints the charging schedule grouped by day, hour, and port.
pub fn print_schedule(fleet: &Fleet, schedule: &Schedule) {
    println!("\nCharging Schedule:");
    for day in 0..=LAST_SERVICE_DAY {
        // (hour, port, vehicle, power)
        let mut day_slots: Vec<(usize, usize, &str, f32)> = Vec::new();
        for (vehicle, v) in fleet.iter().enumerate() {
            for s in schedule.sessions(vehicle) {
                if (s.hour - HORIZON_START_HOUR) / HOURS_PER_DAY == day {
                    day_slots.push((s.hour, s.port, v.id.as_str(), s.power_kw));
                }
            }
        }
        if day_slots.is_empty() {
            continue;
        }
        day_slots.sort_by_key(|&(hour, port, _, _)| (hour, port));

        println!("Day {day}:");
        let mut current_hour = None;
        for (hour, port, id, power_kw) in day_slots {
            if current_hour != Some(hour) {
                if current_hour.is_some() {
                    println!();
                }
                print!("  Hour {}: Port {port}: {id} ({power_kw:.2} kW)", formatted_hour(hour));
                current_hour = Some(hour);
            } else {
                print!(", Port {port}: {id} ({power_kw:.2} kW)");
            }
        }
        println!();
    }
}

/// Prints the end-of-run SoC listing.
pub fn print_final_soc(fleet: &Fleet, final_soc: &[f32]) {
    println!("\nFinal SoC:");
    for (vehicle, v) in fleet.iter().enumerate() {
        println!("{}: {:.2}%", v.id, final_soc[vehicle] * 100.0);
    }
}

/// Prints each vehicle's hourly SoC for charging hours only.
pub fn print_soc_simulation(fleet: &Fleet, traces: &[Vec<SocSample>]) {
    println!("\nHourly SoC and Power Simulation (Charging Hours Only):");
    for (vehicle, v) in fleet.iter().enumerate() {
        println!("{}:", v.id);
        for day in 0..=LAST_SERVICE_DAY {
            let day_data: Vec<&SocSample> = traces[vehicle]
                .iter()
                .filter(|s| s.day == day && s.power_kw > 0.0)
                .collect();
            if day_data.is_empty() {
                continue;
            }
            print!("  Day {day}:");
            for s in day_data {
                print!(
                    " [{} {:.2} kW {:.2}%]",
                    formatted_hour(s.hour),
                    s.power_kw,
                    s.soc * 100.0
                );
            }
            println!();
        }
    }
}

/// Prints per-day and per-vehicle cost totals with the price behind each
/// line item.
pub fn print_cost_summary(
    fleet: &Fleet,
    costs: &[Vec<CostRecord>],
    schedule: &Schedule,
    prices: &PriceTable,
) {
    println!("\nCost Summary:");
    for (vehicle, v) in fleet.iter().enumerate() {
        if costs[vehicle].is_empty() {
            println!("{}: No charging costs", v.id);
            continue;
        }
        println!("{}:", v.id);
        let mut total = 0.0;
        for day in 0..=LAST_SERVICE_DAY {
            let day_costs: Vec<&CostRecord> =
                costs[vehicle].iter().filter(|c| c.day == day).collect();
            if day_costs.is_empty() {
                continue;
            }
            println!("  Day {day}:");
            let mut day_total = 0.0;
            for c in day_costs {
                let power_kw = schedule.power_at(vehicle, c.hour);
                println!(
                    "    Hour {}: {:.2} EUR ({:.2} kW x {:.2} EUR/kWh)",
                    formatted_hour(c.hour),
                    c.cost_eur,
                    power_kw,
                    prices.price_at(c.hour)
                );
                day_total += c.cost_eur;
            }
            println!("    Total Day {day}: {day_total:.2} EUR");
            total += day_total;
        }
        println!("  Total {}: {total:.2} EUR", v.id);
    }
}

/// Prints the requirement fulfillment check.
pub fn print_fulfillment(report: &FulfillmentReport) {
    println!("\n{report}");
}
