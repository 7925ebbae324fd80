//! Staffing projection - How many partners do we need?
//! Hourly order load with partners-needed estimates plus delay
//! likelihood by weather and peak flag
//!
//! Run: ./target/release/analytics_staffing [section] [input.csv]
//! Sections: all, hourly, delay

use anyhow::Result;
use std::env;

use delivery_analytics::aggregate::{hourly_load, weather_impact, ORDERS_PER_PARTNER_HOUR};
use delivery_analytics::enrich::enrich_all;
use delivery_analytics::models::EnrichedOrder;
use delivery_analytics::store::RecordStore;

fn print_section_header(title: &str) {
    println!("\n{}", "═".repeat(80));
    println!("  {}", title);
    println!("{}\n", "═".repeat(80));
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let section = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let input = args.get(2).map(|s| s.as_str()).unwrap_or("data/delivery_data.csv");

    let store = RecordStore::load_csv(input)?;
    if store.is_empty() {
        println!("No orders in {} - nothing to project", input);
        return Ok(());
    }
    let enriched = enrich_all(&store)?;

    println!("\n{}", "█".repeat(80));
    println!("{}  STAFFING PROJECTION - What Will We Need?  {}", "█".repeat(16), "█".repeat(17));
    println!("{}\n", "█".repeat(80));

    match section {
        "all" => {
            run_hourly_section(&enriched);
            run_delay_section(&enriched);
        }
        "hourly" => run_hourly_section(&enriched),
        "delay" => run_delay_section(&enriched),
        _ => {
            println!("Unknown section: {}", section);
            println!("Available: all, hourly, delay");
        }
    }

    println!("\n{}", "█".repeat(80));
    Ok(())
}

fn run_hourly_section(enriched: &[EnrichedOrder]) {
    print_section_header("1. HOURLY LOAD & STAFFING");

    println!("  Assumes one partner handles {} orders per hour.\n", ORDERS_PER_PARTNER_HOUR);
    for row in hourly_load(enriched) {
        let status = if enriched
            .iter()
            .any(|e| e.order.order_hour == row.hour && e.order.peak_hour)
        {
            "PEAK"
        } else {
            "    "
        };
        println!(
            "  {} Hour {:02}:00 -> {:>4} orders, avg {:>5.1} min, need ~{} partners",
            status, row.hour, row.order_count, row.avg_time, row.partners_needed
        );
    }
}

fn run_delay_section(enriched: &[EnrichedOrder]) {
    print_section_header("2. DELAY LIKELIHOOD");

    println!("  By weather:");
    println!("  {:10} {:>8} {:>12}", "Weather", "Orders", "Delay Rate");
    println!("  {}", "─".repeat(36));
    for row in weather_impact(enriched) {
        println!("  {:10} {:>8} {:>11.1}%",
                 row.weather.as_str(), row.order_count, row.delay_rate_pct);
    }

    println!("\n  By peak flag:");
    println!("  {:10} {:>8} {:>12}", "Window", "Orders", "Delay Rate");
    println!("  {}", "─".repeat(36));
    for peak in [false, true] {
        let bucket: Vec<&EnrichedOrder> =
            enriched.iter().filter(|e| e.order.peak_hour == peak).collect();
        if bucket.is_empty() {
            continue;
        }
        let delayed = bucket.iter().filter(|e| e.is_delayed).count();
        let rate = delayed as f64 / bucket.len() as f64 * 100.0;
        let label = if peak { "Peak" } else { "Off-peak" };
        println!("  {:10} {:>8} {:>11.1}%", label, bucket.len(), rate);
    }
}
