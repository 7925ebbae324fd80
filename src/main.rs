//! Full pipeline driver: load the delivery CSV, enrich every order,
//! run all aggregations, write the flat-file exports and the final
//! business report.
//!
//! Run: cargo run --release -- [OPTIONS]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use delivery_analytics::aggregate::{
    alerts, area_distance_rollup, area_performance, food_type_insights, hourly_load, kpi_summary,
    partner_performance, peak_analysis, weather_impact, weather_rating_rollup,
};
use delivery_analytics::enrich::enrich_all;
use delivery_analytics::error::PipelineError;
use delivery_analytics::export::{
    write_dashboard_json, write_enriched_csv, write_rows,
};
use delivery_analytics::report::{build_report, no_data_report};
use delivery_analytics::store::RecordStore;

#[derive(Parser, Debug)]
#[command(name = "delivery_analytics")]
#[command(about = "Run the full delivery analytics pipeline")]
struct Args {
    /// Input delivery CSV
    #[arg(long, default_value = "data/delivery_data.csv")]
    input: PathBuf,

    /// Enriched dataset output path
    #[arg(long, default_value = "data/delivery_data_enriched.csv")]
    enriched: PathBuf,

    /// Directory for per-aggregate CSVs, the report and the dashboard snapshot
    #[arg(long, default_value = "output/reports")]
    output_dir: PathBuf,

    /// Include a generation timestamp in the report header
    #[arg(long, default_value = "false")]
    stamp: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args = Args::parse();

    let store = RecordStore::load_csv(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let label = if args.stamp {
        Some(chrono::Local::now().format("Generated %Y-%m-%d %H:%M").to_string())
    } else {
        None
    };

    std::fs::create_dir_all(&args.output_dir)?;
    let report_path = args.output_dir.join("final_report.txt");

    let enriched = match enrich_all(&store) {
        Ok(enriched) => enriched,
        Err(PipelineError::EmptyInput) => {
            warn!("Input contains no orders; writing no-data report");
            std::fs::write(&report_path, no_data_report(label.as_deref()))?;
            info!("Wrote {}", report_path.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    info!("Enriched {} orders", enriched.len());

    let kpis = kpi_summary(&enriched);
    let weather = weather_impact(&enriched);
    let partners = partner_performance(&enriched);
    let areas = area_performance(&enriched);
    let foods = food_type_insights(&enriched);
    let peak = peak_analysis(&enriched);
    let hourly = hourly_load(&enriched);
    let weather_rating = weather_rating_rollup(&enriched);
    let distance = area_distance_rollup(&enriched);

    write_enriched_csv(&args.enriched, &enriched)?;
    write_rows(args.output_dir.join("partner_utilization.csv"), &partners)?;
    write_rows(args.output_dir.join("weather_impact.csv"), &weather)?;
    write_rows(args.output_dir.join("area_performance.csv"), &areas)?;
    write_rows(args.output_dir.join("food_type.csv"), &foods)?;
    write_rows(args.output_dir.join("peak_analysis.csv"), &peak)?;
    write_rows(args.output_dir.join("hourly_load.csv"), &hourly)?;
    write_rows(args.output_dir.join("weather_rating.csv"), &weather_rating)?;
    write_rows(args.output_dir.join("distance_analysis.csv"), &distance)?;

    let alert_lines = alerts(&enriched, &partners);
    write_dashboard_json(
        args.output_dir.join("dashboard.json"),
        &kpis,
        &partners,
        &alert_lines,
    )?;

    let report = build_report(
        label.as_deref(),
        &kpis,
        &weather,
        &partners,
        &areas,
        &foods,
        &peak,
    );
    std::fs::write(&report_path, &report)?;
    info!("Wrote {}", report_path.display());

    info!(
        "Pipeline complete: {} orders, {} delayed, Rs.{:.0} revenue at risk",
        kpis.total_orders, kpis.delayed_orders, kpis.total_revenue_loss
    );

    Ok(())
}
