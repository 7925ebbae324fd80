//! Console BI summary - What is happening?
//! KPIs, weather impact, partner tiers, area and food-type breakdowns
//!
//! Run: ./target/release/analytics_summary [section] [input.csv]
//! Sections: all, kpi, weather, partners, areas, food, distance

use anyhow::Result;
use std::env;

use delivery_analytics::aggregate::{
    area_distance_rollup, area_performance, food_type_insights, hourly_load, kpi_summary,
    partner_performance, weather_impact, weather_rating_rollup,
};
use delivery_analytics::enrich::enrich_all;
use delivery_analytics::models::{EnrichedOrder, PartnerTier};
use delivery_analytics::report::fmt_rupees;
use delivery_analytics::store::RecordStore;

fn print_section_header(title: &str) {
    println!("\n{}", "═".repeat(80));
    println!("  {}", title);
    println!("{}\n", "═".repeat(80));
}

fn print_subsection(title: &str) {
    println!("\n{}", title);
    println!("{}", "─".repeat(70));
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let section = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let input = args.get(2).map(|s| s.as_str()).unwrap_or("data/delivery_data.csv");

    let store = RecordStore::load_csv(input)?;
    if store.is_empty() {
        println!("No orders in {} - nothing to summarize", input);
        return Ok(());
    }
    let enriched = enrich_all(&store)?;

    println!("\n{}", "█".repeat(80));
    println!("{}  DELIVERY ANALYTICS SUMMARY - What is Happening?  {}", "█".repeat(13), "█".repeat(14));
    println!("{}\n", "█".repeat(80));

    match section {
        "all" => {
            run_kpi_section(&enriched);
            run_weather_section(&enriched);
            run_partner_section(&enriched);
            run_area_section(&enriched);
            run_food_section(&enriched);
            run_distance_section(&enriched);
        }
        "kpi" => run_kpi_section(&enriched),
        "weather" => run_weather_section(&enriched),
        "partners" => run_partner_section(&enriched),
        "areas" => run_area_section(&enriched),
        "food" => run_food_section(&enriched),
        "distance" => run_distance_section(&enriched),
        _ => {
            println!("Unknown section: {}", section);
            println!("Available: all, kpi, weather, partners, areas, food, distance");
        }
    }

    println!("\n{}", "█".repeat(80));
    Ok(())
}

fn run_kpi_section(enriched: &[EnrichedOrder]) {
    print_section_header("1. KEY PERFORMANCE INDICATORS");

    let kpi = kpi_summary(enriched);
    println!("  Total orders:            {:>10}", kpi.total_orders);
    println!("  Delayed orders (>40m):   {:>10}", kpi.delayed_orders);
    println!("  Delay rate:              {:>9.1}%", kpi.delay_rate_pct);
    println!("  Total revenue:           {:>10}", fmt_rupees(kpi.total_revenue));
    println!("  Revenue at risk:         {:>10}", fmt_rupees(kpi.total_revenue_loss));
    println!("  Monthly loss projection: {:>10}", fmt_rupees(kpi.monthly_loss_projection));
    println!("  Avg delivery time:       {:>8.1} min", kpi.avg_delivery_time);
    println!("  Avg satisfaction:        {:>6.1}/100", kpi.avg_satisfaction);
    println!("  Avg efficiency score:    {:>10.2}", kpi.avg_efficiency);
    println!("  Avg route score:         {:>10.2}", kpi.avg_route_score);

    print_subsection("Hourly Order Volume");
    for row in hourly_load(enriched) {
        let bar_len = (row.order_count as usize).min(40);
        let bar: String = "█".repeat(bar_len);
        println!("  {:02}:00 {:>5} {}", row.hour, row.order_count, bar);
    }
}

fn run_weather_section(enriched: &[EnrichedOrder]) {
    print_section_header("2. WEATHER IMPACT");

    println!("  {:10} {:>8} {:>12} {:>12} {:>11} {:>14}",
             "Weather", "Orders", "Avg Time", "Efficiency", "Delay%", "Revenue Loss");
    println!("  {}", "─".repeat(72));
    for row in weather_impact(enriched) {
        println!("  {:10} {:>8} {:>8.1} min {:>12.2} {:>10.1}% {:>14}",
                 row.weather.as_str(), row.order_count, row.avg_delivery_time,
                 row.avg_efficiency, row.delay_rate_pct, fmt_rupees(row.revenue_loss));
    }

    print_subsection("Weather x Rating Tier (avg delivery time)");
    println!("  {:10} {:8} {:>8} {:>12}", "Weather", "Tier", "Orders", "Avg Time");
    println!("  {}", "─".repeat(45));
    for row in weather_rating_rollup(enriched) {
        println!("  {:10} {:8} {:>8} {:>8.1} min",
                 row.weather.as_str(), row.rating_tier.as_str(), row.order_count, row.avg_time);
    }
}

fn run_partner_section(enriched: &[EnrichedOrder]) {
    print_section_header("3. PARTNER PERFORMANCE");

    let partners = partner_performance(enriched);
    let premium = partners.iter().filter(|p| p.tier == PartnerTier::Premium).count();
    let standard = partners.iter().filter(|p| p.tier == PartnerTier::Standard).count();
    let training = partners.iter().filter(|p| p.tier == PartnerTier::Training).count();

    print_subsection("Tier Distribution");
    println!("  Premium:  {:>4}", premium);
    println!("  Standard: {:>4}", standard);
    println!("  Training: {:>4}", training);

    print_subsection("Top 10 Partners by Rating");
    println!("  {:8} {:>8} {:>10} {:>10} {:>12} {:>10}",
             "Partner", "Orders", "Rating", "Avg Time", "Utilization", "Tier");
    println!("  {}", "─".repeat(66));
    for p in partners.iter().take(10) {
        println!("  {:8} {:>8} {:>10.1} {:>6.1} min {:>12.2} {:>10}",
                 p.partner_id, p.total_orders, p.avg_rating, p.avg_time,
                 p.utilization, p.tier.as_str());
    }
}

fn run_area_section(enriched: &[EnrichedOrder]) {
    print_section_header("4. AREA PERFORMANCE");

    println!("  {:18} {:>8} {:>10} {:>8} {:>12} {:>14}",
             "Area", "Orders", "Avg Time", "Delay%", "Revenue", "Churn Loss");
    println!("  {}", "─".repeat(76));
    for row in area_performance(enriched) {
        println!("  {:18} {:>8} {:>6.1} min {:>7.1}% {:>12} {:>14}",
                 row.area.as_str(), row.order_count, row.avg_delivery_time,
                 row.delay_rate_pct, fmt_rupees(row.total_revenue),
                 fmt_rupees(row.estimated_churn_loss));
    }
}

fn run_food_section(enriched: &[EnrichedOrder]) {
    print_section_header("5. FOOD TYPE INSIGHTS");

    println!("  {:12} {:>8} {:>10} {:>10} {:>10} {:>10}",
             "Food", "Orders", "Avg Time", "Min", "Max", "Avg Value");
    println!("  {}", "─".repeat(66));
    for row in food_type_insights(enriched) {
        println!("  {:12} {:>8} {:>6.1} min {:>10.1} {:>10.1} {:>10}",
                 row.food_type.as_str(), row.order_count, row.avg_time,
                 row.min_time, row.max_time, fmt_rupees(row.avg_value));
    }
}

fn run_distance_section(enriched: &[EnrichedOrder]) {
    print_section_header("6. AREA x DISTANCE BUCKET");

    println!("  {:18} {:8} {:>8} {:>10} {:>10}",
             "Area", "Bucket", "Orders", "Avg Time", "Avg KM");
    println!("  {}", "─".repeat(60));
    for row in area_distance_rollup(enriched) {
        println!("  {:18} {:8} {:>8} {:>6.1} min {:>10.2}",
                 row.area.as_str(), row.distance_bucket.as_str(), row.order_count,
                 row.avg_time, row.avg_distance);
    }
}
