//! Synthetic delivery dataset generator
//!
//! Produces a delivery-order CSV matching the 17-column input schema:
//! 15 restaurant profiles, 3 delivery areas with coordinate boxes,
//! weighted weather/day/hour draws, 50 partners with stable base
//! ratings, and a delivery-time model driven by distance, weather,
//! peak load, partner quality and prep time.
//!
//! Usage:
//!   cargo run --release --bin generate_data -- [OPTIONS]
//!
//! Options:
//!   --orders <N>    Number of orders to generate (default: 1200)
//!   --seed <N>      Random seed for reproducibility (optional)
//!   --output <PATH> Output CSV path (default: data/delivery_data.csv)

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use csv::WriterBuilder;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

use delivery_analytics::enrich::{round1, round2};
use delivery_analytics::models::{CsvOrder, CustomerArea, DayType, FoodType, Weather};

/// Synthetic delivery data generator
#[derive(Parser, Debug)]
#[command(name = "generate_data")]
#[command(about = "Generate a synthetic delivery-order dataset")]
struct Args {
    /// Number of orders to generate
    #[arg(long, default_value = "1200")]
    orders: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = "data/delivery_data.csv")]
    output: PathBuf,
}

struct Restaurant {
    name: &'static str,
    lat: f64,
    lon: f64,
    food: FoodType,
}

const RESTAURANTS: [Restaurant; 15] = [
    Restaurant { name: "Pizza Palace", lat: 12.9716, lon: 77.5946, food: FoodType::Pizza },
    Restaurant { name: "Dragon Wok", lat: 12.9352, lon: 77.6245, food: FoodType::Chinese },
    Restaurant { name: "Spice Garden", lat: 12.9611, lon: 77.6387, food: FoodType::Indian },
    Restaurant { name: "Burger Barn", lat: 12.9250, lon: 77.5800, food: FoodType::FastFood },
    Restaurant { name: "Sweet Tooth", lat: 12.9450, lon: 77.5700, food: FoodType::Desserts },
    Restaurant { name: "Curry House", lat: 12.9800, lon: 77.6100, food: FoodType::Indian },
    Restaurant { name: "Noodle Box", lat: 12.9550, lon: 77.6050, food: FoodType::Chinese },
    Restaurant { name: "Flame Grill", lat: 12.9680, lon: 77.5850, food: FoodType::FastFood },
    Restaurant { name: "Roma Kitchen", lat: 12.9400, lon: 77.6200, food: FoodType::Pizza },
    Restaurant { name: "Ice Cream Hub", lat: 12.9300, lon: 77.5950, food: FoodType::Desserts },
    Restaurant { name: "Tandoori Nights", lat: 12.9750, lon: 77.6300, food: FoodType::Indian },
    Restaurant { name: "Wonton Express", lat: 12.9500, lon: 77.5750, food: FoodType::Chinese },
    Restaurant { name: "Cheese Burst", lat: 12.9650, lon: 77.6150, food: FoodType::Pizza },
    Restaurant { name: "Quick Bites", lat: 12.9350, lon: 77.6000, food: FoodType::FastFood },
    Restaurant { name: "Cake Walk", lat: 12.9850, lon: 77.5900, food: FoodType::Desserts },
];

struct AreaBox {
    area: CustomerArea,
    lat_range: (f64, f64),
    lon_range: (f64, f64),
}

const AREAS: [AreaBox; 3] = [
    AreaBox { area: CustomerArea::Downtown, lat_range: (12.960, 12.985), lon_range: (77.580, 77.610) },
    AreaBox { area: CustomerArea::Suburbs, lat_range: (12.920, 12.945), lon_range: (77.560, 77.590) },
    AreaBox { area: CustomerArea::BusinessDistrict, lat_range: (12.945, 12.970), lon_range: (77.610, 77.645) },
];

const AREA_WEIGHTS: [f64; 3] = [0.40, 0.35, 0.25];

const WEATHER_CHOICES: [Weather; 4] = [Weather::Sunny, Weather::Rainy, Weather::Cloudy, Weather::Stormy];
const WEATHER_WEIGHTS: [f64; 4] = [0.40, 0.25, 0.25, 0.10];

const DAY_WEIGHTS: [f64; 2] = [0.71, 0.29];

/// Order volume by hour of day, 08:00 through 22:00.
const HOUR_WEIGHTS: [u32; 15] = [2, 3, 5, 8, 10, 5, 3, 3, 6, 9, 10, 8, 5, 3, 2];

const PEAK_HOURS: [u8; 7] = [11, 12, 13, 18, 19, 20, 21];

fn weather_penalty(weather: Weather) -> f64 {
    match weather {
        Weather::Sunny => 0.0,
        Weather::Cloudy => 3.0,
        Weather::Rainy => 8.0,
        Weather::Stormy => 15.0,
    }
}

fn prep_minutes(food: FoodType) -> f64 {
    match food {
        FoodType::Pizza => 5.0,
        FoodType::Chinese => 3.0,
        FoodType::Indian => 6.0,
        FoodType::FastFood => 2.0,
        FoodType::Desserts => 1.0,
    }
}

fn base_value(food: FoodType) -> f64 {
    match food {
        FoodType::Pizza => 350.0,
        FoodType::Chinese => 300.0,
        FoodType::Indian => 280.0,
        FoodType::FastFood => 200.0,
        FoodType::Desserts => 180.0,
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

fn generate(n: usize, rng: &mut StdRng) -> Result<Vec<CsvOrder>> {
    let area_dist = WeightedIndex::new(AREA_WEIGHTS)?;
    let weather_dist = WeightedIndex::new(WEATHER_WEIGHTS)?;
    let day_dist = WeightedIndex::new(DAY_WEIGHTS)?;
    let hour_dist = WeightedIndex::new(HOUR_WEIGHTS)?;

    let coord_noise = Normal::new(0.0, 0.002)?;
    let rating_noise = Normal::new(0.0, 0.2)?;
    let distance_noise = Normal::new(0.0, 0.5)?;
    let time_noise = Normal::new(0.0, 5.0)?;
    let value_noise = Normal::new(0.0, 80.0)?;

    // Each partner keeps a stable base rating; per-order ratings are
    // small perturbations of it.
    let base_ratings: Vec<(String, f64)> = (1..=50)
        .map(|i| (format!("P{:03}", i), round1(rng.gen_range(2.5..5.0))))
        .collect();

    let mut orders = Vec::with_capacity(n);
    for i in 1..=n {
        let rest = &RESTAURANTS[rng.gen_range(0..RESTAURANTS.len())];
        let rest_lat = rest.lat + coord_noise.sample(rng);
        let rest_lon = rest.lon + coord_noise.sample(rng);

        let area = &AREAS[area_dist.sample(rng)];
        let del_lat = rng.gen_range(area.lat_range.0..area.lat_range.1);
        let del_lon = rng.gen_range(area.lon_range.0..area.lon_range.1);

        let weather = WEATHER_CHOICES[weather_dist.sample(rng)];
        let day_type = [DayType::Weekday, DayType::Weekend][day_dist.sample(rng)];
        let hour = 8 + hour_dist.sample(rng) as u8;
        let is_peak = PEAK_HOURS.contains(&hour);

        let (partner_id, base_rating) = &base_ratings[rng.gen_range(0..base_ratings.len())];
        let rating = round1((base_rating + rating_noise.sample(rng)).clamp(1.0, 5.0));

        // Planar degree distance scaled to km (~111 km per degree).
        let degrees =
            ((rest_lat - del_lat).powi(2) + (rest_lon - del_lon).powi(2)).sqrt();
        let distance = round2((degrees * 111.0 + distance_noise.sample(rng)).max(0.5));

        let base_time = 10.0 + distance * 4.0;
        let peak_penalty = if is_peak { 7.0 } else { 0.0 };
        let rating_bonus = (rating - 3.0) * -2.0;
        let actual_time = round1(
            (base_time
                + weather_penalty(weather)
                + peak_penalty
                + rating_bonus
                + prep_minutes(rest.food)
                + time_noise.sample(rng))
            .clamp(10.0, 90.0),
        );

        let order_value = (base_value(rest.food) + value_noise.sample(rng)).round().max(80.0);

        orders.push(CsvOrder {
            order_id: format!("ORD{:05}", i),
            restaurant_lat: round6(rest_lat),
            restaurant_lon: round6(rest_lon),
            restaurant_name: rest.name.to_string(),
            food_type: rest.food.as_str().to_string(),
            delivery_lat: round6(del_lat),
            delivery_lon: round6(del_lon),
            customer_area: area.area.as_str().to_string(),
            weather: weather.as_str().to_string(),
            partner_id: partner_id.clone(),
            partner_rating: rating,
            order_hour: hour,
            day_type: day_type.as_str().to_string(),
            order_value,
            actual_delivery_time: actual_time,
            distance_km: distance,
            peak_hour: is_peak as u8,
        });
    }
    Ok(orders)
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("🔧 Synthetic Delivery Data Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Orders:      {}", args.orders);
    println!("Output:      {}", args.output.display());
    if let Some(seed) = args.seed {
        println!("Random seed: {}", seed);
    }
    println!();

    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    println!("🏭 Generating orders...");
    let orders = generate(args.orders, &mut rng)?;

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new().has_headers(true).from_path(&args.output)?;
    for order in &orders {
        writer.serialize(order)?;
    }
    writer.flush()?;

    let delayed = orders.iter().filter(|o| o.actual_delivery_time > 40.0).count();
    let total_value: f64 = orders.iter().map(|o| o.order_value).sum();

    println!("\n✅ Generation complete!");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Orders written:  {:>8}", orders.len());
    println!("Delayed (>40m):  {:>8}", delayed);
    println!("Total value:     {:>8.0}", total_value);
    println!("Output file:     {}", args.output.display());

    Ok(())
}
