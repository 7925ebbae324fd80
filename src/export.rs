//! Flat-file exports: the enriched dataset, one CSV per aggregate,
//! and the JSON snapshot consumed by the external dashboard/viewer.

use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use crate::aggregate::{KpiSummary, PartnerRow};
use crate::error::Result;
use crate::models::{
    CustomerArea, DayType, DistanceBucket, EnrichedOrder, FoodType, RatingTier, Weather,
};

/// Enriched export row: every raw column followed by every derived
/// field, matching the canonical header order.
#[derive(Debug, Serialize)]
struct EnrichedCsvRow<'a> {
    #[serde(rename = "OrderID")]
    order_id: &'a str,
    #[serde(rename = "RestaurantLat")]
    restaurant_lat: f64,
    #[serde(rename = "RestaurantLon")]
    restaurant_lon: f64,
    #[serde(rename = "RestaurantName")]
    restaurant_name: &'a str,
    #[serde(rename = "FoodType")]
    food_type: FoodType,
    #[serde(rename = "DeliveryLat")]
    delivery_lat: f64,
    #[serde(rename = "DeliveryLon")]
    delivery_lon: f64,
    #[serde(rename = "CustomerArea")]
    customer_area: CustomerArea,
    #[serde(rename = "Weather")]
    weather: Weather,
    #[serde(rename = "PartnerID")]
    partner_id: &'a str,
    #[serde(rename = "PartnerRating")]
    partner_rating: f64,
    #[serde(rename = "OrderHour")]
    order_hour: u8,
    #[serde(rename = "DayType")]
    day_type: DayType,
    #[serde(rename = "OrderValue")]
    order_value: f64,
    #[serde(rename = "ActualDeliveryTime")]
    actual_delivery_time: f64,
    #[serde(rename = "DistanceKM")]
    distance_km: f64,
    #[serde(rename = "PeakHour")]
    peak_hour: u8,
    #[serde(rename = "WeatherFactor")]
    weather_factor: f64,
    #[serde(rename = "EfficiencyScore")]
    efficiency_score: f64,
    #[serde(rename = "IsDelayed")]
    is_delayed: bool,
    #[serde(rename = "RevenueLossContribution")]
    revenue_loss_contribution: f64,
    #[serde(rename = "TimeEfficiency")]
    time_efficiency: f64,
    #[serde(rename = "DistanceEfficiency")]
    distance_efficiency: f64,
    #[serde(rename = "RouteOptimizationScore")]
    route_optimization_score: f64,
    #[serde(rename = "CustomerSatisfactionIndex")]
    customer_satisfaction_index: f64,
    #[serde(rename = "RatingTier")]
    rating_tier: RatingTier,
    #[serde(rename = "DistanceBucket")]
    distance_bucket: DistanceBucket,
}

impl<'a> From<&'a EnrichedOrder> for EnrichedCsvRow<'a> {
    fn from(e: &'a EnrichedOrder) -> Self {
        let o = &e.order;
        EnrichedCsvRow {
            order_id: &o.order_id,
            restaurant_lat: o.restaurant_lat,
            restaurant_lon: o.restaurant_lon,
            restaurant_name: &o.restaurant_name,
            food_type: o.food_type,
            delivery_lat: o.delivery_lat,
            delivery_lon: o.delivery_lon,
            customer_area: o.customer_area,
            weather: o.weather,
            partner_id: &o.partner_id,
            partner_rating: o.partner_rating,
            order_hour: o.order_hour,
            day_type: o.day_type,
            order_value: o.order_value,
            actual_delivery_time: o.actual_delivery_time,
            distance_km: o.distance_km,
            peak_hour: o.peak_hour as u8,
            weather_factor: e.weather_factor,
            efficiency_score: e.efficiency_score,
            is_delayed: e.is_delayed,
            revenue_loss_contribution: e.revenue_loss_contribution,
            time_efficiency: e.time_efficiency,
            distance_efficiency: e.distance_efficiency,
            route_optimization_score: e.route_optimization_score,
            customer_satisfaction_index: e.customer_satisfaction_index,
            rating_tier: e.rating_tier,
            distance_bucket: e.distance_bucket,
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes the enriched dataset (raw columns plus derived fields).
pub fn write_enriched_csv(path: impl AsRef<Path>, orders: &[EnrichedOrder]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for e in orders {
        writer.serialize(EnrichedCsvRow::from(e))?;
    }
    writer.flush()?;
    info!("Wrote {} enriched rows to {}", orders.len(), path.display());
    Ok(())
}

/// Writes one aggregate's rows as a headered CSV.
pub fn write_rows<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// KPI snapshot for the external dashboard and viewer builders.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub kpis: &'a KpiSummary,
    pub top_partner_id: Option<&'a str>,
    pub top_partner_rating: Option<f64>,
    pub alerts: &'a [String],
}

pub fn write_dashboard_json(
    path: impl AsRef<Path>,
    kpis: &KpiSummary,
    partners: &[PartnerRow],
    alerts: &[String],
) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let snapshot = DashboardSnapshot {
        kpis,
        top_partner_id: partners.first().map(|p| p.partner_id.as_str()),
        top_partner_rating: partners.first().map(|p| p.avg_rating),
        alerts,
    };
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot).map_err(std::io::Error::from)?;
    info!("Wrote dashboard snapshot to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{alerts, kpi_summary, partner_performance};
    use crate::enrich::enrich_all;
    use crate::store::RecordStore;

    const HEADER: &str = "OrderID,RestaurantLat,RestaurantLon,RestaurantName,FoodType,DeliveryLat,DeliveryLon,CustomerArea,Weather,PartnerID,PartnerRating,OrderHour,DayType,OrderValue,ActualDeliveryTime,DistanceKM,PeakHour";

    fn sample_store() -> RecordStore {
        let csv = format!(
            "{}\n\
             ORD00001,12.97,77.59,Pizza Palace,Pizza,12.96,77.60,Downtown,Sunny,P001,4.2,12,Weekday,350,32.5,2.4,1\n\
             ORD00002,12.94,77.62,Dragon Wok,Chinese,12.93,77.58,Suburbs,Stormy,P002,2.8,20,Weekend,300,55.0,6.5,1\n",
            HEADER
        );
        RecordStore::from_reader(csv.as_bytes()).unwrap()
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("delivery_analytics_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_enriched_export_reloads_as_valid_input() {
        let store = sample_store();
        let enriched = enrich_all(&store).unwrap();
        let path = temp_path("enriched.csv");
        write_enriched_csv(&path, &enriched).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("OrderID,"));
        assert!(header.contains("EfficiencyScore"));
        assert!(header.contains("DistanceBucket"));
        // Derived columns are a superset of the input schema, so the
        // export is itself loadable.
        let reloaded = RecordStore::from_reader(text.as_bytes()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.orders()[1].order_id, "ORD00002");
    }

    #[test]
    fn test_enriched_export_is_deterministic() {
        let store = sample_store();
        let enriched = enrich_all(&store).unwrap();
        let a = temp_path("enriched_a.csv");
        let b = temp_path("enriched_b.csv");
        write_enriched_csv(&a, &enriched).unwrap();
        write_enriched_csv(&b, &enriched).unwrap();
        assert_eq!(
            std::fs::read(&a).unwrap(),
            std::fs::read(&b).unwrap()
        );
    }

    #[test]
    fn test_dashboard_snapshot_json() {
        let store = sample_store();
        let enriched = enrich_all(&store).unwrap();
        let kpis = kpi_summary(&enriched);
        let partners = partner_performance(&enriched);
        let alert_lines = alerts(&enriched, &partners);
        let path = temp_path("dashboard.json");
        write_dashboard_json(&path, &kpis, &partners, &alert_lines).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["kpis"]["total_orders"], 2);
        assert_eq!(value["top_partner_id"], "P001");
        assert_eq!(value["alerts"].as_array().unwrap().len(), 3);
    }
}
