//! Metric enricher: derives the per-order business metrics from raw
//! order fields plus two dataset-wide maxima. All formulas are pure,
//! so enrichment can be re-run without touching the source orders.

use crate::error::{PipelineError, Result};
use crate::models::{DistanceBucket, EnrichedOrder, Order, RatingTier, Weather};
use crate::store::RecordStore;

/// An order slower than this many minutes counts as delayed.
pub const DELAY_THRESHOLD_MINUTES: f64 = 40.0;

/// Share of a delayed order's value assumed lost to customer churn.
pub const CHURN_RATE: f64 = 0.15;

/// Days used to extrapolate a single-day sample to a monthly figure.
pub const MONTHLY_PROJECTION_DAYS: f64 = 30.0;

/// Fixed weather multiplier applied to the efficiency score.
pub fn weather_factor(weather: Weather) -> f64 {
    match weather {
        Weather::Sunny => 1.0,
        Weather::Cloudy => 0.9,
        Weather::Rainy => 0.7,
        Weather::Stormy => 0.5,
    }
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Dataset-wide maxima computed once per run. ActualDeliveryTime is
/// at least 10 and DistanceKM at least 0.5, so both denominators are
/// nonzero whenever the dataset is nonempty.
#[derive(Debug, Clone, Copy)]
pub struct DatasetScales {
    pub max_delivery_time: f64,
    pub max_distance_km: f64,
}

impl DatasetScales {
    pub fn from_orders(orders: &[Order]) -> Result<Self> {
        if orders.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        let max_delivery_time = orders
            .iter()
            .map(|o| o.actual_delivery_time)
            .fold(f64::MIN, f64::max);
        let max_distance_km = orders
            .iter()
            .map(|o| o.distance_km)
            .fold(f64::MIN, f64::max);
        Ok(DatasetScales {
            max_delivery_time,
            max_distance_km,
        })
    }
}

/// Computes every derived field for one order.
pub fn enrich(order: &Order, scales: &DatasetScales) -> EnrichedOrder {
    let wf = weather_factor(order.weather);
    let time = order.actual_delivery_time;

    let efficiency_score = round2((5.0 - time / 10.0) * order.partner_rating * wf);

    let is_delayed = time > DELAY_THRESHOLD_MINUTES;
    let revenue_loss_contribution = if is_delayed {
        order.order_value * CHURN_RATE
    } else {
        0.0
    };

    let time_efficiency = 1.0 - time / scales.max_delivery_time;
    let distance_efficiency = 1.0 - order.distance_km / scales.max_distance_km;
    let route_optimization_score = round2((distance_efficiency + time_efficiency) / 2.0 * 100.0);

    let customer_satisfaction_index = round3(
        (1.0 - time / scales.max_delivery_time) * 0.6 + (order.partner_rating / 5.0) * 0.4,
    ) * 100.0;

    EnrichedOrder {
        weather_factor: wf,
        efficiency_score,
        is_delayed,
        revenue_loss_contribution,
        time_efficiency,
        distance_efficiency,
        route_optimization_score,
        customer_satisfaction_index,
        rating_tier: RatingTier::from_rating(order.partner_rating),
        distance_bucket: DistanceBucket::from_km(order.distance_km),
        order: order.clone(),
    }
}

/// Enriches the whole store. Empty input surfaces as `EmptyInput` so
/// the driver can emit its "no data" report instead of dividing by a
/// missing maximum.
pub fn enrich_all(store: &RecordStore) -> Result<Vec<EnrichedOrder>> {
    let scales = DatasetScales::from_orders(store.orders())?;
    Ok(store.iter().map(|o| enrich(o, &scales)).collect())
}
