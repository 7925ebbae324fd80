use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Weather condition. Declaration order is the fixed reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
}

impl Weather {
    pub const ALL: [Weather; 4] = [
        Weather::Sunny,
        Weather::Cloudy,
        Weather::Rainy,
        Weather::Stormy,
    ];

    pub fn parse(s: &str) -> Result<Self, PipelineError> {
        match s {
            "Sunny" => Ok(Weather::Sunny),
            "Cloudy" => Ok(Weather::Cloudy),
            "Rainy" => Ok(Weather::Rainy),
            "Stormy" => Ok(Weather::Stormy),
            _ => Err(PipelineError::UnknownCategory {
                field: "Weather",
                value: s.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "Sunny",
            Weather::Cloudy => "Cloudy",
            Weather::Rainy => "Rainy",
            Weather::Stormy => "Stormy",
        }
    }
}

/// Cuisine category. Wire spelling for FastFood is "Fast Food".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FoodType {
    Pizza,
    Chinese,
    Indian,
    #[serde(rename = "Fast Food")]
    FastFood,
    Desserts,
}

impl FoodType {
    pub fn parse(s: &str) -> Result<Self, PipelineError> {
        match s {
            "Pizza" => Ok(FoodType::Pizza),
            "Chinese" => Ok(FoodType::Chinese),
            "Indian" => Ok(FoodType::Indian),
            "Fast Food" => Ok(FoodType::FastFood),
            "Desserts" => Ok(FoodType::Desserts),
            _ => Err(PipelineError::UnknownCategory {
                field: "FoodType",
                value: s.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodType::Pizza => "Pizza",
            FoodType::Chinese => "Chinese",
            FoodType::Indian => "Indian",
            FoodType::FastFood => "Fast Food",
            FoodType::Desserts => "Desserts",
        }
    }
}

/// Delivery destination zone. Wire spelling for BusinessDistrict is
/// "Business District".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CustomerArea {
    Downtown,
    Suburbs,
    #[serde(rename = "Business District")]
    BusinessDistrict,
}

impl CustomerArea {
    pub fn parse(s: &str) -> Result<Self, PipelineError> {
        match s {
            "Downtown" => Ok(CustomerArea::Downtown),
            "Suburbs" => Ok(CustomerArea::Suburbs),
            "Business District" => Ok(CustomerArea::BusinessDistrict),
            _ => Err(PipelineError::UnknownCategory {
                field: "CustomerArea",
                value: s.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerArea::Downtown => "Downtown",
            CustomerArea::Suburbs => "Suburbs",
            CustomerArea::BusinessDistrict => "Business District",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn parse(s: &str) -> Result<Self, PipelineError> {
        match s {
            "Weekday" => Ok(DayType::Weekday),
            "Weekend" => Ok(DayType::Weekend),
            _ => Err(PipelineError::UnknownCategory {
                field: "DayType",
                value: s.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }
}

/// Partner rating bracket used in the Weather x RatingTier rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatingTier {
    High,
    Medium,
    Low,
}

impl RatingTier {
    pub fn from_rating(rating: f64) -> Self {
        if rating >= 4.0 {
            RatingTier::High
        } else if rating >= 3.0 {
            RatingTier::Medium
        } else {
            RatingTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingTier::High => "High",
            RatingTier::Medium => "Medium",
            RatingTier::Low => "Low",
        }
    }
}

/// Trip length bracket used in the Area x DistanceBucket rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DistanceBucket {
    Short,
    Medium,
    Long,
}

impl DistanceBucket {
    pub fn from_km(km: f64) -> Self {
        if km < 3.0 {
            DistanceBucket::Short
        } else if km < 6.0 {
            DistanceBucket::Medium
        } else {
            DistanceBucket::Long
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceBucket::Short => "Short",
            DistanceBucket::Medium => "Medium",
            DistanceBucket::Long => "Long",
        }
    }
}

/// Partner performance classification over aggregate rating and time.
/// The rating guard runs first; guard order is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PartnerTier {
    Premium,
    Standard,
    Training,
}

impl PartnerTier {
    pub fn classify(avg_rating: f64, avg_time: f64) -> Self {
        if avg_rating >= 4.0 && avg_time < 35.0 {
            PartnerTier::Premium
        } else if avg_rating >= 3.0 && avg_time < 45.0 {
            PartnerTier::Standard
        } else {
            PartnerTier::Training
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PartnerTier::Premium => "Premium",
            PartnerTier::Standard => "Standard",
            PartnerTier::Training => "Training",
        }
    }
}

/// Raw record as it appears in the delivery CSV. Categorical columns
/// stay as strings here; parsing into closed enums happens in
/// `to_order` so an unrecognized value surfaces with its column name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvOrder {
    #[serde(rename = "OrderID")]
    pub order_id: String,
    #[serde(rename = "RestaurantLat")]
    pub restaurant_lat: f64,
    #[serde(rename = "RestaurantLon")]
    pub restaurant_lon: f64,
    #[serde(rename = "RestaurantName")]
    pub restaurant_name: String,
    #[serde(rename = "FoodType")]
    pub food_type: String,
    #[serde(rename = "DeliveryLat")]
    pub delivery_lat: f64,
    #[serde(rename = "DeliveryLon")]
    pub delivery_lon: f64,
    #[serde(rename = "CustomerArea")]
    pub customer_area: String,
    #[serde(rename = "Weather")]
    pub weather: String,
    #[serde(rename = "PartnerID")]
    pub partner_id: String,
    #[serde(rename = "PartnerRating")]
    pub partner_rating: f64,
    #[serde(rename = "OrderHour")]
    pub order_hour: u8,
    #[serde(rename = "DayType")]
    pub day_type: String,
    #[serde(rename = "OrderValue")]
    pub order_value: f64,
    #[serde(rename = "ActualDeliveryTime")]
    pub actual_delivery_time: f64,
    #[serde(rename = "DistanceKM")]
    pub distance_km: f64,
    #[serde(rename = "PeakHour")]
    pub peak_hour: u8,
}

/// One delivery order. Created once at ingestion, immutable after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub restaurant_lat: f64,
    pub restaurant_lon: f64,
    pub restaurant_name: String,
    pub food_type: FoodType,
    pub delivery_lat: f64,
    pub delivery_lon: f64,
    pub customer_area: CustomerArea,
    pub weather: Weather,
    pub partner_id: String,
    pub partner_rating: f64,
    pub order_hour: u8,
    pub day_type: DayType,
    pub order_value: f64,
    pub actual_delivery_time: f64,
    pub distance_km: f64,
    pub peak_hour: bool,
}

impl CsvOrder {
    pub fn to_order(&self) -> Result<Order, PipelineError> {
        Ok(Order {
            order_id: self.order_id.clone(),
            restaurant_lat: self.restaurant_lat,
            restaurant_lon: self.restaurant_lon,
            restaurant_name: self.restaurant_name.clone(),
            food_type: FoodType::parse(&self.food_type)?,
            delivery_lat: self.delivery_lat,
            delivery_lon: self.delivery_lon,
            customer_area: CustomerArea::parse(&self.customer_area)?,
            weather: Weather::parse(&self.weather)?,
            partner_id: self.partner_id.clone(),
            partner_rating: self.partner_rating,
            order_hour: self.order_hour,
            day_type: DayType::parse(&self.day_type)?,
            order_value: self.order_value,
            actual_delivery_time: self.actual_delivery_time,
            distance_km: self.distance_km,
            peak_hour: self.peak_hour != 0,
        })
    }
}

/// Order plus all derived metrics. Every derived field is a pure
/// function of the order and two dataset-wide maxima, so re-running
/// enrichment on the same input reproduces these values exactly.
#[derive(Debug, Clone)]
pub struct EnrichedOrder {
    pub order: Order,
    pub weather_factor: f64,
    pub efficiency_score: f64,
    pub is_delayed: bool,
    pub revenue_loss_contribution: f64,
    pub time_efficiency: f64,
    pub distance_efficiency: f64,
    pub route_optimization_score: f64,
    pub customer_satisfaction_index: f64,
    pub rating_tier: RatingTier,
    pub distance_bucket: DistanceBucket,
}
