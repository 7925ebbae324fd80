//! Record store: loads the delivery CSV into memory and exposes
//! read-only access. Iteration order is the file's row order, which
//! keeps every downstream report deterministic.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::models::{CsvOrder, Order};

/// The 17 columns every input file must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 17] = [
    "OrderID",
    "RestaurantLat",
    "RestaurantLon",
    "RestaurantName",
    "FoodType",
    "DeliveryLat",
    "DeliveryLon",
    "CustomerArea",
    "Weather",
    "PartnerID",
    "PartnerRating",
    "OrderHour",
    "DayType",
    "OrderValue",
    "ActualDeliveryTime",
    "DistanceKM",
    "PeakHour",
];

#[derive(Debug, Clone)]
pub struct RecordStore {
    orders: Vec<Order>,
}

impl RecordStore {
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let store = Self::from_reader(file)?;
        info!("Loaded {} orders from {}", store.len(), path.display());
        Ok(store)
    }

    /// Parses a headered CSV stream. Missing columns, mistyped cells
    /// and unknown categorical values all fail the whole batch.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(rdr);

        let headers = reader.headers()?.clone();
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(PipelineError::Schema {
                    column: required.to_string(),
                    detail: "required column missing from header".to_string(),
                });
            }
        }

        let mut orders = Vec::new();
        for (idx, result) in reader.deserialize::<CsvOrder>().enumerate() {
            let raw = result.map_err(|e| deserialize_error(&headers, idx, e))?;
            orders.push(raw.to_order()?);
        }

        Ok(RecordStore { orders })
    }

    pub fn from_orders(orders: Vec<Order>) -> Self {
        RecordStore { orders }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Projects a single column (or any derived scalar) out of the
    /// store without exposing mutable access to the rows.
    pub fn column<T>(&self, select: impl Fn(&Order) -> T) -> Vec<T> {
        self.orders.iter().map(select).collect()
    }
}

/// Maps a csv deserialize failure to a schema error naming the
/// offending column when the parser reports one.
fn deserialize_error(headers: &StringRecord, row: usize, e: csv::Error) -> PipelineError {
    let column = match e.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err
            .field()
            .and_then(|i| headers.get(i as usize))
            .unwrap_or("<unknown>")
            .to_string(),
        _ => "<unknown>".to_string(),
    };
    PipelineError::Schema {
        column,
        detail: format!("row {}: {}", row + 1, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "OrderID,RestaurantLat,RestaurantLon,RestaurantName,FoodType,DeliveryLat,DeliveryLon,CustomerArea,Weather,PartnerID,PartnerRating,OrderHour,DayType,OrderValue,ActualDeliveryTime,DistanceKM,PeakHour";

    fn row(order_id: &str, weather: &str, rating: &str) -> String {
        format!(
            "{},12.97,77.59,Pizza Palace,Pizza,12.96,77.60,Downtown,{},P001,{},12,Weekday,350,32.5,2.4,1",
            order_id, weather, rating
        )
    }

    #[test]
    fn test_loads_valid_rows() {
        let csv = format!("{}\n{}\n{}\n", HEADER, row("ORD00001", "Sunny", "4.2"), row("ORD00002", "Rainy", "3.1"));
        let store = RecordStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.orders()[0].order_id, "ORD00001");
        assert!(store.orders()[0].peak_hour);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let truncated = HEADER.replace(",PeakHour", "");
        let csv = format!("{}\n", truncated);
        let err = RecordStore::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            PipelineError::Schema { column, .. } => assert_eq!(column, "PeakHour"),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_rating_is_schema_error() {
        let csv = format!("{}\n{}\n", HEADER, row("ORD00001", "Sunny", "excellent"));
        let err = RecordStore::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            PipelineError::Schema { column, detail } => {
                assert_eq!(column, "PartnerRating");
                assert!(detail.contains("row 1"));
            }
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_weather_fails_batch() {
        let csv = format!("{}\n{}\n", HEADER, row("ORD00001", "Hail", "4.0"));
        let err = RecordStore::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::UnknownCategory { field: "Weather", .. }
        ));
    }

    #[test]
    fn test_header_only_file_is_empty_store() {
        let csv = format!("{}\n", HEADER);
        let store = RecordStore::from_reader(csv.as_bytes()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_column_projection() {
        let csv = format!("{}\n{}\n{}\n", HEADER, row("A", "Sunny", "4.0"), row("B", "Stormy", "2.5"));
        let store = RecordStore::from_reader(csv.as_bytes()).unwrap();
        let ratings = store.column(|o| o.partner_rating);
        assert_eq!(ratings, vec![4.0, 2.5]);
    }
}
