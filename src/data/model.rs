use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use super::error::DataError;

// ---------------------------------------------------------------------------
// Column – the dataset columns the dashboard reads
// ---------------------------------------------------------------------------

/// A column of the order-review table, named after its CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    OrderId,
    CustomerId,
    CustomerCity,
    ProductCategory,
    PurchaseTimestamp,
    TotalRevenue,
    DeliveryDuration,
    ReviewScore,
}

impl Column {
    /// Header name in `sales_review_data.csv`.
    pub fn name(self) -> &'static str {
        match self {
            Column::OrderId => "order_id",
            Column::CustomerId => "customer_id",
            Column::CustomerCity => "customer_city",
            Column::ProductCategory => "product_category_name",
            Column::PurchaseTimestamp => "order_purchase_timestamp",
            Column::TotalRevenue => "total_revenue",
            Column::DeliveryDuration => "delivery_duration",
            Column::ReviewScore => "review_score",
        }
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell, usable as a group key
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Grouping collects these into maps, so `CellValue` must be `Ord` and `Hash`.
/// Equality follows `Ord` (`total_cmp` for floats), keeping `Eq` reflexive.
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Null,
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Timestamp(_) => 3,
                Text(_) => 4,
            }
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Timestamp(t) => t.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell, used by sums, means and correlation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<Option<&String>> for CellValue {
    fn from(value: Option<&String>) -> Self {
        value.map_or(CellValue::Null, |s| CellValue::Text(s.clone()))
    }
}

// ---------------------------------------------------------------------------
// OrderReview – one row of the CSV (one order line item)
// ---------------------------------------------------------------------------

/// A single order line item joined with its customer and review.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderReview {
    pub order_id: String,
    pub customer_id: String,
    pub customer_city: Option<String>,
    #[serde(rename = "product_category_name")]
    pub product_category: Option<String>,
    #[serde(
        rename = "order_purchase_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub purchased_at: NaiveDateTime,
    pub total_revenue: Option<f64>,
    pub delivery_duration: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub review_score: Option<i64>,
}

impl OrderReview {
    /// Value of `column` for this row.
    pub fn cell(&self, column: Column) -> CellValue {
        match column {
            Column::OrderId => CellValue::Text(self.order_id.clone()),
            Column::CustomerId => CellValue::Text(self.customer_id.clone()),
            Column::CustomerCity => self.customer_city.as_ref().into(),
            Column::ProductCategory => self.product_category.as_ref().into(),
            Column::PurchaseTimestamp => CellValue::Timestamp(self.purchased_at),
            Column::TotalRevenue | Column::DeliveryDuration => self
                .number(column)
                .map_or(CellValue::Null, CellValue::Float),
            Column::ReviewScore => self.review_score.map_or(CellValue::Null, CellValue::Integer),
        }
    }

    /// Numeric value of `column`, skipping the cell allocation of [`Self::cell`].
    pub fn number(&self, column: Column) -> Option<f64> {
        match column {
            Column::TotalRevenue => self.total_revenue.filter(|v| !v.is_nan()),
            Column::DeliveryDuration => self.delivery_duration.filter(|v| !v.is_nan()),
            Column::ReviewScore => self.review_score.map(|s| s as f64),
            _ => None,
        }
    }

    /// Calendar date of the purchase (time of day dropped).
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchased_at.date()
    }
}

/// Parse a purchase timestamp. Accepts `2017-10-02 10:56:33`,
/// `2017-10-02T10:56:33` and a bare `2017-10-02` (midnight).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DataError> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DataError::InvalidTimestamp(raw.to_string()))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Review scores may be written as `5` or, after a pandas round-trip, `5.0`.
fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Some(i));
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_nan() => Ok(None),
        Ok(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
        _ => Err(serde::de::Error::custom(DataError::InvalidNumber {
            column: Column::ReviewScore.name(),
            value: raw,
        })),
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter options.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// All rows, in file order.
    pub rows: Vec<OrderReview>,
    /// Distinct non-null product categories, sorted.
    pub categories: BTreeSet<String>,
    /// Distinct non-null customer cities, sorted.
    pub cities: BTreeSet<String>,
    /// Earliest and latest purchase date.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl SalesDataset {
    /// Build filter options from the loaded rows.
    pub fn from_rows(rows: Vec<OrderReview>) -> Self {
        let mut categories = BTreeSet::new();
        let mut cities = BTreeSet::new();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for row in &rows {
            if let Some(cat) = &row.product_category {
                categories.insert(cat.clone());
            }
            if let Some(city) = &row.customer_city {
                cities.insert(city.clone());
            }
            let day = row.purchase_date();
            date_bounds = Some(match date_bounds {
                Some((lo, hi)) => (lo.min(day), hi.max(day)),
                None => (day, day),
            });
        }

        SalesDataset {
            rows,
            categories,
            cities,
            date_bounds,
        }
    }

    /// Number of rows (line items).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Compact row constructor shared by the pipeline tests.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn row(
        order: &str,
        customer: &str,
        city: Option<&str>,
        category: Option<&str>,
        purchased: &str,
        revenue: f64,
        duration: Option<f64>,
        score: Option<i64>,
    ) -> OrderReview {
        OrderReview {
            order_id: order.to_string(),
            customer_id: customer.to_string(),
            customer_city: city.map(str::to_string),
            product_category: category.map(str::to_string),
            purchased_at: parse_timestamp(purchased).unwrap(),
            total_revenue: Some(revenue),
            delivery_duration: duration,
            review_score: score,
        }
    }

    #[test]
    fn parses_supported_timestamp_formats() {
        let a = parse_timestamp("2017-10-02 10:56:33").unwrap();
        let b = parse_timestamp("2017-10-02T10:56:33").unwrap();
        assert_eq!(a, b);
        let midnight = parse_timestamp("2017-10-02").unwrap();
        assert_eq!(midnight.date(), a.date());
        assert!(matches!(
            parse_timestamp("02/10/2017"),
            Err(DataError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn cell_values_order_within_and_across_types() {
        assert!(CellValue::Integer(1) < CellValue::Integer(5));
        assert!(CellValue::Text("a".into()) < CellValue::Text("b".into()));
        assert!(CellValue::Null < CellValue::Integer(0));
        assert!(CellValue::Integer(10) < CellValue::Text("0".into()));
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::Float(f64::NAN), CellValue::Float(f64::NAN));
    }

    #[test]
    fn nan_measurements_read_as_null_cells() {
        let mut r = row("o1", "c1", None, None, "2018-01-01", f64::NAN, Some(f64::NAN), None);
        assert_eq!(r.cell(Column::TotalRevenue), CellValue::Null);
        assert_eq!(r.cell(Column::DeliveryDuration), CellValue::Null);
        r.delivery_duration = Some(4.5);
        assert_eq!(r.cell(Column::DeliveryDuration), CellValue::Float(4.5));
    }

    #[test]
    fn dataset_collects_distinct_options_and_date_bounds() {
        let ds = SalesDataset::from_rows(vec![
            row("o1", "c1", Some("sao paulo"), Some("toys"), "2018-01-05 09:00:00", 10.0, None, Some(5)),
            row("o2", "c2", None, Some("toys"), "2017-03-01 23:59:59", 5.0, None, Some(4)),
            row("o3", "c3", Some("rio"), None, "2018-06-30 00:00:00", 1.0, None, None),
        ]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.categories.len(), 1);
        assert_eq!(
            ds.cities.iter().cloned().collect::<Vec<_>>(),
            vec!["rio".to_string(), "sao paulo".to_string()]
        );
        let (lo, hi) = ds.date_bounds.unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2017, 3, 1).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2018, 6, 30).unwrap());
    }

    #[test]
    fn number_reads_only_numeric_columns() {
        let r = row("o1", "c1", None, None, "2018-01-01", 12.5, Some(3.0), Some(4));
        assert_eq!(r.number(Column::TotalRevenue), Some(12.5));
        assert_eq!(r.number(Column::ReviewScore), Some(4.0));
        assert_eq!(r.number(Column::OrderId), None);
        assert_eq!(r.cell(Column::CustomerCity), CellValue::Null);
    }
}
