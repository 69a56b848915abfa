use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::error::DataError;
use super::model::{Column, OrderReview, SalesDataset};

/// Columns that must be present in the header row.
/// `review_score` may be absent (older exports); every row then has no score.
const REQUIRED_COLUMNS: [Column; 7] = [
    Column::OrderId,
    Column::CustomerId,
    Column::CustomerCity,
    Column::ProductCategory,
    Column::PurchaseTimestamp,
    Column::TotalRevenue,
    Column::DeliveryDuration,
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the order-review dataset from a delimited text file.
///
/// Expected layout: a header row naming at least the dashboard columns
/// (`order_id`, `customer_id`, `customer_city`, `product_category_name`,
/// `order_purchase_timestamp`, `total_revenue`, `delivery_duration`,
/// `review_score`). Extra columns are ignored.
pub fn load_file(path: &Path) -> Result<SalesDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => {}
        other => bail!("Unsupported file extension: .{other}"),
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let dataset = load_csv(file).with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows ({} categories, {} cities) from {}",
        dataset.len(),
        dataset.categories.len(),
        dataset.cities.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV text into a dataset. Fails on the first malformed row.
pub fn load_csv<R: Read>(input: R) -> Result<SalesDataset> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column.name()) {
            return Err(DataError::MissingColumn(column.name()).into());
        }
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<OrderReview>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let row = result.with_context(|| format!("CSV line {}", row_no + 2))?;
        rows.push(row);
    }

    let dataset = SalesDataset::from_rows(rows);
    if dataset.is_empty() {
        return Err(DataError::EmptyDataset.into());
    }
    Ok(dataset)
}
