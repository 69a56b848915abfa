use thiserror::Error;

/// Failures while turning `sales_review_data.csv` into a [`super::model::SalesDataset`].
#[derive(Debug, Error)]
pub enum DataError {
    /// A required header is absent from the CSV.
    #[error("CSV is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("invalid purchase timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("column '{column}': '{value}' is not a valid number")]
    InvalidNumber { column: &'static str, value: String },

    /// The file parsed but held no data rows.
    #[error("dataset has no rows")]
    EmptyDataset,
}
