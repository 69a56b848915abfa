/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  sales_review_data.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → SalesDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SalesDataset  │  Vec<OrderReview>, filter options
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  metrics, top-N, grouped mean, correlation
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
