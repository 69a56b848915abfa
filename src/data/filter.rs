use std::collections::BTreeSet;

use chrono::NaiveDate;
use thiserror::Error;

use super::model::{OrderReview, SalesDataset};

// ---------------------------------------------------------------------------
// Filter criteria: what the sidebar currently selects
// ---------------------------------------------------------------------------

/// Inclusive purchase-date range. Compared against the date part only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// A user-input problem that is shown but does not stop filtering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterWarning {
    #[error("End date ({end}) must not be before start date ({start}).")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
}

/// Sidebar selections, rebuilt from widget state on every change.
///
/// A row passes when:
/// * its category is in `categories` (a null category never passes)
/// * its city is in `cities` (a null city never passes)
/// * `date_range` is `None`, or the purchase date lies inside it
///
/// An empty selection set therefore hides everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub categories: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    /// Criteria with everything selected (the dashboard's initial state).
    pub fn select_all(dataset: &SalesDataset) -> Self {
        Self {
            categories: dataset.categories.clone(),
            cities: dataset.cities.clone(),
            date_range: dataset
                .date_bounds
                .map(|(start, end)| DateRange::new(start, end)),
        }
    }

    /// Report an inverted date range. Filtering still uses the range as given.
    pub fn validate(&self) -> Option<FilterWarning> {
        self.date_range
            .filter(DateRange::is_inverted)
            .map(|r| FilterWarning::InvertedDateRange {
                start: r.start,
                end: r.end,
            })
    }

    /// Whether a single row satisfies all three predicates.
    pub fn matches(&self, row: &OrderReview) -> bool {
        let in_set = |set: &BTreeSet<String>, value: &Option<String>| {
            value.as_ref().is_some_and(|v| set.contains(v))
        };
        in_set(&self.categories, &row.product_category)
            && in_set(&self.cities, &row.customer_city)
            && self
                .date_range
                .map_or(true, |range| range.contains(row.purchase_date()))
    }
}

// ---------------------------------------------------------------------------
// FilteredView – the rows that pass
// ---------------------------------------------------------------------------

/// The subset of a dataset passing a [`FilterCriteria`], as row indices in
/// source order. Borrowing the dataset keeps the source immutable.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a SalesDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every row.
    pub fn all(dataset: &'a SalesDataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Narrow this view further. Applying the same criteria twice is a no-op.
    pub fn refine(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| criteria.matches(&self.dataset.rows[i]))
            .collect();
        FilteredView {
            dataset: self.dataset,
            indices,
        }
    }

    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a OrderReview> + '_ {
        let rows = &self.dataset.rows;
        self.indices.iter().map(move |&i| &rows[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the rows of `dataset` that pass every predicate in `criteria`.
pub fn apply_filters<'a>(dataset: &'a SalesDataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let view = FilteredView::all(dataset).refine(criteria);
    log::debug!(
        "filter: {} categories, {} cities, range {:?} -> {}/{} rows",
        criteria.categories.len(),
        criteria.cities.len(),
        criteria.date_range,
        view.len(),
        dataset.len()
    );
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::row;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset() -> SalesDataset {
        SalesDataset::from_rows(vec![
            row("o1", "c1", Some("sao paulo"), Some("toys"), "2017-01-10 08:00:00", 10.0, Some(5.0), Some(5)),
            row("o2", "c2", Some("rio"), Some("toys"), "2017-02-15 23:30:00", 20.0, Some(9.0), Some(3)),
            row("o3", "c3", Some("rio"), Some("books"), "2017-03-20 12:00:00", 30.0, Some(2.0), Some(4)),
            row("o4", "c1", None, Some("books"), "2017-03-21 12:00:00", 40.0, None, None),
            row("o5", "c4", Some("curitiba"), None, "2017-04-01 00:00:00", 50.0, Some(12.0), Some(1)),
        ])
    }

    #[test]
    fn select_all_keeps_rows_without_nulls() {
        let ds = dataset();
        let criteria = FilterCriteria::select_all(&ds);
        let view = apply_filters(&ds, &criteria);
        assert_eq!(view.indices(), &[0, 1, 2]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let ds = dataset();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.cities = BTreeSet::from(["rio".to_string()]);
        criteria.categories = BTreeSet::from(["toys".to_string()]);
        let view = apply_filters(&ds, &criteria);
        assert_eq!(view.indices(), &[1]);

        for r in view.rows() {
            assert!(criteria.matches(r));
        }
    }

    #[test]
    fn date_range_is_inclusive_and_ignores_time_of_day() {
        let ds = dataset();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.date_range = Some(DateRange::new(date(2017, 2, 15), date(2017, 3, 20)));
        let view = apply_filters(&ds, &criteria);
        // o2 was bought late on the start day and still counts
        assert_eq!(view.indices(), &[1, 2]);
    }

    #[test]
    fn no_date_range_applies_no_date_predicate() {
        let ds = dataset();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.date_range = None;
        assert_eq!(apply_filters(&ds, &criteria).len(), 3);
    }

    #[test]
    fn empty_city_selection_yields_empty_view() {
        let ds = dataset();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.cities.clear();
        let view = apply_filters(&ds, &criteria);
        assert!(view.is_empty());
    }

    #[test]
    fn inverted_range_warns_and_still_filters() {
        let ds = dataset();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.date_range = Some(DateRange::new(date(2017, 4, 1), date(2017, 1, 1)));
        assert_eq!(
            criteria.validate(),
            Some(FilterWarning::InvertedDateRange {
                start: date(2017, 4, 1),
                end: date(2017, 1, 1)
            })
        );
        assert!(apply_filters(&ds, &criteria).is_empty());

        criteria.date_range = Some(DateRange::new(date(2017, 1, 1), date(2017, 1, 1)));
        assert_eq!(criteria.validate(), None);
    }

    #[test]
    fn output_is_an_order_preserving_subset() {
        let ds = dataset();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.categories = BTreeSet::from(["books".to_string()]);
        let view = apply_filters(&ds, &criteria);
        assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
        assert!(view.indices().iter().all(|&i| i < ds.len()));
        assert_eq!(ds.len(), 5);
    }

    #[test]
    fn refining_with_same_criteria_is_idempotent() {
        let ds = dataset();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.date_range = Some(DateRange::new(date(2017, 1, 1), date(2017, 2, 28)));
        let once = apply_filters(&ds, &criteria);
        let twice = once.refine(&criteria);
        assert_eq!(once.indices(), twice.indices());
    }
}
