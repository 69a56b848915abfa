use std::fmt;

use crate::data::aggregate::{
    SummaryMetrics, correlation, grouped_mean, summary_metrics, top_n_by_frequency, top_n_by_sum,
};
use crate::data::filter::{FilterCriteria, FilterWarning, apply_filters};
use crate::data::model::{Column, SalesDataset};

// ---------------------------------------------------------------------------
// Correlation readout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Positive => f.write_str("Positive"),
            Direction::Negative => f.write_str("Negative"),
        }
    }
}

/// A defined Pearson coefficient as shown to the user: two decimals and a sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationReadout {
    pub coefficient: f64,
}

impl CorrelationReadout {
    /// Zero counts as positive.
    pub fn direction(&self) -> Direction {
        if self.coefficient < 0.0 {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }
}

impl fmt::Display for CorrelationReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ({})", self.coefficient, self.direction())
    }
}

// ---------------------------------------------------------------------------
// ViewModel – everything one frame of the dashboard draws
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub warning: Option<FilterWarning>,
    pub visible_rows: usize,
    pub metrics: SummaryMetrics,
    /// (category, line-item count), largest first.
    pub top_by_orders: Vec<(String, usize)>,
    /// (category, revenue), largest first.
    pub top_by_revenue: Vec<(String, f64)>,
    /// (review score, mean delivery days), by ascending score.
    pub duration_by_score: Vec<(f64, f64)>,
    /// (delivery days, review score) for every row with both.
    pub scatter: Vec<[f64; 2]>,
    pub correlation: Option<CorrelationReadout>,
}

/// Run the whole pipeline for one set of criteria.
///
/// Pure: the dataset is only read and nothing is cached between calls.
pub fn render(dataset: &SalesDataset, criteria: &FilterCriteria, top_n: usize) -> ViewModel {
    let warning = criteria.validate();
    if let Some(w) = &warning {
        log::warn!("{w}");
    }

    let view = apply_filters(dataset, criteria);
    if view.is_empty() {
        log::debug!("no rows match the current filters");
    }

    let top_by_orders = top_n_by_frequency(&view, Column::ProductCategory, top_n)
        .into_iter()
        .map(|(cat, count)| (cat.to_string(), count))
        .collect();
    let top_by_revenue = top_n_by_sum(&view, Column::ProductCategory, Column::TotalRevenue, top_n)
        .into_iter()
        .map(|(cat, total)| (cat.to_string(), total))
        .collect();
    let duration_by_score = grouped_mean(&view, Column::ReviewScore, Column::DeliveryDuration)
        .into_iter()
        .filter_map(|(score, mean)| Some((score.as_f64()?, mean)))
        .collect();
    let scatter = view
        .rows()
        .filter_map(|row| {
            Some([
                row.number(Column::DeliveryDuration)?,
                row.number(Column::ReviewScore)?,
            ])
        })
        .collect();
    let correlation = correlation(&view, Column::DeliveryDuration, Column::ReviewScore)
        .map(|coefficient| CorrelationReadout { coefficient });

    ViewModel {
        warning,
        visible_rows: view.len(),
        metrics: summary_metrics(&view),
        top_by_orders,
        top_by_revenue,
        duration_by_score,
        scatter,
        correlation,
    }
}

/// Format an amount in Brazilian reais with no decimals: `R$ 1,234,568`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("R$ -{grouped}")
    } else {
        format!("R$ {grouped}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::filter::DateRange;
    use crate::data::model::tests::row;

    fn dataset() -> SalesDataset {
        SalesDataset::from_rows(vec![
            row("o1", "c1", Some("rio"), Some("toys"), "2018-01-01 10:00:00", 100.0, Some(2.0), Some(5)),
            row("o2", "c2", Some("rio"), Some("toys"), "2018-01-02 10:00:00", 50.0, Some(4.0), Some(4)),
            row("o3", "c3", Some("natal"), Some("books"), "2018-01-03 10:00:00", 300.0, Some(20.0), Some(1)),
            row("o4", "c3", Some("natal"), Some("books"), "2018-01-04 10:00:00", 10.0, None, Some(2)),
        ])
    }

    #[test]
    fn renders_every_panel_for_full_selection() {
        let ds = dataset();
        let vm = render(&ds, &FilterCriteria::select_all(&ds), 10);
        assert_eq!(vm.warning, None);
        assert_eq!(vm.visible_rows, 4);
        assert_eq!(vm.metrics.order_count, 4);
        assert_eq!(vm.metrics.customer_count, 3);
        assert_eq!(vm.top_by_orders, vec![("toys".to_string(), 2), ("books".to_string(), 2)]);
        assert_eq!(vm.top_by_revenue[0], ("books".to_string(), 310.0));
        assert_eq!(
            vm.duration_by_score,
            vec![(1.0, 20.0), (4.0, 4.0), (5.0, 2.0)]
        );
        assert_eq!(vm.scatter.len(), 3);
        let readout = vm.correlation.unwrap();
        assert_eq!(readout.direction(), Direction::Negative);
    }

    #[test]
    fn top_n_limits_chart_entries() {
        let ds = dataset();
        let vm = render(&ds, &FilterCriteria::select_all(&ds), 1);
        assert_eq!(vm.top_by_orders.len(), 1);
        assert_eq!(vm.top_by_revenue, vec![("books".to_string(), 310.0)]);
    }

    #[test]
    fn inverted_range_renders_empty_with_warning() {
        let ds = dataset();
        let mut criteria = FilterCriteria::select_all(&ds);
        let day = |d| NaiveDate::from_ymd_opt(2018, 1, d).unwrap();
        criteria.date_range = Some(DateRange::new(day(4), day(1)));
        let vm = render(&ds, &criteria, 10);
        assert!(vm.warning.is_some());
        assert_eq!(vm.visible_rows, 0);
        assert_eq!(vm.metrics, SummaryMetrics::default());
        assert!(vm.top_by_orders.is_empty());
        assert!(vm.duration_by_score.is_empty());
        assert_eq!(vm.correlation, None);
    }

    #[test]
    fn readout_formats_two_decimals_and_sign() {
        let neg = CorrelationReadout { coefficient: -0.3349 };
        assert_eq!(neg.to_string(), "-0.33 (Negative)");
        let zero = CorrelationReadout { coefficient: 0.0 };
        assert_eq!(zero.to_string(), "0.00 (Positive)");
    }

    #[test]
    fn currency_uses_thousands_separators() {
        assert_eq!(format_currency(0.0), "R$ 0");
        assert_eq!(format_currency(999.4), "R$ 999");
        assert_eq!(format_currency(1000.0), "R$ 1,000");
        assert_eq!(format_currency(15_843_553.24), "R$ 15,843,553");
        assert_eq!(format_currency(-1234.0), "R$ -1,234");
    }
}
