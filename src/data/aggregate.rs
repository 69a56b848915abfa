use std::collections::{BTreeMap, HashMap, HashSet};

use super::filter::FilteredView;
use super::model::{CellValue, Column, OrderReview};

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline numbers for the current view.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryMetrics {
    /// Distinct order ids.
    pub order_count: usize,
    /// Sum of line-item revenue.
    pub revenue_total: f64,
    /// Distinct customer ids.
    pub customer_count: usize,
}

pub fn summary_metrics(view: &FilteredView<'_>) -> SummaryMetrics {
    let mut orders = HashSet::new();
    let mut customers = HashSet::new();
    let mut revenue_total = 0.0;

    for row in view.rows() {
        orders.insert(row.order_id.as_str());
        customers.insert(row.customer_id.as_str());
        revenue_total += row.number(Column::TotalRevenue).unwrap_or(0.0);
    }

    SummaryMetrics {
        order_count: orders.len(),
        revenue_total,
        customer_count: customers.len(),
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Fold the view into per-group accumulators, keeping groups in the order
/// they were first seen. Null keys are dropped.
fn fold_groups<T, F>(view: &FilteredView<'_>, column: Column, mut fold: F) -> Vec<(CellValue, T)>
where
    T: Default,
    F: FnMut(&mut T, &OrderReview),
{
    let mut position: HashMap<CellValue, usize> = HashMap::new();
    let mut groups: Vec<(CellValue, T)> = Vec::new();

    for row in view.rows() {
        let key = row.cell(column);
        if key.is_null() {
            continue;
        }
        let idx = *position.entry(key.clone()).or_insert_with(|| {
            groups.push((key, T::default()));
            groups.len() - 1
        });
        fold(&mut groups[idx].1, row);
    }
    groups
}

/// The `n` most frequent values of `column`, highest count first.
/// Equal counts keep first-seen order.
pub fn top_n_by_frequency(view: &FilteredView<'_>, column: Column, n: usize) -> Vec<(CellValue, usize)> {
    let mut counts = fold_groups(view, column, |count: &mut usize, _| *count += 1);
    // sort_by is stable, which gives the first-seen tie-break
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// The `n` groups of `group_column` with the largest sum of `value_column`.
/// Missing values add nothing; equal sums keep first-seen order.
pub fn top_n_by_sum(
    view: &FilteredView<'_>,
    group_column: Column,
    value_column: Column,
    n: usize,
) -> Vec<(CellValue, f64)> {
    let mut sums = fold_groups(view, group_column, |sum: &mut f64, row| {
        *sum += row.number(value_column).unwrap_or(0.0);
    });
    sums.sort_by(|a, b| b.1.total_cmp(&a.1));
    sums.truncate(n);
    sums
}

/// Mean of `value_column` per distinct `group_column` value, ordered by key.
/// Rows missing the value are skipped; a group with no values is absent.
pub fn grouped_mean(
    view: &FilteredView<'_>,
    group_column: Column,
    value_column: Column,
) -> BTreeMap<CellValue, f64> {
    fold_groups(view, group_column, |acc: &mut (f64, usize), row| {
        if let Some(v) = row.number(value_column) {
            acc.0 += v;
            acc.1 += 1;
        }
    })
    .into_iter()
    .filter(|(_, (_, count))| *count > 0)
    .map(|(key, (sum, count))| (key, sum / count as f64))
    .collect()
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation of two numeric columns over rows where both are present.
///
/// Returns `None` when fewer than two such rows exist or either column is
/// constant, since the coefficient is undefined there.
pub fn correlation(view: &FilteredView<'_>, column_a: Column, column_b: Column) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = view
        .rows()
        .filter_map(|row| Some((row.number(column_a)?, row.number(column_b)?)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }
    let (first_a, first_b) = pairs[0];
    if pairs.iter().all(|&(a, _)| a == first_a) || pairs.iter().all(|&(_, b)| b == first_b) {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for &(a, b) in &pairs {
        let da = a - mean_a;
        let db = b - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a <= 0.0 || var_b <= 0.0 {
        return None;
    }

    let r = cov / (var_a.sqrt() * var_b.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}
