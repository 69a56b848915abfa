use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Plot, PlotPoints, Points};

use crate::color::Ramp;
use crate::state::AppState;
use crate::view_model::{ViewModel, format_currency};

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render metrics and charts for the current view model.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let view = &state.view;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(warning) = &view.warning {
                ui.colored_label(Color32::RED, format!("❌ {warning}"));
            }

            ui.heading("📈 Summary");
            metrics_row(ui, view);
            ui.add_space(12.0);

            ui.heading("🛒 Top categories by number of orders");
            let counts: Vec<(String, f64)> = view
                .top_by_orders
                .iter()
                .map(|(cat, count)| (cat.clone(), *count as f64))
                .collect();
            ranked_bars(ui, "top_orders", &counts, Ramp::Blues, "Orders");
            ui.add_space(12.0);

            ui.heading("💰 Top categories by total revenue");
            ranked_bars(ui, "top_revenue", &view.top_by_revenue, Ramp::Greens, "Revenue (BRL)");
            ui.add_space(12.0);

            ui.heading("⏱ Delivery duration and review score");
            correlation_label(ui, view);
            duration_by_score_chart(ui, view);
            scatter_chart(ui, view);
        });
}

fn metrics_row(ui: &mut Ui, view: &ViewModel) {
    let m = &view.metrics;
    let cards = [
        ("Total orders", m.order_count.to_string()),
        ("Total revenue", format_currency(m.revenue_total)),
        ("Customers", m.customer_count.to_string()),
    ];
    ui.columns(cards.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            col.group(|ui: &mut Ui| {
                ui.label(label);
                ui.label(RichText::new(value).size(26.0).strong());
            });
        }
    });
}

fn correlation_label(ui: &mut Ui, view: &ViewModel) {
    let text = match &view.correlation {
        Some(readout) => format!("Pearson correlation: {readout}"),
        None => "Pearson correlation: no correlation computable".to_string(),
    };
    ui.label(RichText::new(text).strong());
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Horizontal bars, largest entry on top, category names on the y axis.
fn ranked_bars(ui: &mut Ui, id: &str, entries: &[(String, f64)], ramp: Ramp, value_label: &str) {
    if entries.is_empty() {
        ui.label("No data for the current filters.");
        return;
    }

    let n = entries.len();
    let colors = ramp.colors(n);
    // Bar i sits at y = n-1-i so the first entry is drawn at the top.
    let bars: Vec<Bar> = entries
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, ((name, value), color))| {
            Bar::new((n - 1 - i) as f64, *value)
                .name(name)
                .fill(color)
                .width(0.7)
        })
        .collect();

    let names: Vec<String> = entries.iter().rev().map(|(name, _)| name.clone()).collect();
    let y_labels = move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if v < 0.0 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        names.get(v.round() as usize).cloned().unwrap_or_default()
    };

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(value_label)
        .y_axis_formatter(y_labels)
        .y_axis_min_width(140.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// Mean delivery days for each review score.
fn duration_by_score_chart(ui: &mut Ui, view: &ViewModel) {
    ui.label("Mean delivery duration per review score");
    if view.duration_by_score.is_empty() {
        ui.label("No data for the current filters.");
        return;
    }

    let colors = Ramp::OrangeRed.colors(view.duration_by_score.len());
    let bars: Vec<Bar> = view
        .duration_by_score
        .iter()
        .zip(colors)
        .map(|(&(score, days), color)| {
            Bar::new(score, days)
                .name(format!("score {score:.0}"))
                .fill(color)
                .width(0.6)
        })
        .collect();

    Plot::new("duration_by_score")
        .height(CHART_HEIGHT)
        .x_axis_label("Review score (1-5)")
        .y_axis_label("Mean delivery duration (days)")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// One point per row: delivery days against review score.
fn scatter_chart(ui: &mut Ui, view: &ViewModel) {
    ui.label("Delivery duration vs review score");
    if view.scatter.is_empty() {
        ui.label("No data for the current filters.");
        return;
    }

    let points = Points::new(PlotPoints::from(view.scatter.clone()))
        .radius(2.5)
        .color(Color32::from_rgba_unmultiplied(70, 130, 180, 77));

    Plot::new("duration_vs_score")
        .height(CHART_HEIGHT)
        .x_axis_label("Delivery duration (days)")
        .y_axis_label("Review score")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(points);
        });
}
