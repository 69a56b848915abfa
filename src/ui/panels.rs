use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::state::{AppState, Facet};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter data");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            date_range_section(ui, state);
            ui.separator();

            facet_section(ui, state, Facet::Category);
            facet_section(ui, state, Facet::City);
        });
}

/// Start / end date pickers plus the inverted-range error.
fn date_range_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Purchase date");

    let Some(range) = state.criteria.date_range.as_mut() else {
        ui.label("No dates in dataset.");
        return;
    };

    let mut changed = false;
    egui::Grid::new("date_range")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Start");
            changed |= ui
                .add(DatePickerButton::new(&mut range.start).id_salt("start_date"))
                .changed();
            ui.end_row();

            ui.label("End");
            changed |= ui
                .add(DatePickerButton::new(&mut range.end).id_salt("end_date"))
                .changed();
            ui.end_row();
        });

    if changed {
        state.mark_dirty();
    }

    if let Some(warning) = state.criteria.validate() {
        ui.label(RichText::new(format!("❌ {warning}")).color(Color32::RED));
    }
}

/// Collapsible multi-select for one facet, with All / None buttons.
fn facet_section(ui: &mut Ui, state: &mut AppState, facet: Facet) {
    let all_values = state.options(facet);

    // Show count of selected / total in the header
    let n_selected = state.selection(facet).len();
    let n_total = all_values.len();
    let header_text = format!("{}  ({n_selected}/{n_total})", facet.label());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(facet.label())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(facet);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(facet);
                }
            });

            for val in &all_values {
                let mut checked = state.selection(facet).contains(val);
                if ui.checkbox(&mut checked, val.as_str()).changed() {
                    state.toggle(facet, val);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} rows loaded, {} visible",
            state.dataset.len(),
            state.view.visible_rows
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Replace the dataset with another CSV. On failure the current one is kept.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales review data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
