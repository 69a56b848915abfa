use std::collections::BTreeSet;

use crate::config::DashboardConfig;
use crate::data::filter::FilterCriteria;
use crate::data::model::SalesDataset;
use crate::view_model::{ViewModel, render};

// ---------------------------------------------------------------------------
// Facets – the two multi-select filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Category,
    City,
}

impl Facet {
    pub fn label(self) -> &'static str {
        match self {
            Facet::Category => "Product category",
            Facet::City => "Customer city",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset. Replaced wholesale by File → Open….
    pub dataset: SalesDataset,

    /// Current sidebar selections.
    pub criteria: FilterCriteria,

    /// Pipeline output for `criteria`, rebuilt when `dirty`.
    pub view: ViewModel,
    dirty: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// State with everything selected and the view already computed.
    pub fn new(config: DashboardConfig, dataset: SalesDataset) -> Self {
        let criteria = FilterCriteria::select_all(&dataset);
        let view = render(&dataset, &criteria, config.top_n);
        Self {
            config,
            dataset,
            criteria,
            view,
            dirty: false,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset filters to "everything".
    pub fn set_dataset(&mut self, dataset: SalesDataset) {
        self.criteria = FilterCriteria::select_all(&dataset);
        self.dataset = dataset;
        self.status_message = None;
        self.mark_dirty();
        self.refresh();
    }

    /// Flag the view model as stale after a criteria edit.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Re-run the pipeline if anything changed since the last run.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.view = render(&self.dataset, &self.criteria, self.config.top_n);
        log::debug!("recomputed view: {} visible rows", self.view.visible_rows);
        self.dirty = false;
    }

    /// All values a facet can take in the loaded dataset.
    pub fn options(&self, facet: Facet) -> BTreeSet<String> {
        match facet {
            Facet::Category => self.dataset.categories.clone(),
            Facet::City => self.dataset.cities.clone(),
        }
    }

    pub fn selection(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Category => &self.criteria.categories,
            Facet::City => &self.criteria.cities,
        }
    }

    fn selection_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Category => &mut self.criteria.categories,
            Facet::City => &mut self.criteria.cities,
        }
    }

    /// Toggle a single value in a facet's selection.
    pub fn toggle(&mut self, facet: Facet, value: &str) {
        let selected = self.selection_mut(facet);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.mark_dirty();
    }

    /// Select all values in a facet.
    pub fn select_all(&mut self, facet: Facet) {
        let all = self.options(facet);
        *self.selection_mut(facet) = all;
        self.mark_dirty();
    }

    /// Deselect all values in a facet.
    pub fn select_none(&mut self, facet: Facet) {
        self.selection_mut(facet).clear();
        self.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::row;

    fn loaded_state() -> AppState {
        AppState::new(
            DashboardConfig::default(),
            SalesDataset::from_rows(vec![
                row("o1", "c1", Some("rio"), Some("toys"), "2018-01-01", 10.0, Some(2.0), Some(5)),
                row("o2", "c2", Some("natal"), Some("books"), "2018-02-01", 20.0, Some(9.0), Some(2)),
            ]),
        )
    }

    #[test]
    fn new_dataset_selects_everything() {
        let state = loaded_state();
        assert_eq!(state.selection(Facet::City).len(), 2);
        assert_eq!(state.view.visible_rows, 2);
        assert!(state.criteria.date_range.is_some());
    }

    #[test]
    fn toggling_refilters_on_refresh() {
        let mut state = loaded_state();
        state.toggle(Facet::City, "rio");
        assert_eq!(state.view.visible_rows, 2);
        state.refresh();
        assert_eq!(state.view.visible_rows, 1);

        state.toggle(Facet::City, "rio");
        state.refresh();
        assert_eq!(state.view.visible_rows, 2);
    }

    #[test]
    fn select_none_then_all() {
        let mut state = loaded_state();
        state.select_none(Facet::Category);
        state.refresh();
        assert_eq!(state.view.visible_rows, 0);
        assert_eq!(state.view.metrics.order_count, 0);

        state.select_all(Facet::Category);
        state.refresh();
        assert_eq!(state.view.visible_rows, 2);
    }

    #[test]
    fn replacing_dataset_resets_selection() {
        let mut state = loaded_state();
        state.select_none(Facet::City);
        state.refresh();
        assert_eq!(state.view.visible_rows, 0);

        state.set_dataset(SalesDataset::from_rows(vec![row(
            "o9", "c9", Some("recife"), Some("games"), "2018-03-01", 5.0, None, Some(3),
        )]));
        assert_eq!(state.selection(Facet::City).len(), 1);
        assert_eq!(state.view.visible_rows, 1);
    }
}
