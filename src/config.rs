use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. The dashboard takes no flags; these are the defaults it
/// always runs with.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Dataset read at startup, relative to the working directory.
    pub data_path: PathBuf,
    /// How many categories the top-N charts show.
    pub top_n: usize,
    pub window_title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("sales_review_data.csv"),
            top_n: 10,
            window_title: "E-Commerce Sales Dashboard – Olist Brazil".to_string(),
            window_size: [1280.0, 900.0],
            min_window_size: [720.0, 480.0],
        }
    }
}
