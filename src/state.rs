use std::path::Path;

use anyhow::Result;
use fast_food_filter::data::export::export_csv_file;
use fast_food_filter::data::filter::COMPANY;
use fast_food_filter::data::loader::load_file;
use fast_food_filter::{
    Config, DatasetError, DietaryCategory, FilterParams, FilterPipeline, NumericRange,
    NutritionTable, Selection,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded dataset (None until a file is loaded). Loaded once per file.
    pub dataset: Option<NutritionTable>,

    /// Companies in the order they first appear in the dataset.
    pub companies: Vec<String>,

    /// Slider extents for calories and protein.
    pub calorie_bounds: NumericRange,
    pub protein_bounds: NumericRange,

    /// Current user selections.
    pub params: Option<FilterParams>,

    /// Indices of items passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether `status_message` holds a filtering error.
    filter_failed: bool,

    pipeline: FilterPipeline,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let pipeline = FilterPipeline::new(config.thresholds);
        Self {
            config,
            dataset: None,
            companies: Vec::new(),
            calorie_bounds: NumericRange::new(0.0, 0.0),
            protein_bounds: NumericRange::new(0.0, 0.0),
            params: None,
            visible_indices: Vec::new(),
            status_message: None,
            filter_failed: false,
            pipeline,
        }
    }

    /// Load a file and make it the current dataset. Errors land in the status line.
    pub fn open(&mut self, path: &Path) {
        let loaded = load_file(path, &self.config.load_options())
            .and_then(|table| self.set_dataset(table).map_err(Into::into));
        if let Err(e) = loaded {
            log::error!("Failed to load file: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    /// Ingest a newly loaded dataset and reset filters to show everything.
    pub fn set_dataset(&mut self, dataset: NutritionTable) -> Result<(), DatasetError> {
        let params = FilterParams::for_table(&dataset)?;
        self.companies = dataset.unique_labels(COMPANY)?;
        self.calorie_bounds = params.calories;
        self.protein_bounds = params.protein;
        self.params = Some(params);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
        Ok(())
    }

    /// Recompute `visible_indices` after a parameter change.
    pub fn refilter(&mut self) {
        let (Some(ds), Some(params)) = (&self.dataset, &self.params) else {
            return;
        };
        match self.pipeline.run(ds, params) {
            Ok(selection) => {
                self.visible_indices = selection.into_indices();
                if self.filter_failed {
                    self.filter_failed = false;
                    self.status_message = None;
                }
            }
            Err(e) => {
                log::error!("Filtering failed: {e}");
                self.visible_indices.clear();
                self.status_message = Some(format!("Error: {e}"));
                self.filter_failed = true;
            }
        }
    }

    /// The current result as a selection over the loaded dataset.
    pub fn visible_selection(&self) -> Option<Selection<'_>> {
        self.dataset
            .as_ref()
            .map(|ds| Selection::from_indices(ds, self.visible_indices.clone()))
    }

    pub fn is_company_selected(&self, company: &str) -> bool {
        self.params
            .as_ref()
            .is_some_and(|p| p.companies.contains(company))
    }

    pub fn set_company(&mut self, company: &str, selected: bool) {
        if let Some(params) = &mut self.params {
            if selected {
                params.companies.insert(company.to_string());
            } else {
                params.companies.remove(company);
            }
        }
        self.refilter();
    }

    pub fn select_all_companies(&mut self) {
        if let Some(params) = &mut self.params {
            params.companies = self.companies.iter().cloned().collect();
        }
        self.refilter();
    }

    pub fn select_no_companies(&mut self) {
        if let Some(params) = &mut self.params {
            params.companies.clear();
        }
        self.refilter();
    }

    pub fn set_dietary(&mut self, category: DietaryCategory, on: bool) {
        if let Some(params) = &mut self.params {
            params.dietary.set(category, on);
        }
        self.refilter();
    }

    /// Write the current result to `path`.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        let selection = self
            .visible_selection()
            .ok_or_else(|| anyhow::anyhow!("no dataset loaded"))?;
        export_csv_file(&selection, path)
    }
}
