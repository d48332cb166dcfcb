use std::collections::BTreeSet;

use super::filter::{
    DietaryCategory, DietaryThresholds, Filter, CALORIES, COMPANY, PROTEIN,
};
use super::model::{DatasetError, NutritionTable, Selection};

// ---------------------------------------------------------------------------
// Parameters collected by the presentation layer
// ---------------------------------------------------------------------------

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bounds spanning every number in `column`, widened to whole numbers.
    /// A column without numbers yields `0..=0`.
    fn spanning(table: &NutritionTable, column: &str) -> Result<Self, DatasetError> {
        Ok(match table.numeric_bounds(column)? {
            Some((lo, hi)) => Self::new(lo.floor(), hi.ceil()),
            None => Self::new(0.0, 0.0),
        })
    }
}

/// On/off switch per dietary category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DietaryToggles {
    enabled: BTreeSet<DietaryCategory>,
}

impl DietaryToggles {
    pub fn is_enabled(&self, category: DietaryCategory) -> bool {
        self.enabled.contains(&category)
    }

    pub fn set(&mut self, category: DietaryCategory, on: bool) {
        if on {
            self.enabled.insert(category);
        } else {
            self.enabled.remove(&category);
        }
    }

    /// Enabled categories in [`DietaryCategory::ALL`] order.
    pub fn active(&self) -> impl Iterator<Item = DietaryCategory> + '_ {
        DietaryCategory::ALL
            .into_iter()
            .filter(|c| self.enabled.contains(c))
    }
}

/// Everything the user can choose: companies, calorie and protein ranges,
/// and the dietary toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    pub companies: BTreeSet<String>,
    pub calories: NumericRange,
    pub protein: NumericRange,
    pub dietary: DietaryToggles,
}

impl FilterParams {
    /// Neutral parameters: every company and full calorie/protein ranges.
    pub fn for_table(table: &NutritionTable) -> Result<Self, DatasetError> {
        Ok(Self {
            companies: table.unique_labels(COMPANY)?.into_iter().collect(),
            calories: NumericRange::spanning(table, CALORIES)?,
            protein: NumericRange::spanning(table, PROTEIN)?,
            dietary: DietaryToggles::default(),
        })
    }

    /// The filter chain in application order.
    pub fn to_filters(&self, thresholds: &DietaryThresholds) -> Vec<Filter> {
        let mut filters = vec![
            Filter::company_in(self.companies.iter().cloned()),
            Filter::between(CALORIES, self.calories.min, self.calories.max),
            Filter::between(PROTEIN, self.protein.min, self.protein.max),
        ];
        filters.extend(self.dietary.active().map(|c| c.filter(thresholds)));
        filters
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Stateless runner for the filter chain. Holds only the thresholds.
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    thresholds: DietaryThresholds,
}

impl FilterPipeline {
    pub fn new(thresholds: DietaryThresholds) -> Self {
        Self { thresholds }
    }

    /// Company, then calories, then protein, then each active dietary filter.
    pub fn run<'a>(
        &self,
        table: &'a NutritionTable,
        params: &FilterParams,
    ) -> Result<Selection<'a>, DatasetError> {
        let mut selection = table.select_all();
        for filter in params.to_filters(&self.thresholds) {
            let before = selection.len();
            selection = filter.apply(selection)?;
            log::debug!("{}: {before} -> {} rows", filter.description(), selection.len());
        }
        Ok(selection)
    }
}
