//! Filter a fast-food nutrition table by company, calorie and protein ranges,
//! and fixed dietary categories, then export the matching items.

pub mod config;
pub mod data;

pub use config::Config;
pub use data::filter::{DietaryCategory, DietaryThresholds, Filter};
pub use data::model::{CellValue, DatasetError, MenuItem, NutritionTable, Selection};
pub use data::pipeline::{DietaryToggles, FilterParams, FilterPipeline, NumericRange};
