use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{DatasetError, MenuItem, NutritionTable, Selection};

// ---------------------------------------------------------------------------
// Column names and dietary thresholds
// ---------------------------------------------------------------------------

pub const COMPANY: &str = "company";
pub const CALORIES: &str = "calories";
pub const TOTAL_FAT: &str = "total_fat";
pub const SODIUM: &str = "sodium";
pub const CARBS: &str = "carbs";
pub const FIBER: &str = "fiber";
pub const SUGAR: &str = "sugar";
pub const PROTEIN: &str = "protein";

/// Columns every nutrition table must carry.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COMPANY, CALORIES, TOTAL_FAT, SODIUM, CARBS, FIBER, SUGAR, PROTEIN,
];

/// Required columns holding nutrition amounts. Only these are parsed as
/// numbers and rounded; every other column is carried through as text.
pub const NUMERIC_COLUMNS: [&str; 7] = [CALORIES, TOTAL_FAT, SODIUM, CARBS, FIBER, SUGAR, PROTEIN];

/// kcal
pub const LOW_CALORIE_LIMIT: f64 = 40.0;
/// g
pub const LOW_FAT_LIMIT: f64 = 3.0;
/// mg
pub const LOW_SODIUM_LIMIT: f64 = 140.0;
/// g
pub const LOW_CARB_LIMIT: f64 = 9.0;
/// g
pub const LOW_FIBER_LIMIT: f64 = 0.5;
/// g
pub const LOW_SUGAR_LIMIT: f64 = 5.0;
/// g
pub const HIGH_PROTEIN_FLOOR: f64 = 10.0;

/// Cut-offs for the dietary categories. All "low" limits are exclusive upper
/// bounds; `high_protein` is an exclusive lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietaryThresholds {
    pub low_calorie: f64,
    pub low_fat: f64,
    pub low_sodium: f64,
    pub low_carb: f64,
    pub low_fiber: f64,
    pub low_sugar: f64,
    pub high_protein: f64,
}

impl Default for DietaryThresholds {
    fn default() -> Self {
        Self {
            low_calorie: LOW_CALORIE_LIMIT,
            low_fat: LOW_FAT_LIMIT,
            low_sodium: LOW_SODIUM_LIMIT,
            low_carb: LOW_CARB_LIMIT,
            low_fiber: LOW_FIBER_LIMIT,
            low_sugar: LOW_SUGAR_LIMIT,
            high_protein: HIGH_PROTEIN_FLOOR,
        }
    }
}

impl DietaryThresholds {
    /// Name and value of every threshold, for validation and logging.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("low_calorie", self.low_calorie),
            ("low_fat", self.low_fat),
            ("low_sodium", self.low_sodium),
            ("low_carb", self.low_carb),
            ("low_fiber", self.low_fiber),
            ("low_sugar", self.low_sugar),
            ("high_protein", self.high_protein),
        ]
    }
}

// ---------------------------------------------------------------------------
// Dietary categories
// ---------------------------------------------------------------------------

/// The fixed-threshold filters a user can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DietaryCategory {
    LowCalorie,
    LowFat,
    LowSodium,
    LowCarb,
    LowFiber,
    LowSugar,
    HighProtein,
    WeightLoss,
}

impl DietaryCategory {
    /// Every category, in the order the UI lists and applies them.
    pub const ALL: [DietaryCategory; 8] = [
        DietaryCategory::LowCalorie,
        DietaryCategory::LowFat,
        DietaryCategory::LowSodium,
        DietaryCategory::LowCarb,
        DietaryCategory::LowFiber,
        DietaryCategory::LowSugar,
        DietaryCategory::HighProtein,
        DietaryCategory::WeightLoss,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DietaryCategory::LowCalorie => "Low Calories",
            DietaryCategory::LowFat => "Low Fat",
            DietaryCategory::LowSodium => "Low Sodium",
            DietaryCategory::LowCarb => "Low Carb",
            DietaryCategory::LowFiber => "Low Fiber",
            DietaryCategory::LowSugar => "Low Sugar",
            DietaryCategory::HighProtein => "High Protein",
            DietaryCategory::WeightLoss => "Best for Losing Weight",
        }
    }

    /// The filter this category stands for under the given thresholds.
    pub fn filter(self, t: &DietaryThresholds) -> Filter {
        match self {
            DietaryCategory::LowCalorie => Filter::below(CALORIES, t.low_calorie),
            DietaryCategory::LowFat => Filter::below(TOTAL_FAT, t.low_fat),
            DietaryCategory::LowSodium => Filter::below(SODIUM, t.low_sodium),
            DietaryCategory::LowCarb => Filter::below(CARBS, t.low_carb),
            DietaryCategory::LowFiber => Filter::below(FIBER, t.low_fiber),
            DietaryCategory::LowSugar => Filter::below(SUGAR, t.low_sugar),
            DietaryCategory::HighProtein => Filter::above(PROTEIN, t.high_protein),
            DietaryCategory::WeightLoss => Filter::all(vec![
                DietaryCategory::LowCalorie.filter(t),
                DietaryCategory::LowCarb.filter(t),
                DietaryCategory::HighProtein.filter(t),
            ]),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter: a composable row predicate
// ---------------------------------------------------------------------------

/// A row predicate over named columns.
///
/// Numeric variants only match cells holding a real number; text, missing and
/// NaN cells are treated as non-matching. Applying a filter to a table that
/// lacks one of its columns fails with [`DatasetError::MissingColumn`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Column label is one of the given values.
    OneOf {
        column: String,
        values: BTreeSet<String>,
    },
    /// `min <= value <= max`
    Between { column: String, min: f64, max: f64 },
    /// `value < limit`
    Below { column: String, limit: f64 },
    /// `value > floor`
    Above { column: String, floor: f64 },
    /// Conjunction. An empty list matches every row.
    All(Vec<Filter>),
}

impl Filter {
    pub fn company_in<I, S>(companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::OneOf {
            column: COMPANY.to_string(),
            values: companies.into_iter().map(Into::into).collect(),
        }
    }

    pub fn between(column: &str, min: f64, max: f64) -> Self {
        Filter::Between {
            column: column.to_string(),
            min,
            max,
        }
    }

    pub fn below(column: &str, limit: f64) -> Self {
        Filter::Below {
            column: column.to_string(),
            limit,
        }
    }

    pub fn above(column: &str, floor: f64) -> Self {
        Filter::Above {
            column: column.to_string(),
            floor,
        }
    }

    pub fn all(filters: Vec<Filter>) -> Self {
        Filter::All(filters)
    }

    /// Apply to a selection, returning the matching subset in the same order.
    pub fn apply<'a>(&self, selection: Selection<'a>) -> Result<Selection<'a>, DatasetError> {
        let predicate = self.bind(selection.table())?;
        Ok(selection.retain(|row| predicate.matches(row)))
    }

    /// Human-readable form used in logs.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Resolve column names against the table once, before scanning rows.
    fn bind(&self, table: &NutritionTable) -> Result<Bound<'_>, DatasetError> {
        Ok(match self {
            Filter::OneOf { column, values } => Bound::OneOf(table.column_index(column)?, values),
            Filter::Between { column, min, max } => {
                Bound::Between(table.column_index(column)?, *min, *max)
            }
            Filter::Below { column, limit } => Bound::Below(table.column_index(column)?, *limit),
            Filter::Above { column, floor } => Bound::Above(table.column_index(column)?, *floor),
            Filter::All(filters) => Bound::All(
                filters
                    .iter()
                    .map(|f| f.bind(table))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::OneOf { column, values } => {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                write!(f, "{column} in {{{}}}", values.join(", "))
            }
            Filter::Between { column, min, max } => write!(f, "{column} in [{min}, {max}]"),
            Filter::Below { column, limit } => write!(f, "{column} < {limit}"),
            Filter::Above { column, floor } => write!(f, "{column} > {floor}"),
            Filter::All(filters) if filters.is_empty() => write!(f, "all"),
            Filter::All(filters) => {
                let parts: Vec<String> = filters.iter().map(|p| p.to_string()).collect();
                write!(f, "({})", parts.join(" AND "))
            }
        }
    }
}

/// A filter with its columns resolved to positions.
enum Bound<'f> {
    OneOf(usize, &'f BTreeSet<String>),
    Between(usize, f64, f64),
    Below(usize, f64),
    Above(usize, f64),
    All(Vec<Bound<'f>>),
}

impl Bound<'_> {
    fn matches(&self, row: &MenuItem) -> bool {
        match self {
            Bound::OneOf(col, values) => row
                .cell(*col)
                .label()
                .is_some_and(|label| values.contains(&label)),
            Bound::Between(col, min, max) => row
                .cell(*col)
                .as_f64()
                .is_some_and(|v| *min <= v && v <= *max),
            Bound::Below(col, limit) => row.cell(*col).as_f64().is_some_and(|v| v < *limit),
            Bound::Above(col, floor) => row.cell(*col).as_f64().is_some_and(|v| v > *floor),
            Bound::All(parts) => parts.iter().all(|p| p.matches(row)),
        }
    }
}

/// Apply filters in order. An empty list returns the selection unchanged.
pub fn apply_all<'a>(
    selection: Selection<'a>,
    filters: &[Filter],
) -> Result<Selection<'a>, DatasetError> {
    filters.iter().try_fold(selection, |sel, f| f.apply(sel))
}

// ---------------------------------------------------------------------------
// Named filters with the default thresholds
// ---------------------------------------------------------------------------

/// Items from the given companies. An empty set selects nothing.
pub fn filter_by_company<'a, I, S>(
    selection: Selection<'a>,
    companies: I,
) -> Result<Selection<'a>, DatasetError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Filter::company_in(companies).apply(selection)
}

/// Items with `min <= calories <= max`.
pub fn filter_by_calories(
    selection: Selection<'_>,
    min: f64,
    max: f64,
) -> Result<Selection<'_>, DatasetError> {
    Filter::between(CALORIES, min, max).apply(selection)
}

/// Items with `min <= protein <= max`.
pub fn filter_by_protein(
    selection: Selection<'_>,
    min: f64,
    max: f64,
) -> Result<Selection<'_>, DatasetError> {
    Filter::between(PROTEIN, min, max).apply(selection)
}

fn dietary(
    selection: Selection<'_>,
    category: DietaryCategory,
) -> Result<Selection<'_>, DatasetError> {
    category
        .filter(&DietaryThresholds::default())
        .apply(selection)
}

pub fn low_calorie(selection: Selection<'_>) -> Result<Selection<'_>, DatasetError> {
    dietary(selection, DietaryCategory::LowCalorie)
}

pub fn low_fat(selection: Selection<'_>) -> Result<Selection<'_>, DatasetError> {
    dietary(selection, DietaryCategory::LowFat)
}

pub fn low_sodium(selection: Selection<'_>) -> Result<Selection<'_>, DatasetError> {
    dietary(selection, DietaryCategory::LowSodium)
}

pub fn low_carb(selection: Selection<'_>) -> Result<Selection<'_>, DatasetError> {
    dietary(selection, DietaryCategory::LowCarb)
}

pub fn low_fiber(selection: Selection<'_>) -> Result<Selection<'_>, DatasetError> {
    dietary(selection, DietaryCategory::LowFiber)
}

pub fn low_sugar(selection: Selection<'_>) -> Result<Selection<'_>, DatasetError> {
    dietary(selection, DietaryCategory::LowSugar)
}

pub fn high_protein(selection: Selection<'_>) -> Result<Selection<'_>, DatasetError> {
    dietary(selection, DietaryCategory::HighProtein)
}

/// Low calorie, low carb and high protein at once.
pub fn best_for_weight_loss(selection: Selection<'_>) -> Result<Selection<'_>, DatasetError> {
    dietary(selection, DietaryCategory::WeightLoss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn nutrition(rows: &[(&str, &str, &str, &str)]) -> NutritionTable {
        // company, calories, carbs, protein; the rest sit just inside every limit
        let columns = vec![
            "item", COMPANY, CALORIES, TOTAL_FAT, SODIUM, CARBS, FIBER, SUGAR, PROTEIN,
        ];
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, (company, calories, carbs, protein))| {
                let item = format!("item {i}");
                MenuItem::new(
                    [item.as_str(), *company, *calories, "1", "100", *carbs, "0", "2", *protein]
                        .into_iter()
                        .map(CellValue::parse)
                        .collect(),
                )
            })
            .collect();
        NutritionTable::new(columns.into_iter().map(String::from).collect(), rows).unwrap()
    }

    #[test]
    fn company_filter_matches_membership() {
        let t = nutrition(&[("A", "1", "1", "1"), ("B", "1", "1", "1"), ("C", "1", "1", "1")]);
        let sel = filter_by_company(t.select_all(), ["A", "C"]).unwrap();
        assert_eq!(sel.indices(), &[0, 2]);
    }

    #[test]
    fn empty_company_set_selects_nothing() {
        let t = nutrition(&[("A", "1", "1", "1")]);
        let sel = filter_by_company(t.select_all(), Vec::<String>::new()).unwrap();
        assert!(sel.is_empty());
    }

    #[test]
    fn calorie_range_is_inclusive() {
        let t = nutrition(&[("A", "100", "1", "1"), ("A", "500", "1", "1"), ("A", "501", "1", "1")]);
        let sel = filter_by_calories(t.select_all(), 100.0, 500.0).unwrap();
        assert_eq!(sel.indices(), &[0, 1]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let t = nutrition(&[("A", "100", "1", "1")]);
        let sel = filter_by_protein(t.select_all(), 10.0, 0.0).unwrap();
        assert!(sel.is_empty());
    }

    #[test]
    fn low_calorie_is_strict() {
        let t = nutrition(&[("A", "39", "1", "1"), ("A", "40", "1", "1")]);
        assert_eq!(low_calorie(t.select_all()).unwrap().indices(), &[0]);
    }

    #[test]
    fn high_protein_is_strict() {
        let t = nutrition(&[("A", "1", "1", "10"), ("A", "1", "1", "11")]);
        assert_eq!(high_protein(t.select_all()).unwrap().indices(), &[1]);
    }

    #[test]
    fn weight_loss_keeps_only_qualifying_rows() {
        let t = nutrition(&[("A", "30", "5", "15"), ("B", "50", "5", "15")]);
        let sel = best_for_weight_loss(t.select_all()).unwrap();
        assert_eq!(sel.indices(), &[0]);
    }

    #[test]
    fn non_numeric_and_missing_cells_never_match() {
        let t = nutrition(&[("A", "n/a", "1", "1"), ("A", "", "1", "1"), ("A", "20", "1", "1")]);
        assert_eq!(low_calorie(t.select_all()).unwrap().indices(), &[2]);
        assert_eq!(
            filter_by_calories(t.select_all(), f64::MIN, f64::MAX)
                .unwrap()
                .indices(),
            &[2]
        );
    }

    #[test]
    fn missing_column_fails_even_on_empty_selection() {
        let t = NutritionTable::new(vec![COMPANY.to_string()], vec![]).unwrap();
        let err = low_sugar(t.select_all()).unwrap_err();
        assert_eq!(err, DatasetError::MissingColumn(SUGAR.into()));
    }

    #[test]
    fn every_threshold_filter_uses_its_column() {
        let t = nutrition(&[("A", "1", "1", "1")]);
        for f in [low_fat, low_sodium, low_carb, low_fiber, low_sugar] {
            assert_eq!(f(t.select_all()).unwrap().len(), 1);
        }
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let t = nutrition(&[("A", "45", "1", "1")]);
        let loose = DietaryThresholds {
            low_calorie: 50.0,
            ..DietaryThresholds::default()
        };
        let sel = DietaryCategory::LowCalorie
            .filter(&loose)
            .apply(t.select_all())
            .unwrap();
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn descriptions_are_readable() {
        let f = DietaryCategory::WeightLoss.filter(&DietaryThresholds::default());
        assert_eq!(f.description(), "(calories < 40 AND carbs < 9 AND protein > 10)");
        assert_eq!(Filter::between(CALORIES, 0.0, 500.0).description(), "calories in [0, 500]");
        assert_eq!(Filter::company_in(["B", "A"]).description(), "company in {A, B}");
    }

    #[test]
    fn apply_all_with_no_filters_is_identity() {
        let t = nutrition(&[("A", "1", "1", "1"), ("B", "2", "2", "2")]);
        let sel = apply_all(t.select_all(), &[]).unwrap();
        assert_eq!(sel, t.select_all());
    }
}
