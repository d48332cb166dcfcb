use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value as JsonValue};

use super::filter::{NUMERIC_COLUMNS, REQUIRED_COLUMNS};
use super::model::{CellValue, MenuItem, NutritionTable};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How raw values are normalised while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Round every nutrition cell to a whole number (ties to even).
    pub round_numbers: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            round_numbers: true,
        }
    }
}

impl LoadOptions {
    fn normalise(&self, cell: CellValue) -> CellValue {
        if self.round_numbers {
            cell.rounded()
        } else {
            cell
        }
    }
}

/// Nutrition columns are parsed as numbers; the rest stay as written.
fn is_numeric_column(column: &str) -> bool {
    NUMERIC_COLUMNS.contains(&column)
}

fn text_cell(raw: &str, options: &LoadOptions, numeric: bool) -> CellValue {
    if numeric {
        options.normalise(CellValue::parse(raw))
    } else if raw.is_empty() {
        CellValue::Missing
    } else {
        CellValue::Text(raw.to_string())
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a nutrition table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, one menu item per line
/// * `.json` – `[{ "company": "...", "calories": 250, ... }, ...]`
///
/// Fails if any of the required nutrition columns is absent.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<NutritionTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path, options),
        "json" => load_json(path, options),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    table
        .require_columns(&REQUIRED_COLUMNS)
        .with_context(|| format!("validating {}", path.display()))?;

    log::info!(
        "Loaded {} menu items with columns {:?} from {}",
        table.len(),
        table.columns(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path, options: &LoadOptions) -> Result<NutritionTable> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader, options)
}

/// Parse CSV from any reader. The first record is the header.
pub fn read_csv<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    options: &LoadOptions,
) -> Result<NutritionTable> {
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let numeric: Vec<bool> = columns.iter().map(|c| is_numeric_column(c)).collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != columns.len() {
            bail!(
                "CSV row {row_no}: {} fields but the header has {}",
                record.len(),
                columns.len()
            );
        }
        let cells = record
            .iter()
            .zip(&numeric)
            .map(|(raw, &numeric)| text_cell(raw, options, numeric))
            .collect();
        rows.push(MenuItem::new(cells));
    }

    Ok(NutritionTable::new(columns, rows)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "company": "Sonic", "item": "Corn Dog", "calories": 230, "protein": 6.0, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path, options: &LoadOptions) -> Result<NutritionTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text, options)
}

/// Parse a records-oriented JSON document.
pub fn parse_json(text: &str, options: &LoadOptions) -> Result<NutritionTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let objects: Vec<&Map<String, JsonValue>> = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<_>>()?;

    // Union of keys, in order of first appearance.
    let mut columns: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = objects
        .iter()
        .map(|obj| {
            let cells = columns
                .iter()
                .map(|col| {
                    obj.get(col).map_or(CellValue::Missing, |val| {
                        json_to_cell(val, options, is_numeric_column(col))
                    })
                })
                .collect();
            MenuItem::new(cells)
        })
        .collect();

    Ok(NutritionTable::new(columns, rows)?)
}

fn json_to_cell(val: &JsonValue, options: &LoadOptions, numeric: bool) -> CellValue {
    match val {
        JsonValue::Null => CellValue::Missing,
        JsonValue::String(s) => text_cell(s, options, numeric),
        JsonValue::Number(n) if numeric => options.normalise(
            n.as_f64().map_or(CellValue::Missing, CellValue::Number),
        ),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "company,item,calories,total_fat,sodium,carbs,fiber,sugar,protein";

    fn csv_reader(body: &str) -> csv::Reader<&[u8]> {
        csv::Reader::from_reader(body.as_bytes())
    }

    #[test]
    fn reads_csv_and_rounds_numbers() {
        let text = format!("{HEADER}\nSonic,Corn Dog,230.5,13,500,23,1.5,4.4,6\n");
        let table = read_csv(csv_reader(&text), &LoadOptions::default()).unwrap();
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.cell(0), &CellValue::Text("Sonic".into()));
        assert_eq!(row.cell(2), &CellValue::Number(230.0));
        assert_eq!(row.cell(6), &CellValue::Number(2.0));
        assert_eq!(row.cell(7), &CellValue::Number(4.0));
    }

    #[test]
    fn rounding_can_be_disabled() {
        let text = format!("{HEADER}\nSonic,Corn Dog,230.5,13,500,23,0.4,4,6\n");
        let options = LoadOptions {
            round_numbers: false,
        };
        let table = read_csv(csv_reader(&text), &options).unwrap();
        assert_eq!(table.rows()[0].cell(6), &CellValue::Number(0.4));
    }

    #[test]
    fn empty_and_nan_cells_load_as_missing() {
        let text = format!("{HEADER}\nSonic,Shake,,13,NaN,23,1,4,6\n");
        let table = read_csv(csv_reader(&text), &LoadOptions::default()).unwrap();
        let row = &table.rows()[0];
        assert_eq!(row.cell(2), &CellValue::Missing);
        assert_eq!(row.cell(4), &CellValue::Missing);
    }

    #[test]
    fn ragged_csv_row_is_rejected() {
        let text = format!("{HEADER}\nSonic,Shake,1\n");
        let err = read_csv(csv_reader(&text), &LoadOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 0"));
    }

    #[test]
    fn json_records_union_keys_in_file_order() {
        let text = r#"[
            {"company": "Arbys", "calories": 350.6, "protein": null},
            {"company": "Arbys", "sugar": "12"}
        ]"#;
        let table = parse_json(text, &LoadOptions::default()).unwrap();
        assert_eq!(table.columns(), &["company", "calories", "protein", "sugar"]);
        assert_eq!(table.rows()[0].cell(1), &CellValue::Number(351.0));
        assert_eq!(table.rows()[0].cell(2), &CellValue::Missing);
        assert_eq!(table.rows()[1].cell(1), &CellValue::Missing);
        assert_eq!(table.rows()[1].cell(3), &CellValue::Number(12.0));
    }

    #[test]
    fn json_passthrough_columns_keep_their_text() {
        let text = r#"[{"company": "Sonic", "item": 2.5, "code": "NA", "calories": 2.5}]"#;
        let table = parse_json(text, &LoadOptions::default()).unwrap();
        assert_eq!(table.columns(), &["company", "item", "code", "calories"]);
        let row = &table.rows()[0];
        assert_eq!(row.cell(1), &CellValue::Text("2.5".into()));
        assert_eq!(row.cell(2), &CellValue::Text("NA".into()));
        assert_eq!(row.cell(3), &CellValue::Number(2.0));
    }

    #[test]
    fn csv_passthrough_columns_are_not_rounded_or_blanked() {
        let text = format!("{HEADER}\nSonic,2.5,230,13,500,23,1,4,6\nSonic,NA,10,0,5,1,0,0,1\n");
        let table = read_csv(csv_reader(&text), &LoadOptions::default()).unwrap();
        assert_eq!(table.rows()[0].cell(1), &CellValue::Text("2.5".into()));
        assert_eq!(table.rows()[1].cell(1), &CellValue::Text("NA".into()));

        let exported = crate::data::export::to_csv_string(&table.select_all()).unwrap();
        assert!(exported.contains("Sonic,2.5,230,"));
        assert!(exported.contains("Sonic,NA,10,"));
    }

    #[test]
    fn json_export_keeps_source_column_order() {
        let text = r#"[{"company": "Sonic", "item": "Corn Dog", "calories": 230, "total_fat": 13,
            "sodium": 500, "carbs": 23, "fiber": 1, "sugar": 4, "protein": 6}]"#;
        let table = parse_json(text, &LoadOptions::default()).unwrap();
        let exported = crate::data::export::to_csv_string(&table.select_all()).unwrap();
        assert_eq!(
            exported.lines().next(),
            Some("company,item,calories,total_fat,sodium,carbs,fiber,sugar,protein")
        );
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(parse_json("{}", &LoadOptions::default()).is_err());
        assert!(parse_json("[1]", &LoadOptions::default()).is_err());
    }

    #[test]
    fn load_file_rejects_missing_required_column() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "company,calories\nSonic,230").unwrap();
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("missing required column 'total_fat'"));
    }

    #[test]
    fn load_file_reads_csv_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{HEADER}\nSonic,Corn Dog,230,13,500,23,1,4,6").unwrap();
        let table = load_file(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn load_file_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = load_file(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
