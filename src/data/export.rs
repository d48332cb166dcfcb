use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Selection;

/// File name offered when saving results.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "filtered_data.csv";

/// Write the selection as CSV: the table header, then each selected row.
pub fn write_csv<W: Write>(selection: &Selection<'_>, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(selection.table().columns())
        .context("writing CSV header")?;
    for (n, row) in selection.rows().enumerate() {
        out.write_record(row.cells.iter().map(|c| c.to_string()))
            .with_context(|| format!("writing CSV row {n}"))?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(())
}

/// The selection as an in-memory CSV document.
pub fn to_csv_string(selection: &Selection<'_>) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(selection, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not UTF-8")
}

/// Save the selection to `path`.
pub fn export_csv_file(selection: &Selection<'_>, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(selection, std::io::BufWriter::new(file))
        .with_context(|| format!("exporting to {}", path.display()))?;
    log::info!("Exported {} rows to {}", selection.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::low_calorie;
    use crate::data::model::{CellValue, MenuItem, NutritionTable};

    fn table() -> NutritionTable {
        NutritionTable::new(
            vec!["company".into(), "item".into(), "calories".into()],
            vec![
                MenuItem::new(vec![
                    CellValue::parse("Sonic"),
                    CellValue::parse("Side Salad, no dressing"),
                    CellValue::Number(20.0),
                ]),
                MenuItem::new(vec![
                    CellValue::parse("Sonic"),
                    CellValue::parse("Corn Dog"),
                    CellValue::Number(230.0),
                ]),
                MenuItem::new(vec![
                    CellValue::parse("Arbys"),
                    CellValue::parse("Water"),
                    CellValue::Missing,
                ]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn writes_header_and_selected_rows_only() {
        let t = table();
        let sel = low_calorie(t.select_all()).unwrap();
        let text = to_csv_string(&sel).unwrap();
        assert_eq!(
            text,
            "company,item,calories\nSonic,\"Side Salad, no dressing\",20\n"
        );
    }

    #[test]
    fn missing_cells_are_empty_fields() {
        let t = table();
        let text = to_csv_string(&t.select_all()).unwrap();
        assert!(text.ends_with("Arbys,Water,\n"));
    }

    #[test]
    fn empty_selection_still_has_header() {
        let t = table();
        let sel = crate::data::filter::filter_by_company(t.select_all(), Vec::<String>::new()).unwrap();
        assert_eq!(to_csv_string(&sel).unwrap(), "company,item,calories\n");
    }

    #[test]
    fn export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE_NAME);
        let t = table();
        export_csv_file(&t.select_all(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
    }
}
