use std::fs;
use std::path::Path;
use log::info;
use crate::error::ScrapeError;
use crate::input_loader::Table;

/// Writes the whole table as CSV, headers first, rows in table order.
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<(), ScrapeError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut csv_writer = csv::WriterBuilder::new().from_path(path)?;
    csv_writer.write_record(&table.headers)?;
    for row in &table.rows {
        csv_writer.write_record(table.cells(row))?;
    }
    csv_writer.flush()?;

    info!("Saved {} rows to {:?}", table.rows.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_loader::load_table;

    #[test]
    fn test_written_table_reads_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        let mut table = Table::new(vec!["Model#".into(), "Note".into()]);
        table.push_cells(["B2", "has, comma"]);
        table.push_cells(["A1", ""]);

        write_table(&table, &path).unwrap();
        let reloaded = load_table(&path, "Model#").unwrap();

        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file.
        let result = write_table(&Table::new(vec!["Model#".into()]), dir.path());
        assert!(result.is_err());
    }
}
