use std::fs::File;
use std::path::Path;
use log::{info, warn};
use calamine::{open_workbook_auto, Reader};
use crate::error::ScrapeError;
use crate::product::{Field, NOT_AVAILABLE};

pub const STATUS_COLUMN: &str = "Status";

/// One spreadsheet row as positional `(header, value)` cells.
/// Duplicate or blank headers each keep their own cell; lookups by name
/// hit the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrites the first cell named `column`, or appends one.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| name == column) {
            Some((_, cell)) => *cell = value,
            None => self.cells.push((column.to_string(), value)),
        }
    }

    fn push(&mut self, column: &str, value: String) {
        self.cells.push((column.to_string(), value));
    }

    fn value_at(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|(_, value)| value.as_str())
    }
}

/// In-memory table: header order is kept so output columns line up with input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Table { headers, rows: Vec::new() }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Appends a row from positional cells. Short rows are padded, extra cells dropped.
    pub fn push_cells<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = cells.into_iter().map(Into::into);
        let mut row = Row::default();
        for header in &self.headers {
            row.push(header, values.next().unwrap_or_default());
        }
        self.rows.push(row);
    }

    /// Adds a column with `default` in every row if it is not present yet.
    pub fn add_column(&mut self, column: &str, default: &str) {
        if self.has_column(column) {
            return;
        }
        self.headers.push(column.to_string());
        for row in &mut self.rows {
            row.push(column, default.to_string());
        }
    }

    /// Positional cells of `row` in header order.
    pub fn cells<'a>(&'a self, row: &'a Row) -> impl Iterator<Item = &'a str> + 'a {
        (0..self.headers.len()).map(move |i| row.value_at(i).unwrap_or(""))
    }
}

/// Loads `.xlsx`/`.xls` through calamine and anything else as CSV.
pub fn load_table<P: AsRef<Path>>(filename: P, model_column: &str) -> Result<Table, ScrapeError> {
    let path_ref = filename.as_ref();

    let is_excel = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls"));

    let table = if is_excel {
        load_excel(path_ref)?
    } else {
        load_csv(path_ref)?
    };

    if !table.has_column(model_column) {
        return Err(ScrapeError::MissingColumn(model_column.to_string()));
    }

    info!("Loaded {} rows from {:?}", table.rows.len(), path_ref);
    Ok(table)
}

fn load_csv(path: &Path) -> Result<Table, ScrapeError> {
    let file = File::open(path)?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ScrapeError::EmptyInput(path.display().to_string()));
    }

    let mut table = Table::new(headers);
    for result in rdr.records() {
        let record = result?;
        if record.len() > table.headers.len() {
            warn!(
                "Row {} has {} cells but only {} headers; extra cells dropped",
                table.rows.len() + 1,
                record.len(),
                table.headers.len()
            );
        }
        table.push_cells(record.iter());
    }
    Ok(table)
}

fn load_excel(path: &Path) -> Result<Table, ScrapeError> {
    let mut workbook = open_workbook_auto(path)?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(ScrapeError::EmptyInput(path.display().to_string())),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Err(ScrapeError::EmptyInput(path.display().to_string())),
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_cells(row.iter().map(|c| c.to_string().trim().to_string()));
    }
    Ok(table)
}

/// Makes sure the status column and every attribute column exist.
/// Attribute columns start at the sentinel; existing columns are untouched.
pub fn ensure_columns(table: &mut Table) {
    table.add_column(STATUS_COLUMN, "");
    for field in Field::ALL {
        table.add_column(field.column(), NOT_AVAILABLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_csv_keeps_extra_columns_and_pads_short_rows() {
        let file = write_temp("Model#,Brand,Price\nABC123,Acme,10\nXYZ9,Other\n");
        let table = load_table(file.path(), "Model#").unwrap();

        assert_eq!(table.headers, vec!["Model#", "Brand", "Price"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("Brand"), Some("Acme"));
        assert_eq!(table.rows[1].get("Price"), Some(""));
    }

    #[test]
    fn test_duplicate_and_blank_headers_keep_their_own_cells() {
        let file = write_temp("Model#,Notes,Notes,\nABC123,first,second,tail\n");
        let mut table = load_table(file.path(), "Model#").unwrap();
        ensure_columns(&mut table);

        let row = &table.rows[0];
        let cells: Vec<&str> = table.cells(row).take(4).collect();
        assert_eq!(cells, ["ABC123", "first", "second", "tail"]);
        assert_eq!(row.get("Notes"), Some("first"));
        assert_eq!(table.headers[3], "");
    }

    #[test]
    fn test_load_xlsx_first_sheet() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/models.xlsx");
        let table = load_table(&path, "Model#").unwrap();

        assert_eq!(table.headers, vec!["Model#", "Brand", "Notes"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].get("Model#"), Some("12345"));
        assert_eq!(table.rows[0].get("Brand"), Some("Acme"));
        assert_eq!(table.rows[0].get("Notes"), Some("fragile"));
        assert_eq!(table.rows[1].get("Model#"), Some("XYZ-9"));
        assert_eq!(table.rows[1].get("Notes"), Some(""));
        assert_eq!(table.rows[2].get("Model#"), Some(""));
        assert_eq!(table.rows[2].get("Brand"), Some("NoModel"));
    }

    #[test]
    fn test_missing_model_column_is_an_error() {
        let file = write_temp("Sku,Brand\n1,Acme\n");
        let err = load_table(file.path(), "Model#").unwrap_err();
        assert!(matches!(err, ScrapeError::MissingColumn(ref c) if c == "Model#"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_table("/nonexistent/dir/input.csv", "Model#");
        assert!(matches!(result, Err(ScrapeError::Io(_))));
    }

    #[test]
    fn test_ensure_columns_adds_defaults_without_overwriting() {
        let mut table = Table::new(vec!["Model#".into(), "Name".into()]);
        table.push_cells(["ABC123", "Existing name"]);

        ensure_columns(&mut table);

        assert_eq!(table.headers.len(), 2 + 13);
        assert_eq!(table.headers[2], STATUS_COLUMN);
        let row = &table.rows[0];
        assert_eq!(row.get("Name"), Some("Existing name"));
        assert_eq!(row.get("Features"), Some("N/A"));
        assert_eq!(row.get(STATUS_COLUMN), Some(""));
    }
}
