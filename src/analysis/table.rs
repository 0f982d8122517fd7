use std::io::Read;

/// In-memory review spreadsheet. The schema is whatever the source file
/// declares; cells are kept as strings and parsed only where a resolved role
/// requires it. Extra columns are carried but ignored by the engine.
#[derive(Debug, Clone, Default)]
pub struct ReviewTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReviewTable {
    /// Build a table from already-materialized columns and rows. Rows are
    /// padded or truncated to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(|cell| cell.as_str())
            .unwrap_or("")
    }

    /// Distinct non-empty values of one column, in first-occurrence order.
    pub fn distinct_values(&self, column: usize) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for row in &self.rows {
            let value = row.get(column).map(|cell| cell.trim()).unwrap_or("");
            if value.is_empty() {
                continue;
            }
            if !seen.iter().any(|known| known == value) {
                seen.push(value.to_string());
            }
        }
        seen
    }

    /// A new table holding only the rows whose cell in `column` matches
    /// `value` (trimmed, case-insensitive). Used to re-run the engine on one
    /// department or tenure slice.
    pub fn slice_by(&self, column: usize, value: &str) -> Self {
        let wanted = value.trim();
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                row.get(column)
                    .map(|cell| cell.trim().eq_ignore_ascii_case(wanted))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}
