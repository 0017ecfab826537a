use super::value::Value;

/// Header the API uses for elapsed time
pub const SECONDS_COLUMN: &str = "Time Spent (seconds)";
/// Header the elapsed-time column carries after normalization (whole minutes)
pub const TIME_COLUMN: &str = "Time";

/// Normalized view of one API report
#[derive(Debug, Clone, PartialEq)]
pub struct RowTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Borrowed view of one row, addressable by column name
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }
}

impl RowTable {
    /// Build a table from already-normalized columns and rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RowWidth {
                    row: idx,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Build a table from raw report headers and rows.
    ///
    /// The elapsed-seconds column, when present, is renamed to [`TIME_COLUMN`]
    /// and converted to whole minutes. This is the only place that conversion
    /// happens, so a built table can never be converted twice.
    pub fn from_report(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        let mut table = Self::new(headers, rows)?;

        let Some(time_idx) = table.column_index(SECONDS_COLUMN) else {
            return Ok(table);
        };

        for (row_idx, row) in table.rows.iter_mut().enumerate() {
            let minutes =
                row[time_idx]
                    .seconds_to_minutes()
                    .ok_or_else(|| TableError::InvalidTime {
                        row: row_idx,
                        value: row[time_idx].to_string(),
                    })?;
            row[time_idx] = minutes;
        }
        table.columns[time_idx] = TIME_COLUMN.to_string();

        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    fn require_column(&self, column: &str) -> Result<usize, TableError> {
        self.column_index(column).ok_or_else(|| TableError::Schema {
            column: column.to_string(),
            available: self.columns.clone(),
        })
    }

    /// Select `value_column` from the first row whose `filter_column` equals
    /// `filter_value`.
    ///
    /// No matching row is a normal outcome and yields `Ok(None)`. A column
    /// missing from the header is a [`TableError::Schema`], even on an empty
    /// table.
    pub fn lookup(
        &self,
        value_column: &str,
        filter_column: &str,
        filter_value: &Value,
    ) -> Result<Option<&Value>, TableError> {
        let value_idx = self.require_column(value_column)?;
        let filter_idx = self.require_column(filter_column)?;

        Ok(self
            .rows
            .iter()
            .find(|row| &row[filter_idx] == filter_value)
            .map(|row| &row[value_idx]))
    }

    /// Value of `column` in the first row, `Ok(None)` when the table is empty
    pub fn first(&self, column: &str) -> Result<Option<&Value>, TableError> {
        let idx = self.require_column(column)?;
        Ok(self.rows.first().map(|row| &row[idx]))
    }
}

impl std::fmt::Display for RowTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                cells
                    .iter()
                    .map(|row| row[idx].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(name, w)| format!("{:<w$}", name, w = *w))
            .collect();
        writeln!(f, "{}", header.join("  ").trim_end())?;

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())?;
        }

        write!(f, "({} rows)", self.rows.len())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Column not found: {column} (available: {available:?})")]
    Schema {
        column: String,
        available: Vec<String>,
    },

    #[error("Row {row} has {actual} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Row {row} has non-numeric elapsed time: {value}")]
    InvalidTime { row: usize, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn overview(rows: Vec<(&str, i64)>) -> RowTable {
        RowTable::new(
            headers(&["Rank", "Time", "Number of People", "Category"]),
            rows.into_iter()
                .enumerate()
                .map(|(i, (cat, mins))| {
                    vec![
                        Value::Int(i as i64 + 1),
                        Value::Int(mins),
                        Value::Int(1),
                        Value::from(cat),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_from_report_converts_seconds() {
        let table = RowTable::from_report(
            headers(&["Rank", SECONDS_COLUMN, "Number of People", "Category"]),
            vec![
                vec![Value::Int(1), Value::Int(2700), Value::Int(1), "Entertainment".into()],
                vec![Value::Int(2), Value::Int(119), Value::Int(1), "Reference".into()],
                vec![Value::Int(3), Value::Int(59), Value::Int(1), "Utilities".into()],
            ],
        )
        .unwrap();

        assert!(table.has_column(TIME_COLUMN));
        assert!(!table.has_column(SECONDS_COLUMN));

        let minutes: Vec<i64> = table
            .rows()
            .map(|r| r.get(TIME_COLUMN).and_then(Value::as_i64).unwrap())
            .collect();
        assert_eq!(minutes, vec![45, 1, 0]);
    }

    #[test]
    fn test_from_report_without_time_column() {
        let table = RowTable::from_report(
            headers(&["Date", "Efficiency (percent)"]),
            vec![vec!["2024-01-01".into(), Value::Float(62.5)]],
        )
        .unwrap();
        assert_eq!(table.columns(), &headers(&["Date", "Efficiency (percent)"])[..]);
        assert_eq!(table.first("Efficiency (percent)").unwrap(), Some(&Value::Float(62.5)));
    }

    #[test]
    fn test_already_minutes_table_left_alone() {
        // A table that already carries minutes has no seconds header, so
        // building it again must not divide a second time.
        let table = RowTable::from_report(
            headers(&["Time", "Category"]),
            vec![vec![Value::Int(45), "Entertainment".into()]],
        )
        .unwrap();
        let spent = table
            .lookup(TIME_COLUMN, "Category", &"Entertainment".into())
            .unwrap();
        assert_eq!(spent, Some(&Value::Int(45)));
    }

    #[test]
    fn test_from_report_rejects_bad_time() {
        let err = RowTable::from_report(
            headers(&[SECONDS_COLUMN]),
            vec![vec!["soon".into()]],
        )
        .unwrap_err();
        assert!(matches!(err, TableError::InvalidTime { row: 0, .. }));
    }

    #[test]
    fn test_row_width_mismatch() {
        let err = RowTable::new(headers(&["a", "b"]), vec![vec![Value::Int(1)]]).unwrap_err();
        assert!(matches!(
            err,
            TableError::RowWidth { row: 0, expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_lookup_found_and_absent() {
        let table = overview(vec![("Software Development", 90), ("Entertainment", 45)]);

        let spent = table
            .lookup("Time", "Category", &"Entertainment".into())
            .unwrap();
        assert_eq!(spent, Some(&Value::Int(45)));

        let missing = table.lookup("Time", "Category", &"Shopping".into()).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_lookup_order_independent() {
        let a = overview(vec![("News", 10), ("Entertainment", 45), ("Design", 5)]);
        let b = overview(vec![("Design", 5), ("News", 10), ("Entertainment", 45)]);

        for cat in ["News", "Entertainment", "Design", "Absent"] {
            let key = Value::from(cat);
            assert_eq!(
                a.lookup("Time", "Category", &key).unwrap(),
                b.lookup("Time", "Category", &key).unwrap(),
            );
        }
    }

    #[test]
    fn test_lookup_numeric_filter() {
        let table = RowTable::new(
            headers(&["Date", "Time", "Number of People", "Productivity"]),
            vec![
                vec!["2024-01-01".into(), Value::Int(120), Value::Int(1), Value::Int(2)],
                vec!["2024-01-01".into(), Value::Int(80), Value::Int(1), Value::Int(1)],
                vec!["2024-01-01".into(), Value::Int(30), Value::Int(1), Value::Int(-2)],
            ],
        )
        .unwrap();

        let very = table.lookup("Time", "Productivity", &Value::Int(2)).unwrap();
        assert_eq!(very, Some(&Value::Int(120)));
        let neutral = table.lookup("Time", "Productivity", &Value::Int(0)).unwrap();
        assert_eq!(neutral, None);
    }

    #[test]
    fn test_lookup_missing_column_is_schema_error() {
        let table = overview(vec![("Entertainment", 45)]);

        let err = table
            .lookup("Minutes", "Category", &"Entertainment".into())
            .unwrap_err();
        assert!(matches!(err, TableError::Schema { ref column, .. } if column == "Minutes"));

        let err = table.lookup("Time", "Activity", &"x".into()).unwrap_err();
        assert!(matches!(err, TableError::Schema { ref column, .. } if column == "Activity"));

        let empty = RowTable::new(headers(&["Time"]), vec![]).unwrap();
        assert!(empty.lookup("Time", "Category", &"x".into()).is_err());
        assert!(empty.first("Category").is_err());
        assert_eq!(empty.first("Time").unwrap(), None);
    }

    #[test]
    fn test_display() {
        let table = overview(vec![("Entertainment", 45)]);
        let text = table.to_string();
        assert!(text.starts_with("Rank"));
        assert!(text.contains("Entertainment"));
        assert!(text.ends_with("(1 rows)"));
    }
}
