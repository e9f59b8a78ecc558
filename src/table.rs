use std::fmt;
use std::path::Path;

/// Column names of the measurements file, in file order.
pub const COLUMNS: [&str; 5] = ["X", "Y1", "Y2", "Y3", "Y4"];

/// Number of timing columns following the input size.
pub const SERIES_COUNT: usize = COLUMNS.len() - 1;

/// One line of the measurements file: an input size and one elapsed time per algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub x: f64,
    pub y: [f64; SERIES_COUNT],
}

impl Measurement {
    pub fn new(x: f64, y: [f64; SERIES_COUNT]) -> Self {
        Measurement { x, y }
    }

    fn values(&self) -> [f64; COLUMNS.len()] {
        [self.x, self.y[0], self.y[1], self.y[2], self.y[3]]
    }
}

/// Rows are kept in file order. X is expected to be ascending but that is not checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    rows: Vec<Measurement>,
}

impl MeasurementTable {
    pub fn new() -> Self {
        MeasurementTable { rows: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MeasurementTable {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, row: Measurement) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// All values of the named column, `None` for an unknown name.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = COLUMNS.iter().position(|&c| c == name)?;
        Some(self.rows.iter().map(|row| row.values()[idx]).collect())
    }

    /// `(X, Yi)` pairs for the timing column `index` (0 is `Y1`).
    pub fn series(&self, index: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.rows.iter().map(move |row| (row.x, row.y[index]))
    }

    /// Writes the table tab-separated without a header, the format `parse::load` reads back.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(path)?;
        for row in &self.rows {
            let mut record = Vec::with_capacity(COLUMNS.len());
            record.push(format!("{}", row.x));
            record.extend(row.y.iter().map(|t| format!("{:.3}", t)));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl FromIterator<Measurement> for MeasurementTable {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        MeasurementTable {
            rows: iter.into_iter().collect(),
        }
    }
}

// Right aligned columns with a leading row index, like a dataframe printout.
impl fmt::Display for MeasurementTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.values().iter().map(|v| v.to_string()).collect())
            .collect();

        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.len()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        write!(f, "{:>w$}", "", w = index_width)?;
        for (name, width) in COLUMNS.iter().zip(&widths) {
            write!(f, "  {:>w$}", name, w = width)?;
        }
        writeln!(f)?;

        for (idx, row) in cells.iter().enumerate() {
            write!(f, "{:>w$}", idx, w = index_width)?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {:>w$}", cell, w = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
fn sample() -> MeasurementTable {
    vec![
        Measurement::new(100.0, [0.5, 1.2, 0.8, 0.6]),
        Measurement::new(200.0, [1.1, 4.9, 3.0, 1.3]),
    ]
    .into_iter()
    .collect()
}

#[test]
fn columns_are_named_in_order() {
    let table = sample();
    assert_eq!(table.columns(), &["X", "Y1", "Y2", "Y3", "Y4"]);
    assert_eq!(table.column("X"), Some(vec![100.0, 200.0]));
    assert_eq!(table.column("Y2"), Some(vec![1.2, 4.9]));
    assert_eq!(table.column("Y5"), None);
}

#[test]
fn series_pairs_x_with_timing_column() {
    let table = sample();
    let heap: Vec<(f64, f64)> = table.series(3).collect();
    assert_eq!(heap, vec![(100.0, 0.6), (200.0, 1.3)]);
}

#[test]
fn display_prints_header_and_rows() {
    let printed = sample().to_string();
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0].split_whitespace().collect::<Vec<_>>(),
        vec!["X", "Y1", "Y2", "Y3", "Y4"]
    );
    assert_eq!(
        lines[2].split_whitespace().collect::<Vec<_>>(),
        vec!["1", "200", "1.1", "4.9", "3", "1.3"]
    );
    // every line has the same width
    assert!(lines.iter().all(|l| l.len() == lines[0].len()));
}

#[test]
fn write_is_tab_separated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("time_sorts.txt");
    sample().write(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "100\t0.500\t1.200\t0.800\t0.600\n200\t1.100\t4.900\t3.000\t1.300\n"
    );
}
