use flame;
use std::fs;
use std::io;
use std::num::{ParseFloatError, ParseIntError};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::table::{Measurement, MeasurementTable, COLUMNS, SERIES_COUNT};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line}: {source}")]
    Float {
        line: usize,
        #[source]
        source: ParseFloatError,
    },
    #[error("line {line}: {source}")]
    Int {
        line: usize,
        #[source]
        source: ParseIntError,
    },
    #[error("{0}")]
    InvalidInput(String),
}

/// Reads a file as a string, turning a missing file into `ParseError::NotFound`.
pub(crate) fn read_input(path: &Path) -> Result<String, ParseError> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ParseError::NotFound(path.to_path_buf()),
        _ => ParseError::Io(err),
    })
}

/// Loads a measurements file: five whitespace separated numbers per line, no header.
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeasurementTable, ParseError> {
    let path = path.as_ref();
    flame::span_of("load", || -> Result<MeasurementTable, ParseError> {
        let input = read_input(path)?;
        let table = parse_str(&input)?;
        tracing::debug!(path = %path.display(), rows = table.len(), "loaded measurements");
        Ok(table)
    })
}

pub fn parse_str(input: &str) -> Result<MeasurementTable, ParseError> {
    let mut table = MeasurementTable::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let fields = line.split_whitespace().collect::<Vec<&str>>();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != COLUMNS.len() {
            return Err(ParseError::InvalidInput(format!(
                "line {}: expected {} columns, found {}",
                line_no,
                COLUMNS.len(),
                fields.len()
            )));
        }

        let mut values = [0f64; COLUMNS.len()];
        for (value, field) in values.iter_mut().zip(&fields) {
            *value = field.parse::<f64>().map_err(|source| ParseError::Float {
                line: line_no,
                source,
            })?;
        }

        let mut y = [0f64; SERIES_COUNT];
        y.copy_from_slice(&values[1..]);
        table.push(Measurement::new(values[0], y));
    }

    Ok(table)
}

#[test]
fn loads_rows_in_order() {
    let table = parse_str("100 0.5 1.2 0.8 0.6\n200 1.1 4.9 3.0 1.3\n").unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.columns(), &["X", "Y1", "Y2", "Y3", "Y4"]);
    assert_eq!(table.column("X"), Some(vec![100.0, 200.0]));
    assert_eq!(table.rows()[1].y, [1.1, 4.9, 3.0, 1.3]);
}

#[test]
fn accepts_tabs_and_repeated_spaces() {
    let table = parse_str("100\t0\t1\t2\t3\n\n  500    4  5\t\t6 7  \n").unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1], Measurement::new(500.0, [4.0, 5.0, 6.0, 7.0]));
}

#[test]
fn rejects_wrong_column_count() {
    match parse_str("100 1 2 3 4\n200 1 2 3\n") {
        Err(ParseError::InvalidInput(msg)) => assert!(msg.starts_with("line 2")),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn rejects_non_numeric_field() {
    match parse_str("100 1 2 three 4\n") {
        Err(ParseError::Float { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected Float error, got {:?}", other),
    }
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("time_sorts.txt");
    match load(&path) {
        Err(ParseError::NotFound(p)) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn loads_written_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("time_sorts.txt");
    fs::write(&path, "100\t0.5\t1.2\t0.8\t0.6\n200\t1.1\t4.9\t3.0\t1.3\n").unwrap();

    let table = load(&path).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.series(0).collect::<Vec<_>>(), vec![(100.0, 0.5), (200.0, 1.1)]);
}
