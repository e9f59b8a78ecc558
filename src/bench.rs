use glob::glob;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    io,
    path::{Path, PathBuf},
    sync::mpsc::channel,
    time::{Duration, Instant},
};
use thiserror::Error;
use threadpool::ThreadPool;

use crate::{
    parse::ParseError,
    sorts::Algorithm,
    table::{Measurement, MeasurementTable, SERIES_COUNT},
    ticket::{self, LotteryTicket},
};

/// Dataset sizes measured when none are given and none are found on disk.
pub const DEFAULT_SIZES: [usize; 16] = [
    100, 500, 1000, 2500, 5000, 7500, 10000, 12500, 15000, 20000, 30000, 40000, 50000, 60000,
    80000, 100000,
];

#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
    #[error("dataset generation for {0} did not finish")]
    Generation(PathBuf),
}

/// A `lottery_<size>.txt` file in the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub size: usize,
    pub path: PathBuf,
}

impl Dataset {
    pub fn new<P: AsRef<Path>>(dir: P, size: usize) -> Self {
        Dataset {
            size,
            path: dir.as_ref().join(format!("lottery_{}.txt", size)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchOptions {
    /// Directory for `sorted_<algorithm>_<size>.csv`; nothing is written when `None`.
    pub sorted_dir: Option<PathBuf>,
}

/// Finds `lottery_<n>.txt` files in `dir`, ordered by size.
pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Vec<Dataset>, BenchError> {
    let pattern = dir.as_ref().join("lottery_*.txt");
    let mut datasets = Vec::new();
    for entry in glob(&pattern.to_string_lossy())? {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        let size = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_prefix("lottery_"))
            .and_then(|s| s.parse::<usize>().ok());
        match size {
            Some(size) => datasets.push(Dataset { size, path }),
            None => tracing::debug!(path = %path.display(), "not a dataset"),
        }
    }
    datasets.sort_by_key(|d| d.size);
    Ok(datasets)
}

/// Writes every missing dataset with random tickets. Files are generated in parallel,
/// each from its own seed derived from `seed` and the dataset size.
pub fn generate_missing(datasets: &[Dataset], seed: u64) -> Result<usize, BenchError> {
    let missing: Vec<Dataset> = datasets
        .iter()
        .filter(|d| !d.path.exists())
        .cloned()
        .collect();
    if missing.is_empty() {
        return Ok(0);
    }

    let pool = ThreadPool::new(missing.len().min(num_workers()));
    let (tx, rx) = channel();
    for dataset in &missing {
        let tx = tx.clone();
        let dataset = dataset.clone();
        pool.execute(move || {
            let mut rng = StdRng::seed_from_u64(seed ^ dataset.size as u64);
            let tickets = ticket::generate(dataset.size, &mut rng);
            let result = ticket::write_tickets(&dataset.path, &tickets);
            let _ = tx.send((dataset, result));
        });
    }
    drop(tx);

    let mut done = Vec::with_capacity(missing.len());
    for (dataset, result) in rx.iter() {
        result?;
        tracing::info!(path = %dataset.path.display(), size = dataset.size, "generated dataset");
        done.push(dataset.path);
    }
    // a worker that panicked never reports back
    if let Some(lost) = missing.iter().find(|d| !done.contains(&d.path)) {
        return Err(BenchError::Generation(lost.path.clone()));
    }
    Ok(done.len())
}

fn num_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// Sorts a copy of `data` and reports how long the sort alone took.
pub fn measure<T: Ord + Clone>(algorithm: Algorithm, data: &[T]) -> (Vec<T>, Duration) {
    let mut copy = data.to_vec();
    let start = Instant::now();
    algorithm.sort(&mut copy);
    let elapsed = start.elapsed();
    (copy, elapsed)
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Times all four algorithms on each dataset, one row per dataset.
pub fn run(datasets: &[Dataset], options: &BenchOptions) -> Result<MeasurementTable, BenchError> {
    let mut table = MeasurementTable::with_capacity(datasets.len());

    for (index, dataset) in datasets.iter().enumerate() {
        println!("Progress: {}/{}", index + 1, datasets.len());
        let tickets = ticket::read_tickets(&dataset.path)?;
        let row = flame::span_of(format!("dataset {}", dataset.size), || {
            run_dataset(dataset.size, &tickets, options)
        })?;
        table.push(row);
    }

    Ok(table)
}

fn run_dataset(
    size: usize,
    tickets: &[LotteryTicket],
    options: &BenchOptions,
) -> Result<Measurement, BenchError> {
    if tickets.len() != size {
        tracing::warn!(expected = size, found = tickets.len(), "dataset size mismatch");
    }

    let mut times = [0f64; SERIES_COUNT];
    for (slot, algorithm) in times.iter_mut().zip(Algorithm::ALL) {
        let (sorted, elapsed) = measure(algorithm, tickets);
        *slot = millis(elapsed);
        println!(
            "Algorithm: {}, Size: {}, Time: {:.3} ms",
            algorithm.label(),
            size,
            *slot
        );

        if let Some(dir) = &options.sorted_dir {
            let path = dir.join(format!("sorted_{}_{}.csv", algorithm.name(), sorted.len()));
            ticket::write_tickets(&path, &sorted)?;
        }
    }

    Ok(Measurement::new(size as f64, times))
}

#[cfg(test)]
fn fixture(dir: &Path, sizes: &[usize]) -> Vec<Dataset> {
    let datasets: Vec<Dataset> = sizes.iter().map(|&s| Dataset::new(dir, s)).collect();
    generate_missing(&datasets, 42).unwrap();
    datasets
}

#[test]
fn measure_returns_sorted_copy() {
    let data = vec![4, 1, 3, 2];
    for algorithm in Algorithm::ALL {
        let (sorted, _) = measure(algorithm, &data);
        assert_eq!(sorted, vec![1, 2, 3, 4]);
    }
    assert_eq!(data, vec![4, 1, 3, 2]);
}

#[test]
fn discovers_datasets_by_size() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), &[500, 20, 100]);
    std::fs::write(dir.path().join("lottery_notes.txt"), "").unwrap();

    let found = discover(dir.path()).unwrap();
    let sizes: Vec<usize> = found.iter().map(|d| d.size).collect();
    assert_eq!(sizes, vec![20, 100, 500]);
}

#[test]
fn generation_skips_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let datasets = fixture(dir.path(), &[10, 30]);
    assert_eq!(ticket::read_tickets(&datasets[1].path).unwrap().len(), 30);
    assert_eq!(generate_missing(&datasets, 42).unwrap(), 0);
}

#[test]
fn one_row_per_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let datasets = fixture(dir.path(), &[10, 50]);
    let options = BenchOptions {
        sorted_dir: Some(dir.path().to_path_buf()),
    };

    let table = run(&datasets, &options).unwrap();
    assert_eq!(table.column("X"), Some(vec![10.0, 50.0]));
    assert!(table.rows().iter().all(|r| r.y.iter().all(|t| *t >= 0.0)));

    let mut expected = ticket::read_tickets(&datasets[1].path).unwrap();
    expected.sort();
    for algorithm in Algorithm::ALL {
        let path = dir.path().join(format!("sorted_{}_50.csv", algorithm.name()));
        assert_eq!(ticket::read_tickets(&path).unwrap(), expected);
    }
}
