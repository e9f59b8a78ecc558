use rand::Rng;
use std::cmp::Ordering;
use std::fmt;
use std::num::ParseIntError;
use std::path::Path;

use crate::parse::ParseError;

const COSTS: [i32; 5] = [50, 100, 150, 200, 500];

/// A lottery ticket, the record type the benchmark datasets consist of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotteryTicket {
    pub number: i64,
    pub cost: i32,
    /// Draw date, `YYYY-MM-DD`, so lexical order is chronological.
    pub date: String,
    pub win: i32,
}

impl LotteryTicket {
    pub fn new(number: i64, cost: i32, date: impl Into<String>, win: i32) -> Self {
        LotteryTicket {
            number,
            cost,
            date: date.into(),
            win,
        }
    }
}

// Date ascending, then win amount descending, then ticket number ascending.
impl Ord for LotteryTicket {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| other.win.cmp(&self.win))
            .then_with(|| self.number.cmp(&other.number))
    }
}

impl PartialOrd for LotteryTicket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LotteryTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.number, self.cost, self.date, self.win)
    }
}

/// Reads a dataset: `number,cost,date,win` per line, no header.
pub fn read_tickets<P: AsRef<Path>>(path: P) -> Result<Vec<LotteryTicket>, ParseError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ParseError::NotFound(path.to_path_buf()));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut tickets = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        if record.len() != 4 {
            return Err(ParseError::InvalidInput(format!(
                "line {}: expected 4 fields, found {}",
                line,
                record.len()
            )));
        }
        let int = |source: ParseIntError| ParseError::Int { line, source };
        tickets.push(LotteryTicket {
            number: record[0].parse::<i64>().map_err(int)?,
            cost: record[1].parse::<i32>().map_err(int)?,
            date: record[2].to_string(),
            win: record[3].parse::<i32>().map_err(int)?,
        });
    }

    Ok(tickets)
}

pub fn write_tickets<P: AsRef<Path>>(path: P, tickets: &[LotteryTicket]) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for ticket in tickets {
        wtr.write_record(&[
            ticket.number.to_string(),
            ticket.cost.to_string(),
            ticket.date.clone(),
            ticket.win.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Random tickets drawn over a few years, roughly one in five winning.
pub fn generate<R: Rng>(count: usize, rng: &mut R) -> Vec<LotteryTicket> {
    (0..count)
        .map(|_| {
            let date = format!(
                "{:04}-{:02}-{:02}",
                rng.gen_range(2020..=2024),
                rng.gen_range(1..=12),
                rng.gen_range(1..=28)
            );
            let win = if rng.gen_bool(0.2) {
                rng.gen_range(1..=1000) * 10
            } else {
                0
            };
            LotteryTicket {
                number: rng.gen_range(1_000_000_000..10_000_000_000),
                cost: COSTS[rng.gen_range(0..COSTS.len())],
                date,
                win,
            }
        })
        .collect()
}

#[test]
fn orders_by_date_then_win_desc_then_number() {
    let mut tickets = vec![
        LotteryTicket::new(3, 100, "2023-05-01", 0),
        LotteryTicket::new(2, 100, "2023-05-01", 500),
        LotteryTicket::new(1, 100, "2023-05-01", 0),
        LotteryTicket::new(9, 50, "2021-01-15", 10),
    ];
    tickets.sort();
    let numbers: Vec<i64> = tickets.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![9, 2, 1, 3]);
}

#[test]
fn csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lottery_3.txt");
    let tickets = vec![
        LotteryTicket::new(1234567890, 100, "2022-02-02", 0),
        LotteryTicket::new(9876543210, 500, "2020-12-31", 2500),
        LotteryTicket::new(5555555555, 50, "2024-07-19", 10),
    ];
    write_tickets(&path, &tickets).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap().lines().next(),
        Some("1234567890,100,2022-02-02,0")
    );
    assert_eq!(read_tickets(&path).unwrap(), tickets);
}

#[test]
fn reports_bad_number_with_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lottery_2.txt");
    std::fs::write(&path, "1,100,2022-02-02,0\n2,abc,2022-02-03,0\n").unwrap();
    match read_tickets(&path) {
        Err(ParseError::Int { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected Int error, got {:?}", other),
    }
}

#[test]
fn missing_dataset_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_tickets(dir.path().join("lottery_100.txt")),
        Err(ParseError::NotFound(_))
    ));
}

#[test]
fn generates_requested_count() {
    use rand::{rngs::StdRng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(7);
    let tickets = generate(250, &mut rng);
    assert_eq!(tickets.len(), 250);
    assert!(tickets.iter().all(|t| t.date.len() == 10 && t.number >= 1_000_000_000));
    assert!(tickets.iter().all(|t| COSTS.contains(&t.cost)));
}
