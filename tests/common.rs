#![cfg(feature = "std")]

use std::{fs, path::Path};

use csv::ReaderBuilder;
use packlog::{
    avec::{
        FromRecord,
        log::Sink,
        text::{decode_hex, parse_hex},
    },
    sans::word::{Address, I256, U256},
    schema::Dataset,
};

#[test]
fn decode_slice_swaps() {
    validate_slice("fixtures/swaps", Dataset::Swap);
}

#[test]
fn decode_slice_states() {
    validate_slice("fixtures/states", Dataset::State);
}

#[test]
fn decode_slice_deposits() {
    validate_slice("fixtures/deposits", Dataset::Deposit);
}

#[test]
fn decode_slice_withdraws() {
    validate_slice("fixtures/withdraws", Dataset::Withdraw);
}

#[test]
fn decode_slice_rebalances() {
    validate_slice("fixtures/rebalances", Dataset::Rebalance);
}

#[test]
fn log_swaps() {
    validate_log("fixtures/swaps", Dataset::Swap);
}

#[test]
fn log_states() {
    validate_log("fixtures/states", Dataset::State);
}

#[test]
fn log_deposits() {
    validate_log("fixtures/deposits", Dataset::Deposit);
}

#[test]
fn log_withdraws() {
    validate_log("fixtures/withdraws", Dataset::Withdraw);
}

#[test]
fn log_rebalances() {
    validate_log("fixtures/rebalances", Dataset::Rebalance);
}

#[test]
fn reprepare_discards_rows() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Sink::new(dir.path());

    for record in records("fixtures/swaps") {
        sink.append(Dataset::Swap, &record).unwrap();
    }
    sink.prepare(Dataset::Swap).unwrap();

    let (headers, rows) = read_csv(dir.path().join(Dataset::Swap.file_name()));
    assert_eq!(headers, Dataset::Swap.columns());
    assert!(rows.is_empty());
}

/// Decode each fixture record into a receiver checking values against the
/// expected rows.
fn validate_slice(path: &str, dataset: Dataset) {
    let (_, expected) = read_csv(Path::new(path).with_extension("csv"));
    let mut validator = Validator::default();

    for (record, row) in records(path).iter().zip(expected) {
        let data = parse_hex(record).unwrap();
        validator.expect(row);
        packlog::avec::decode_slice(&data, dataset.schema(), &mut validator).unwrap();
        assert!(validator.0.is_empty(), "unconsumed fields: {:?}", validator.0);
    }
}

/// Append each fixture record to a fresh log and compare the log with the
/// expected rows.
fn validate_log(path: &str, dataset: Dataset) {
    let dir = tempfile::tempdir().unwrap();
    let sink = Sink::new(dir.path());

    for record in records(path) {
        let values = sink.append(dataset, &record).unwrap();
        assert_eq!(values, decode_hex(&record, dataset.schema()).unwrap());
    }

    let (headers, rows) = read_csv(dir.path().join(dataset.file_name()));
    let (_, expected) = read_csv(Path::new(path).with_extension("csv"));

    assert_eq!(headers, dataset.columns());
    assert_eq!(rows, expected);
}

fn records(path: &str) -> Vec<String> {
    let data = fs::read_to_string(Path::new(path).with_extension("hex")).unwrap();
    data.lines().map(str::to_string).collect()
}

fn read_csv(path: impl AsRef<Path>) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = ReaderBuilder::new().from_path(path).unwrap();

    let headers = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
        .collect();

    (headers, rows)
}

#[derive(Default)]
struct Validator(Vec<String>, usize);

impl Validator {
    fn expect(&mut self, row: Vec<String>) {
        self.0 = row;
        self.1 = 0;
    }

    fn validate(&mut self, field: usize, value: impl ToString) {
        assert_eq!(field, self.1);
        self.1 += 1;
        assert_eq!(self.0.remove(0), value.to_string());
    }
}

impl FromRecord for Validator {
    fn add_u256(&mut self, field: usize, value: U256) {
        self.validate(field, value);
    }
    fn add_i256(&mut self, field: usize, value: I256) {
        self.validate(field, value);
    }
    fn add_u128(&mut self, field: usize, value: u128) {
        self.validate(field, value);
    }
    fn add_address(&mut self, field: usize, value: Address) {
        self.validate(field, value);
    }
    fn add_i32(&mut self, field: usize, value: i32) {
        self.validate(field, value);
    }
    fn add_bool(&mut self, field: usize, value: bool) {
        self.validate(field, value);
    }
}
