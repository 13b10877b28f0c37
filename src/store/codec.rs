//! CSV record codec shared by the flat-file store, the SQLite archive
//! export, and the day archives.
//!
//! Column order and names are the wire contract:
//! `id, datetime, customer_type, large_qty, medium_qty, small_qty,
//! total_price, total_gas`.

use crate::domain::{BottleCounts, CustomerTier, Kilograms, Money, SaleId, Transaction};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{location}: {reason}")]
    Invalid { location: String, reason: String },
}

/// Wire column names, in order.
const HEADER: [&str; 8] = [
    "id",
    "datetime",
    "customer_type",
    "large_qty",
    "medium_qty",
    "small_qty",
    "total_price",
    "total_gas",
];

/// One persisted row, exactly the wire columns.
#[derive(Debug, Serialize, Deserialize)]
struct Row {
    id: String,
    datetime: String,
    customer_type: i64,
    large_qty: u32,
    medium_qty: u32,
    small_qty: u32,
    total_price: String,
    total_gas: String,
}

fn encode(tx: &Transaction) -> Row {
    Row {
        id: tx.id.as_str().to_string(),
        datetime: tx.datetime_str(),
        customer_type: tx.customer_tier.as_i64(),
        large_qty: tx.counts.large,
        medium_qty: tx.counts.medium,
        small_qty: tx.counts.small,
        total_price: tx.total_price.to_canonical_string(),
        total_gas: tx.total_gas.to_canonical_string(),
    }
}

fn decode(row: Row) -> Result<Transaction, String> {
    let timestamp = Transaction::parse_datetime(&row.datetime)
        .map_err(|e| format!("invalid datetime {:?}: {}", row.datetime, e))?;
    let tier = CustomerTier::try_from(row.customer_type).map_err(|e| e.to_string())?;
    let total_price = Money::from_str_canonical(&row.total_price)
        .map_err(|e| format!("invalid total_price {:?}: {}", row.total_price, e))?;
    let total_gas = Kilograms::from_str_canonical(&row.total_gas)
        .map_err(|e| format!("invalid total_gas {:?}: {}", row.total_gas, e))?;

    Ok(Transaction::new(
        SaleId::new(row.id),
        timestamp,
        tier,
        BottleCounts::new(row.large_qty, row.medium_qty, row.small_qty),
        total_price,
        total_gas,
    ))
}

/// Write a header and all records to `writer`.
pub fn write_records<W: Write>(writer: W, records: &[Transaction]) -> Result<(), CodecError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    // Written explicitly so an empty store still carries its header.
    csv_writer.write_record(HEADER)?;
    for tx in records {
        csv_writer.serialize(encode(tx))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read records leniently: a record that cannot be decoded is skipped
/// with a warning so one bad row cannot take down reporting. I/O-level
/// failures still error.
pub fn read_records<R: Read>(reader: R, location: &str) -> Result<Vec<Transaction>, CodecError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in csv_reader.deserialize::<Row>().enumerate() {
        let record_no = index + 1;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(e.into());
                }
                warn!(location, record = record_no, error = %e, "skipping unreadable record");
                continue;
            }
        };
        match decode(row) {
            Ok(tx) => records.push(tx),
            Err(reason) => {
                warn!(location, record = record_no, reason, "skipping corrupt record");
            }
        }
    }
    Ok(records)
}

/// Read records strictly: the first undecodable record fails the whole
/// read. Used before rewrites, where skipping a record would drop it.
pub fn read_records_strict<R: Read>(
    reader: R,
    location: &str,
) -> Result<Vec<Transaction>, CodecError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in csv_reader.deserialize::<Row>().enumerate() {
        let record_no = index + 1;
        let row = result?;
        let tx = decode(row).map_err(|reason| CodecError::Invalid {
            location: format!("{} record {}", location, record_no),
            reason,
        })?;
        records.push(tx);
    }
    Ok(records)
}

/// Read a record file leniently; a missing file reads as empty.
pub fn read_file(path: &Path) -> Result<Vec<Transaction>, CodecError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path)?;
    read_records(file, &path.display().to_string())
}

/// Read a record file strictly; a missing file reads as empty.
pub fn read_file_strict(path: &Path) -> Result<Vec<Transaction>, CodecError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path)?;
    read_records_strict(file, &path.display().to_string())
}

/// Replace the file at `path` with `records`, going through a sibling
/// temp file and a rename so a crash mid-write cannot leave a torn file.
pub fn write_file_atomic(path: &Path, records: &[Transaction]) -> Result<(), CodecError> {
    let tmp_path = path.with_extension("csv.tmp");
    let file = std::fs::File::create(&tmp_path)?;
    write_records(file, records)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Append one record to the file at `path`, writing the header first if
/// the file is new or empty.
pub fn append_record(path: &Path, tx: &Transaction) -> Result<(), CodecError> {
    let needs_header = match std::fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        csv_writer.write_record(HEADER)?;
    }
    csv_writer.serialize(encode(tx))?;
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(id: &str) -> Transaction {
        Transaction::new(
            SaleId::new(id.to_string()),
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, 15, 30)
                .unwrap(),
            CustomerTier::Wholesale,
            BottleCounts::new(2, 1, 0),
            Money::from_str_canonical("7765").unwrap(),
            Kilograms::from_str_canonical("30").unwrap(),
        )
    }

    #[test]
    fn test_header_and_row_wire_format() {
        let mut out = Vec::new();
        write_records(&mut out, &[sample("tx-1")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,datetime,customer_type,large_qty,medium_qty,small_qty,total_price,total_gas"
        );
        assert_eq!(lines.next().unwrap(), "tx-1,2024-01-02 09:15:30,1,2,1,0,7765,30");
    }

    #[test]
    fn test_empty_write_still_carries_header() {
        let mut out = Vec::new();
        write_records(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.trim_end(),
            "id,datetime,customer_type,large_qty,medium_qty,small_qty,total_price,total_gas"
        );
        assert!(read_records(text.as_bytes(), "test").unwrap().is_empty());
    }

    #[test]
    fn test_write_read_roundtrip() {
        let records = vec![sample("tx-1"), sample("tx-2")];
        let mut out = Vec::new();
        write_records(&mut out, &records).unwrap();
        let back = read_records(out.as_slice(), "test").unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_lenient_read_skips_corrupt_record() {
        let csv = "id,datetime,customer_type,large_qty,medium_qty,small_qty,total_price,total_gas\n\
                   tx-1,2024-01-02 09:15:30,1,2,1,0,7765,30\n\
                   tx-2,2024-01-02 10:00:00,9,1,0,0,3330,12\n\
                   tx-3,2024-01-02 11:00:00,0,1,0,0,3330,12\n";
        let records = read_records(csv.as_bytes(), "test").unwrap();
        let ids: Vec<&str> = records.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tx-1", "tx-3"]);
    }

    #[test]
    fn test_strict_read_fails_on_corrupt_record() {
        let csv = "id,datetime,customer_type,large_qty,medium_qty,small_qty,total_price,total_gas\n\
                   tx-1,not a datetime,1,2,1,0,7765,30\n";
        let err = read_records_strict(csv.as_bytes(), "test").unwrap_err();
        assert!(matches!(err, CodecError::Invalid { .. }));
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_negative_quantity_is_corrupt() {
        let csv = "id,datetime,customer_type,large_qty,medium_qty,small_qty,total_price,total_gas\n\
                   tx-1,2024-01-02 09:15:30,1,-2,1,0,7765,30\n";
        let records = read_records(csv.as_bytes(), "test").unwrap();
        assert!(records.is_empty());
        assert!(read_records_strict(csv.as_bytes(), "test").is_err());
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        append_record(&path, &sample("tx-1")).unwrap();
        append_record(&path, &sample("tx-2")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("id,datetime").count(), 1);
        let records = read_file(&path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_atomic_write_replaces_contents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        write_file_atomic(&path, &[sample("tx-1"), sample("tx-2")]).unwrap();
        write_file_atomic(&path, &[sample("tx-3")]).unwrap();

        let records = read_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "tx-3");
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(read_file(&path).unwrap().is_empty());
        assert!(read_file_strict(&path).unwrap().is_empty());
    }
}
