//! CSV persistence for price tables

use super::price_table::{PricePoint, PriceTable};
use crate::clock::Interval;
use crate::error::StorageError;
use csv::{Reader, Writer, WriterBuilder};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// File-backed store for price tables, one CSV per `(prefix, interval)`
#[derive(Debug, Clone)]
pub struct MarketStore {
    data_path: PathBuf,
}

impl MarketStore {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    /// Path of the CSV backing a given series
    pub fn path(&self, prefix: &str, interval: Interval) -> PathBuf {
        self.data_path
            .join(format!("{}_{}.csv", prefix, interval.minutes()))
    }

    pub fn exists(&self, prefix: &str, interval: Interval) -> bool {
        self.path(prefix, interval).is_file()
    }

    /// Load the full stored price table
    pub fn load(&self, prefix: &str, interval: Interval) -> Result<PriceTable, StorageError> {
        let path = self.path(prefix, interval);
        if !path.is_file() {
            return Err(StorageError::NotFound { path });
        }

        let mut reader = Reader::from_path(&path)?;
        let mut points = Vec::new();

        for result in reader.records() {
            let record = result?;
            if record.len() < 3 {
                return Err(StorageError::Malformed(format!(
                    "expected 3 fields, got {}",
                    record.len()
                )));
            }

            let time: i64 = record[1]
                .parse()
                .map_err(|_| StorageError::Malformed(format!("bad time '{}'", &record[1])))?;
            let close: f64 = record[2]
                .parse()
                .map_err(|_| StorageError::Malformed(format!("bad close '{}'", &record[2])))?;

            points.push(PricePoint {
                asset: record[0].to_string(),
                time,
                close,
            });
        }

        Ok(PriceTable::new(points))
    }

    /// Write a full price table, replacing anything stored before
    pub fn write_fresh(
        &self,
        prefix: &str,
        interval: Interval,
        table: &PriceTable,
    ) -> Result<(), StorageError> {
        let path = self.path(prefix, interval);
        ensure_parent(&path)?;

        let mut writer = Writer::from_path(&path)?;
        writer.write_record(["asset", "time", "close"])?;
        for point in table.points() {
            write_point(&mut writer, point)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Append observations to an existing file, without a header
    pub fn append(
        &self,
        prefix: &str,
        interval: Interval,
        points: &[PricePoint],
    ) -> Result<(), StorageError> {
        let path = self.path(prefix, interval);
        if !path.is_file() {
            return Err(StorageError::NotFound { path });
        }

        let file = OpenOptions::new().append(true).open(&path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        for point in points {
            write_point(&mut writer, point)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn write_point<W: std::io::Write>(
    writer: &mut Writer<W>,
    point: &PricePoint,
) -> Result<(), StorageError> {
    writer.write_record([
        point.asset.as_str(),
        &point.time.to_string(),
        &point.close.to_string(),
    ])?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
