//! CSV persistence for signal series

use super::series::{SignalRow, SignalSeries};
use crate::clock::Interval;
use crate::error::StorageError;
use csv::{Reader, Writer, WriterBuilder};
use std::fs::OpenOptions;
use std::path::PathBuf;

/// File-backed, append-only store for signal series.
///
/// One CSV per `(prefix, interval)`, rows `time,signal`. An undefined signal
/// is stored as an empty field and loads back as `None`; it is never coerced
/// to 0.
#[derive(Debug, Clone)]
pub struct SignalStore {
    data_path: PathBuf,
}

impl SignalStore {
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

    /// Load the full stored series
    pub fn load(&self, prefix: &str, interval: Interval) -> Result<SignalSeries, StorageError> {
        let path = self.path(prefix, interval);
        if !path.is_file() {
            return Err(StorageError::NotFound { path });
        }

        let mut reader = Reader::from_path(&path)?;
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;
            if record.len() < 2 {
                return Err(StorageError::Malformed(format!(
                    "expected 2 fields, got {}",
                    record.len()
                )));
            }

            let time: i64 = record[0]
                .parse()
                .map_err(|_| StorageError::Malformed(format!("bad time '{}'", &record[0])))?;
            let signal = match record[1].trim() {
                "" => None,
                raw => Some(raw.parse::<u32>().map_err(|_| {
                    StorageError::Malformed(format!("bad signal '{raw}'"))
                })?),
            };

            rows.push(SignalRow { time, signal });
        }

        Ok(SignalSeries { rows })
    }

    /// Write a complete series, replacing anything stored before
    pub fn write_fresh(
        &self,
        prefix: &str,
        interval: Interval,
        rows: &[SignalRow],
    ) -> Result<(), StorageError> {
        let path = self.path(prefix, interval);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = Writer::from_path(&path)?;
        writer.write_record(["time", "signal"])?;
        for row in rows {
            write_row(&mut writer, row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Append rows to an existing series, without rewriting prior rows
    pub fn append_rows(
        &self,
        prefix: &str,
        interval: Interval,
        rows: &[SignalRow],
    ) -> Result<(), StorageError> {
        let path = self.path(prefix, interval);
        if !path.is_file() {
            return Err(StorageError::NotFound { path });
        }

        let file = OpenOptions::new().append(true).open(&path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        for row in rows {
            write_row(&mut writer, row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn write_row<W: std::io::Write>(
    writer: &mut Writer<W>,
    row: &SignalRow,
) -> Result<(), StorageError> {
    let signal = row.signal.map(|s| s.to_string()).unwrap_or_default();
    writer.write_record([row.time.to_string(), signal])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rows() -> Vec<SignalRow> {
        vec![
            SignalRow {
                time: 3600,
                signal: None,
            },
            SignalRow {
                time: 7200,
                signal: Some(3),
            },
        ]
    }

    #[test]
    fn test_round_trip_preserves_undefined_signals() {
        let dir = tempdir().unwrap();
        let store = SignalStore::new(dir.path());

        store.write_fresh("digital", Interval::Hour, &rows()).unwrap();
        let series = store.load("digital", Interval::Hour).unwrap();

        assert_eq!(series.rows.len(), 2);
        assert_eq!(series.rows[0].signal, None);
        assert_eq!(series.rows[1].signal, Some(3));
        assert_eq!(series.last_time(), Some(7200));
    }

    #[test]
    fn test_append_rows() {
        let dir = tempdir().unwrap();
        let store = SignalStore::new(dir.path());

        store.write_fresh("digital", Interval::Hour, &rows()).unwrap();
        store
            .append_rows(
                "digital",
                Interval::Hour,
                &[SignalRow {
                    time: 10800,
                    signal: Some(1),
                }],
            )
            .unwrap();

        let series = store.load("digital", Interval::Hour).unwrap();
        assert_eq!(series.rows.len(), 3);
        assert_eq!(series.rows[2].time, 10800);
    }

    #[test]
    fn test_append_to_missing_series_fails() {
        let dir = tempdir().unwrap();
        let store = SignalStore::new(dir.path());

        match store.append_rows("digital", Interval::Hour, &rows()) {
            Err(StorageError::NotFound { .. }) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
