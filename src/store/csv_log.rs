//! A single append-only CSV file with a fixed header.

use crate::errors::AppResult;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
    header: StringRecord,
}

impl CsvLog {
    /// Open the log, writing `header` if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>, header: &[&str]) -> AppResult<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut wtr = WriterBuilder::new().from_path(&path)?;
            wtr.write_record(header)?;
            wtr.flush()?;
        }
        Ok(Self {
            path,
            header: StringRecord::from(header),
        })
    }

    /// Append one row of raw fields.
    pub fn append_fields<I, T>(&self, fields: I) -> AppResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.write_record(fields)?;
        wtr.flush()?;
        Ok(())
    }

    /// Append one serializable row; field order must match the header.
    pub fn append<T: Serialize>(&self, row: &T) -> AppResult<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.serialize(row)?;
        wtr.flush()?;
        Ok(())
    }

    /// Load every row. Rows that do not deserialize are skipped.
    ///
    /// A file created under an older, shorter header still receives rows in
    /// the current layout; those rows are read against the current header.
    pub fn read_all<T: DeserializeOwned>(&self) -> AppResult<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut rdr = ReaderBuilder::new().flexible(true).from_path(&self.path)?;
        let file_header = rdr.headers()?.clone();
        let upgraded = file_header.len() != self.header.len();

        let mut out = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let row = record.and_then(|rec| {
                let header = if upgraded && rec.len() == self.header.len() {
                    &self.header
                } else {
                    &file_header
                };
                rec.deserialize::<T>(Some(header))
            });
            match row {
                Ok(r) => out.push(r),
                Err(e) => tracing::warn!(
                    log = %self.path.display(),
                    row = idx + 2,
                    error = %e,
                    "skipping malformed row"
                ),
            }
        }
        Ok(out)
    }
}
