// Record stores kept as CSV files.

use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator};
use election_core::store::{RawRecord, RecordStore, StoreError, StoreKind};
use log::debug;
use snafu::ResultExt;

use crate::election::*;

/// A record store that keeps one CSV file per kind in a directory.
///
/// Fields are written and read without any quoting: a line is exactly
/// `key,value`.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl AsRef<Path>) -> CsvStore {
        CsvStore {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, kind: StoreKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    fn read_records(&self, kind: StoreKind) -> ElectionResult<Vec<RawRecord>> {
        let path = self.path(kind);
        let display = path.display().to_string();
        let file = match File::open(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("read_records: {} does not exist", display);
                return Ok(Vec::new());
            }
            r => r.context(OpenStoreSnafu {
                path: display.clone(),
            })?,
        };
        let rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(file);

        let mut res: Vec<RawRecord> = Vec::new();
        for (idx, line_r) in rdr.into_byte_records().enumerate() {
            let line = line_r.context(ReadRecordSnafu {
                path: display.clone(),
            })?;
            if line.len() < 2 {
                debug!("read_records: {}:{} has no delimiter", display, idx + 1);
                continue;
            }
            let fields: Vec<Cow<str>> = line.iter().map(String::from_utf8_lossy).collect();
            res.push(RawRecord::new(fields[0].as_ref(), fields[1..].join(",")));
        }
        debug!("read_records: {} records in {}", res.len(), display);
        Ok(res)
    }

    fn append_record(&self, kind: StoreKind, record: &RawRecord) -> ElectionResult<()> {
        let path = self.path(kind);
        let display = path.display().to_string();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context(OpenStoreSnafu {
                path: display.clone(),
            })?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);
        wtr.write_record([&record.key, &record.value])
            .context(WriteRecordSnafu {
                path: display.clone(),
            })?;
        wtr.flush().context(FlushStoreSnafu { path: display })?;
        Ok(())
    }

    fn remove(&self, kind: StoreKind) -> ElectionResult<()> {
        let path = self.path(kind);
        match fs::remove_file(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            r => r.context(RemoveStoreSnafu {
                path: path.display().to_string(),
            }),
        }
    }
}

fn to_store_error(kind: StoreKind) -> impl Fn(ElectionError) -> StoreError {
    move |e| StoreError::new(kind, e.to_string())
}

impl RecordStore for CsvStore {
    fn read_all(&self, kind: StoreKind) -> Result<Vec<RawRecord>, StoreError> {
        self.read_records(kind).map_err(to_store_error(kind))
    }

    fn append(&mut self, kind: StoreKind, record: &RawRecord) -> Result<(), StoreError> {
        self.append_record(kind, record).map_err(to_store_error(kind))
    }

    fn clear(&mut self, kind: StoreKind) -> Result<(), StoreError> {
        self.remove(kind).map_err(to_store_error(kind))
    }
}
