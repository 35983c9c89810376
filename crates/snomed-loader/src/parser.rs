//! Generic RF2 file parser.
//!
//! Streams records out of tab-delimited RF2 files. RF2 has no quoting or
//! escaping, so terms containing `"` are read verbatim.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;
use std::time::Instant;

use csv::{Reader, ReaderBuilder, StringRecord};
use snomed_types::SctId;

use crate::types::{ParseStats, Rf2Config, Rf2Error, Rf2Result};

/// Types that can be parsed from an RF2 row.
pub trait Rf2Record: Sized {
    /// Header columns, in order.
    const EXPECTED_COLUMNS: &'static [&'static str];

    /// Builds a record from one row.
    fn from_record(record: &StringRecord) -> Rf2Result<Self>;

    /// Returns true if this record passes the base filter.
    fn passes_filter(&self, config: &Rf2Config) -> bool;
}

/// A streaming parser over one RF2 file.
///
/// Malformed rows surface as `Err` items; they are never skipped silently.
pub struct Rf2Parser<R: Read, T: Rf2Record> {
    reader: Reader<R>,
    config: Rf2Config,
    stats: ParseStats,
    _marker: PhantomData<T>,
}

impl<T: Rf2Record> Rf2Parser<BufReader<File>, T> {
    /// Opens `path` and validates its header.
    ///
    /// # Errors
    /// Returns an error if the file is missing, unreadable or has the wrong
    /// header.
    pub fn from_path<P: AsRef<Path>>(path: P, config: Rf2Config) -> Rf2Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Rf2Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }

    /// Counts data rows in a file, header excluded.
    pub fn count_lines<P: AsRef<Path>>(path: P) -> Rf2Result<usize> {
        let file = File::open(path.as_ref())?;
        let count = BufReader::new(file).lines().count();
        Ok(count.saturating_sub(1))
    }
}

impl<R: Read, T: Rf2Record> Rf2Parser<R, T> {
    /// Wraps a reader and validates its header.
    pub fn from_reader(reader: R, config: Rf2Config) -> Rf2Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(false)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self::validate_headers(&mut csv_reader)?;

        Ok(Self {
            reader: csv_reader,
            config,
            stats: ParseStats::default(),
            _marker: PhantomData,
        })
    }

    fn validate_headers(reader: &mut Reader<R>) -> Rf2Result<()> {
        let headers = reader.headers()?;
        let expected = T::EXPECTED_COLUMNS;

        if headers.len() < expected.len() {
            return Err(Rf2Error::InvalidHeader {
                expected: expected.len(),
                found: headers.len(),
            });
        }

        for (i, expected_col) in expected.iter().enumerate() {
            let found = headers.get(i).unwrap_or("");
            // UTF-8 BOM
            let found = found.trim_start_matches('\u{feff}');
            if found != *expected_col {
                return Err(Rf2Error::UnexpectedColumn {
                    position: i,
                    expected: expected_col.to_string(),
                    found: found.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Counters for the rows read so far.
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// The parser configuration.
    pub fn config(&self) -> &Rf2Config {
        &self.config
    }

    /// Reads every remaining row, stopping at the first malformed one.
    pub fn parse_all(self) -> Rf2Result<Vec<T>> {
        self.parse_all_with_stats().map(|(records, _)| records)
    }

    /// Like [`parse_all`](Self::parse_all), also returning the file's counters.
    pub fn parse_all_with_stats(mut self) -> Rf2Result<(Vec<T>, ParseStats)> {
        let started = Instant::now();
        let mut results = Vec::new();
        for record in self.by_ref() {
            results.push(record?);
        }
        self.stats.parse_time_ms = started.elapsed().as_millis() as u64;
        Ok((results, self.stats))
    }

    /// Reads rows in batches of `config.batch_size`, handing each batch to
    /// `callback`. Returns the number of rows delivered.
    pub fn parse_batched<F>(mut self, mut callback: F) -> Rf2Result<usize>
    where
        F: FnMut(Vec<T>) -> Rf2Result<()>,
    {
        let batch_size = self.config.batch_size.max(1);
        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0;

        for record in self.by_ref() {
            batch.push(record?);
            if batch.len() >= batch_size {
                total += batch.len();
                callback(std::mem::replace(&mut batch, Vec::with_capacity(batch_size)))?;
            }
        }

        if !batch.is_empty() {
            total += batch.len();
            callback(batch)?;
        }

        Ok(total)
    }
}

impl<R: Read, T: Rf2Record> Iterator for Rf2Parser<R, T> {
    type Item = Rf2Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        loop {
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    if record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }
                    self.stats.total_records += 1;

                    match T::from_record(&record) {
                        Ok(parsed) if parsed.passes_filter(&self.config) => {
                            self.stats.filtered_records += 1;
                            return Some(Ok(parsed));
                        }
                        Ok(_) => {
                            self.stats.skipped_records += 1;
                        }
                        Err(e) => return Some(Err(e)),
                    }
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Field-level parsing helpers.
pub mod parse {
    use csv::StringRecord;

    use super::{Rf2Error, Rf2Result, SctId};

    /// Returns column `index`, failing with [`Rf2Error::MissingField`] when
    /// it is absent or empty.
    pub fn field<'r>(
        record: &'r StringRecord,
        index: usize,
        column: &'static str,
    ) -> Rf2Result<&'r str> {
        match record.get(index) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Rf2Error::MissingField {
                column,
                line: record.position().map(|p| p.line()).unwrap_or(0),
            }),
        }
    }

    /// Parses an SCTID.
    pub fn sctid(value: &str) -> Rf2Result<SctId> {
        value.parse::<u64>().map_err(|_| Rf2Error::InvalidSctId {
            value: value.to_string(),
        })
    }

    /// Parses `0` or `1`.
    pub fn boolean(value: &str) -> Rf2Result<bool> {
        match value {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(Rf2Error::InvalidBoolean {
                value: value.to_string(),
            }),
        }
    }

    /// Parses a YYYYMMDD effective time.
    pub fn effective_time(value: &str) -> Rf2Result<u32> {
        if value.len() != 8 {
            return Err(Rf2Error::InvalidDate {
                value: value.to_string(),
            });
        }
        value.parse::<u32>().map_err(|_| Rf2Error::InvalidDate {
            value: value.to_string(),
        })
    }

    /// Parses an integer.
    pub fn integer<T: std::str::FromStr>(value: &str) -> Rf2Result<T> {
        value.parse::<T>().map_err(|_| Rf2Error::InvalidInteger {
            value: value.to_string(),
        })
    }
}
