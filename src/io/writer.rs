//! Output table writers.
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::error::Error;

/// CSV writer for one output table.
///
/// Headers come from the record type's serde field names, so every table is
/// written through the same code path.
pub struct TableWriter<T: Serialize> {
    writer: csv::Writer<File>,
    rows: usize,
    _marker: PhantomData<T>,
}

impl<T: Serialize> TableWriter<T> {
    pub fn create(path: &Path) -> Result<Self, Error> {
        debug!("creating table {:?}", path);
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
            rows: 0,
            _marker: PhantomData,
        })
    }

    pub fn write(&mut self, record: &T) -> Result<(), Error> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, records: I) -> Result<(), Error>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Number of rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<usize, Error> {
        self.writer.flush()?;
        Ok(self.rows)
    }
}
