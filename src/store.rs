//! Ordered collection of records backed by one MOT annotation file.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::{Error, Record, Result};

/// An ordered sequence of [`Record`]s loaded from one MOT file.
///
/// Order is preserved from the input file; it matters only for output
/// determinism, not for reconciliation correctness. One store represents
/// either the original annotation file or one reviewer's edited copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from already-parsed records.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load a store from a MOT file, one record per line.
    ///
    /// Blank lines are ignored. Any unparseable line aborts the load with
    /// [`Error::MalformedRecord`]; a missing file fails with
    /// [`Error::MissingInput`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(Record::parse_line(&line, path, index + 1)?);
        }

        Ok(Self { records })
    }

    /// The records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Mutable view of the records, for in-place edits such as renaming.
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Append a record, preserving insertion order.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Drop every record for which `keep` returns false.
    pub fn retain<F: FnMut(&Record) -> bool>(&mut self, keep: F) {
        self.records.retain(keep);
    }

    /// Sort records ascending by (frame, object id).
    pub fn sort_by_frame_and_id(&mut self) {
        self.records
            .sort_by_key(|r| (r.frame, r.object_id));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render the store as one line per record, in store order, without
    /// trailing newlines.
    pub fn serialize(&self) -> Vec<String> {
        self.records.iter().map(Record::to_line).collect()
    }

    /// Write the store to `path` in the MOT format, one record per line.
    ///
    /// The destination directory is created if absent. The write is a direct
    /// overwrite; the tool is batch and re-runnable, so no atomic-rename
    /// protocol is used.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        for record in &self.records {
            writeln!(writer, "{}", record.to_line())?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
