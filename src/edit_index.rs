//! Index of edited records grouped by identity key across all edit sources.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, IdentityKey, RecordStore, Result};

/// Maps each identity key to every object id assigned to it across all edit
/// sources combined.
///
/// Duplicates are kept: if three reviewers relabel the same detection to the
/// same id, that id appears three times, which is what gives the vote its
/// weight. Within one source, append order follows that source's record
/// order; this is what breaks frequency ties during reconciliation.
///
/// Built once per run and read-only afterwards.
#[derive(Debug, Default)]
pub struct EditIndex {
    ids_by_key: HashMap<IdentityKey, Vec<i32>>,
}

impl EditIndex {
    /// Build the index from every record of every edit source.
    pub fn build(sources: &[RecordStore]) -> Self {
        let mut ids_by_key: HashMap<IdentityKey, Vec<i32>> = HashMap::new();
        for source in sources {
            for record in source.records() {
                ids_by_key
                    .entry(record.identity_key())
                    .or_default()
                    .push(record.object_id);
            }
        }
        Self { ids_by_key }
    }

    /// Candidate ids recorded for `key`, possibly empty.
    pub fn get(&self, key: &IdentityKey) -> &[i32] {
        self.ids_by_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct identity keys touched by any edit source.
    pub fn len(&self) -> usize {
        self.ids_by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids_by_key.is_empty()
    }
}

/// Find edit-source files in `dir` whose file name contains `base_name`.
///
/// This is how a run selects the edited copies belonging to one original
/// file when several originals share an edit folder. Results are sorted by
/// file name so repeated runs see the sources in the same order.
pub fn find_edit_sources(dir: &Path, base_name: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::MissingInput(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.contains(base_name) {
                paths.push(path);
            }
        }
    }
    paths.sort();
    Ok(paths)
}
