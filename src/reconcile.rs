//! Majority-vote reconciliation of edited annotation copies.

use std::path::Path;

use crate::edit_index::{find_edit_sources, EditIndex};
use crate::{Error, RecordStore, Result};

/// Upper bound of the id range the upstream labeling convention reserves for
/// "mark for deletion" sentinels.
pub const DEFAULT_DELETION_ID_THRESHOLD: i32 = 14;

/// Configuration for the reconciler.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// In a two-way split, the record is deleted when the dominant candidate
    /// id is at or below this value; the dominant vote is then read as a
    /// deletion marker rather than a relabel target.
    pub deletion_id_threshold: i32,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            deletion_id_threshold: DEFAULT_DELETION_ID_THRESHOLD,
        }
    }
}

/// Outcome of the vote for a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No edit source disagrees; keep the record as is.
    Keep,
    /// Replace the object id with the given target; other fields unchanged.
    Relabel(i32),
    /// Drop the record from the output.
    Delete,
}

/// Applies the voting policy record by record.
///
/// Inputs are never mutated; reconciliation produces a fresh store.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    /// Decide what happens to a record given the candidate ids collected for
    /// its identity key.
    ///
    /// With one distinct candidate the edit is unanimous: the record keeps
    /// its id, or takes the candidate id if it differs. With exactly two the
    /// dominant id decides: at or below the deletion threshold it is a
    /// removal marker and the record is deleted, otherwise the rarer id wins
    /// as the deliberate correction. Three or more distinct candidates are
    /// irreconcilable and the record is deleted.
    pub fn decide(&self, original_id: i32, candidate_ids: &[i32]) -> Decision {
        if candidate_ids.is_empty() {
            return Decision::Keep;
        }

        let counts = count_votes(candidate_ids);
        match counts.len() {
            1 => {
                let unanimous = counts[0].0;
                if unanimous == original_id {
                    Decision::Keep
                } else {
                    Decision::Relabel(unanimous)
                }
            }
            2 => {
                if counts[0].0 <= self.config.deletion_id_threshold {
                    Decision::Delete
                } else {
                    Decision::Relabel(counts[1].0)
                }
            }
            _ => Decision::Delete,
        }
    }

    /// Walk the original store and apply [`Reconciler::decide`] per record.
    pub fn reconcile(&self, original: &RecordStore, edits: &EditIndex) -> RecordStore {
        let mut output = RecordStore::new();
        for record in original.records() {
            match self.decide(record.object_id, edits.get(&record.identity_key())) {
                Decision::Keep => output.push(record.clone()),
                Decision::Relabel(id) => output.push(record.with_object_id(id)),
                Decision::Delete => {}
            }
        }
        output
    }
}

/// Counters reported by a full [`run`].
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub edit_sources: usize,
    pub input_records: usize,
    pub output_records: usize,
}

/// End-to-end reconciliation of one original file.
///
/// Loads `original_path`, loads every file in `edits_dir` whose name contains
/// the original's base name, builds the edit index, reconciles, and writes
/// the result to `output_path`.
///
/// All inputs are parsed before anything is written, so a malformed line in
/// any file aborts the run without leaving partial output behind.
pub fn run(
    original_path: &Path,
    edits_dir: &Path,
    output_path: &Path,
    config: ReconcilerConfig,
) -> Result<RunSummary> {
    let original = RecordStore::load(original_path)?;

    let base_name = original_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::MissingInput(original_path.to_path_buf()))?;

    let mut sources = Vec::new();
    for path in find_edit_sources(edits_dir, base_name)? {
        sources.push(RecordStore::load(&path)?);
    }

    let index = EditIndex::build(&sources);
    let merged = Reconciler::new(config).reconcile(&original, &index);
    merged.write(output_path)?;

    Ok(RunSummary {
        edit_sources: sources.len(),
        input_records: original.len(),
        output_records: merged.len(),
    })
}

/// Count distinct ids in `ids`, most frequent first.
///
/// Stable count-then-sort: ids tied on frequency stay in first-appearance
/// order, which is the tie-break the decision policy relies on.
fn count_votes(ids: &[i32]) -> Vec<(i32, usize)> {
    let mut counts: Vec<(i32, usize)> = Vec::new();
    for &id in ids {
        match counts.iter_mut().find(|(seen, _)| *seen == id) {
            Some((_, n)) => *n += 1,
            None => counts.push((id, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
