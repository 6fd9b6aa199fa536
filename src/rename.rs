//! Single-id renamer: rewrites a set of object ids to one new id.
//!
//! Each invocation writes an auto-numbered `{base}_valNN.txt` copy next to
//! earlier ones; those copies are the edit sources the reconciler later
//! merges back into the original file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, RecordStore, Result};

/// Rewrite every record whose object id is in `old_ids` to `new_id`.
///
/// Returns the number of records changed.
pub fn rename_ids(store: &mut RecordStore, old_ids: &[i32], new_id: i32) -> usize {
    let mut changed = 0;
    for record in store.records_mut() {
        if old_ids.contains(&record.object_id) {
            record.object_id = new_id;
            changed += 1;
        }
    }
    changed
}

/// Next free auto-numbered output path `{base_name}_valNN.txt` in `dir`.
///
/// NN is two-digit and one past the highest existing number, starting at
/// `val00` when no numbered copy exists yet. The directory is created if
/// absent.
pub fn next_versioned_path(dir: &Path, base_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let prefix = format!("{}_val", base_name);
    let mut highest: Option<u32> = None;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else { continue };
        let number = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".txt"))
            .and_then(|digits| digits.parse::<u32>().ok());
        if let Some(number) = number {
            highest = Some(highest.map_or(number, |h| h.max(number)));
        }
    }

    let next = highest.map_or(0, |h| h + 1);
    Ok(dir.join(format!("{}_val{:02}.txt", base_name, next)))
}

/// Load `input`, rename `old_ids` to `new_id`, and save the result as the
/// next `{base}_valNN.txt` in `output_dir`.
///
/// Returns the output path, or `None` when no record matched any old id, in
/// which case nothing is written.
pub fn run(
    input: &Path,
    output_dir: &Path,
    old_ids: &[i32],
    new_id: i32,
) -> Result<Option<PathBuf>> {
    let mut store = RecordStore::load(input)?;
    if rename_ids(&mut store, old_ids, new_id) == 0 {
        return Ok(None);
    }

    let base_name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::MissingInput(input.to_path_buf()))?;

    let output_path = next_versioned_path(output_dir, base_name)?;
    store.write(&output_path)?;
    Ok(Some(output_path))
}
