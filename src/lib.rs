//! # motmerge - MOT annotation reconciliation toolkit
//!
//! Tools for maintaining object-tracking annotation files in the MOT
//! (Multiple Object Tracking) line-oriented format, where several reviewers
//! independently edit copies of an original file and the edits must be merged
//! back into a single authoritative file.
//!
//! ## Features
//!
//! - Majority-vote reconciliation of independently edited annotation copies
//! - Single-id renamer producing auto-numbered edit-source files
//! - Labelbox NDJSON export import into the MOT format
//! - Deterministic per-id colors for bounding-box visualization
//!
//! ## Example
//!
//! ```rust,ignore
//! use motmerge::{EditIndex, Reconciler, ReconcilerConfig, RecordStore};
//!
//! let original = RecordStore::load("original/game1.txt")?;
//! let edits = vec![RecordStore::load("changed/game1_val00.txt")?];
//! let index = EditIndex::build(&edits);
//! let merged = Reconciler::new(ReconcilerConfig::default()).reconcile(&original, &index);
//! merged.write("integrated/game1.txt")?;
//! ```

pub mod drawing;
pub mod edit_index;
pub mod labelbox;
pub mod reconcile;
pub mod record;
pub mod rename;
pub mod store;

// Re-exports for convenience
pub use edit_index::EditIndex;
pub use reconcile::{Decision, Reconciler, ReconcilerConfig};
pub use record::{BoundingBox, IdentityKey, Record};
pub use store::RecordStore;

// Error types
pub use crate::error::{Error, Result};

mod error {
    use std::path::PathBuf;
    use thiserror::Error;

    /// Errors that can occur in the motmerge library
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("malformed record at {path}:{line}: {reason}")]
        MalformedRecord {
            path: String,
            line: usize,
            reason: String,
        },

        #[error("missing input: {}", .0.display())]
        MissingInput(PathBuf),

        #[error("invalid NDJSON export: {0}")]
        InvalidNdjson(String),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for motmerge operations
    pub type Result<T> = std::result::Result<T, Error>;
}
