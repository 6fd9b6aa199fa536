//! A single MOT-format annotation record and its identity key.

use std::path::Path;

use crate::{Error, Result};

/// Number of comma-separated fields in one MOT line.
pub const FIELD_COUNT: usize = 11;

/// Bounding box in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// Key used to match the same physical detection across independently
/// edited files.
///
/// The object id is deliberately excluded: it is the field under revision,
/// so two records describing the same box in the same frame collide here no
/// matter which ids the reviewers assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub frame: i32,
    pub bbox: BoundingBox,
}

/// One row of a MOT annotation file:
///
/// `frame, id, bb_left, bb_top, bb_width, bb_height, conf, x, y, z, class`
///
/// Frame, id, and the box are parsed as integers; the trailing fields are
/// pass-through and kept exactly as written so that loading and re-serializing
/// a file does not rewrite values the tool never interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub frame: i32,
    pub object_id: i32,
    pub bbox: BoundingBox,
    /// Detection confidence, kept as written.
    pub confidence: String,
    /// Reserved world-coordinate fields, usually `-1`.
    pub aux: [String; 3],
    pub class_label: String,
}

impl Record {
    /// Parse one line of a MOT file.
    ///
    /// Fields are comma-separated; whitespace around each field is ignored.
    /// Fails with [`Error::MalformedRecord`] on a wrong field count or a
    /// non-integer frame, id, or box field. No semantic validation of the box
    /// is performed; negative or out-of-frame geometry passes through.
    ///
    /// # Arguments
    /// * `line` - The raw line, without trailing newline
    /// * `path` - Source file, used in error messages
    /// * `line_number` - 1-based line number, used in error messages
    pub fn parse_line(line: &str, path: &Path, line_number: usize) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedRecord {
            path: path.display().to_string(),
            line: line_number,
            reason,
        };

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != FIELD_COUNT {
            return Err(malformed(format!(
                "expected {} fields, got {}",
                FIELD_COUNT,
                fields.len()
            )));
        }

        let parse_int = |name: &str, value: &str| {
            value
                .parse::<i32>()
                .map_err(|_| malformed(format!("{} is not an integer: '{}'", name, value)))
        };

        Ok(Self {
            frame: parse_int("frame", fields[0])?,
            object_id: parse_int("object id", fields[1])?,
            bbox: BoundingBox {
                left: parse_int("bb_left", fields[2])?,
                top: parse_int("bb_top", fields[3])?,
                width: parse_int("bb_width", fields[4])?,
                height: parse_int("bb_height", fields[5])?,
            },
            confidence: fields[6].to_string(),
            aux: [
                fields[7].to_string(),
                fields[8].to_string(),
                fields[9].to_string(),
            ],
            class_label: fields[10].to_string(),
        })
    }

    /// The (frame, box) key identifying this physical detection.
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            frame: self.frame,
            bbox: self.bbox,
        }
    }

    /// Render the record as one MOT line, without trailing newline.
    ///
    /// Fields are joined with `", "`, the separator the upstream labeling
    /// scripts emit.
    pub fn to_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}",
            self.frame,
            self.object_id,
            self.bbox.left,
            self.bbox.top,
            self.bbox.width,
            self.bbox.height,
            self.confidence,
            self.aux[0],
            self.aux[1],
            self.aux[2],
            self.class_label
        )
    }

    /// Copy of this record with a different object id; all other fields are
    /// left untouched.
    pub fn with_object_id(&self, object_id: i32) -> Self {
        Self {
            object_id,
            ..self.clone()
        }
    }
}
