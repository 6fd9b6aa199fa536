//! Importer for Labelbox NDJSON video exports.
//!
//! The export carries one JSON document per line; each document nests
//! per-frame object annotations under `projects.*.labels[].annotations.frames`.
//! Only the fields consumed here are read; the rest of the export schema is
//! ignored. Imported boxes are merged into a MOT record store keyed by
//! `(frame, object_id)` — deliberately a different key than the reconciler's
//! `(frame, box)`, because here the id is trusted and the box is the field
//! being refreshed.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use crate::{BoundingBox, Error, Record, RecordStore, Result};

/// Metadata defaults applied to every imported record.
const DEFAULT_CONFIDENCE: &str = "1";
const DEFAULT_AUX: &str = "-1";
const DEFAULT_CLASS: &str = "player";

#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(default)]
    projects: HashMap<String, Project>,
}

#[derive(Debug, Deserialize)]
struct Project {
    #[serde(default)]
    labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct Label {
    #[serde(default)]
    annotations: Annotations,
}

#[derive(Debug, Default, Deserialize)]
struct Annotations {
    #[serde(default)]
    frames: HashMap<String, FrameAnnotations>,
}

#[derive(Debug, Deserialize)]
struct FrameAnnotations {
    #[serde(default)]
    objects: HashMap<String, ObjectAnnotation>,
}

#[derive(Debug, Deserialize)]
struct ObjectAnnotation {
    name: String,
    bounding_box: ExportBox,
}

#[derive(Debug, Deserialize)]
struct ExportBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

/// Boxes extracted from an export, keyed by `(frame, object_id)`.
///
/// Frame numbers in the export are 1-indexed; keys here are shifted to the
/// 0-indexed convention of the MOT files this pipeline produces. A `BTreeMap`
/// keeps iteration deterministic.
pub type ImportedBoxes = BTreeMap<(i32, i32), BoundingBox>;

/// Read a Labelbox NDJSON export and extract every object bounding box.
///
/// The object's `name` field carries the object id and must parse as an
/// integer. Pixel coordinates are rounded to the nearest integer.
pub fn load_export(path: &Path) -> Result<ImportedBoxes> {
    if !path.is_file() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut boxes = ImportedBoxes::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: ExportRow = serde_json::from_str(&line)
            .map_err(|e| Error::InvalidNdjson(format!("line {}: {}", index + 1, e)))?;

        for project in row.projects.values() {
            for label in &project.labels {
                for (frame_key, frame) in &label.annotations.frames {
                    let frame_number: i32 = frame_key.parse().map_err(|_| {
                        Error::InvalidNdjson(format!(
                            "line {}: frame key '{}' is not an integer",
                            index + 1,
                            frame_key
                        ))
                    })?;

                    for object in frame.objects.values() {
                        let object_id: i32 = object.name.parse().map_err(|_| {
                            Error::InvalidNdjson(format!(
                                "line {}: object name '{}' is not an integer id",
                                index + 1,
                                object.name
                            ))
                        })?;

                        let bbox = BoundingBox {
                            left: object.bounding_box.left.round() as i32,
                            top: object.bounding_box.top.round() as i32,
                            width: object.bounding_box.width.round() as i32,
                            height: object.bounding_box.height.round() as i32,
                        };
                        boxes.insert((frame_number - 1, object_id), bbox);
                    }
                }
            }
        }
    }

    Ok(boxes)
}

/// Merge imported boxes into `store`.
///
/// Any existing record sharing a `(frame, object_id)` key with an import is
/// replaced; everything else passes through. Imported records carry fixed
/// default metadata (confidence 1, aux -1, class "player"). The result is
/// sorted ascending by (frame, object id).
pub fn merge(store: &RecordStore, imported: &ImportedBoxes) -> RecordStore {
    let mut merged = store.clone();
    merged.retain(|r| !imported.contains_key(&(r.frame, r.object_id)));

    for (&(frame, object_id), &bbox) in imported {
        merged.push(Record {
            frame,
            object_id,
            bbox,
            confidence: DEFAULT_CONFIDENCE.to_string(),
            aux: [
                DEFAULT_AUX.to_string(),
                DEFAULT_AUX.to_string(),
                DEFAULT_AUX.to_string(),
            ],
            class_label: DEFAULT_CLASS.to_string(),
        });
    }

    merged.sort_by_frame_and_id();
    merged
}

/// End-to-end import: load the export and the MOT file, merge, and write the
/// result to `output_path`.
pub fn run(ndjson_path: &Path, mot_path: &Path, output_path: &Path) -> Result<()> {
    let imported = load_export(ndjson_path)?;
    let store = RecordStore::load(mot_path)?;
    merge(&store, &imported).write(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::TempDir;

    fn export_line() -> String {
        // One project, one label, two frames; frame numbers are 1-indexed.
        r#"{"projects":{"p1":{"labels":[{"annotations":{"frames":{
            "1":{"objects":{"obj-a":{"name":"20","bounding_box":{"left":10.4,"top":10.6,"width":5.0,"height":5.0}}}},
            "2":{"objects":{"obj-a":{"name":"20","bounding_box":{"left":11.0,"top":10.0,"width":5.0,"height":5.0}},
                            "obj-b":{"name":"21","bounding_box":{"left":50.0,"top":60.0,"width":7.0,"height":9.0}}}}
        }}}]}}}"#
            .replace('\n', "")
    }

    fn write_export(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("export.ndjson");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", export_line()).unwrap();
        path
    }

    #[test]
    fn test_load_export_extracts_and_reindexes_frames() {
        let dir = TempDir::new().unwrap();
        let boxes = load_export(&write_export(&dir)).unwrap();

        assert_eq!(boxes.len(), 3);
        // Frame 1 in the export becomes frame 0; coordinates are rounded.
        assert_eq!(
            boxes[&(0, 20)],
            BoundingBox {
                left: 10,
                top: 11,
                width: 5,
                height: 5
            }
        );
        assert!(boxes.contains_key(&(1, 20)));
        assert!(boxes.contains_key(&(1, 21)));
    }

    #[test]
    fn test_load_export_rejects_non_integer_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.ndjson");
        let mut file = File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"projects":{{"p1":{{"labels":[{{"annotations":{{"frames":{{"1":{{"objects":{{"o":{{"name":"goalkeeper","bounding_box":{{"left":1,"top":2,"width":3,"height":4}}}}}}}}}}}}}}]}}}}}}"#
        )
        .unwrap();

        let err = load_export(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidNdjson(_)));
    }

    #[test]
    fn test_merge_replaces_matching_keys_and_sorts() {
        let store = RecordStore::from_records(vec![
            // Same (frame, id) as an import: replaced.
            Record::parse_line(
                "1, 20, 99, 99, 9, 9, 0.4, -1, -1, -1, player",
                Path::new("test.txt"),
                1,
            )
            .unwrap(),
            // Untouched record on a later frame.
            Record::parse_line(
                "3, 30, 70, 70, 6, 6, 0.9, -1, -1, -1, player",
                Path::new("test.txt"),
                2,
            )
            .unwrap(),
        ]);

        let dir = TempDir::new().unwrap();
        let imported = load_export(&write_export(&dir)).unwrap();
        let merged = merge(&store, &imported);

        assert_eq!(
            merged.serialize(),
            [
                "0, 20, 10, 11, 5, 5, 1, -1, -1, -1, player",
                "1, 20, 11, 10, 5, 5, 1, -1, -1, -1, player",
                "1, 21, 50, 60, 7, 9, 1, -1, -1, -1, player",
                "3, 30, 70, 70, 6, 6, 0.9, -1, -1, -1, player",
            ]
        );
    }
}
