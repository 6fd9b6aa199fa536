//! Boundary helpers for the bounding-box visualization tool.
//!
//! The video overlay itself (decode, rasterize, encode) lives outside this
//! crate; what it needs from here is a stable id-to-color mapping and the
//! records grouped per frame.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Record, RecordStore};

/// RGB color, one byte per channel.
pub type Rgb = (u8, u8, u8);

/// Deterministic color for an object id.
///
/// The id seeds a fixed RNG, so the same id yields the same color in every
/// run and every process.
pub fn color_for_id(object_id: i32) -> Rgb {
    let mut rng = StdRng::seed_from_u64(object_id as u32 as u64);
    (rng.gen(), rng.gen(), rng.gen())
}

/// Group a store's records by frame, preserving store order within a frame.
pub fn records_by_frame(store: &RecordStore) -> HashMap<i32, Vec<&Record>> {
    let mut by_frame: HashMap<i32, Vec<&Record>> = HashMap::new();
    for record in store.records() {
        by_frame.entry(record.frame).or_default().push(record);
    }
    by_frame
}
