//! Test data generation utilities.
//!
//! Builds master sets with known answers and writes design space documents
//! to temporary files.

#![allow(dead_code)]

use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

use mutator_math::Location;

/// The six-master grid on `pop` x `snap` with values 1 to 6.
pub fn grid_masters() -> Vec<(Location, f64)> {
    let mut items = Vec::new();
    for (i, (pop, snap)) in [(1, 1), (2, 1), (3, 1), (1, 2), (2, 2), (3, 2)].into_iter().enumerate() {
        items.push((
            Location::new().with("pop", pop).with("snap", snap),
            (i + 1) as f64,
        ));
    }
    items
}

/// A two-master weight axis with a kinked map, as a JSON document.
pub fn weight_document() -> serde_json::Value {
    json!({
        "axes": {
            "weight": {"tag": "wght", "minimum": 0, "maximum": 1000, "default": 0,
                       "map": [[0, 0], [500, 200], [1000, 1000]]}
        },
        "masters": [
            {"name": "Light", "location": {"weight": 0}, "value": [0, 0, 100, 0]},
            {"name": "Bold", "location": {"weight": 1000}, "value": [0, 0, 200, 50]}
        ],
        "instances": [
            {"name": "Thin", "location": {"weight": 0}},
            {"name": "Regular", "location": {"weight": 250}},
            {"name": "Medium", "location": {"weight": 500}},
            {"name": "Heavy", "location": {"weight": 1000}}
        ]
    })
}

/// Write `document` to a file in a fresh temporary directory.
///
/// The directory is returned too so it lives as long as the caller needs it.
pub fn write_document(document: &serde_json::Value) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("design.json");
    let mut file = std::fs::File::create(&path).expect("Failed to create document");
    file.write_all(document.to_string().as_bytes())
        .expect("Failed to write document");
    (dir, path)
}
