//! Output row types.
//!
//! Field declaration order is the CSV column order.

use serde::{Deserialize, Serialize};

use super::ratio::AspectRatio;

/// A row type with a fixed column header.
///
/// `HEADER` must list the struct's fields in declaration order. The writer
/// emits it explicitly so that empty tables still carry a header.
pub trait TableRow: Serialize {
    const HEADER: &'static [&'static str];
}

/// Dataset-wide counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataRow {
    pub image_count: usize,
    pub object_count: usize,
}

/// One row per COCO image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRow {
    pub id: u64,
    /// Basename of the image's `file_name`.
    pub file_name: String,
    pub object_count: usize,
    pub width: u64,
    pub height: u64,
    pub area: u64,
    pub aspect_ratio: AspectRatio,
    pub aspect_ratio_float: f64,
}

/// One row per COCO annotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectRow {
    pub image_id: u64,
    /// Bbox center x, truncated.
    pub x: i64,
    /// Bbox center y, truncated.
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub area: i64,
    pub aspect_ratio: AspectRatio,
    pub aspect_ratio_float: f64,
}

impl TableRow for MetadataRow {
    const HEADER: &'static [&'static str] = &["image_count", "object_count"];
}

impl TableRow for ImageRow {
    const HEADER: &'static [&'static str] = &[
        "id",
        "file_name",
        "object_count",
        "width",
        "height",
        "area",
        "aspect_ratio",
        "aspect_ratio_float",
    ];
}

impl TableRow for ObjectRow {
    const HEADER: &'static [&'static str] = &[
        "image_id",
        "x",
        "y",
        "width",
        "height",
        "area",
        "aspect_ratio",
        "aspect_ratio_float",
    ];
}

/// The three tables produced from a dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Tables {
    pub metadata: MetadataRow,
    pub images: Vec<ImageRow>,
    pub objects: Vec<ObjectRow>,
}

impl Tables {
    pub const METADATA_FILE: &'static str = "metadata.csv";
    pub const IMAGES_FILE: &'static str = "imagedata.csv";
    pub const OBJECTS_FILE: &'static str = "objectdata.csv";
}
