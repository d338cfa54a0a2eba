//! COCO JSON reader.
//!
//! Only the fields the extractor needs are modelled. Any other keys in the
//! document (`info`, `licenses`, `categories`, `segmentation`, ...) are
//! accepted and ignored.
//!
//! # COCO Format Reference
//!
//! COCO bounding boxes use `[x, y, width, height]` format where:
//! - `(x, y)` is the top-left corner in absolute pixel coordinates
//! - `width` and `height` are the dimensions
//!
//! Coordinates are usually fractional in real datasets. The extractor works
//! in whole pixels, so [`CocoAnnotation::bbox_px`] truncates each component
//! toward zero and rejects values outside the `i64` range.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CocotabError;

/// Top-level COCO dataset structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CocoDataset {
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
}

/// COCO image entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
    pub width: u64,
    pub height: u64,
}

/// COCO annotation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub image_id: u64,

    /// COCO bbox format: [x, y, width, height] with (x,y) as top-left corner
    pub bbox: [f64; 4],
}

impl CocoImage {
    pub fn new(id: u64, file_name: impl Into<String>, width: u64, height: u64) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            width,
            height,
        }
    }
}

impl CocoAnnotation {
    pub fn new(image_id: u64, bbox: [f64; 4]) -> Self {
        Self { image_id, bbox }
    }

    /// Returns the bbox as whole pixels `[x, y, width, height]`, or `None`
    /// if any component does not fit in an `i64` after truncation.
    pub fn bbox_px(&self) -> Option<[i64; 4]> {
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;

        let mut px = [0i64; 4];
        for (out, v) in px.iter_mut().zip(self.bbox) {
            let t = v.trunc();
            if !(-LIMIT..LIMIT).contains(&t) {
                return None;
            }
            *out = t as i64;
        }
        Some(px)
    }
}

/// Reads a dataset from a COCO JSON file.
///
/// # Errors
/// Returns [`CocotabError::Io`] if the file cannot be opened and
/// [`CocotabError::CocoJsonParse`] if it is not valid JSON or lacks the
/// `images`/`annotations` sequences.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use cocotab::coco::read_coco_json;
///
/// let dataset = read_coco_json(Path::new("instances_val.json"))?;
/// # Ok::<(), cocotab::CocotabError>(())
/// ```
pub fn read_coco_json(path: &Path) -> Result<CocoDataset, CocotabError> {
    let file = File::open(path).map_err(|source| CocotabError::io(path, source))?;
    let reader = BufReader::new(file);

    let coco: CocoDataset =
        serde_json::from_reader(reader).map_err(|source| CocotabError::CocoJsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        path = %path.display(),
        images = coco.images.len(),
        annotations = coco.annotations.len(),
        "loaded COCO dataset"
    );

    Ok(coco)
}

/// Reads a dataset from a COCO JSON string.
///
/// Useful for testing without file I/O.
pub fn from_coco_str(json: &str) -> Result<CocoDataset, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a dataset from a COCO JSON byte slice.
pub fn from_coco_slice(bytes: &[u8]) -> Result<CocoDataset, serde_json::Error> {
    serde_json::from_slice(bytes)
}
