//! Derived tables.
//!
//! Turns a [`CocoDataset`] into the metadata, image and object tables that
//! the writer serializes.

pub mod ratio;
mod rows;

pub use ratio::{aspect_ratio_float, gcd, AspectRatio};
pub use rows::{ImageRow, MetadataRow, ObjectRow, TableRow, Tables};

use std::collections::HashMap;
use std::path::Path;

use crate::coco::{CocoAnnotation, CocoDataset, CocoImage};
use crate::error::CocotabError;

/// Compute all three tables for a dataset.
///
/// # Errors
/// Fails on the first image or annotation with a zero dimension, or whose
/// area or center overflows.
pub fn extract_tables(dataset: &CocoDataset) -> Result<Tables, CocotabError> {
    let metadata = build_metadata(dataset);
    let images = build_image_rows(dataset)?;
    let objects = build_object_rows(dataset)?;

    Ok(Tables {
        metadata,
        images,
        objects,
    })
}

pub fn build_metadata(dataset: &CocoDataset) -> MetadataRow {
    MetadataRow {
        image_count: dataset.images.len(),
        object_count: dataset.annotations.len(),
    }
}

/// Count annotations per image ID.
///
/// IDs that no image declares are still counted; they simply never get
/// looked up.
pub fn count_objects_by_image(annotations: &[CocoAnnotation]) -> HashMap<u64, usize> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for ann in annotations {
        *counts.entry(ann.image_id).or_insert(0) += 1;
    }
    counts
}

/// One row per image, in input order.
pub fn build_image_rows(dataset: &CocoDataset) -> Result<Vec<ImageRow>, CocotabError> {
    let counts = count_objects_by_image(&dataset.annotations);

    dataset
        .images
        .iter()
        .map(|img| {
            let object_count = counts.get(&img.id).copied().unwrap_or(0);
            image_row(img, object_count)
        })
        .collect()
}

fn image_row(img: &CocoImage, object_count: usize) -> Result<ImageRow, CocotabError> {
    let context = || format!("image {}", img.id);

    let (w, h) = match (i64::try_from(img.width), i64::try_from(img.height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(CocotabError::ArithmeticOverflow { context: context() });
        }
    };
    let (aspect_ratio, aspect_ratio_float) = ratios(w, h, context)?;

    let area = img
        .width
        .checked_mul(img.height)
        .ok_or_else(|| CocotabError::ArithmeticOverflow { context: context() })?;

    Ok(ImageRow {
        id: img.id,
        file_name: basename(&img.file_name),
        object_count,
        width: img.width,
        height: img.height,
        area,
        aspect_ratio,
        aspect_ratio_float,
    })
}

/// One row per annotation, in input order.
pub fn build_object_rows(dataset: &CocoDataset) -> Result<Vec<ObjectRow>, CocotabError> {
    dataset
        .annotations
        .iter()
        .enumerate()
        .map(|(index, ann)| object_row(index, ann))
        .collect()
}

fn object_row(index: usize, ann: &CocoAnnotation) -> Result<ObjectRow, CocotabError> {
    let context = || format!("annotation #{} (image {})", index, ann.image_id);
    let overflow = || CocotabError::ArithmeticOverflow { context: context() };

    let [bx, by, bw, bh] = ann.bbox_px().ok_or_else(overflow)?;
    let (aspect_ratio, aspect_ratio_float) = ratios(bw, bh, context)?;

    let x = bx.checked_add(bw / 2).ok_or_else(overflow)?;
    let y = by.checked_add(bh / 2).ok_or_else(overflow)?;
    let area = bw.checked_mul(bh).ok_or_else(overflow)?;

    Ok(ObjectRow {
        image_id: ann.image_id,
        x,
        y,
        width: bw,
        height: bh,
        area,
        aspect_ratio,
        aspect_ratio_float,
    })
}

fn ratios(
    width: i64,
    height: i64,
    context: impl Fn() -> String,
) -> Result<(AspectRatio, f64), CocotabError> {
    match (
        AspectRatio::reduce(width, height),
        aspect_ratio_float(width, height),
    ) {
        (Some(ratio), Some(float)) => Ok((ratio, float)),
        _ => {
            let context = context();
            tracing::warn!(%context, width, height, "zero dimension, aspect ratio undefined");
            Err(CocotabError::DegenerateDimensions {
                context,
                width,
                height,
            })
        }
    }
}

/// Final path component of a COCO `file_name`, which is sometimes a
/// relative path like `train2017/000000000139.jpg`.
fn basename(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}
