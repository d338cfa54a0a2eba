#![allow(dead_code)]

use cocotab::coco::{CocoAnnotation, CocoDataset, CocoImage};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_image(id: u64) -> impl Strategy<Value = CocoImage> {
    (1u64..=4096, 1u64..=4096, "[a-z0-9_/]{0,12}[a-z0-9]{1,8}\\.jpg")
        .prop_map(move |(w, h, name)| CocoImage::new(id, name, w, h))
}

/// Bbox with positive integral extents, optionally offset by a fraction.
pub fn arb_bbox() -> impl Strategy<Value = [f64; 4]> {
    (
        0u32..2000,
        0u32..2000,
        1u32..1000,
        1u32..1000,
        prop_oneof![Just(0.0), 0.0f64..0.99],
    )
        .prop_map(|(x, y, w, h, frac)| {
            [
                x as f64 + frac,
                y as f64 + frac,
                w as f64 + frac,
                h as f64 + frac,
            ]
        })
}

/// Dataset with unique image IDs `1..=n` and annotations that may also
/// reference IDs beyond `n`.
pub fn arb_dataset(max_images: usize, max_annotations: usize) -> impl Strategy<Value = CocoDataset> {
    (0..=max_images).prop_flat_map(move |n| {
        let images = (1..=n as u64).map(arb_image).collect::<Vec<_>>();
        let max_ref = n as u64 + 2;
        let annotations = prop::collection::vec(
            (1..=max_ref, arb_bbox()).prop_map(|(image_id, bbox)| CocoAnnotation::new(image_id, bbox)),
            0..=max_annotations,
        );
        (images, annotations).prop_map(|(images, annotations)| CocoDataset {
            images,
            annotations,
        })
    })
}
