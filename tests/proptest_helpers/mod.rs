#![allow(dead_code)]

use std::collections::{BTreeSet, HashSet};

use coco_regroup::ir::{Annotation, Category, CategoryId, Dataset, Image, ImageId};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use serde_json::json;

/// Source names used by the builtin policies plus a few no policy knows.
pub const CATEGORY_NAMES: &[&str] = &[
    "polipo",
    "mioma",
    "K",
    "EIN",
    "sinechie",
    "endometrio polipoide",
    "iperplasia semplice",
    "iperplasia complessa",
    "artefatto",
    "bolla",
];

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

/// Datasets with unique image ids, category names drawn (with repeats)
/// from [`CATEGORY_NAMES`], and annotations whose references may dangle.
///
/// Every annotation carries a unique `id` equal to its input position, so
/// tests can check relative order after filtering.
pub fn arb_dataset(max_images: usize, max_cats: usize, max_anns: usize) -> BoxedStrategy<Dataset> {
    (
        proptest::collection::btree_set(1u64..=64, 0..=max_images),
        proptest::collection::vec((1u64..=16, 0..CATEGORY_NAMES.len()), 0..=max_cats),
        proptest::collection::vec((1u64..=72, 1u64..=20, any::<u8>()), 0..=max_anns),
    )
        .prop_map(|(image_ids, category_seeds, ann_seeds)| {
            build_dataset(image_ids, category_seeds, ann_seeds)
        })
        .boxed()
}

fn build_dataset(
    image_ids: BTreeSet<u64>,
    category_seeds: Vec<(u64, usize)>,
    ann_seeds: Vec<(u64, u64, u8)>,
) -> Dataset {
    let images = image_ids
        .into_iter()
        .map(|id| Image::new(id).with_field("file_name", json!(format!("{id:04}.png"))))
        .collect();

    let categories = category_seeds
        .into_iter()
        .map(|(id, name_idx)| Category::new(id, CATEGORY_NAMES[name_idx]))
        .collect();

    let annotations = ann_seeds
        .into_iter()
        .enumerate()
        .map(|(idx, (image_id, category_id, payload))| {
            Annotation::new(image_id, category_id)
                .with_field("id", json!(idx))
                .with_field("area", json!(payload))
        })
        .collect();

    Dataset {
        images,
        annotations,
        categories,
    }
}

/// The position-derived `id` of an annotation built by [`arb_dataset`].
pub fn annotation_index(annotation: &Annotation) -> u64 {
    annotation.fields()["id"]
        .as_u64()
        .expect("generated annotations carry an integer id")
}

pub fn assert_referential_integrity(dataset: &Dataset) -> Result<(), String> {
    let category_ids: HashSet<CategoryId> = dataset.categories.iter().map(|c| c.id).collect();
    for ann in &dataset.annotations {
        if !category_ids.contains(&ann.category_id()) {
            return Err(format!(
                "annotation {} references missing category {}",
                annotation_index(ann),
                ann.category_id()
            ));
        }
    }
    Ok(())
}

pub fn assert_image_survivorship(dataset: &Dataset) -> Result<(), String> {
    let used: HashSet<ImageId> = dataset.annotations.iter().map(|a| a.image_id()).collect();
    for image in &dataset.images {
        if !used.contains(&image.id()) {
            return Err(format!("image {} has no annotations", image.id()));
        }
    }
    Ok(())
}

/// Checks that `ids` is strictly increasing, i.e. a subsequence of input order.
pub fn assert_increasing<T: PartialOrd + std::fmt::Debug>(ids: &[T]) -> Result<(), String> {
    match ids.windows(2).find(|w| w[0] >= w[1]) {
        Some(w) => Err(format!("order broken at {:?} -> {:?}", w[0], w[1])),
        None => Ok(()),
    }
}
