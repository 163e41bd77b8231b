//! Annotation rewriting and image survivorship.

use std::collections::HashSet;

use super::resolve::CategoryMapping;
use crate::ir::{Annotation, Image, ImageId};

/// Annotations and images that survive a mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filtered {
    /// Rewritten annotations, in input order.
    pub annotations: Vec<Annotation>,
    /// Images with at least one kept annotation, in input order.
    pub images: Vec<Image>,
}

/// Applies `mapping` to `annotations` and keeps the images they still use.
///
/// An annotation whose category is absent from the mapping is dropped,
/// including annotations whose category does not exist at all. An image
/// survives only if a kept annotation references it; having had
/// annotations in the input is not enough.
pub fn filter_dataset(
    annotations: Vec<Annotation>,
    images: Vec<Image>,
    mapping: &CategoryMapping,
) -> Filtered {
    let annotations: Vec<Annotation> = annotations
        .into_iter()
        .filter_map(|ann| {
            mapping
                .get(ann.category_id())
                .map(|new_id| ann.with_category(new_id))
        })
        .collect();

    let used_images: HashSet<ImageId> = annotations.iter().map(Annotation::image_id).collect();

    let images = images
        .into_iter()
        .filter(|image| used_images.contains(&image.id()))
        .collect();

    Filtered {
        annotations,
        images,
    }
}
