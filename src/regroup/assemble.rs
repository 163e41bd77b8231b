//! Final dataset construction.

use super::filter::Filtered;
use crate::ir::{Category, Dataset};

/// Combines the filtered collections with the regrouped categories.
///
/// No further checks: the resolver and the filter already guarantee that
/// every kept annotation points at one of `categories`.
pub fn assemble(filtered: Filtered, categories: Vec<Category>) -> Dataset {
    Dataset {
        images: filtered.images,
        annotations: filtered.annotations,
        categories,
    }
}
