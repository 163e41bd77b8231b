//! Dataset representation for coco-regroup.
//!
//! The engine only needs a thin typed layer over COCO-style JSON: the ids
//! that tie the three collections together. Everything else is kept as
//! opaque JSON so that a regrouped dataset differs from its source only in
//! what regrouping is supposed to change.
//!
//! # Example
//!
//! ```
//! use coco_regroup::ir::{Annotation, Category, Dataset, Image};
//!
//! let dataset = Dataset {
//!     images: vec![Image::new(100u64)],
//!     annotations: vec![Annotation::new(100u64, 1u64)],
//!     categories: vec![Category::new(1u64, "polipo")],
//! };
//! assert_eq!(dataset.annotations[0].category_id().as_u64(), 1);
//! ```

mod ids;
pub mod io_coco_json;
mod model;

// Re-export core types for convenient access
pub use ids::{CategoryId, ImageId};
pub use model::{Annotation, Category, Dataset, Image};
