//! Core dataset model for the regrouping engine.
//!
//! Images and annotations are kept as the JSON objects they were read
//! from, with only the id fields the engine needs lifted into typed
//! values. Everything else (file names, bounding boxes, segmentation
//! polygons, vendor extensions) is carried through untouched, in its
//! original key order.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::ids::{CategoryId, ImageId};

/// A COCO-style dataset: images, annotations and categories.
///
/// Field order here is the serialization order of the output document.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Dataset {
    /// All images in the dataset.
    pub images: Vec<Image>,

    /// All annotations, in source order.
    pub annotations: Vec<Annotation>,

    /// All category definitions.
    pub categories: Vec<Category>,
}

/// An image in the dataset.
///
/// Only `id` is interpreted; the remaining fields stay in `fields`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Image {
    id: ImageId,
    fields: Map<String, Value>,
}

impl Image {
    /// Creates an image carrying nothing but its id.
    pub fn new(id: impl Into<ImageId>) -> Self {
        let id = id.into();
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::from(id.as_u64()));
        Self { id, fields }
    }

    /// Adds (or replaces) an opaque field. `id` cannot be overwritten.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != "id" {
            self.fields.insert(key, value);
        }
        self
    }

    /// The image id.
    pub fn id(&self) -> ImageId {
        self.id
    }

    /// The full JSON object for this image, including `id`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Map<String, Value>> for Image {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = required_u64(&fields, "id")?;
        Ok(Self {
            id: ImageId::new(id),
            fields,
        })
    }
}

impl From<Image> for Map<String, Value> {
    fn from(image: Image) -> Self {
        image.fields
    }
}

/// An annotation referencing one image and one category.
///
/// The annotation's own `id`, geometry and any other payload are opaque.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Annotation {
    image_id: ImageId,
    category_id: CategoryId,
    fields: Map<String, Value>,
}

impl Annotation {
    /// Creates an annotation carrying only its two references.
    pub fn new(image_id: impl Into<ImageId>, category_id: impl Into<CategoryId>) -> Self {
        let image_id = image_id.into();
        let category_id = category_id.into();
        let mut fields = Map::new();
        fields.insert("image_id".to_string(), Value::from(image_id.as_u64()));
        fields.insert("category_id".to_string(), Value::from(category_id.as_u64()));
        Self {
            image_id,
            category_id,
            fields,
        }
    }

    /// Adds (or replaces) an opaque field. The reference fields cannot be
    /// overwritten this way; use [`Annotation::with_category`] instead.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != "image_id" && key != "category_id" {
            self.fields.insert(key, value);
        }
        self
    }

    /// Returns a copy pointing at `category_id`, all other fields unchanged.
    ///
    /// The `category_id` key keeps its position in the JSON object.
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = category_id;
        self.fields.insert(
            "category_id".to_string(),
            Value::from(category_id.as_u64()),
        );
        self
    }

    /// The referenced image.
    pub fn image_id(&self) -> ImageId {
        self.image_id
    }

    /// The referenced category.
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// The full JSON object for this annotation.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Map<String, Value>> for Annotation {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let image_id = required_u64(&fields, "image_id")?;
        let category_id = required_u64(&fields, "category_id")?;
        Ok(Self {
            image_id: ImageId::new(image_id),
            category_id: CategoryId::new(category_id),
            fields,
        })
    }
}

impl From<Annotation> for Map<String, Value> {
    fn from(annotation: Annotation) -> Self {
        annotation.fields
    }
}

/// A category (class label).
///
/// Input categories only need `id` and `name`; the other fields fall back
/// to their defaults when absent or `null`. The regrouped output always
/// writes every field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub supercategory: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub keypoint_colors: Vec<Value>,
}

impl Category {
    /// Creates a category with empty supercategory, color and metadata.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supercategory: String::new(),
            color: String::new(),
            metadata: Map::new(),
            keypoint_colors: Vec::new(),
        }
    }

    /// Sets the display color (hex string such as `#fc0000`).
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn required_u64(fields: &Map<String, Value>, key: &str) -> Result<u64, String> {
    match fields.get(key) {
        None => Err(format!("missing field `{key}`")),
        Some(value) => value
            .as_u64()
            .ok_or_else(|| format!("field `{key}` must be a non-negative integer, got {value}")),
    }
}
