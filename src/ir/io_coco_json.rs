//! COCO-style JSON reader and writer.
//!
//! # Input
//!
//! The document must carry `images`, `annotations` and `categories` arrays.
//! Other top-level keys (`info`, `licenses`, ...) are accepted and ignored.
//! Entries are validated one by one so that a malformed entry is reported
//! with its collection and index.
//!
//! # Output
//!
//! The writer emits exactly the three collections, in the order
//! `images`, `annotations`, `categories`, pretty-printed with two-space
//! indentation. Opaque fields keep their source key order and numeric
//! spelling, so identical inputs always produce identical bytes.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::model::{Annotation, Category, Dataset, Image};
use crate::error::RegroupError;

/// Top-level document as read from disk, before entry validation.
#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    images: Option<Vec<Value>>,

    #[serde(default)]
    annotations: Option<Vec<Value>>,

    #[serde(default)]
    categories: Option<Vec<Value>>,
}

/// Reads a dataset from a COCO-style JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read, is not valid JSON, or is
/// missing a required collection or entry field.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use coco_regroup::ir::io_coco_json::read_dataset;
///
/// let dataset = read_dataset(Path::new("gyn1.json"))?;
/// # Ok::<(), coco_regroup::RegroupError>(())
/// ```
pub fn read_dataset(path: &Path) -> Result<Dataset, RegroupError> {
    let file = File::open(path).map_err(RegroupError::Io)?;
    let reader = BufReader::new(file);

    let raw: RawDataset =
        serde_json::from_reader(reader).map_err(|source| RegroupError::DatasetParse {
            path: path.to_path_buf(),
            source,
        })?;

    raw_to_dataset(raw)
}

/// Writes a dataset to a JSON file.
///
/// The document is fully serialized before the file is created, so a
/// serialization failure never leaves a truncated file behind.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), RegroupError> {
    let json = to_dataset_string(dataset).map_err(|source| RegroupError::DatasetWrite {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json).map_err(RegroupError::Io)
}

/// Reads a dataset from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_dataset_str(json: &str) -> Result<Dataset, RegroupError> {
    let raw: RawDataset = serde_json::from_str(json).map_err(RegroupError::InvalidJson)?;
    raw_to_dataset(raw)
}

/// Reads a dataset from a JSON byte slice.
///
/// Useful for fuzzing and processing raw bytes without UTF-8 validation overhead.
pub fn from_dataset_slice(bytes: &[u8]) -> Result<Dataset, RegroupError> {
    let raw: RawDataset = serde_json::from_slice(bytes).map_err(RegroupError::InvalidJson)?;
    raw_to_dataset(raw)
}

/// Writes a dataset to a JSON string, terminated by a newline.
pub fn to_dataset_string(dataset: &Dataset) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(dataset)?;
    json.push('\n');
    Ok(json)
}

fn raw_to_dataset(raw: RawDataset) -> Result<Dataset, RegroupError> {
    Ok(Dataset {
        images: typed_entries::<Image>("images", raw.images)?,
        annotations: typed_entries::<Annotation>("annotations", raw.annotations)?,
        categories: typed_entries::<Category>("categories", raw.categories)?,
    })
}

fn typed_entries<T: DeserializeOwned>(
    collection: &'static str,
    entries: Option<Vec<Value>>,
) -> Result<Vec<T>, RegroupError> {
    let entries = entries.ok_or_else(|| RegroupError::MalformedDataset {
        collection,
        message: "missing top-level array".to_string(),
    })?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.is_object() {
                return Err(RegroupError::MalformedDataset {
                    collection,
                    message: format!("entry {index} is not an object"),
                });
            }
            serde_json::from_value(entry).map_err(|err| RegroupError::MalformedDataset {
                collection,
                message: format!("entry {index}: {err}"),
            })
        })
        .collect()
}
