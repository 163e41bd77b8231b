//! Named grouping policies.
//!
//! A [`GroupPolicy`] lists coarse target categories in a fixed order. Each
//! [`TargetCategory`] names the fine-grained source categories it absorbs.
//! Declaration order matters: it fixes the order of the output categories
//! and decides which target wins when two targets claim the same source.

mod file;
mod registry;

pub use file::{parse_policy_file, PolicyFile};
pub use registry::{PolicyRegistry, DEFAULT_POLICY};

use serde::{Deserialize, Serialize};

use crate::ir::CategoryId;

/// A named rule set grouping source categories into target categories.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupPolicy {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub targets: Vec<TargetCategory>,
}

/// One coarse output category and the source category names it absorbs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetCategory {
    /// Id assigned by the policy author; written as-is to the output.
    pub id: CategoryId,

    /// Display name of the output category.
    #[serde(rename = "name")]
    pub display_name: String,

    /// Hex color such as `#fc0000`.
    pub color: String,

    /// Source category names, matched exactly against `Category::name`.
    #[serde(rename = "sources")]
    pub source_category_names: Vec<String>,
}

impl GroupPolicy {
    /// Creates an empty policy.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            targets: Vec::new(),
        }
    }

    /// Sets the human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a target category after the ones already declared.
    pub fn with_target(mut self, target: TargetCategory) -> Self {
        self.targets.push(target);
        self
    }
}

impl TargetCategory {
    pub fn new<I, S>(
        id: impl Into<CategoryId>,
        display_name: impl Into<String>,
        color: impl Into<String>,
        sources: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            color: color.into(),
            source_category_names: sources.into_iter().map(Into::into).collect(),
        }
    }
}
