//! Resolution of a policy against a dataset's categories.
//!
//! Produces the regrouped category list and the old-id to new-id mapping.
//!
//! # Tie-break
//!
//! Targets are visited in declaration order, source names within a target
//! in declaration order, and input categories in input order. Every name
//! match writes `mapping[category.id] = target.id`, so when a category is
//! claimed more than once the last write wins. This covers both overlapping
//! source lists across targets and duplicate names in the input.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::error::RegroupError;
use crate::ir::{Category, CategoryId};
use crate::policy::GroupPolicy;

/// Mapping from source category id to regrouped category id.
///
/// Not total: source categories absorbed by no target are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryMapping {
    map: HashMap<CategoryId, CategoryId>,
}

impl CategoryMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `from -> to`, returning the target it replaced, if any.
    pub fn insert(&mut self, from: CategoryId, to: CategoryId) -> Option<CategoryId> {
        self.map.insert(from, to)
    }

    /// The regrouped id for `from`, or `None` if it is excluded.
    pub fn get(&self, from: CategoryId) -> Option<CategoryId> {
        self.map.get(&from).copied()
    }

    /// Whether `from` is absorbed by some target.
    pub fn contains(&self, from: CategoryId) -> bool {
        self.map.contains_key(&from)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries sorted by source id.
    pub fn sorted_entries(&self) -> Vec<(CategoryId, CategoryId)> {
        let mut entries: Vec<_> = self.map.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort();
        entries
    }
}

impl FromIterator<(CategoryId, CategoryId)> for CategoryMapping {
    fn from_iter<I: IntoIterator<Item = (CategoryId, CategoryId)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

/// A mapping entry overwritten by a later match with a different target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingOverride {
    pub category: CategoryId,
    pub category_name: String,
    pub previous: CategoryId,
    pub winner: CategoryId,
}

/// Result of resolving a policy against a category list.
#[derive(Clone, Debug)]
pub struct ResolvedCategories {
    /// One category per policy target, in target order.
    pub categories: Vec<Category>,
    pub mapping: CategoryMapping,
    pub overrides: Vec<MappingOverride>,
    /// Policy source names no input category carries, in policy order.
    pub unmatched_sources: Vec<String>,
    /// Input categories whose id is absorbed by no target, in input order.
    pub excluded: Vec<Category>,
}

/// Resolves `policy` against the dataset's `existing` categories.
///
/// # Errors
/// Returns [`RegroupError::DuplicateTargetId`] if two targets share an id.
pub fn resolve_categories(
    policy: &GroupPolicy,
    existing: &[Category],
) -> Result<ResolvedCategories, RegroupError> {
    check_unique_target_ids(policy)?;

    let categories: Vec<Category> = policy
        .targets
        .iter()
        .map(|target| {
            Category::new(target.id, target.display_name.as_str()).with_color(&target.color)
        })
        .collect();

    let mut mapping = CategoryMapping::new();
    let mut overrides = Vec::new();
    let mut unmatched_sources = Vec::new();
    let mut matched = vec![false; existing.len()];

    for target in &policy.targets {
        for source in &target.source_category_names {
            let mut found = false;
            for (idx, category) in existing.iter().enumerate() {
                if category.name != *source {
                    continue;
                }
                found = true;
                matched[idx] = true;

                if let Some(previous) = mapping.insert(category.id, target.id) {
                    if previous != target.id {
                        overrides.push(MappingOverride {
                            category: category.id,
                            category_name: category.name.clone(),
                            previous,
                            winner: target.id,
                        });
                    }
                }
            }
            if !found {
                unmatched_sources.push(source.clone());
            }
        }
    }

    // An entry that shares its id with a mapped entry is not excluded: its
    // annotations follow the mapped id.
    let excluded: Vec<Category> = existing
        .iter()
        .zip(&matched)
        .filter(|(category, matched)| !**matched && !mapping.contains(category.id))
        .map(|(category, _)| category.clone())
        .collect();

    debug!(
        "policy '{}': {} of {} categories mapped, {} excluded, {} override(s)",
        policy.name,
        mapping.len(),
        existing.len(),
        excluded.len(),
        overrides.len()
    );

    Ok(ResolvedCategories {
        categories,
        mapping,
        overrides,
        unmatched_sources,
        excluded,
    })
}

fn check_unique_target_ids(policy: &GroupPolicy) -> Result<(), RegroupError> {
    let mut seen = HashSet::new();
    for target in &policy.targets {
        if !seen.insert(target.id) {
            return Err(RegroupError::DuplicateTargetId {
                policy: policy.name.clone(),
                id: target.id,
            });
        }
    }
    Ok(())
}
