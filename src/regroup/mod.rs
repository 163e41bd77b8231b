//! Category regrouping pipeline.
//!
//! A run takes a dataset and a policy and produces a new dataset whose
//! categories are exactly the policy's targets:
//!
//! 1. [`resolve_categories`] builds the target categories and the old-id
//!    to new-id mapping.
//! 2. [`filter_dataset`] rewrites annotations through the mapping, drops
//!    unmapped ones and keeps only images that still have annotations.
//! 3. [`assemble`] puts the pieces back together.
//!
//! Every stage is a pure function of its inputs. The same dataset and
//! policy always yield the same output.

mod assemble;
mod filter;
pub mod report;
mod resolve;

pub use assemble::assemble;
pub use filter::{filter_dataset, Filtered};
pub use report::{DatasetCounts, RegroupIssue, RegroupIssueCode, RegroupReport, RegroupSeverity};
pub use resolve::{resolve_categories, CategoryMapping, MappingOverride, ResolvedCategories};

use std::collections::HashSet;

use log::info;

use crate::error::RegroupError;
use crate::ir::{CategoryId, Dataset, ImageId};
use crate::policy::{GroupPolicy, PolicyRegistry};

/// The regrouped dataset together with a description of the run.
#[derive(Clone, Debug)]
pub struct RegroupOutcome {
    pub dataset: Dataset,
    pub report: RegroupReport,
}

/// Looks up `policy_name` in `registry` and regroups `dataset` with it.
///
/// # Errors
/// [`RegroupError::UnknownPolicy`] if the name is not registered, and
/// anything [`regroup_dataset`] can return.
pub fn run_pipeline(
    dataset: Dataset,
    registry: &PolicyRegistry,
    policy_name: &str,
) -> Result<RegroupOutcome, RegroupError> {
    let policy = registry.resolve(policy_name)?;
    regroup_dataset(dataset, policy)
}

/// Regroups `dataset` with an already selected policy.
pub fn regroup_dataset(
    dataset: Dataset,
    policy: &GroupPolicy,
) -> Result<RegroupOutcome, RegroupError> {
    let mut report = RegroupReport::new(policy.name.as_str());
    report.input = counts(&dataset);

    let resolved = resolve_categories(policy, &dataset.categories)?;
    note_resolution(&resolved, &mut report);

    let known_categories: HashSet<CategoryId> =
        dataset.categories.iter().map(|c| c.id).collect();
    let dangling_categories = dataset
        .annotations
        .iter()
        .filter(|ann| !known_categories.contains(&ann.category_id()))
        .count();
    if dangling_categories > 0 {
        report.add(RegroupIssue::info(
            RegroupIssueCode::DanglingCategoryRef,
            format!(
                "{} annotation(s) reference categories missing from the input and were dropped",
                dangling_categories
            ),
        ));
    }

    let known_images: HashSet<ImageId> = dataset.images.iter().map(|i| i.id()).collect();

    let Dataset {
        images,
        annotations,
        ..
    } = dataset;
    let filtered = filter_dataset(annotations, images, &resolved.mapping);

    let dangling_images = filtered
        .annotations
        .iter()
        .filter(|ann| !known_images.contains(&ann.image_id()))
        .count();
    if dangling_images > 0 {
        report.add(RegroupIssue::info(
            RegroupIssueCode::DanglingImageRef,
            format!(
                "{} kept annotation(s) reference images missing from the input",
                dangling_images
            ),
        ));
    }

    let dataset = assemble(filtered, resolved.categories);
    report.output = counts(&dataset);

    info!(
        "policy '{}': kept {}/{} annotations and {}/{} images",
        policy.name,
        report.output.annotations,
        report.input.annotations,
        report.output.images,
        report.input.images
    );

    Ok(RegroupOutcome { dataset, report })
}

fn note_resolution(resolved: &ResolvedCategories, report: &mut RegroupReport) {
    for o in &resolved.overrides {
        report.add(RegroupIssue::warning(
            RegroupIssueCode::MappingOverride,
            format!(
                "category {} '{}' is claimed by targets {} and {}; target {} wins",
                o.category, o.category_name, o.previous, o.winner, o.winner
            ),
        ));
    }

    for source in &resolved.unmatched_sources {
        report.add(RegroupIssue::info(
            RegroupIssueCode::UnmatchedSourceName,
            format!("source name '{}' matches no input category", source),
        ));
    }

    for category in &resolved.excluded {
        report.add(RegroupIssue::info(
            RegroupIssueCode::ExcludedCategory,
            format!(
                "category {} '{}' is absorbed by no target; its annotations are dropped",
                category.id, category.name
            ),
        ));
    }
}

fn counts(dataset: &Dataset) -> DatasetCounts {
    DatasetCounts {
        images: dataset.images.len(),
        annotations: dataset.annotations.len(),
        categories: dataset.categories.len(),
    }
}
