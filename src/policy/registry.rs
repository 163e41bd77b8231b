//! The table of policies available to a run.

use std::path::Path;

use log::debug;

use super::file::read_policy_file;
use super::{GroupPolicy, TargetCategory};
use crate::error::RegroupError;

/// Name of the policy used when none is requested.
pub const DEFAULT_POLICY: &str = "default";

/// An immutable, ordered table of named policies.
///
/// Built once at startup (builtin policies, optionally extended from a
/// policy file) and then only read.
#[derive(Clone, Debug, Default)]
pub struct PolicyRegistry {
    policies: Vec<GroupPolicy>,
}

impl PolicyRegistry {
    /// A registry with no policies.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The policies shipped with the tool: `binario` and `default`.
    pub fn builtin() -> Self {
        let binario = GroupPolicy::new("binario")
            .with_description("Polyps versus every other finding")
            .with_target(TargetCategory::new(1u64, "polipo", "#fc0000", ["polipo"]))
            .with_target(TargetCategory::new(
                2u64,
                "altro",
                "#0000fc",
                [
                    "iperplasia semplice",
                    "iperplasia complessa",
                    "K",
                    "EIN",
                    "sinechie",
                    "endometrio polipoide",
                    "mioma",
                ],
            ));

        let default = GroupPolicy::new(DEFAULT_POLICY)
            .with_description("Focal, dysnormal and oncological lesions")
            .with_target(TargetCategory::new(
                1u64,
                "focale",
                "#fc0000",
                ["polipo", "mioma"],
            ))
            .with_target(TargetCategory::new(
                2u64,
                "disnormale",
                "#00fc00",
                [
                    "endometrio polipoide",
                    "iperplasia semplice",
                    "iperplasia complessa",
                ],
            ))
            .with_target(TargetCategory::new(
                3u64,
                "oncologica",
                "#0000fc",
                ["EIN", "K"],
            ));

        Self {
            policies: vec![binario, default],
        }
    }

    /// Adds a policy. A policy with the same name is replaced in place.
    pub fn register(mut self, policy: GroupPolicy) -> Self {
        match self.policies.iter_mut().find(|p| p.name == policy.name) {
            Some(existing) => {
                debug!("replacing policy '{}'", policy.name);
                *existing = policy;
            }
            None => self.policies.push(policy),
        }
        self
    }

    /// Registers every policy found in a YAML/JSON policy file.
    pub fn extend_from_file(self, path: &Path) -> Result<Self, RegroupError> {
        let file = read_policy_file(path)?;
        debug!(
            "loaded {} policies from {}",
            file.policies.len(),
            path.display()
        );
        Ok(file.policies.into_iter().fold(self, Self::register))
    }

    /// Looks a policy up by name.
    pub fn resolve(&self, name: &str) -> Result<&GroupPolicy, RegroupError> {
        self.policies
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| RegroupError::UnknownPolicy {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    /// Policy names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.policies.iter().map(|p| p.name.as_str())
    }

    /// All policies in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &GroupPolicy> {
        self.policies.iter()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
