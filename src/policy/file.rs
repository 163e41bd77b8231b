//! Policy files: extra policies loaded at startup.
//!
//! ```yaml
//! policies:
//!   - name: lesioni
//!     description: optional free text
//!     targets:
//!       - id: 1
//!         name: focale
//!         color: "#fc0000"
//!         sources: [polipo, mioma]
//! ```
//!
//! JSON documents of the same shape are accepted too.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::GroupPolicy;
use crate::error::RegroupError;

/// Top-level shape of a policy file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyFile {
    #[serde(default)]
    pub policies: Vec<GroupPolicy>,
}

/// Parses policy file contents.
pub fn parse_policy_file(contents: &str) -> Result<PolicyFile, serde_yaml::Error> {
    serde_yaml::from_str(contents)
}

pub(super) fn read_policy_file(path: &Path) -> Result<PolicyFile, RegroupError> {
    let contents = fs::read_to_string(path).map_err(|source| RegroupError::PolicyFileRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_policy_file(&contents).map_err(|source| RegroupError::PolicyFileParse {
        path: path.to_path_buf(),
        source,
    })
}
