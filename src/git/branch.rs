//! Release branch recognition

use crate::config::Environment;
use std::fmt;

/// Branches that trigger a deployment
pub const RELEASE_BRANCHES: [&str; 3] = [
    "release-production",
    "release-staging",
    "release-development",
];

/// A branch that names a deployment environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBranch {
    name: String,
    environment: Environment,
}

impl ReleaseBranch {
    /// Recognize one of the release branches
    ///
    /// Only exact matches count; `release-staging-2` or `Release-staging` are
    /// ordinary branches. The environment is the token after the last `-`.
    #[must_use]
    pub fn parse(branch: &str) -> Option<Self> {
        if !RELEASE_BRANCHES.contains(&branch) {
            return None;
        }

        let (_, suffix) = branch.rsplit_once('-')?;
        let environment = suffix.parse().ok()?;

        Some(Self {
            name: branch.to_owned(),
            environment,
        })
    }

    /// The branch name as checked out
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The environment this branch deploys to
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }
}

impl fmt::Display for ReleaseBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
