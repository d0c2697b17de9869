//! Projects resource selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which projects API collection receives notebook updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectsResource {
    /// `PATCH /tasks/{id}` with parameters and notebook (default).
    #[default]
    Tasks,
    /// `PATCH /components/{id}` with the notebook only.
    Components,
}

impl ProjectsResource {
    /// URL path segment of the collection.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ProjectsResource::Tasks => "tasks",
            ProjectsResource::Components => "components",
        }
    }
}

impl fmt::Display for ProjectsResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for ProjectsResource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tasks" | "task" => Ok(ProjectsResource::Tasks),
            "components" | "component" => Ok(ProjectsResource::Components),
            _ => Err(format!("Unknown projects resource: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource() {
        assert_eq!("Tasks".parse::<ProjectsResource>(), Ok(ProjectsResource::Tasks));
        assert_eq!(
            "component".parse::<ProjectsResource>(),
            Ok(ProjectsResource::Components)
        );
        assert!("experiments".parse::<ProjectsResource>().is_err());
    }
}
