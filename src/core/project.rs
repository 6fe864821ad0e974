//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::EntityPrefix;

/// Represents a Flock project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .flock/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            let flock_dir = current.join(".flock");
            if flock_dir.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let flock_dir = root.join(".flock");
        if flock_dir.exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        std::fs::create_dir_all(&flock_dir)
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        // Create default config
        let config_path = flock_dir.join("config.yaml");
        std::fs::write(&config_path, Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        // Create collection directories
        for prefix in EntityPrefix::all() {
            std::fs::create_dir_all(root.join(prefix.collection_dir()))
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Flock Project Configuration

# Default author recorded on new entries (can be overridden by global config)
# author: ""

# Notification preferences
notifications:
  visitor_alerts: true
  followup_reminders: true
  monthly_reports: false
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .flock directory
    pub fn flock_dir(&self) -> PathBuf {
        self.root.join(".flock")
    }

    /// Get the collection directory for a record type
    pub fn collection_dir(&self, prefix: EntityPrefix) -> PathBuf {
        self.root.join(prefix.collection_dir())
    }

    /// Path of the persisted notification feed
    pub fn feed_path(&self) -> PathBuf {
        self.flock_dir().join("feed.yaml")
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no Flock project found (searched from {searched_from} upward). Run `flock init` first.")]
    NotFound { searched_from: PathBuf },

    #[error("a Flock project already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("I/O error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.flock_dir().is_dir());
        assert!(project.flock_dir().join("config.yaml").is_file());
        for prefix in EntityPrefix::all() {
            assert!(project.collection_dir(*prefix).is_dir());
        }
    }

    #[test]
    fn test_init_refuses_existing() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();
        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let nested = tmp.path().join("members");
        let project = Project::discover_from(&nested).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_discover_not_found() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
