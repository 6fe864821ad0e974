//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::Project;

/// Flock configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author recorded on new entries
    pub author: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Notification preferences
    pub notifications: Option<NotificationPrefs>,
}

/// Per-project notification preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPrefs {
    /// Append a feed notice when a new visitor is added
    pub visitor_alerts: bool,

    /// Remind about pending follow-ups in `flock status`
    pub followup_reminders: bool,

    /// Mention the monthly report in `flock status`
    pub monthly_reports: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            visitor_alerts: true,
            followup_reminders: true,
            monthly_reports: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/flock/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Project config (.flock/config.yaml)
        if let Ok(project) = Project::discover() {
            let project_config_path = project.flock_dir().join("config.yaml");
            if project_config_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&project_config_path) {
                    if let Ok(project_config) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(project_config);
                    }
                }
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("FLOCK_AUTHOR") {
            config.author = Some(author);
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "flock")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.notifications.is_some() {
            self.notifications = other.notifications;
        }
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        // Try git config
        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        // Fall back to username
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Effective notification preferences
    pub fn notifications(&self) -> NotificationPrefs {
        self.notifications.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefs() {
        let prefs = NotificationPrefs::default();
        assert!(prefs.visitor_alerts);
        assert!(prefs.followup_reminders);
        assert!(!prefs.monthly_reports);
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            author: Some("base".to_string()),
            ..Config::default()
        };
        base.merge(Config {
            author: Some("override".to_string()),
            ..Config::default()
        });
        assert_eq!(base.author.as_deref(), Some("override"));
    }

    #[test]
    fn test_prefs_parse_from_yaml() {
        let config: Config = serde_yml::from_str(
            "notifications:\n  visitor_alerts: false\n  monthly_reports: true\n",
        )
        .unwrap();
        let prefs = config.notifications();
        assert!(!prefs.visitor_alerts);
        assert!(prefs.followup_reminders); // defaulted
        assert!(prefs.monthly_reports);
    }
}
