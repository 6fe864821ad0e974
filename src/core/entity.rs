//! Record trait - common interface for all record types

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::EntityId;

/// Common trait for all Flock records
pub trait Record: Serialize + DeserializeOwned {
    /// The record type prefix (e.g., "MBR", "VIS")
    const PREFIX: &'static str;

    /// Get the record's unique ID
    fn id(&self) -> &EntityId;

    /// Get the person's full name
    fn full_name(&self) -> &str;

    /// Contact email, if any (members carry none)
    fn email(&self) -> Option<&str> {
        None
    }

    /// Contact phone number, if any
    fn phone(&self) -> Option<&str> {
        None
    }

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last-update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Composite identity used by merge-mode imports to spot duplicates:
    /// lower-cased email (or empty) + phone (or empty) + lower-cased name.
    fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.email().map(|e| e.to_lowercase()).unwrap_or_default(),
            self.phone().unwrap_or_default(),
            self.full_name().to_lowercase()
        )
    }
}

/// Service cohorts a person can belong to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ServiceGroup {
    Children,
    Teens,
    Youth,
    #[default]
    Adults,
}

impl ServiceGroup {
    /// All groups, in display order
    pub fn all() -> &'static [ServiceGroup] {
        &[
            ServiceGroup::Children,
            ServiceGroup::Teens,
            ServiceGroup::Youth,
            ServiceGroup::Adults,
        ]
    }

    /// Whether members of this group need a parent/guardian on record
    pub fn requires_guardian(&self) -> bool {
        matches!(self, ServiceGroup::Children | ServiceGroup::Teens)
    }

    /// The label used in CSV exports ("Victory Land" is the children's
    /// service branding; everything else is capitalized)
    pub fn export_label(&self) -> &'static str {
        match self {
            ServiceGroup::Children => "Victory Land",
            ServiceGroup::Teens => "Teens",
            ServiceGroup::Youth => "Youth",
            ServiceGroup::Adults => "Adults",
        }
    }
}

impl std::fmt::Display for ServiceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceGroup::Children => write!(f, "children"),
            ServiceGroup::Teens => write!(f, "teens"),
            ServiceGroup::Youth => write!(f, "youth"),
            ServiceGroup::Adults => write!(f, "adults"),
        }
    }
}

impl std::str::FromStr for ServiceGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "children" => Ok(ServiceGroup::Children),
            "teens" => Ok(ServiceGroup::Teens),
            "youth" => Ok(ServiceGroup::Youth),
            "adults" => Ok(ServiceGroup::Adults),
            _ => Err(format!("Unknown service group: {}", s)),
        }
    }
}

/// Gender as recorded on membership forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}
