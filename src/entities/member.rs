//! Member record type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::entity::{Gender, Record, ServiceGroup};
use crate::core::identity::{EntityId, EntityPrefix};

/// A birth date carrying only month and day.
///
/// Stored and displayed as `--MM-DD`; no year is ever recorded or trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialDate {
    month: u32,
    day: u32,
}

impl PartialDate {
    /// Build from month/day, rejecting impossible values
    pub fn new(month: u32, day: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            Some(Self { month, day })
        } else {
            None
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The `MM-DD` form used in CSV exports
    pub fn mm_dd(&self) -> String {
        format!("{:02}-{:02}", self.month, self.day)
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for PartialDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("--")
            .ok_or_else(|| format!("expected --MM-DD, got '{}'", s))?;
        let (mm, dd) = body
            .split_once('-')
            .ok_or_else(|| format!("expected --MM-DD, got '{}'", s))?;
        let month: u32 = mm.parse().map_err(|_| format!("bad month in '{}'", s))?;
        let day: u32 = dd.parse().map_err(|_| format!("bad day in '{}'", s))?;
        Self::new(month, day).ok_or_else(|| format!("out-of-range month/day in '{}'", s))
    }
}

impl Serialize for PartialDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PartialDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A church member record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier
    pub id: EntityId,

    /// Person's full name
    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Month and day only; the year is never stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<PartialDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Required at entry time for children/teens members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_guardian: Option<String>,

    /// Service cohort
    pub service_category: ServiceGroup,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub care_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last-update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member with the given name and service cohort
    pub fn new(full_name: String, service_category: ServiceGroup) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityPrefix::Mbr),
            full_name,
            gender: None,
            date_of_birth: None,
            phone_number: None,
            parent_guardian: None,
            service_category,
            care_group: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this member satisfies the guardian rule. Only manual entry
    /// enforces it; CSV import deliberately does not.
    pub fn guardian_rule_satisfied(&self) -> bool {
        !self.service_category.requires_guardian()
            || self
                .parent_guardian
                .as_deref()
                .map_or(false, |g| !g.trim().is_empty())
    }
}

impl Record for Member {
    const PREFIX: &'static str = "MBR";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn phone(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_date_display() {
        let d = PartialDate::new(12, 25).unwrap();
        assert_eq!(d.to_string(), "--12-25");
        assert_eq!(d.mm_dd(), "12-25");
    }

    #[test]
    fn test_partial_date_parse() {
        let d: PartialDate = "--03-07".parse().unwrap();
        assert_eq!(d.month(), 3);
        assert_eq!(d.day(), 7);
        assert!("03-07".parse::<PartialDate>().is_err());
        assert!("--13-07".parse::<PartialDate>().is_err());
        assert!("--00-07".parse::<PartialDate>().is_err());
    }

    #[test]
    fn test_member_yaml_roundtrip() {
        let mut member = Member::new("Mary Smith".to_string(), ServiceGroup::Children);
        member.date_of_birth = PartialDate::new(12, 25);
        member.parent_guardian = Some("Anne Smith".to_string());

        let yaml = serde_yml::to_string(&member).unwrap();
        let parsed: Member = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(member.id, parsed.id);
        assert_eq!(parsed.date_of_birth, PartialDate::new(12, 25));
        assert_eq!(parsed.service_category, ServiceGroup::Children);
    }

    #[test]
    fn test_guardian_rule() {
        let mut member = Member::new("Timmy".to_string(), ServiceGroup::Children);
        assert!(!member.guardian_rule_satisfied());
        member.parent_guardian = Some("Anne Smith".to_string());
        assert!(member.guardian_rule_satisfied());

        let adult = Member::new("Joe".to_string(), ServiceGroup::Adults);
        assert!(adult.guardian_rule_satisfied());
    }

    #[test]
    fn test_dedup_key_has_no_email() {
        let member = Member::new("Mary Smith".to_string(), ServiceGroup::Adults);
        assert_eq!(member.dedup_key(), "||mary smith");
    }
}
