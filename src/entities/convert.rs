//! New convert record type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Record, ServiceGroup};
use crate::core::identity::{EntityId, EntityPrefix};

/// Follow-up pipeline for new converts. Narrower than the visitor
/// vocabulary: converts progress toward discipleship, not membership states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ConvertFollowUp {
    #[default]
    Pending,
    Contacted,
    Discipled,
}

impl std::fmt::Display for ConvertFollowUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertFollowUp::Pending => write!(f, "pending"),
            ConvertFollowUp::Contacted => write!(f, "contacted"),
            ConvertFollowUp::Discipled => write!(f, "discipled"),
        }
    }
}

impl std::str::FromStr for ConvertFollowUp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ConvertFollowUp::Pending),
            "contacted" => Ok(ConvertFollowUp::Contacted),
            "discipled" => Ok(ConvertFollowUp::Discipled),
            _ => Err(format!("Unknown follow-up status: {}", s)),
        }
    }
}

/// A new convert record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Convert {
    /// Unique identifier
    pub id: EntityId,

    /// Person's full name
    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Service attended at conversion
    pub service_attended: ServiceGroup,

    /// Date of conversion
    pub date_of_conversion: NaiveDate,

    /// Position in the follow-up pipeline
    #[serde(default)]
    pub follow_up: ConvertFollowUp,

    /// Leader assigned for discipleship follow-up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_leader: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last-update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Convert {
    /// Create a new convert with the given name and attended service.
    /// The conversion date defaults to today.
    pub fn new(full_name: String, service_attended: ServiceGroup) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityPrefix::Cvt),
            full_name,
            phone_number: None,
            email: None,
            service_attended,
            date_of_conversion: now.date_naive(),
            follow_up: ConvertFollowUp::default(),
            assigned_leader: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Convert {
    const PREFIX: &'static str = "CVT";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
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
    fn test_convert_yaml_roundtrip() {
        let mut convert = Convert::new("Peter Brown".to_string(), ServiceGroup::Adults);
        convert.assigned_leader = Some("Deacon James".to_string());
        convert.follow_up = ConvertFollowUp::Discipled;

        let yaml = serde_yml::to_string(&convert).unwrap();
        let parsed: Convert = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(convert.id, parsed.id);
        assert_eq!(parsed.follow_up, ConvertFollowUp::Discipled);
        assert_eq!(parsed.assigned_leader.as_deref(), Some("Deacon James"));
    }

    #[test]
    fn test_convert_vocabulary_has_no_member_state() {
        assert!("member".parse::<ConvertFollowUp>().is_err());
        assert!("converted".parse::<ConvertFollowUp>().is_err());
    }
}
