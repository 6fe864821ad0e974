//! Visitor record type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Record, ServiceGroup};
use crate::core::identity::{EntityId, EntityPrefix};

/// Follow-up pipeline for visitors. Wider than the convert vocabulary: a
/// visitor can be marked converted or even member without leaving the
/// visitors collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum VisitorFollowUp {
    #[default]
    Pending,
    Contacted,
    Converted,
    Member,
}

impl std::fmt::Display for VisitorFollowUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitorFollowUp::Pending => write!(f, "pending"),
            VisitorFollowUp::Contacted => write!(f, "contacted"),
            VisitorFollowUp::Converted => write!(f, "converted"),
            VisitorFollowUp::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for VisitorFollowUp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(VisitorFollowUp::Pending),
            "contacted" => Ok(VisitorFollowUp::Contacted),
            "converted" => Ok(VisitorFollowUp::Converted),
            "member" => Ok(VisitorFollowUp::Member),
            _ => Err(format!("Unknown follow-up status: {}", s)),
        }
    }
}

/// A first-time visitor record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visitor {
    /// Unique identifier
    pub id: EntityId,

    /// Person's full name
    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Service the visitor attended
    pub service_attended: ServiceGroup,

    /// Date of the first visit
    pub first_visit_date: NaiveDate,

    /// Free text: how they heard about the church
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_heard: Option<String>,

    /// Interest tags, collected as `;`-separated values on import
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub areas_of_interest: Vec<String>,

    /// Position in the follow-up pipeline
    #[serde(default)]
    pub follow_up: VisitorFollowUp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last-update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Visitor {
    /// Create a new visitor with the given name and attended service.
    /// The first visit defaults to today.
    pub fn new(full_name: String, service_attended: ServiceGroup) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityPrefix::Vis),
            full_name,
            phone_number: None,
            email: None,
            service_attended,
            first_visit_date: now.date_naive(),
            how_heard: None,
            areas_of_interest: Vec::new(),
            follow_up: VisitorFollowUp::default(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Visitor {
    const PREFIX: &'static str = "VIS";

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
    fn test_visitor_yaml_roundtrip() {
        let mut visitor = Visitor::new("John Doe".to_string(), ServiceGroup::Youth);
        visitor.email = Some("john@example.com".to_string());
        visitor.areas_of_interest = vec!["choir".to_string(), "ushering".to_string()];
        visitor.follow_up = VisitorFollowUp::Contacted;

        let yaml = serde_yml::to_string(&visitor).unwrap();
        let parsed: Visitor = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(visitor.id, parsed.id);
        assert_eq!(parsed.areas_of_interest, visitor.areas_of_interest);
        assert_eq!(parsed.follow_up, VisitorFollowUp::Contacted);
    }

    #[test]
    fn test_follow_up_defaults_to_pending() {
        let yaml = "id: VIS-01HQ3K4N5M6P7R8S9T0BCDEFGH\nfull_name: Jane\nservice_attended: adults\nfirst_visit_date: 2026-01-10\ncreated_at: 2026-01-10T09:00:00Z\nupdated_at: 2026-01-10T09:00:00Z\n";
        let parsed: Visitor = serde_yml::from_str(yaml).unwrap();
        assert_eq!(parsed.follow_up, VisitorFollowUp::Pending);
        assert!(parsed.areas_of_interest.is_empty());
    }

    #[test]
    fn test_dedup_key_lowercases_email_and_name() {
        let mut visitor = Visitor::new("Jane DOE".to_string(), ServiceGroup::Adults);
        visitor.email = Some("Jane@Example.COM".to_string());
        visitor.phone_number = Some("555-1234".to_string());
        assert_eq!(visitor.dedup_key(), "jane@example.com|555-1234|jane doe");
    }
}
