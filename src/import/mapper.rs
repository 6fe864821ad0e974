//! Column mapping between canonical entity fields and source CSV headers
//!
//! Two modes: strict (source headers must contain every required header
//! verbatim) and mapped (a best-effort auto-proposal the user can override,
//! validated before materialization). Both failure paths name every missing
//! field in a single message.

use std::collections::HashMap;

use crate::core::identity::EntityPrefix;

use super::ImportError;

/// Required CSV headers per record type (exact, case-sensitive,
/// order-independent)
pub fn required_headers(kind: EntityPrefix) -> &'static [&'static str] {
    match kind {
        EntityPrefix::Mbr => &[
            "Full Name",
            "Gender",
            "Date of Birth",
            "Phone",
            "Service Category",
            "Care Group",
            "Created At",
            "Updated At",
        ],
        EntityPrefix::Vis => &[
            "Full Name",
            "Phone",
            "Email",
            "Service Attended",
            "First Visit Date",
            "How Heard",
            "Areas of Interest",
            "Follow-up",
            "Created At",
            "Updated At",
        ],
        EntityPrefix::Cvt => &[
            "Full Name",
            "Phone",
            "Email",
            "Service",
            "Date of Conversion",
            "Follow-up Status",
            "Assigned Leader",
            "Created At",
            "Updated At",
        ],
    }
}

/// Headers accepted but not required (offered in the mapping flow, skipped
/// by validation)
pub fn optional_headers(kind: EntityPrefix) -> &'static [&'static str] {
    match kind {
        EntityPrefix::Mbr => &["Parent/Guardian"],
        _ => &[],
    }
}

/// Every field offered for mapping, required first
pub fn mappable_headers(kind: EntityPrefix) -> Vec<&'static str> {
    let mut fields: Vec<&'static str> = required_headers(kind).to_vec();
    fields.extend_from_slice(optional_headers(kind));
    fields
}

/// Strict-mode gate: every required header must be present verbatim.
/// Names every missing header in one error.
pub fn validate_strict(kind: EntityPrefix, headers: &[String]) -> Result<(), ImportError> {
    let missing: Vec<String> = required_headers(kind)
        .iter()
        .filter(|req| !headers.iter().any(|h| h == *req))
        .map(|req| req.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingHeaders(missing))
    }
}

/// An association from canonical field names to source CSV headers
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    assoc: HashMap<String, String>,
}

impl ColumnMap {
    /// Source header mapped to a canonical field, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.assoc
            .get(field)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Map (or remap) a canonical field to a source header
    pub fn set(&mut self, field: &str, source: &str) {
        self.assoc.insert(field.to_string(), source.to_string());
    }

    /// Drop a mapping
    pub fn unset(&mut self, field: &str) {
        self.assoc.remove(field);
    }
}

/// Best-effort auto-mapping over the required fields: pass one is an exact
/// case-insensitive match, pass two matches the first word of the canonical
/// field name as a substring of the header. The first satisfying header
/// wins in each pass. Substring matching can misfire on look-alike headers;
/// that imprecision is part of the contract - the user reviews the proposal.
pub fn auto_map(kind: EntityPrefix, headers: &[String]) -> ColumnMap {
    let mut map = ColumnMap::default();

    for req in required_headers(kind) {
        let req_lower = req.trim().to_lowercase();
        let found = headers
            .iter()
            .find(|h| h.trim().to_lowercase() == req_lower)
            .or_else(|| {
                let first_word = req
                    .split(' ')
                    .next()
                    .unwrap_or_default()
                    .to_lowercase();
                headers
                    .iter()
                    .find(|h| h.to_lowercase().contains(&first_word))
            });
        if let Some(source) = found {
            map.set(req, source);
        }
    }

    map
}

/// Mapping-mode gate: every required field must map to a non-empty source
/// header. Names every unmapped field in one error.
pub fn validate_map(kind: EntityPrefix, map: &ColumnMap) -> Result<(), ImportError> {
    let unmapped: Vec<String> = required_headers(kind)
        .iter()
        .filter(|req| map.get(req).is_none())
        .map(|req| req.to_string())
        .collect();

    if unmapped.is_empty() {
        Ok(())
    } else {
        Err(ImportError::UnmappedFields(unmapped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strict_accepts_exact_headers() {
        let hdrs = headers(required_headers(EntityPrefix::Mbr));
        assert!(validate_strict(EntityPrefix::Mbr, &hdrs).is_ok());
    }

    #[test]
    fn test_strict_accepts_extra_and_reordered_headers() {
        let mut hdrs = headers(required_headers(EntityPrefix::Mbr));
        hdrs.reverse();
        hdrs.push("Parent/Guardian".to_string());
        hdrs.push("Unrelated".to_string());
        assert!(validate_strict(EntityPrefix::Mbr, &hdrs).is_ok());
    }

    #[test]
    fn test_strict_names_every_missing_header() {
        let hdrs = headers(&["Full Name", "Gender", "Phone"]);
        let err = validate_strict(EntityPrefix::Mbr, &hdrs).unwrap_err();
        match err {
            ImportError::MissingHeaders(missing) => {
                assert_eq!(
                    missing,
                    vec![
                        "Date of Birth",
                        "Service Category",
                        "Care Group",
                        "Created At",
                        "Updated At"
                    ]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_strict_is_case_sensitive() {
        let mut hdrs = headers(required_headers(EntityPrefix::Cvt));
        hdrs.retain(|h| h != "Assigned Leader");
        hdrs.push("assigned leader".to_string());
        let err = validate_strict(EntityPrefix::Cvt, &hdrs).unwrap_err();
        assert!(matches!(err, ImportError::MissingHeaders(m) if m == vec!["Assigned Leader"]));
    }

    #[test]
    fn test_auto_map_exact_case_insensitive() {
        let hdrs = headers(&["full name", "GENDER", "Date of Birth"]);
        let map = auto_map(EntityPrefix::Mbr, &hdrs);
        assert_eq!(map.get("Full Name"), Some("full name"));
        assert_eq!(map.get("Gender"), Some("GENDER"));
        assert_eq!(map.get("Date of Birth"), Some("Date of Birth"));
    }

    #[test]
    fn test_auto_map_substring_on_first_word() {
        // "Phone" should fall back to "Mobile Phone"? No - substring match
        // looks for the canonical first word inside the header.
        let hdrs = headers(&["Name of person", "Phone number (home)"]);
        let map = auto_map(EntityPrefix::Vis, &hdrs);
        // "Full" is not in either header, so Full Name stays unmapped
        assert_eq!(map.get("Full Name"), None);
        assert_eq!(map.get("Phone"), Some("Phone number (home)"));
    }

    #[test]
    fn test_auto_map_first_match_wins() {
        // Two headers contain "created"; the first one is chosen, even
        // though the second is the better fit. Documented imprecision.
        let hdrs = headers(&["created by", "Created At"]);
        let map = auto_map(EntityPrefix::Mbr, &hdrs);
        assert_eq!(map.get("Created At"), Some("Created At")); // exact wins over substring
        let hdrs = headers(&["date created by", "creation stamp"]);
        let map = auto_map(EntityPrefix::Mbr, &hdrs);
        assert_eq!(map.get("Created At"), Some("date created by"));
    }

    #[test]
    fn test_validate_map_names_every_unmapped_field() {
        let hdrs = headers(&["Full Name"]);
        let map = auto_map(EntityPrefix::Cvt, &hdrs);
        let err = validate_map(EntityPrefix::Cvt, &map).unwrap_err();
        match err {
            ImportError::UnmappedFields(unmapped) => {
                assert!(unmapped.contains(&"Email".to_string()));
                assert!(unmapped.contains(&"Date of Conversion".to_string()));
                assert!(!unmapped.contains(&"Full Name".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parent_guardian_is_optional_for_members() {
        let hdrs = headers(required_headers(EntityPrefix::Mbr));
        let map = auto_map(EntityPrefix::Mbr, &hdrs);
        // No Parent/Guardian column anywhere, still valid
        assert!(validate_map(EntityPrefix::Mbr, &map).is_ok());
        assert!(mappable_headers(EntityPrefix::Mbr).contains(&"Parent/Guardian"));
    }
}
