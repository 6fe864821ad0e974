//! Canonicalizers for imported vocabulary
//!
//! Import sources are uncontrolled spreadsheets, so these functions are
//! total: any input - empty, misspelled, or garbage - lands on a canonical
//! value. "adults" and "pending" are the universal fallbacks; a row is never
//! rejected for an unrecognized category.

use chrono::Datelike;

use crate::core::entity::ServiceGroup;
use crate::entities::{ConvertFollowUp, PartialDate, VisitorFollowUp};

/// Map free text onto a service cohort. Unrecognized input means adults.
pub fn service_group(input: &str) -> ServiceGroup {
    match input.trim().to_lowercase().as_str() {
        "child" | "children" | "kids" | "kid" | "victory land" | "victoryland" | "victory" => {
            ServiceGroup::Children
        }
        "teen" | "teens" => ServiceGroup::Teens,
        "youth" | "young" | "young adults" => ServiceGroup::Youth,
        _ => ServiceGroup::Adults,
    }
}

/// Map free text onto the visitor follow-up pipeline. Defaults to pending.
pub fn visitor_follow_up(input: &str) -> VisitorFollowUp {
    match input.trim().to_lowercase().as_str() {
        "contact" | "contacted" => VisitorFollowUp::Contacted,
        "convert" | "converted" => VisitorFollowUp::Converted,
        "member" | "membership" => VisitorFollowUp::Member,
        _ => VisitorFollowUp::Pending,
    }
}

/// Map free text onto the convert follow-up pipeline. Defaults to pending.
/// "disicpled" is a misspelling seen in real data and is accepted.
pub fn convert_follow_up(input: &str) -> ConvertFollowUp {
    match input.trim().to_lowercase().as_str() {
        "contact" | "contacted" => ConvertFollowUp::Contacted,
        "disciple" | "discipled" | "disicpled" => ConvertFollowUp::Discipled,
        _ => ConvertFollowUp::Pending,
    }
}

/// Extract a month/day birth date from free text.
///
/// Accepts the stored `--MM-DD` form, bare `MM-DD`, or any full date this
/// can parse (the year is discarded). Empty or unparseable input yields
/// None; this never fails a row.
pub fn birth_date(input: &str) -> Option<PartialDate> {
    let v = input.trim();
    if v.is_empty() {
        return None;
    }

    if let Some(body) = v.strip_prefix("--") {
        if let Some((month, day)) = two_digit_pair(body) {
            return PartialDate::new(month, day);
        }
    }

    if let Some((month, day)) = two_digit_pair(v) {
        return PartialDate::new(month, day);
    }

    full_date_month_day(v).and_then(|(month, day)| PartialDate::new(month, day))
}

/// Match exactly `DD-DD` (two digits, dash, two digits)
fn two_digit_pair(s: &str) -> Option<(u32, u32)> {
    let (mm, dd) = s.split_once('-')?;
    if mm.len() != 2 || dd.len() != 2 {
        return None;
    }
    if !mm.bytes().all(|b| b.is_ascii_digit()) || !dd.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((mm.parse().ok()?, dd.parse().ok()?))
}

/// Pull month/day out of a full date string, trying the formats import
/// sources actually use
fn full_date_month_day(s: &str) -> Option<(u32, u32)> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some((dt.month(), dt.day()));
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(s, fmt) {
            return Some((date.month(), date.day()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_group_children_aliases() {
        for alias in ["child", "children", "kids", "kid", "victory land", "victoryland", "victory"]
        {
            assert_eq!(service_group(alias), ServiceGroup::Children, "{}", alias);
        }
        // Case and whitespace tolerant
        assert_eq!(service_group("  KIDS "), ServiceGroup::Children);
        assert_eq!(service_group("Victory Land"), ServiceGroup::Children);
    }

    #[test]
    fn test_service_group_other_cohorts() {
        assert_eq!(service_group("teen"), ServiceGroup::Teens);
        assert_eq!(service_group("Teens"), ServiceGroup::Teens);
        assert_eq!(service_group("young adults"), ServiceGroup::Youth);
        assert_eq!(service_group("young"), ServiceGroup::Youth);
    }

    #[test]
    fn test_service_group_fallback_is_adults() {
        // The fallback is specifically adults, not just "some value"
        assert_eq!(service_group(""), ServiceGroup::Adults);
        assert_eq!(service_group("adults"), ServiceGroup::Adults);
        assert_eq!(service_group("senior choir"), ServiceGroup::Adults);
        assert_eq!(service_group("garbage!!!"), ServiceGroup::Adults);
    }

    #[test]
    fn test_visitor_follow_up() {
        assert_eq!(visitor_follow_up("contact"), VisitorFollowUp::Contacted);
        assert_eq!(visitor_follow_up("Contacted"), VisitorFollowUp::Contacted);
        assert_eq!(visitor_follow_up("convert"), VisitorFollowUp::Converted);
        assert_eq!(visitor_follow_up("converted"), VisitorFollowUp::Converted);
        assert_eq!(visitor_follow_up("membership"), VisitorFollowUp::Member);
        assert_eq!(visitor_follow_up("member"), VisitorFollowUp::Member);
    }

    #[test]
    fn test_visitor_follow_up_fallback_is_pending() {
        assert_eq!(visitor_follow_up(""), VisitorFollowUp::Pending);
        assert_eq!(visitor_follow_up("nonsense"), VisitorFollowUp::Pending);
        // "discipled" belongs to the convert vocabulary, not the visitor one
        assert_eq!(visitor_follow_up("discipled"), VisitorFollowUp::Pending);
    }

    #[test]
    fn test_convert_follow_up() {
        assert_eq!(convert_follow_up("contacted"), ConvertFollowUp::Contacted);
        assert_eq!(convert_follow_up("disciple"), ConvertFollowUp::Discipled);
        assert_eq!(convert_follow_up("discipled"), ConvertFollowUp::Discipled);
        // The known misspelling is tolerated
        assert_eq!(convert_follow_up("disicpled"), ConvertFollowUp::Discipled);
    }

    #[test]
    fn test_convert_follow_up_fallback_is_pending() {
        assert_eq!(convert_follow_up(""), ConvertFollowUp::Pending);
        // Visitor-only states fall back rather than crossing vocabularies
        assert_eq!(convert_follow_up("member"), ConvertFollowUp::Pending);
        assert_eq!(convert_follow_up("converted"), ConvertFollowUp::Pending);
    }

    #[test]
    fn test_birth_date_already_partial() {
        assert_eq!(birth_date("--12-25"), PartialDate::new(12, 25));
    }

    #[test]
    fn test_birth_date_bare_month_day() {
        assert_eq!(birth_date("12-25"), PartialDate::new(12, 25));
        assert_eq!(birth_date(" 03-07 "), PartialDate::new(3, 7));
    }

    #[test]
    fn test_birth_date_full_date_discards_year() {
        assert_eq!(birth_date("1990-12-25"), PartialDate::new(12, 25));
        assert_eq!(birth_date("12/25/1990"), PartialDate::new(12, 25));
        assert_eq!(birth_date("1990-12-25T08:30:00Z"), PartialDate::new(12, 25));
    }

    #[test]
    fn test_birth_date_never_fails() {
        assert_eq!(birth_date(""), None);
        assert_eq!(birth_date("   "), None);
        assert_eq!(birth_date("not a date"), None);
        assert_eq!(birth_date("99-99"), None);
        assert_eq!(birth_date("1-2"), None); // single digits are not MM-DD
    }
}
