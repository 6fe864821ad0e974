//! Mapped row -> fully formed record
//!
//! Every imported row mints a fresh ID - source identity is never
//! preserved, even when the CSV carries an ID column; imported data is new
//! facts, not an upsert. Missing names become "Unnamed", missing timestamps
//! become "now" at materialization time, and enum fields go through the
//! canonicalizers, so no row can fail here.

use chrono::{DateTime, NaiveDate, Utc};

use crate::core::entity::Gender;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::{Convert, Member, Visitor};

use super::canon;
use super::mapper::ColumnMap;
use super::parser::CsvTable;

/// Positional access to one data row, resolved either through the identity
/// headers (strict mode) or through a column map (mapping mode).
///
/// Lookups are defensive: an unmapped field, unknown header, or short row
/// all read as the empty string.
pub struct RowView<'a> {
    table: &'a CsvTable,
    row: &'a [String],
    map: Option<&'a ColumnMap>,
}

impl<'a> RowView<'a> {
    pub fn new(table: &'a CsvTable, row: &'a [String], map: Option<&'a ColumnMap>) -> Self {
        Self { table, row, map }
    }

    /// Value of a canonical field in this row, trimmed; "" when absent
    pub fn field(&self, name: &str) -> String {
        let source = match self.map {
            Some(map) => match map.get(name) {
                Some(source) => source,
                None => return String::new(),
            },
            None => name,
        };

        self.table
            .header_index(source)
            .and_then(|idx| self.row.get(idx))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}

/// Build a member from a row
pub fn member(view: &RowView) -> Member {
    let now = Utc::now();
    Member {
        id: EntityId::new(EntityPrefix::Mbr),
        full_name: person_name(view.field("Full Name")),
        gender: view.field("Gender").parse::<Gender>().ok(),
        date_of_birth: canon::birth_date(&view.field("Date of Birth")),
        phone_number: non_empty(view.field("Phone")),
        parent_guardian: non_empty(view.field("Parent/Guardian")),
        service_category: canon::service_group(&view.field("Service Category")),
        care_group: non_empty(view.field("Care Group")),
        notes: None,
        created_at: timestamp_or(view.field("Created At"), now),
        updated_at: timestamp_or(view.field("Updated At"), now),
    }
}

/// Build a visitor from a row
pub fn visitor(view: &RowView) -> Visitor {
    let now = Utc::now();
    Visitor {
        id: EntityId::new(EntityPrefix::Vis),
        full_name: person_name(view.field("Full Name")),
        phone_number: non_empty(view.field("Phone")),
        email: non_empty(view.field("Email")),
        service_attended: canon::service_group(&view.field("Service Attended")),
        first_visit_date: event_date_or(view.field("First Visit Date"), now.date_naive()),
        how_heard: non_empty(view.field("How Heard")),
        areas_of_interest: split_interests(&view.field("Areas of Interest")),
        follow_up: canon::visitor_follow_up(&view.field("Follow-up")),
        notes: None,
        created_at: timestamp_or(view.field("Created At"), now),
        updated_at: timestamp_or(view.field("Updated At"), now),
    }
}

/// Build a convert from a row
pub fn convert(view: &RowView) -> Convert {
    let now = Utc::now();
    Convert {
        id: EntityId::new(EntityPrefix::Cvt),
        full_name: person_name(view.field("Full Name")),
        phone_number: non_empty(view.field("Phone")),
        email: non_empty(view.field("Email")),
        service_attended: canon::service_group(&view.field("Service")),
        date_of_conversion: event_date_or(view.field("Date of Conversion"), now.date_naive()),
        follow_up: canon::convert_follow_up(&view.field("Follow-up Status")),
        assigned_leader: non_empty(view.field("Assigned Leader")),
        notes: None,
        created_at: timestamp_or(view.field("Created At"), now),
        updated_at: timestamp_or(view.field("Updated At"), now),
    }
}

fn person_name(value: String) -> String {
    if value.is_empty() {
        "Unnamed".to_string()
    } else {
        value
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// `;`-separated tags, trimmed, empty segments dropped
fn split_interests(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Timestamp cell -> DateTime, falling back to `now` when empty or
/// unparseable
fn timestamp_or(value: String, now: DateTime<Utc>) -> DateTime<Utc> {
    if value.is_empty() {
        return now;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return dt.and_utc();
        }
    }
    now
}

/// Event-date cell -> NaiveDate, falling back to `today`
fn event_date_or(value: String, today: NaiveDate) -> NaiveDate {
    if value.is_empty() {
        return today;
    }
    if let Ok(date) = NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        return date;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return dt.date_naive();
    }
    today
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::ServiceGroup;
    use crate::entities::{PartialDate, VisitorFollowUp};
    use crate::import::parser;

    #[test]
    fn test_member_row_canonicalizes() {
        let table = parser::parse(
            "Full Name,Gender,Date of Birth,Phone,Service Category,Care Group,Created At,Updated At\n\
             \"Mary Smith\",female,12-25,555-1234,kids,Grace Group,,\n",
        )
        .unwrap();
        let view = RowView::new(&table, &table.rows[0], None);
        let m = member(&view);

        assert_eq!(m.full_name, "Mary Smith");
        assert_eq!(m.service_category, ServiceGroup::Children); // "kids" canonicalized
        assert_eq!(m.date_of_birth, PartialDate::new(12, 25));
        assert_eq!(m.phone_number.as_deref(), Some("555-1234"));
        assert_eq!(m.care_group.as_deref(), Some("Grace Group"));
        assert_eq!(m.created_at, m.updated_at); // both defaulted to now
    }

    #[test]
    fn test_missing_name_becomes_unnamed() {
        let table = parser::parse(
            "Full Name,Gender,Date of Birth,Phone,Service Category,Care Group,Created At,Updated At\n\
             ,,,,teens,,,\n",
        )
        .unwrap();
        let view = RowView::new(&table, &table.rows[0], None);
        let m = member(&view);

        assert_eq!(m.full_name, "Unnamed");
        assert_eq!(m.service_category, ServiceGroup::Teens);
        // Import does not enforce the guardian rule - that gate only exists
        // on manual entry
        assert!(m.parent_guardian.is_none());
    }

    #[test]
    fn test_fresh_id_minted_per_row() {
        let table = parser::parse(
            "Full Name,Gender,Date of Birth,Phone,Service Category,Care Group,Created At,Updated At\n\
             Mary,,,,adults,,,\n\
             Mary,,,,adults,,,\n",
        )
        .unwrap();
        let a = member(&RowView::new(&table, &table.rows[0], None));
        let b = member(&RowView::new(&table, &table.rows[1], None));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_timestamps_read_from_source_when_present() {
        let table = parser::parse(
            "Full Name,Gender,Date of Birth,Phone,Service Category,Care Group,Created At,Updated At\n\
             Mary,,,,adults,,2025-01-05T10:00:00Z,2025-02-01T12:30:00Z\n",
        )
        .unwrap();
        let m = member(&RowView::new(&table, &table.rows[0], None));
        assert_eq!(m.created_at.to_rfc3339(), "2025-01-05T10:00:00+00:00");
        assert_eq!(m.updated_at.to_rfc3339(), "2025-02-01T12:30:00+00:00");
    }

    #[test]
    fn test_visitor_interests_split_on_semicolons() {
        let table = parser::parse(
            "Full Name,Phone,Email,Service Attended,First Visit Date,How Heard,Areas of Interest,Follow-up,Created At,Updated At\n\
             John,,,youth,2026-03-01,friend,\"choir; ushering ; ;media\",contact,,\n",
        )
        .unwrap();
        let v = visitor(&RowView::new(&table, &table.rows[0], None));
        assert_eq!(v.areas_of_interest, vec!["choir", "ushering", "media"]);
        assert_eq!(v.follow_up, VisitorFollowUp::Contacted);
        assert_eq!(
            v.first_visit_date,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_mapped_mode_resolves_through_column_map() {
        let table = parser::parse("Name,Mobile,Group\nMary,555-1234,kids\n").unwrap();
        let mut map = ColumnMap::default();
        map.set("Full Name", "Name");
        map.set("Phone", "Mobile");
        map.set("Service Category", "Group");

        let m = member(&RowView::new(&table, &table.rows[0], Some(&map)));
        assert_eq!(m.full_name, "Mary");
        assert_eq!(m.phone_number.as_deref(), Some("555-1234"));
        assert_eq!(m.service_category, ServiceGroup::Children);
        // Unmapped fields read as empty, never via identity headers
        assert!(m.care_group.is_none());
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let table = parser::parse(
            "Full Name,Phone,Email,Service,Date of Conversion,Follow-up Status,Assigned Leader,Created At,Updated At\n\
             OnlyName\n",
        )
        .unwrap();
        let c = convert(&RowView::new(&table, &table.rows[0], None));
        assert_eq!(c.full_name, "OnlyName");
        assert!(c.phone_number.is_none());
        assert_eq!(c.service_attended, ServiceGroup::Adults);
    }
}
