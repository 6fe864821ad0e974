//! Merge/replace resolution against the existing collection

use std::collections::HashSet;

use crate::core::entity::Record;

/// How a freshly materialized batch combines with the existing collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ImportMode {
    /// The batch becomes the entire collection; previous contents are
    /// discarded unconditionally (no undo)
    #[default]
    Replace,
    /// Deduplicate the batch against the existing collection by composite
    /// identity (email + phone + name); existing records win ties
    Merge,
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportMode::Replace => write!(f, "replace"),
            ImportMode::Merge => write!(f, "merge"),
        }
    }
}

/// Combine the batch with the existing collection under the given mode.
///
/// Merge iterates the existing collection first, so pre-existing records
/// keep their relative order and win key ties; new, non-duplicate records
/// follow in source order.
pub fn resolve<T: Record>(mode: ImportMode, existing: Vec<T>, batch: Vec<T>) -> Vec<T> {
    match mode {
        ImportMode::Replace => batch,
        ImportMode::Merge => {
            let mut seen: HashSet<String> = HashSet::new();
            let mut out = Vec::with_capacity(existing.len() + batch.len());
            for record in existing.into_iter().chain(batch) {
                if seen.insert(record.dedup_key()) {
                    out.push(record);
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::ServiceGroup;
    use crate::entities::Visitor;

    fn visitor(name: &str, email: Option<&str>, phone: Option<&str>) -> Visitor {
        let mut v = Visitor::new(name.to_string(), ServiceGroup::Adults);
        v.email = email.map(|s| s.to_string());
        v.phone_number = phone.map(|s| s.to_string());
        v
    }

    #[test]
    fn test_replace_discards_existing() {
        let existing = vec![visitor("Old", None, None), visitor("Older", None, None)];
        let batch = vec![visitor("New", None, None)];
        let out = resolve(ImportMode::Replace, existing, batch);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].full_name, "New");
    }

    #[test]
    fn test_replace_with_empty_batch_yields_empty() {
        let existing = vec![visitor("Old", None, None)];
        let out = resolve(ImportMode::Replace, existing, Vec::new());
        assert!(out.is_empty());
    }

    #[test]
    fn test_merge_skips_duplicate_keys() {
        let existing = vec![visitor("Jane Doe", Some("jane@x.com"), Some("555"))];
        let batch = vec![
            visitor("Jane Doe", Some("JANE@X.COM"), Some("555")), // same key, case-folded
            visitor("New Person", None, None),
        ];
        let out = resolve(ImportMode::Merge, existing, batch);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].full_name, "Jane Doe");
        assert_eq!(out[1].full_name, "New Person");
    }

    #[test]
    fn test_merge_existing_wins_ties_and_keeps_order() {
        let mut old = visitor("Jane Doe", None, None);
        old.notes = Some("the original".to_string());
        let existing = vec![old, visitor("Second", None, None)];
        let batch = vec![visitor("Jane Doe", None, None)];

        let out = resolve(ImportMode::Merge, existing, batch);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].notes.as_deref(), Some("the original"));
        assert_eq!(out[1].full_name, "Second");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let batch = vec![
            visitor("A", Some("a@x.com"), None),
            visitor("B", None, Some("111")),
        ];
        let once = resolve(ImportMode::Merge, Vec::new(), batch.clone());
        let size_after_first = once.len();
        let twice = resolve(ImportMode::Merge, once, batch);
        assert_eq!(twice.len(), size_after_first);
    }

    #[test]
    fn test_merge_distinguishes_same_name_different_contact() {
        let existing = vec![visitor("Jane Doe", Some("jane@x.com"), None)];
        let batch = vec![visitor("Jane Doe", Some("other@x.com"), None)];
        let out = resolve(ImportMode::Merge, existing, batch);
        assert_eq!(out.len(), 2);
    }
}
