//! In-memory entry store.
//!
//! Holds the canonical, date-sorted, de-duplicated-by-date set of a single
//! user's weight entries. Mutations keep two invariants:
//!
//! 1. At most one entry per calendar date (upsert-by-date).
//! 2. The collection is sorted ascending by date after every mutation.
//!
//! Remote snapshots may transiently contain duplicate dates when another
//! client raced an insert; those are retained and ordered stably among
//! themselves rather than reconciled here.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::WeightEntry;

/// Validation failures for a submitted date/weight pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Weight must be a positive number")]
    InvalidWeight,
}

/// Result of an upsert: was a new entry created, or an existing one updated?
///
/// Either way the resulting entry is carried so the caller can hand it to
/// the persistence layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Created(WeightEntry),
    Updated(WeightEntry),
}

impl EntryOutcome {
    pub fn entry(&self) -> &WeightEntry {
        match self {
            EntryOutcome::Created(entry) | EntryOutcome::Updated(entry) => entry,
        }
    }
}

/// Result of a remove by id.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    Removed(WeightEntry),
    NotFound,
}

/// Parses and checks a submitted date string.
pub fn validate_date(date: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

/// Checks that a submitted weight is a finite positive number.
pub fn validate_weight(weight: f64) -> Result<f64, ValidationError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(ValidationError::InvalidWeight)
    }
}

/// The in-memory entry collection.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<WeightEntry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entries, ascending by date.
    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Looks up the entry recorded for a date, if any.
    pub fn by_date(&self, date: NaiveDate) -> Option<&WeightEntry> {
        self.entries.iter().find(|e| e.date == date)
    }

    /// Validates and applies a submitted date/weight/notes triple.
    ///
    /// An existing entry for the date is replaced in place (keeping its id);
    /// otherwise a new entry is inserted. On validation failure nothing is
    /// mutated.
    pub fn upsert(
        &mut self,
        date: &str,
        weight: f64,
        notes: &str,
    ) -> Result<EntryOutcome, ValidationError> {
        let date = validate_date(date)?;
        let weight = validate_weight(weight)?;

        let entry = WeightEntry::new(date, weight).with_notes(notes.trim());
        Ok(self.apply(entry))
    }

    /// Upserts an already-validated entry by date.
    ///
    /// Used both by `upsert` and to fold a store-acknowledged entry (now
    /// carrying its id) back into local state. The incoming id wins if
    /// present; otherwise the existing entry's id is kept.
    pub fn apply(&mut self, entry: WeightEntry) -> EntryOutcome {
        let outcome = match self.entries.iter_mut().find(|e| e.date == entry.date) {
            Some(existing) => {
                existing.weight = entry.weight;
                existing.notes = entry.notes;
                if entry.id.is_some() {
                    existing.id = entry.id;
                }
                EntryOutcome::Updated(existing.clone())
            }
            None => {
                self.entries.push(entry.clone());
                EntryOutcome::Created(entry)
            }
        };
        self.sort();
        outcome
    }

    /// Removes the entry with the given id, if present.
    pub fn remove(&mut self, id: Uuid) -> RemoveOutcome {
        match self.entries.iter().position(|e| e.id == Some(id)) {
            Some(index) => RemoveOutcome::Removed(self.entries.remove(index)),
            None => RemoveOutcome::NotFound,
        }
    }

    /// Replaces local state with a full remote snapshot.
    ///
    /// The snapshot always wins over whatever is held locally.
    pub fn replace_all(&mut self, entries: Vec<WeightEntry>) {
        self.entries = entries;
        self.sort();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // Stable sort: entries sharing a date keep their relative order.
    fn sort(&mut self) {
        self.entries.sort_by_key(|e| e.date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn is_sorted(store: &EntryStore) -> bool {
        store.entries().windows(2).all(|w| w[0].date <= w[1].date)
    }

    #[test]
    fn test_upsert_creates_entry() {
        let mut store = EntryStore::new();
        let outcome = store.upsert("2024-01-01", 182.0, "start").unwrap();

        assert!(matches!(outcome, EntryOutcome::Created(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].weight, 182.0);
        assert_eq!(store.entries()[0].notes, "start");
    }

    #[test]
    fn test_upsert_same_date_overwrites() {
        let mut store = EntryStore::new();
        store.upsert("2024-01-01", 182.0, "first").unwrap();
        let outcome = store.upsert("2024-01-01", 181.5, "second").unwrap();

        assert!(matches!(outcome, EntryOutcome::Updated(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].weight, 181.5);
        assert_eq!(store.entries()[0].notes, "second");
    }

    #[test]
    fn test_upsert_keeps_existing_id() {
        let mut store = EntryStore::new();
        let id = Uuid::new_v4();
        store.apply(WeightEntry::new(date("2024-01-01"), 182.0).with_id(id));

        store.upsert("2024-01-01", 181.0, "").unwrap();
        assert_eq!(store.entries()[0].id, Some(id));
    }

    #[test]
    fn test_upsert_sequence_stays_sorted_and_unique() {
        let mut store = EntryStore::new();
        for (d, w) in [
            ("2024-01-05", 181.0),
            ("2024-01-01", 183.0),
            ("2024-01-03", 182.0),
            ("2024-01-01", 182.5),
            ("2024-01-04", 181.5),
        ] {
            store.upsert(d, w, "").unwrap();
            assert!(is_sorted(&store));
        }

        let dates: Vec<_> = store.entries().iter().map(|e| e.date).collect();
        let mut unique = dates.clone();
        unique.dedup();
        assert_eq!(dates, unique);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_chart_ordering_after_out_of_order_upserts() {
        let mut store = EntryStore::new();
        store.upsert("2024-01-03", 180.0, "").unwrap();
        store.upsert("2024-01-01", 182.0, "").unwrap();

        let pairs: Vec<_> = store
            .entries()
            .iter()
            .map(|e| (e.date_label(), e.weight))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("2024-01-01".to_string(), 182.0),
                ("2024-01-03".to_string(), 180.0)
            ]
        );
    }

    #[test]
    fn test_upsert_invalid_date_is_rejected() {
        let mut store = EntryStore::new();
        let result = store.upsert("", f64::NAN, "");
        assert!(matches!(result, Err(ValidationError::InvalidDate(_))));
        assert!(store.is_empty());

        let result = store.upsert("not-a-date", 180.0, "");
        assert!(matches!(result, Err(ValidationError::InvalidDate(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_upsert_invalid_weight_is_rejected() {
        let mut store = EntryStore::new();
        for bad in [f64::NAN, f64::INFINITY, 0.0, -150.0] {
            let result = store.upsert("2024-01-01", bad, "");
            assert_eq!(result, Err(ValidationError::InvalidWeight));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_by_id() {
        let mut store = EntryStore::new();
        let id = Uuid::new_v4();
        store.apply(WeightEntry::new(date("2024-01-01"), 182.0).with_id(id));

        let outcome = store.remove(id);
        assert!(matches!(outcome, RemoveOutcome::Removed(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = EntryStore::new();
        store.upsert("2024-01-01", 182.0, "").unwrap();
        let before = store.entries().to_vec();

        let outcome = store.remove(Uuid::new_v4());
        assert_eq!(outcome, RemoveOutcome::NotFound);
        assert_eq!(store.entries(), &before[..]);
    }

    #[test]
    fn test_replace_all_sorts_and_is_idempotent() {
        let mut store = EntryStore::new();
        store.upsert("2020-06-01", 200.0, "stale local").unwrap();

        let snapshot = vec![
            WeightEntry::new(date("2024-01-03"), 180.0).with_id(Uuid::new_v4()),
            WeightEntry::new(date("2024-01-01"), 182.0).with_id(Uuid::new_v4()),
        ];
        store.replace_all(snapshot.clone());
        let first = store.entries().to_vec();
        assert!(is_sorted(&store));
        assert_eq!(store.len(), 2);

        store.replace_all(snapshot);
        assert_eq!(store.entries(), &first[..]);
    }

    #[test]
    fn test_replace_all_retains_duplicate_dates_stably() {
        // A concurrent client can author a snapshot with a duplicated date;
        // both rows are kept and stay in delivery order.
        let mut store = EntryStore::new();
        let a = WeightEntry::new(date("2024-01-02"), 180.0)
            .with_id(Uuid::new_v4())
            .with_notes("a");
        let b = WeightEntry::new(date("2024-01-02"), 179.0)
            .with_id(Uuid::new_v4())
            .with_notes("b");
        let earlier = WeightEntry::new(date("2024-01-01"), 182.0).with_id(Uuid::new_v4());

        store.replace_all(vec![a.clone(), b.clone(), earlier]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.entries()[1].notes, "a");
        assert_eq!(store.entries()[2].notes, "b");
    }

    #[test]
    fn test_apply_acknowledged_entry_sets_id() {
        let mut store = EntryStore::new();
        store.upsert("2024-01-01", 182.0, "note").unwrap();
        assert!(store.entries()[0].id.is_none());

        let id = Uuid::new_v4();
        let acked = WeightEntry::new(date("2024-01-01"), 182.0)
            .with_notes("note")
            .with_id(id);
        let outcome = store.apply(acked);

        assert!(matches!(outcome, EntryOutcome::Updated(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].id, Some(id));
    }

    #[test]
    fn test_upsert_trims_notes() {
        let mut store = EntryStore::new();
        store.upsert("2024-01-01", 182.0, "  gym day  ").unwrap();
        assert_eq!(store.entries()[0].notes, "gym day");
    }
}
