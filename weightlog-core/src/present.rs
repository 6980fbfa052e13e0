//! Presentation adapter.
//!
//! Pure derivations of chart series and table rows from an entry slice.
//! Nothing here holds state; callers recompute on every store change.

use uuid::Uuid;

use crate::models::WeightEntry;

/// Placeholder shown in the notes column for entries without notes.
const NOTES_PLACEHOLDER: &str = "-";

/// A single chart point: date label on the x axis, weight on the y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub weight: f64,
}

/// Chart-ready data, or a no-data signal for the empty collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// No entries; render a placeholder instead of an empty chart.
    Empty,
    Series(Vec<ChartPoint>),
}

/// A rendered table row. The id is carried for delete-action binding and is
/// absent only for entries not yet acknowledged by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: Option<Uuid>,
    pub date: String,
    /// Weight formatted to one decimal place.
    pub weight: String,
    pub notes: String,
}

/// Derives the ordered (date-label, weight) series for the chart collaborator.
pub fn chart_data(entries: &[WeightEntry]) -> ChartData {
    if entries.is_empty() {
        return ChartData::Empty;
    }
    ChartData::Series(
        entries
            .iter()
            .map(|e| ChartPoint {
                label: e.date_label(),
                weight: e.weight,
            })
            .collect(),
    )
}

/// Derives table rows from the current entry set.
pub fn table_rows(entries: &[WeightEntry]) -> Vec<TableRow> {
    entries
        .iter()
        .map(|e| TableRow {
            id: e.id,
            date: e.date_label(),
            weight: format!("{:.1}", e.weight),
            notes: if e.notes.is_empty() {
                NOTES_PLACEHOLDER.to_string()
            } else {
                e.notes.clone()
            },
        })
        .collect()
}

/// Tooltip enrichment: notes for the entry behind a chart label.
pub fn notes_for_label<'a>(entries: &'a [WeightEntry], label: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|e| e.date_label() == label && !e.notes.is_empty())
        .map(|e| e.notes.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(date: &str, weight: f64, notes: &str) -> WeightEntry {
        WeightEntry::new(date.parse::<NaiveDate>().unwrap(), weight)
            .with_notes(notes)
            .with_id(Uuid::new_v4())
    }

    #[test]
    fn test_chart_data_empty_signals_no_data() {
        assert_eq!(chart_data(&[]), ChartData::Empty);
    }

    #[test]
    fn test_chart_data_preserves_order() {
        let entries = vec![entry("2024-01-01", 182.0, ""), entry("2024-01-03", 180.0, "")];
        let ChartData::Series(points) = chart_data(&entries) else {
            panic!("expected series");
        };
        assert_eq!(points[0].label, "2024-01-01");
        assert_eq!(points[0].weight, 182.0);
        assert_eq!(points[1].label, "2024-01-03");
        assert_eq!(points[1].weight, 180.0);
    }

    #[test]
    fn test_table_rows_format_one_decimal() {
        let entries = vec![entry("2024-01-01", 181.25, "gym")];
        let rows = table_rows(&entries);
        assert_eq!(rows[0].weight, "181.2");
        assert_eq!(rows[0].notes, "gym");
        assert!(rows[0].id.is_some());
    }

    #[test]
    fn test_table_rows_notes_placeholder() {
        let entries = vec![entry("2024-01-01", 180.0, "")];
        let rows = table_rows(&entries);
        assert_eq!(rows[0].notes, NOTES_PLACEHOLDER);
    }

    #[test]
    fn test_notes_for_label() {
        let entries = vec![
            entry("2024-01-01", 182.0, "start"),
            entry("2024-01-03", 180.0, ""),
        ];
        assert_eq!(notes_for_label(&entries, "2024-01-01"), Some("start"));
        assert_eq!(notes_for_label(&entries, "2024-01-03"), None);
        assert_eq!(notes_for_label(&entries, "2024-02-01"), None);
    }
}
