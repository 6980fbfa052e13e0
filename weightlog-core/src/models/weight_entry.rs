use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A single dated weight measurement.
///
/// The id is assigned by the document store on creation; an entry that has
/// not been persisted yet carries no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: Option<Uuid>,
    pub date: NaiveDate,
    /// Weight in pounds.
    pub weight: f64,
    pub notes: String,
}

impl WeightEntry {
    pub fn new(date: NaiveDate, weight: f64) -> Self {
        Self {
            id: None,
            date,
            weight,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Date label used for chart axes and table rows.
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for WeightEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.1} lbs", self.date, self.weight)?;
        if !self.notes.is_empty() {
            write!(f, " ({})", self.notes)?;
        }
        Ok(())
    }
}
