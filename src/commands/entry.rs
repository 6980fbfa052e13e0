use chrono::Local;
use clap::{Args, ValueEnum};
use uuid::Uuid;

use weightlog_core::{
    chart_data, notes_for_label, table_rows, ChartData, DeleteOutcome, EntryOutcome, WeightTracker,
};

use crate::db::JsonStore;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct LogCommand {
    /// Weight in pounds
    pub weight: f64,

    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,

    /// Optional notes for this entry
    #[arg(long, short)]
    pub notes: Option<String>,
}

impl LogCommand {
    pub async fn run(
        &self,
        tracker: &WeightTracker<JsonStore>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let date = self
            .date
            .clone()
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
        let notes = self.notes.as_deref().unwrap_or("");

        match tracker.log_entry(&date, self.weight, notes).await? {
            EntryOutcome::Created(entry) => println!("Added entry: {}", entry),
            EntryOutcome::Updated(entry) => println!("Updated entry: {}", entry),
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct HistoryCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl HistoryCommand {
    pub async fn run(
        &self,
        tracker: &WeightTracker<JsonStore>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let entries = tracker.entries();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Text => {
                if entries.is_empty() {
                    println!("No weight entries yet.");
                    return Ok(());
                }
                println!(
                    "{:<12} {:>8}  {:<24} {}",
                    "Date", "Weight", "Notes", "Id"
                );
                for row in table_rows(&entries) {
                    let id = row
                        .id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:<12} {:>8}  {:<24} {}", row.date, row.weight, row.notes, id);
                }
            }
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct ChartCommand {}

impl ChartCommand {
    pub async fn run(
        &self,
        tracker: &WeightTracker<JsonStore>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let entries = tracker.entries();

        match chart_data(&entries) {
            ChartData::Empty => println!("No weight data to chart yet."),
            ChartData::Series(points) => {
                for point in points {
                    match notes_for_label(&entries, &point.label) {
                        Some(notes) => {
                            println!("{}  {:.1} lbs  ({})", point.label, point.weight, notes)
                        }
                        None => println!("{}  {:.1} lbs", point.label, point.weight),
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct DeleteCommand {
    /// Entry id (shown in history output)
    pub id: String,
}

impl DeleteCommand {
    pub async fn run(
        &self,
        tracker: &WeightTracker<JsonStore>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let id = Uuid::parse_str(&self.id).map_err(|_| format!("Invalid entry id: {}", self.id))?;

        match tracker.delete_entry(id).await? {
            DeleteOutcome::Deleted => println!("Entry deleted."),
            DeleteOutcome::NotFound => println!("Entry was already gone."),
            DeleteOutcome::Cancelled => println!("Delete cancelled."),
        }
        Ok(())
    }
}
