use clap::Args;

use weightlog_core::WeightTracker;

use crate::db::JsonStore;

#[derive(Args)]
pub struct BmiCommand {}

impl BmiCommand {
    pub async fn run(
        &self,
        tracker: &WeightTracker<JsonStore>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match tracker.bmi_check().await? {
            Some(report) => println!("{}", report),
            None => println!("Cancelled."),
        }
        Ok(())
    }
}
