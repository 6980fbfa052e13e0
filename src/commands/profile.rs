use clap::{Args, Subcommand};

use weightlog_core::{ProfilePatch, WeightTracker};

use crate::db::JsonStore;

#[derive(Args)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Show the stored profile
    Show,

    /// Update profile fields; omitted fields keep their values
    Set {
        /// Daily calorie target
        #[arg(long)]
        target_calories: Option<u32>,

        /// Height, feet part
        #[arg(long)]
        height_ft: Option<u32>,

        /// Height, inches part
        #[arg(long)]
        height_in: Option<u32>,
    },
}

impl ProfileCommand {
    pub async fn run(
        &self,
        tracker: &WeightTracker<JsonStore>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ProfileSubcommand::Show => {
                let profile = tracker.profile().await?;
                match profile.height() {
                    Some((ft, inches)) => println!("Height: {}'{}\"", ft, inches),
                    None => println!("Height: not set"),
                }
                match profile.target_calories {
                    Some(calories) => println!("Target calories: {}", calories),
                    None => println!("Target calories: not set"),
                }
                Ok(())
            }
            ProfileSubcommand::Set {
                target_calories,
                height_ft,
                height_in,
            } => {
                if target_calories.is_none() && height_ft.is_none() && height_in.is_none() {
                    return Err("Nothing to set; pass at least one field".into());
                }

                let patch = ProfilePatch {
                    target_calories: *target_calories,
                    height_ft: *height_ft,
                    height_in: *height_in,
                };
                tracker.save_profile(&patch).await?;
                println!("Profile updated.");
                Ok(())
            }
        }
    }
}
