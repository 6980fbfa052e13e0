pub mod user_profile;
pub mod weight_entry;

pub use user_profile::{ProfilePatch, UserProfile};
pub use weight_entry::WeightEntry;
