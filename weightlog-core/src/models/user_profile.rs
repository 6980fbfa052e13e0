use serde::{Deserialize, Serialize};

/// Per-user profile settings.
///
/// Saved with merge semantics: a save only overwrites the fields it carries,
/// so setting a calorie target does not clear a previously stored height.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub target_calories: Option<u32>,
    pub height_ft: Option<u32>,
    pub height_in: Option<u32>,
}

impl UserProfile {
    /// Applies a partial update, leaving unspecified fields intact.
    pub fn merge(&mut self, patch: &ProfilePatch) {
        if let Some(calories) = patch.target_calories {
            self.target_calories = Some(calories);
        }
        if let Some(ft) = patch.height_ft {
            self.height_ft = Some(ft);
        }
        if let Some(inches) = patch.height_in {
            self.height_in = Some(inches);
        }
    }

    /// Stored height as (feet, inches), if both parts are set.
    pub fn height(&self) -> Option<(u32, u32)> {
        match (self.height_ft, self.height_in) {
            (Some(ft), Some(inches)) => Some((ft, inches)),
            _ => None,
        }
    }
}

/// A partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub target_calories: Option<u32>,
    pub height_ft: Option<u32>,
    pub height_in: Option<u32>,
}
