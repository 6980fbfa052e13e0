//! BMI computation from imperial height and weight.

use std::fmt;

const METERS_PER_INCH: f64 = 0.0254;
const KG_PER_POUND: f64 = 0.453592;

/// Standard BMI categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obesity,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obesity => "Obesity",
        };
        write!(f, "{}", label)
    }
}

/// A computed BMI value with its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiReport {
    pub value: f64,
    pub category: BmiCategory,
}

impl fmt::Display for BmiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BMI {:.1} ({})", self.value, self.category)
    }
}

/// Computes BMI from height in feet+inches and weight in pounds.
///
/// Returns `None` for a zero height, which would divide by zero, and for a
/// height too large to total up in inches.
pub fn compute(height_ft: u32, height_in: u32, weight_lbs: f64) -> Option<BmiReport> {
    let total_inches = height_ft.checked_mul(12)?.checked_add(height_in)?;
    if total_inches == 0 {
        return None;
    }

    let height_m = f64::from(total_inches) * METERS_PER_INCH;
    let weight_kg = weight_lbs * KG_PER_POUND;
    let value = weight_kg / (height_m * height_m);

    Some(BmiReport {
        value,
        category: categorize(value),
    })
}

fn categorize(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::NormalWeight
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obesity
    }
}
