// Cleaning steps, applied in order: workout types, steps, derived ratio

use crate::dataframe::{FitnessFrame, CALORIES_PER_STEP};
use crate::na::NA;
use crate::series::NASeries;

impl FitnessFrame {
    /// Trims and title-cases every workout type; blank values become NA
    pub fn clean_workout_types(&mut self) {
        let cleaned = self.workout_type.str().strip().str().title().blank_to_na();
        log::debug!(
            "normalised workout types: {} distinct values",
            cleaned.unique().len()
        );
        self.workout_type = cleaned;
    }

    /// Sets every `Steps <= 0` cell to NA and returns how many were changed
    pub fn invalidate_nonpositive_steps(&mut self) -> usize {
        let mut invalidated = 0;
        for cell in self.steps.values_mut() {
            if matches!(cell, NA::Value(v) if *v <= 0.0) {
                *cell = NA::NA;
                invalidated += 1;
            }
        }
        if invalidated > 0 {
            log::info!("set {} non-positive step counts to NA", invalidated);
        }
        invalidated
    }

    /// Adds `Calories_per_Step = Calories_Burned / Steps`
    ///
    /// NA wherever either operand is NA. Steps are expected to be cleaned
    /// first; a remaining zero divisor also yields NA.
    pub fn derive_calories_per_step(&mut self) {
        let values = self
            .calories_burned
            .values()
            .iter()
            .zip(self.steps.values())
            .map(|(&calories, &steps)| calories / steps)
            .collect();
        self.calories_per_step = Some(NASeries::new(values, Some(CALORIES_PER_STEP.to_string())));
    }
}
