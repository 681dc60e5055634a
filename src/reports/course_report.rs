use serde::{Deserialize, Serialize};

use crate::individual::{DiseaseState, Individual};

/// One row per simulated day of a single individual's course.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct CourseReport {
    pub day: u32,
    pub state: DiseaseState,
    pub status: String,
    pub illness_progress: u32,
    pub recovery_progress: i32,
    pub shedding: bool,
    pub symptomatic: bool,
    pub critical: bool,
    pub terminal: bool,
    pub stabilized: bool,
}

impl CourseReport {
    #[must_use]
    pub fn observe(day: u32, individual: &Individual) -> Self {
        Self {
            day,
            state: individual.state(),
            status: individual.status_label(),
            illness_progress: individual.illness_progress(),
            recovery_progress: individual.recovery_progress(),
            shedding: individual.shedding(),
            symptomatic: individual.symptomatic(),
            critical: individual.critical(),
            terminal: individual.terminal(),
            stabilized: individual.stabilized(),
        }
    }
}
