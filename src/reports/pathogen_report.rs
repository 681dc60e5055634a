use serde::{Deserialize, Serialize};

use crate::{outcomes::OutcomeTally, pathogen::Pathogen};

/// One row per tested pathogen: its thresholds and how its hosts fared.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct PathogenReport {
    /// Hex, e.g. `0x00ffff33`.
    pub generator_code: String,
    pub shedding_onset: u8,
    pub symptom_onset: u8,
    pub critical_threshold: u8,
    pub terminal_threshold: u8,
    pub dead_threshold: u8,
    pub immune_onset: u8,
    pub recovered_threshold: u8,
    pub survivors: u64,
    pub deaths: u64,
    pub fatality_rate: f64,
    pub mean_contagious_days: f64,
    pub mean_asymptomatic_shedding_days: f64,
}

impl PathogenReport {
    #[must_use]
    pub fn new(pathogen: &Pathogen, tally: &OutcomeTally) -> Self {
        Self {
            generator_code: pathogen.code_label(),
            shedding_onset: pathogen.shedding_onset(),
            symptom_onset: pathogen.symptom_onset(),
            critical_threshold: pathogen.critical_threshold(),
            terminal_threshold: pathogen.terminal_threshold(),
            dead_threshold: pathogen.dead_threshold(),
            immune_onset: pathogen.immune_onset(),
            recovered_threshold: pathogen.recovered_threshold(),
            survivors: tally.survivors,
            deaths: tally.deaths,
            fatality_rate: tally.fatality_rate(),
            mean_contagious_days: tally.mean_contagious_days(),
            mean_asymptomatic_shedding_days: tally.mean_asymptomatic_shedding_days(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::PathogenReport;
    use crate::{outcomes::OutcomeTally, pathogen::Pathogen};

    #[test]
    fn test_new_pathogen_report() {
        let tally = OutcomeTally {
            survivors: 3,
            deaths: 1,
            contagious_days: 8,
            asymptomatic_shedding_days: 2,
        };
        let row = PathogenReport::new(&Pathogen::new(0x00FF_FF33).unwrap(), &tally);
        assert_eq!(row.generator_code, "0x00ffff33");
        assert_eq!(row.shedding_onset, 9);
        assert_eq!(row.dead_threshold, 31);
        assert_eq!(row.recovered_threshold, 6);
        assert_eq!(row.deaths, 1);
        assert!((row.fatality_rate - 0.25).abs() < f64::EPSILON);
        assert!((row.mean_contagious_days - 2.0).abs() < f64::EPSILON);
        assert!((row.mean_asymptomatic_shedding_days - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_small_code_is_zero_padded() {
        let row = PathogenReport::new(&Pathogen::new(0x2A).unwrap(), &OutcomeTally::default());
        assert_eq!(row.generator_code, "0x0000002a");
    }
}
