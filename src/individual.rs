//! One individual's course of disease.
//!
//! An infected individual advances on two tracks every day. The recovery
//! track gains 0 or 1 per day; the illness track gains 1 or 2. Stabilizing
//! (recovery reaching `immune_onset`) freezes the illness track, and turning
//! terminal (illness reaching `terminal_threshold`) freezes the recovery
//! track, so whichever track passes its point of no return first decides
//! the outcome.
//!
//! Only the coarse [`DiseaseState`] and the two progress counters are
//! stored. The status flags (`shedding`, `symptomatic`, `critical`,
//! `terminal`, `stabilized`) are derived from them against the bound
//! pathogen's thresholds, so no combination of flags can disagree with the
//! state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::ProgressionError,
    pathogen::Pathogen,
    random::{coin_increment, geometric_draw},
};

/// Largest baseline fragility a geometric draw can produce.
pub const MAX_FRAGILITY: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseState {
    Susceptible,
    Infected,
    Recovered,
    Dead,
}

/// The track that stopped advancing: the illness track once stabilized, the
/// recovery track once terminal. At most one ever holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frozen {
    Illness,
    Recovery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    fragility: u8,
    illness_progress: u32,
    recovery_progress: i32,
    days_infected: u32,
    state: DiseaseState,
    pathogen: Option<Pathogen>,
    // Carried over from the previous pathogen when an ongoing infection is
    // rebound, so a frozen track stays frozen.
    held_freeze: Option<Frozen>,
}

impl Individual {
    /// Creates a susceptible individual with a geometrically drawn fragility.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_valid_fragility(geometric_draw(rng))
    }

    /// Creates a susceptible individual with a fixed fragility, for
    /// controlled experiments.
    ///
    /// # Errors
    /// `InvalidFragility` if `fragility` is above [`MAX_FRAGILITY`].
    pub fn with_fragility(fragility: u8) -> Result<Self, ProgressionError> {
        if fragility > MAX_FRAGILITY {
            return Err(ProgressionError::InvalidFragility(fragility));
        }
        Ok(Self::from_valid_fragility(fragility))
    }

    fn from_valid_fragility(fragility: u8) -> Self {
        Self {
            fragility,
            illness_progress: 0,
            recovery_progress: -i32::from(fragility),
            days_infected: 0,
            state: DiseaseState::Susceptible,
            pathogen: None,
            held_freeze: None,
        }
    }

    /// Binds `pathogen` to the individual.
    ///
    /// Safe to call in any state: recovered individuals are immune and the
    /// dead stay dead. An ongoing infection switches to the new pathogen and
    /// keeps its progress; flags are then read against the new thresholds,
    /// except that a track already frozen by stabilization or by turning
    /// terminal stays frozen.
    pub fn infect(&mut self, pathogen: &Pathogen) {
        match self.state {
            DiseaseState::Susceptible => self.state = DiseaseState::Infected,
            DiseaseState::Infected => self.held_freeze = self.frozen(),
            DiseaseState::Recovered | DiseaseState::Dead => return,
        }
        self.pathogen = Some(*pathogen);
    }

    /// Advances the course by one day.
    ///
    /// Does nothing unless the individual is currently infected. The recovery
    /// track is drawn first (skipped once terminal), then the illness track
    /// (skipped once stabilized).
    pub fn advance_one_day<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.state != DiseaseState::Infected {
            return;
        }
        let Some(pathogen) = self.pathogen else {
            return;
        };

        self.days_infected += 1;
        if !self.terminal() {
            self.progress_recovery(&pathogen, rng);
        }
        if !self.stabilized() {
            self.progress_illness(&pathogen, rng);
        }
    }

    fn progress_recovery<R: Rng + ?Sized>(&mut self, pathogen: &Pathogen, rng: &mut R) {
        // 0.5 per day on average
        self.recovery_progress += coin_increment(rng) as i32;
        if self.recovery_progress >= i32::from(pathogen.recovered_threshold()) {
            self.state = DiseaseState::Recovered;
        }
    }

    fn progress_illness<R: Rng + ?Sized>(&mut self, pathogen: &Pathogen, rng: &mut R) {
        // 1.5 per day on average
        self.illness_progress += 1 + coin_increment(rng);
        if self.illness_progress >= u32::from(pathogen.dead_threshold()) {
            self.state = DiseaseState::Dead;
        }
    }

    /// The pathogen's thresholds, while an infection is ongoing.
    fn active_pathogen(&self) -> Option<&Pathogen> {
        match self.state {
            DiseaseState::Infected => self.pathogen.as_ref(),
            _ => None,
        }
    }

    /// Which track no longer advances. Stabilization is checked first, as the
    /// recovery track is drawn first each day.
    fn frozen(&self) -> Option<Frozen> {
        let pathogen = self.active_pathogen()?;
        if self.held_freeze.is_some() {
            return self.held_freeze;
        }
        if self.days_infected > 0
            && self.recovery_progress >= i32::from(pathogen.immune_onset())
        {
            Some(Frozen::Illness)
        } else if self.illness_progress >= u32::from(pathogen.terminal_threshold()) {
            Some(Frozen::Recovery)
        } else {
            None
        }
    }

    fn illness_reached(&self, threshold: impl Fn(&Pathogen) -> u8) -> bool {
        self.active_pathogen()
            .is_some_and(|p| self.illness_progress >= u32::from(threshold(p)))
    }

    #[must_use]
    pub fn state(&self) -> DiseaseState {
        self.state
    }
    #[must_use]
    pub fn pathogen(&self) -> Option<&Pathogen> {
        self.pathogen.as_ref()
    }
    #[must_use]
    pub fn fragility(&self) -> u8 {
        self.fragility
    }
    #[must_use]
    pub fn illness_progress(&self) -> u32 {
        self.illness_progress
    }
    #[must_use]
    pub fn recovery_progress(&self) -> i32 {
        self.recovery_progress
    }
    /// Days advanced while infected.
    #[must_use]
    pub fn days_infected(&self) -> u32 {
        self.days_infected
    }

    /// Not currently ill: either never infected or recovered.
    #[must_use]
    pub fn healthy(&self) -> bool {
        matches!(
            self.state,
            DiseaseState::Susceptible | DiseaseState::Recovered
        )
    }
    #[must_use]
    pub fn susceptible(&self) -> bool {
        self.state == DiseaseState::Susceptible
    }
    #[must_use]
    pub fn infected(&self) -> bool {
        self.state == DiseaseState::Infected
    }
    #[must_use]
    pub fn recovered(&self) -> bool {
        self.state == DiseaseState::Recovered
    }
    #[must_use]
    pub fn dead(&self) -> bool {
        self.state == DiseaseState::Dead
    }
    /// Recovered or dead; further days change nothing.
    #[must_use]
    pub fn resolved(&self) -> bool {
        matches!(self.state, DiseaseState::Recovered | DiseaseState::Dead)
    }

    /// Immune control reached: the illness track no longer advances.
    ///
    /// Only evaluated after the first day, since the recovery track has not
    /// been drawn before that.
    #[must_use]
    pub fn stabilized(&self) -> bool {
        self.state == DiseaseState::Recovered || self.frozen() == Some(Frozen::Illness)
    }

    /// Contagious: illness reached `shedding_onset` and not yet stabilized.
    #[must_use]
    pub fn shedding(&self) -> bool {
        !self.stabilized() && self.illness_reached(Pathogen::shedding_onset)
    }
    #[must_use]
    pub fn symptomatic(&self) -> bool {
        self.illness_reached(Pathogen::symptom_onset)
    }
    #[must_use]
    pub fn critical(&self) -> bool {
        self.illness_reached(Pathogen::critical_threshold)
    }
    /// Past the point where recovery can still progress.
    #[must_use]
    pub fn terminal(&self) -> bool {
        self.frozen() == Some(Frozen::Recovery)
    }

    /// Human-readable status, e.g. `Infected, Sick, Contagious`.
    #[must_use]
    pub fn status_label(&self) -> String {
        match self.state {
            DiseaseState::Dead => "Dead".to_string(),
            DiseaseState::Recovered => "Recovered".to_string(),
            DiseaseState::Susceptible => "Susceptible".to_string(),
            DiseaseState::Infected => {
                let severity = if self.terminal() {
                    "Terminal"
                } else if self.critical() {
                    "Critical"
                } else if self.symptomatic() {
                    "Sick"
                } else {
                    "Asymptomatic"
                };
                let mut label = format!("Infected, {severity}");
                if self.stabilized() {
                    label.push_str(", Stable");
                }
                if self.shedding() {
                    label.push_str(", Contagious");
                }
                label
            }
        }
    }

    /// The two progress counters, e.g. `Illness: 4, Recovery: -1`.
    #[must_use]
    pub fn status_values(&self) -> String {
        format!(
            "Illness: {}, Recovery: {}",
            self.illness_progress, self.recovery_progress
        )
    }
}
