use std::ops::AddAssign;

use log::trace;
use rand::Rng;
use serde::Serialize;

use crate::{error::ProgressionError, individual::Individual};

/// Day cap used when a configuration does not set one.
pub const DEFAULT_MAX_DAYS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Survived,
    Died,
}

/// What one individual went through, from infection to resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CourseOutcome {
    pub outcome: Outcome,
    pub days: u32,
    /// Days contagious while not yet critical.
    pub contagious_days: u32,
    /// Days contagious without symptoms.
    pub asymptomatic_shedding_days: u32,
}

/// Advances an infected individual until it recovers or dies, observing its
/// flags at the end of every day.
///
/// # Errors
/// `NotInfected` if the individual was never infected, and
/// `UnresolvedCourse` if it is still infected after `max_days` days.
pub fn run_course<R: Rng + ?Sized>(
    individual: &mut Individual,
    rng: &mut R,
    max_days: u32,
) -> Result<CourseOutcome, ProgressionError> {
    run_course_observed(individual, rng, max_days, |_, _| Ok(()))
}

/// Same as [`run_course`], calling `observe` with the day number and the
/// individual once on the day of infection (day 0) and then after every
/// simulated day. An error from `observe` stops the course.
///
/// # Errors
/// Those of [`run_course`], and any error returned by `observe`.
pub fn run_course_observed<R, F>(
    individual: &mut Individual,
    rng: &mut R,
    max_days: u32,
    mut observe: F,
) -> Result<CourseOutcome, ProgressionError>
where
    R: Rng + ?Sized,
    F: FnMut(u32, &Individual) -> Result<(), ProgressionError>,
{
    if individual.susceptible() {
        return Err(ProgressionError::NotInfected);
    }

    let mut days = 0;
    let mut contagious_days = 0;
    let mut asymptomatic_shedding_days = 0;
    observe(days, individual)?;
    while !individual.resolved() {
        if days == max_days {
            return Err(ProgressionError::UnresolvedCourse { max_days });
        }
        individual.advance_one_day(rng);
        days += 1;
        if individual.shedding() && !individual.critical() {
            contagious_days += 1;
        }
        if individual.shedding() && !individual.symptomatic() {
            asymptomatic_shedding_days += 1;
        }
        observe(days, individual)?;
    }

    let outcome = if individual.dead() {
        Outcome::Died
    } else {
        Outcome::Survived
    };
    trace!(
        "Course resolved after {days} days: {outcome:?} ({})",
        individual.status_values()
    );
    Ok(CourseOutcome {
        outcome,
        days,
        contagious_days,
        asymptomatic_shedding_days,
    })
}

/// Running totals over many courses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTally {
    pub survivors: u64,
    pub deaths: u64,
    pub contagious_days: u64,
    pub asymptomatic_shedding_days: u64,
}

impl OutcomeTally {
    pub fn record(&mut self, course: &CourseOutcome) {
        match course.outcome {
            Outcome::Survived => self.survivors += 1,
            Outcome::Died => self.deaths += 1,
        }
        self.contagious_days += u64::from(course.contagious_days);
        self.asymptomatic_shedding_days += u64::from(course.asymptomatic_shedding_days);
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.survivors + self.deaths
    }

    /// Share of courses that ended in death, in `[0, 1]`; `0` when empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fatality_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.deaths as f64 / self.total() as f64
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_contagious_days(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.contagious_days as f64 / self.total() as f64
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_asymptomatic_shedding_days(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.asymptomatic_shedding_days as f64 / self.total() as f64
    }

    /// Prints the end-of-run summary lines.
    pub fn print_summary(&self) {
        println!("Death toll: {}", self.deaths);
        println!("Survivors: {}", self.survivors);
        println!("Fatality Rate: {}%", self.fatality_rate() * 100.0);
        println!(
            "Average days spent contagious: {}",
            self.mean_contagious_days()
        );
        println!(
            "Average days spent unknown contagious: {}",
            self.mean_asymptomatic_shedding_days()
        );
    }
}

impl AddAssign for OutcomeTally {
    fn add_assign(&mut self, other: Self) {
        self.survivors += other.survivors;
        self.deaths += other.deaths;
        self.contagious_days += other.contagious_days;
        self.asymptomatic_shedding_days += other.asymptomatic_shedding_days;
    }
}
