use log::info;
use rand::Rng;

use crate::{
    error::ProgressionError,
    individual::Individual,
    outcomes::{run_course_observed, CourseOutcome},
    pathogen::Pathogen,
    reports::{CourseReport, ReportWriter},
};

/// Builds the demo pathogen and individual, drawing whatever the
/// configuration leaves unset. The individual is drawn first.
///
/// # Errors
/// `InvalidGeneratorCode` or `InvalidFragility` for out-of-range values.
pub fn demo_subjects<R: Rng + ?Sized>(
    pathogen_code: Option<u32>,
    fragility: Option<u8>,
    rng: &mut R,
) -> Result<(Individual, Pathogen), ProgressionError> {
    let individual = match fragility {
        Some(fragility) => Individual::with_fragility(fragility)?,
        None => Individual::new(rng),
    };
    let pathogen = match pathogen_code {
        Some(code) => Pathogen::new(code)?,
        None => Pathogen::random(rng),
    };
    Ok((individual, pathogen))
}

/// The line printed before simulating day `days_elapsed + 1`, numbered by
/// the day about to be simulated.
fn day_heading(days_elapsed: u32, individual: &Individual) -> String {
    format!(
        "Day {} Status: {}",
        days_elapsed + 1,
        individual.status_label()
    )
}

/// Follows one individual from infection to recovery or death, printing its
/// status every day and sending one course report row per day.
///
/// # Errors
/// Invalid configured values, an unresolved course, or a report write
/// failure.
pub fn run_demo<R: Rng + ?Sized>(
    pathogen_code: Option<u32>,
    fragility: Option<u8>,
    max_days: u32,
    rng: &mut R,
    mut course_report: Option<&mut ReportWriter<CourseReport>>,
) -> Result<CourseOutcome, ProgressionError> {
    let (mut individual, pathogen) = demo_subjects(pathogen_code, fragility, rng)?;

    println!("Generated individual with fragility {}", individual.fragility());
    println!(
        "Generated pathogen with generator code {}",
        pathogen.code_label()
    );
    println!("{}", pathogen.summary_label());
    println!("Status: {}", individual.status_label());
    println!("{}", individual.status_values());
    println!("Infecting individual with pathogen...\n");

    individual.infect(&pathogen);
    info!("Following one course of pathogen {}", pathogen.code_label());
    let course = run_course_observed(&mut individual, rng, max_days, |day, individual| {
        if !individual.resolved() {
            println!("{}", day_heading(day, individual));
            println!("{}", individual.status_values());
        }
        if let Some(report) = course_report.as_deref_mut() {
            report.send_report(&CourseReport::observe(day, individual))?;
        }
        Ok(())
    })?;

    println!("Outcome: {}", individual.status_label());
    println!("{}", individual.status_values());
    info!(
        "Course ended in {:?} after {} days",
        course.outcome, course.days
    );
    Ok(course)
}
