use log::info;
use rand::Rng;

use crate::{
    error::ProgressionError,
    individual::Individual,
    outcomes::{run_course, Outcome, OutcomeTally},
    pathogen::Pathogen,
    profiling::{increment_named_count, open_span, DEATH_LABEL, RECOVERY_LABEL},
};

/// Infects `population` fresh individuals with `pathogen` and runs every
/// course to its end.
///
/// Fragility is drawn for each individual unless `fragility` fixes it.
///
/// # Errors
/// `InvalidFragility` for a fixed fragility above 8, or `UnresolvedCourse`
/// if any course outlasts `max_days`.
pub fn run_trial<R: Rng + ?Sized>(
    pathogen: &Pathogen,
    population: usize,
    fragility: Option<u8>,
    max_days: u32,
    rng: &mut R,
) -> Result<OutcomeTally, ProgressionError> {
    let _span = open_span("trial");
    infect_population(pathogen, population, fragility, max_days, rng)
}

/// The trial loop without profiling spans, shared with sweeps.
pub(crate) fn infect_population<R: Rng + ?Sized>(
    pathogen: &Pathogen,
    population: usize,
    fragility: Option<u8>,
    max_days: u32,
    rng: &mut R,
) -> Result<OutcomeTally, ProgressionError> {
    // Validated once so the loop below can't fail halfway through.
    let template = fragility.map(Individual::with_fragility).transpose()?;

    let mut tally = OutcomeTally::default();
    for _ in 0..population {
        let mut individual = match &template {
            Some(template) => template.clone(),
            None => Individual::new(rng),
        };
        individual.infect(pathogen);
        let course = run_course(&mut individual, rng, max_days)?;
        increment_named_count(match course.outcome {
            Outcome::Died => DEATH_LABEL,
            Outcome::Survived => RECOVERY_LABEL,
        });
        tally.record(&course);
    }
    Ok(tally)
}

/// Prints the pathogen under test before a trial, as a header for the
/// summary that follows it.
pub fn print_trial_header(pathogen: &Pathogen, population: usize) {
    println!(
        "Generated pathogen with generator code {}",
        pathogen.code_label()
    );
    println!("{}", pathogen.summary_label());
    println!("Infecting {population} individuals with pathogen...\n");
    info!(
        "Starting trial of pathogen {} on {population} individuals",
        pathogen.code_label()
    );
}

#[cfg(test)]
mod test {
    use super::run_trial;
    use crate::{
        error::ProgressionError,
        outcomes::DEFAULT_MAX_DAYS,
        pathogen::Pathogen,
        random::{stream_rng, test_rng::ConstantRng},
    };

    #[test]
    fn test_constant_trials() {
        let pathogen = Pathogen::new(0x00FF_FF33).unwrap();

        let tally = run_trial(&pathogen, 10, Some(0), DEFAULT_MAX_DAYS, &mut ConstantRng::zeros())
            .unwrap();
        assert_eq!(tally.deaths, 10);
        assert_eq!(tally.survivors, 0);
        assert_eq!(tally.contagious_days, 90);
        assert!((tally.fatality_rate() - 1.0).abs() < f64::EPSILON);

        let tally = run_trial(&pathogen, 10, Some(0), DEFAULT_MAX_DAYS, &mut ConstantRng::ones())
            .unwrap();
        assert_eq!(tally.survivors, 10);
        assert_eq!(tally.deaths, 0);
        assert_eq!(tally.contagious_days, 0);
    }

    #[test]
    fn test_empty_trial() {
        let pathogen = Pathogen::new(0x00FF_FF33).unwrap();
        let tally = run_trial(&pathogen, 0, None, DEFAULT_MAX_DAYS, &mut ConstantRng::zeros())
            .unwrap();
        assert_eq!(tally.total(), 0);
        assert!(tally.fatality_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_fragility() {
        let pathogen = Pathogen::new(0x00FF_FF33).unwrap();
        let e = run_trial(&pathogen, 5, Some(12), DEFAULT_MAX_DAYS, &mut ConstantRng::zeros())
            .err();
        assert!(matches!(e, Some(ProgressionError::InvalidFragility(12))));
    }

    #[test]
    fn test_trial_is_reproducible() {
        let pathogen = Pathogen::new(0x00FF_FF33).unwrap();
        let a = run_trial(&pathogen, 500, None, DEFAULT_MAX_DAYS, &mut stream_rng(3, "trial", 0))
            .unwrap();
        let b = run_trial(&pathogen, 500, None, DEFAULT_MAX_DAYS, &mut stream_rng(3, "trial", 0))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total(), 500);
    }

    #[test]
    fn test_fatality_rate_is_stable_across_seeds() {
        let pathogen = Pathogen::new(0x00FF_FF33).unwrap();
        let rates: Vec<f64> = (0..3)
            .map(|seed| {
                run_trial(
                    &pathogen,
                    20_000,
                    None,
                    DEFAULT_MAX_DAYS,
                    &mut stream_rng(seed, "trial", 0),
                )
                .unwrap()
                .fatality_rate()
            })
            .collect();
        for rate in &rates {
            assert!(*rate > 0.0 && *rate < 1.0);
            assert!((rate - rates[0]).abs() < 0.03, "rates drifted: {rates:?}");
        }
    }

    #[test]
    fn test_frail_individuals_die_more_often() {
        let pathogen = Pathogen::new(0x00FF_FF33).unwrap();
        let sturdy = run_trial(
            &pathogen,
            5_000,
            Some(0),
            DEFAULT_MAX_DAYS,
            &mut stream_rng(5, "trial", 0),
        )
        .unwrap();
        let frail = run_trial(
            &pathogen,
            5_000,
            Some(8),
            DEFAULT_MAX_DAYS,
            &mut stream_rng(5, "trial", 1),
        )
        .unwrap();
        assert!(frail.fatality_rate() > sturdy.fatality_rate());
    }
}
