use log::{debug, info};

use crate::{
    error::ProgressionError,
    outcomes::OutcomeTally,
    pathogen::Pathogen,
    profiling::open_span,
    random::stream_rng,
    reports::{PathogenReport, ReportWriter},
    trial::infect_population,
};

/// Codes between two progress log lines.
pub const PROGRESS_INTERVAL: u32 = 0x1_0000;

/// The random stream every code in a sweep draws from.
const SWEEP_STREAM: &str = "sweep";

/// What a sweep runs: generator codes `first_code..end_code`, each tested on
/// `individuals_per_pathogen` fresh individuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    pub seed: u64,
    pub first_code: u32,
    pub end_code: u32,
    pub individuals_per_pathogen: usize,
    pub fragility: Option<u8>,
    pub max_days: u32,
}

/// Tests every generator code in the configured range and returns the
/// totals over all of them, sending one pathogen report row per code.
///
/// Each code draws from its own stream of the run seed, so any sub-range of
/// a sweep reproduces exactly the rows of the full sweep.
///
/// # Errors
/// `InvalidGeneratorCode` for a range reaching past 24 bits,
/// `InvalidFragility`, `UnresolvedCourse`, or a report write failure.
pub fn run_sweep(
    config: &SweepConfig,
    mut pathogen_report: Option<&mut ReportWriter<PathogenReport>>,
) -> Result<OutcomeTally, ProgressionError> {
    let _span = open_span("sweep");
    info!(
        "Sweeping generator codes {:#010x}..{:#010x}, {} individuals each",
        config.first_code, config.end_code, config.individuals_per_pathogen
    );

    let mut total = OutcomeTally::default();
    for code in config.first_code..config.end_code {
        let pathogen = Pathogen::new(code)?;
        let mut rng = stream_rng(config.seed, SWEEP_STREAM, u64::from(code));
        let tally = infect_population(
            &pathogen,
            config.individuals_per_pathogen,
            config.fragility,
            config.max_days,
            &mut rng,
        )?;
        debug!(
            "Pathogen {}: {} deaths, {} survivors",
            pathogen.code_label(),
            tally.deaths,
            tally.survivors
        );
        if let Some(report) = pathogen_report.as_deref_mut() {
            report.send_report(&PathogenReport::new(&pathogen, &tally))?;
        }
        total += tally;

        let done = code - config.first_code + 1;
        if done % PROGRESS_INTERVAL == 0 {
            info!(
                "Swept {done} of {} codes, fatality rate so far {:.4}%",
                config.end_code - config.first_code,
                total.fatality_rate() * 100.0
            );
        }
    }
    Ok(total)
}

#[cfg(test)]
mod test {
    use super::{run_sweep, SweepConfig};
    use crate::{
        error::ProgressionError,
        outcomes::DEFAULT_MAX_DAYS,
        parameters::ReportOptions,
        reports::{PathogenReport, ReportWriter},
    };
    use tempfile::tempdir;

    fn config(first_code: u32, end_code: u32) -> SweepConfig {
        SweepConfig {
            seed: 17,
            first_code,
            end_code,
            individuals_per_pathogen: 4,
            fragility: None,
            max_days: DEFAULT_MAX_DAYS,
        }
    }

    fn sweep_rows(config: &SweepConfig) -> Vec<PathogenReport> {
        let temp_dir = tempdir().unwrap();
        let mut writer: ReportWriter<PathogenReport> =
            ReportWriter::create(temp_dir.path(), &ReportOptions::default(), "sweep.csv")
                .unwrap();
        run_sweep(config, Some(&mut writer)).unwrap();
        let path = writer.finish().unwrap();
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader.deserialize().map(Result::unwrap).collect()
    }

    #[test]
    fn test_sweep_totals() {
        let total = run_sweep(&config(0x00FF_FF00, 0x0100_0000), None).unwrap();
        assert_eq!(total.total(), 256 * 4);
    }

    #[test]
    fn test_sweep_rows() {
        let rows = sweep_rows(&config(0x00FF_FF30, 0x00FF_FF34));
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].generator_code, "0x00ffff30");
        assert_eq!(rows[3].generator_code, "0x00ffff33");
        assert_eq!(rows[3].dead_threshold, 31);
        for row in &rows {
            assert_eq!(row.survivors + row.deaths, 4);
        }
    }

    #[test]
    fn test_sub_range_matches_full_range() {
        let full = sweep_rows(&config(0x0012_3400, 0x0012_3440));
        let part = sweep_rows(&config(0x0012_3420, 0x0012_3430));
        assert_eq!(part.as_slice(), &full[0x20..0x30]);
    }

    #[test]
    fn test_empty_range() {
        let total = run_sweep(&config(5, 5), None).unwrap();
        assert_eq!(total.total(), 0);
    }

    #[test]
    fn test_range_past_24_bits() {
        let e = run_sweep(&config(0x00FF_FFFF, 0x0100_0001), None).err();
        assert!(matches!(
            e,
            Some(ProgressionError::InvalidGeneratorCode(0x0100_0000))
        ));
    }
}
