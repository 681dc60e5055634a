use std::{
    fs::{self, File},
    marker::PhantomData,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::Serialize;

use crate::{
    error::ProgressionError,
    parameters::{Params, ReportOptions, ReportType, RunType},
};

pub mod course_report;
pub mod pathogen_report;

pub use course_report::CourseReport;
pub use pathogen_report::PathogenReport;

/// A CSV file receiving one serialized row of type `T` per `send_report`.
pub struct ReportWriter<T> {
    writer: csv::Writer<File>,
    path: PathBuf,
    _row: PhantomData<T>,
}

impl<T: Serialize> ReportWriter<T> {
    /// Creates `<output_dir>/<file_prefix><name>`, creating the directory if
    /// needed.
    ///
    /// # Errors
    /// `ReportExists` if the file is already there and `overwrite` is off,
    /// or any I/O error from creating the file.
    pub fn create(
        output_dir: &Path,
        options: &ReportOptions,
        name: &str,
    ) -> Result<Self, ProgressionError> {
        let path = output_path(output_dir, options, name);
        if !options.overwrite && path.exists() {
            return Err(ProgressionError::ReportExists(path));
        }
        fs::create_dir_all(output_dir)?;
        let writer = csv::Writer::from_path(&path)?;
        Ok(Self {
            writer,
            path,
            _row: PhantomData,
        })
    }

    pub fn send_report(&mut self, row: &T) -> Result<(), ProgressionError> {
        self.writer.serialize(row)?;
        Ok(())
    }

    /// Flushes buffered rows to disk.
    pub fn finish(mut self) -> Result<PathBuf, ProgressionError> {
        self.writer.flush()?;
        Ok(self.path)
    }
}

/// Where a named output lands: the prefix is prepended to the file name.
#[must_use]
pub fn output_path(output_dir: &Path, options: &ReportOptions, name: &str) -> PathBuf {
    output_dir.join(format!("{}{}", options.file_prefix, name))
}

/// The report writers requested by the configuration.
#[derive(Default)]
pub struct Reports {
    pub course: Option<ReportWriter<CourseReport>>,
    pub pathogen: Option<ReportWriter<PathogenReport>>,
}

impl Reports {
    pub fn finish(self) -> Result<(), ProgressionError> {
        if let Some(report) = self.course {
            let path = report.finish()?;
            info!("Wrote course report to {}", path.display());
        }
        if let Some(report) = self.pathogen {
            let path = report.finish()?;
            info!("Wrote pathogen report to {}", path.display());
        }
        Ok(())
    }
}

/// Opens every report the run will actually produce. Course reports only
/// come from demo runs and pathogen reports only from trials and sweeps;
/// anything else is skipped with a warning.
pub fn init(parameters: &Params, output_dir: &Path) -> Result<Reports, ProgressionError> {
    let mut reports = Reports::default();
    for report in &parameters.reports {
        match (report, &parameters.run) {
            (ReportType::CourseReport { name }, RunType::Demo { .. }) => {
                reports.course = Some(ReportWriter::create(
                    output_dir,
                    &parameters.report_options,
                    name,
                )?);
            }
            (ReportType::PathogenReport { name }, RunType::Trial { .. } | RunType::Sweep { .. }) => {
                reports.pathogen = Some(ReportWriter::create(
                    output_dir,
                    &parameters.report_options,
                    name,
                )?);
            }
            (report, _) => {
                warn!(
                    "Report {} is not produced by this kind of run. Skipping it.",
                    report.name()
                );
            }
        }
    }
    Ok(reports)
}

#[cfg(test)]
mod test {
    use super::{init, output_path, ReportWriter};
    use crate::{
        error::ProgressionError,
        parameters::{Params, ReportOptions, ReportType, RunType},
    };
    use serde::{Deserialize, Serialize};
    use tempfile::tempdir;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Row {
        day: u32,
        label: String,
    }

    fn demo_params(reports: Vec<ReportType>) -> Params {
        Params {
            seed: 0,
            max_days: 1000,
            run: RunType::Demo {
                pathogen_code: None,
                fragility: None,
            },
            reports,
            report_options: ReportOptions::default(),
            profiling_data_path: None,
        }
    }

    #[test]
    fn test_output_path_prefix() {
        let options = ReportOptions {
            file_prefix: "run1_".to_string(),
            overwrite: false,
        };
        let path = output_path(std::path::Path::new("out"), &options, "course.csv");
        assert_eq!(path, std::path::Path::new("out").join("run1_course.csv"));
    }

    #[test]
    fn test_write_and_read_back() {
        let temp_dir = tempdir().unwrap();
        let mut writer: ReportWriter<Row> =
            ReportWriter::create(temp_dir.path(), &ReportOptions::default(), "rows.csv").unwrap();
        writer
            .send_report(&Row {
                day: 1,
                label: "Infected, Asymptomatic".to_string(),
            })
            .unwrap();
        let path = writer.finish().unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        let rows: Vec<Row> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(
            rows,
            vec![Row {
                day: 1,
                label: "Infected, Asymptomatic".to_string()
            }]
        );
    }

    #[test]
    fn test_existing_file_without_overwrite() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("rows.csv"), "taken").unwrap();

        let e = ReportWriter::<Row>::create(temp_dir.path(), &ReportOptions::default(), "rows.csv")
            .err();
        assert!(matches!(e, Some(ProgressionError::ReportExists(_))));

        let options = ReportOptions {
            file_prefix: String::new(),
            overwrite: true,
        };
        assert!(ReportWriter::<Row>::create(temp_dir.path(), &options, "rows.csv").is_ok());
    }

    #[test]
    fn test_init_skips_reports_for_other_runs() {
        let temp_dir = tempdir().unwrap();
        let parameters = demo_params(vec![
            ReportType::CourseReport {
                name: "course.csv".to_string(),
            },
            ReportType::PathogenReport {
                name: "pathogens.csv".to_string(),
            },
        ]);
        let reports = init(&parameters, temp_dir.path()).unwrap();
        assert!(reports.course.is_some());
        assert!(reports.pathogen.is_none());
        assert!(!temp_dir.path().join("pathogens.csv").exists());
        reports.finish().unwrap();
        assert!(temp_dir.path().join("course.csv").exists());
    }
}
