use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::{
    error::ProgressionError,
    individual::MAX_FRAGILITY,
    outcomes::DEFAULT_MAX_DAYS,
    pathogen::{GENERATOR_CODE_COUNT, MAX_GENERATOR_CODE},
};

/// Which driver to run and how.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RunType {
    /// Follow one individual day by day.
    Demo {
        #[serde(default, deserialize_with = "deserialize_optional_code")]
        pathogen_code: Option<u32>,
        #[serde(default)]
        fragility: Option<u8>,
    },
    /// Infect `population` individuals with one pathogen.
    Trial {
        population: usize,
        #[serde(default, deserialize_with = "deserialize_optional_code")]
        pathogen_code: Option<u32>,
        #[serde(default)]
        fragility: Option<u8>,
    },
    /// Run every generator code in `first_code..end_code`.
    Sweep {
        #[serde(default, deserialize_with = "deserialize_code")]
        first_code: u32,
        #[serde(default = "default_end_code", deserialize_with = "deserialize_code")]
        end_code: u32,
        #[serde(default = "default_individuals_per_pathogen")]
        individuals_per_pathogen: usize,
        #[serde(default)]
        fragility: Option<u8>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ReportType {
    CourseReport { name: String },
    PathogenReport { name: String },
}

impl ReportType {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ReportType::CourseReport { name } | ReportType::PathogenReport { name } => name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportOptions {
    /// Prepended to every report and profiling file name.
    #[serde(default)]
    pub file_prefix: String,
    /// Replace existing output files instead of failing.
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Params {
    /// The random seed for the run; every random stream is derived from it.
    pub seed: u64,
    /// Courses still unresolved after this many days abort the run.
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    pub run: RunType,
    #[serde(default)]
    pub reports: Vec<ReportType>,
    #[serde(default)]
    pub report_options: ReportOptions,
    /// File name for the profiling JSON dump, written into the output directory.
    #[serde(default)]
    pub profiling_data_path: Option<String>,
}

fn default_max_days() -> u32 {
    DEFAULT_MAX_DAYS
}

fn default_end_code() -> u32 {
    GENERATOR_CODE_COUNT
}

fn default_individuals_per_pathogen() -> usize {
    4
}

/// Generator codes may be written as JSON integers or as `"0x..."` strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Number(u64),
    Text(String),
}

fn parse_code(repr: CodeRepr) -> Result<u32, String> {
    let value = match repr {
        CodeRepr::Number(n) => n,
        CodeRepr::Text(text) => {
            let trimmed = text.trim();
            let parsed = match trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
            {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => trimmed.parse::<u64>(),
            };
            parsed.map_err(|e| format!("invalid generator code {text:?}: {e}"))?
        }
    };
    u32::try_from(value).map_err(|_| format!("generator code {value:#x} does not fit in 24 bits"))
}

fn deserialize_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    parse_code(CodeRepr::deserialize(deserializer)?).map_err(de::Error::custom)
}

fn deserialize_optional_code<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    Option::<CodeRepr>::deserialize(deserializer)?
        .map(parse_code)
        .transpose()
        .map_err(de::Error::custom)
}

fn validate_code(code: Option<u32>) -> Result<(), ProgressionError> {
    match code {
        Some(code) if code > MAX_GENERATOR_CODE => {
            Err(ProgressionError::InvalidGeneratorCode(code))
        }
        _ => Ok(()),
    }
}

fn validate_fragility(fragility: Option<u8>) -> Result<(), ProgressionError> {
    match fragility {
        Some(fragility) if fragility > MAX_FRAGILITY => {
            Err(ProgressionError::InvalidFragility(fragility))
        }
        _ => Ok(()),
    }
}

/// Checks the parameters before any simulation work starts, so a bad
/// sweep range fails immediately instead of hours into a run.
pub fn validate_inputs(parameters: &Params) -> Result<(), ProgressionError> {
    if parameters.max_days == 0 {
        return Err(ProgressionError::InvalidParameters(
            "The maximum course length must be positive.".to_string(),
        ));
    }

    match &parameters.run {
        RunType::Demo {
            pathogen_code,
            fragility,
        } => {
            validate_code(*pathogen_code)?;
            validate_fragility(*fragility)?;
        }
        RunType::Trial {
            population,
            pathogen_code,
            fragility,
        } => {
            if *population == 0 {
                return Err(ProgressionError::InvalidParameters(
                    "The trial population must be positive.".to_string(),
                ));
            }
            validate_code(*pathogen_code)?;
            validate_fragility(*fragility)?;
        }
        RunType::Sweep {
            first_code,
            end_code,
            individuals_per_pathogen,
            fragility,
        } => {
            if *end_code > GENERATOR_CODE_COUNT {
                return Err(ProgressionError::InvalidParameters(format!(
                    "The sweep must end at or before {GENERATOR_CODE_COUNT:#x}."
                )));
            }
            if first_code >= end_code {
                return Err(ProgressionError::InvalidParameters(
                    "The sweep range must not be empty.".to_string(),
                ));
            }
            if *individuals_per_pathogen == 0 {
                return Err(ProgressionError::InvalidParameters(
                    "Each pathogen must be tested on at least one individual.".to_string(),
                ));
            }
            validate_fragility(*fragility)?;
        }
    }

    let mut names = HashSet::new();
    for report in &parameters.reports {
        if report.name().is_empty() {
            return Err(ProgressionError::InvalidParameters(
                "Report names must not be empty.".to_string(),
            ));
        }
        if !names.insert(report.name()) {
            return Err(ProgressionError::InvalidParameters(format!(
                "Report name {} is used more than once.",
                report.name()
            )));
        }
    }
    Ok(())
}

/// Reads and validates the parameters from a JSON file.
pub fn load_params(file_path: &Path) -> Result<Params, ProgressionError> {
    let reader = BufReader::new(File::open(file_path)?);
    let parameters: Params = serde_json::from_reader(reader)?;
    validate_inputs(&parameters)?;
    Ok(parameters)
}
