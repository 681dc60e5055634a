use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Errors raised by the progression model and its drivers.
///
/// The core state machine itself is infallible; these only surface at
/// construction boundaries (bad codes, bad fragility), from the course
/// runner, and from configuration and report I/O.
#[derive(Debug)]
pub enum ProgressionError {
    /// A generator code outside `0..=0x00FF_FFFF`.
    InvalidGeneratorCode(u32),
    /// A baseline fragility above the geometric draw's maximum of 8.
    InvalidFragility(u8),
    NotInfected,
    /// The individual was still infected after `max_days` simulated days.
    UnresolvedCourse {
        max_days: u32,
    },
    InvalidParameters(String),
    ReportExists(PathBuf),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
}

impl Display for ProgressionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProgressionError::InvalidGeneratorCode(code) => {
                write!(f, "generator code {code:#x} does not fit in 24 bits")
            }
            ProgressionError::InvalidFragility(fragility) => {
                write!(f, "fragility {fragility} is outside the range 0-8")
            }
            ProgressionError::NotInfected => {
                write!(f, "cannot run a course for an individual that was never infected")
            }
            ProgressionError::UnresolvedCourse { max_days } => {
                write!(f, "individual neither recovered nor died within {max_days} days")
            }
            ProgressionError::InvalidParameters(msg) => write!(f, "invalid parameters: {msg}"),
            ProgressionError::ReportExists(path) => {
                write!(f, "report file already exists: {}", path.display())
            }
            ProgressionError::IoError(e) => write!(f, "I/O error: {e}"),
            ProgressionError::JsonError(e) => write!(f, "JSON error: {e}"),
            ProgressionError::CsvError(e) => write!(f, "CSV error: {e}"),
        }
    }
}

impl std::error::Error for ProgressionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgressionError::IoError(e) => Some(e),
            ProgressionError::JsonError(e) => Some(e),
            ProgressionError::CsvError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProgressionError {
    fn from(error: std::io::Error) -> Self {
        ProgressionError::IoError(error)
    }
}

impl From<serde_json::Error> for ProgressionError {
    fn from(error: serde_json::Error) -> Self {
        ProgressionError::JsonError(error)
    }
}

impl From<csv::Error> for ProgressionError {
    fn from(error: csv::Error) -> Self {
        ProgressionError::CsvError(error)
    }
}

#[cfg(test)]
mod test {
    use super::ProgressionError;
    use std::error::Error;

    #[test]
    fn test_display_generator_code_is_hex() {
        let e = ProgressionError::InvalidGeneratorCode(0x0100_0000);
        assert_eq!(e.to_string(), "generator code 0x1000000 does not fit in 24 bits");
    }

    #[test]
    fn test_io_error_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: ProgressionError = io.into();
        assert!(matches!(e, ProgressionError::IoError(_)));
        assert!(e.source().is_some());
    }

    #[test]
    fn test_parameter_error_has_no_source() {
        let e = ProgressionError::InvalidParameters("bad".to_string());
        assert!(e.source().is_none());
        assert_eq!(e.to_string(), "invalid parameters: bad");
    }
}
