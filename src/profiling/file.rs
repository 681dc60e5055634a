use std::path::Path;
#[cfg(feature = "profiling")]
use std::{
    fs::File,
    io::Write,
    time::{Duration, SystemTime},
};

#[cfg(feature = "profiling")]
use serde::Serialize;

use crate::error::ProgressionError;
#[cfg(feature = "profiling")]
use crate::profiling::{data::profiling_data, NAMED_COUNTS_HEADERS, NAMED_SPANS_HEADERS};

#[cfg(feature = "profiling")]
#[derive(Serialize)]
struct ProfilingData {
    date_time: SystemTime,
    named_counts_headers: Vec<String>,
    named_counts_data: Vec<(String, usize, f64)>,
    named_spans_headers: Vec<String>,
    named_spans_data: Vec<(String, usize, Duration, f64)>,
}

/// Writes the collected counts and spans to `file_path` as pretty JSON.
///
/// # Errors
/// Any I/O or serialization error.
#[cfg(feature = "profiling")]
pub fn write_profiling_data<P: AsRef<Path>>(file_path: P) -> Result<(), ProgressionError> {
    let profiling_data = {
        let container = profiling_data();
        ProfilingData {
            date_time: SystemTime::now(),
            named_counts_headers: NAMED_COUNTS_HEADERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            named_counts_data: container.get_named_counts_table(),
            named_spans_headers: NAMED_SPANS_HEADERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            named_spans_data: container.get_named_spans_table(),
        }
    };

    let json = serde_json::to_string_pretty(&profiling_data)?;
    let mut file = File::create(file_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

#[cfg(not(feature = "profiling"))]
pub fn write_profiling_data<P: AsRef<Path>>(_file_path: P) -> Result<(), ProgressionError> {
    Ok(())
}

#[cfg(all(test, feature = "profiling"))]
mod test {
    use super::write_profiling_data;
    use crate::profiling::increment_named_count;
    use tempfile::tempdir;

    #[test]
    fn test_write_profiling_json() {
        increment_named_count("profiling file test");
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("profiling.json");
        write_profiling_data(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(json["named_counts_headers"][0], "Event Label");
        assert_eq!(json["named_spans_headers"][2], "Duration");
        let counts = json["named_counts_data"].as_array().unwrap();
        assert!(counts.iter().any(|row| row[0] == "profiling file test"));
        assert!(json.get("date_time").is_some());
    }
}
