// Re-export commonly used types at the crate root
pub use error::ProgressionError;
pub use individual::{DiseaseState, Individual};
pub use outcomes::{run_course, CourseOutcome, Outcome, OutcomeTally};
pub use parameters::{Params, RunType};
pub use pathogen::Pathogen;

// Module declarations
pub mod demo;
pub mod error;
pub mod individual;
pub mod outcomes;
pub mod parameters;
pub mod pathogen;
pub mod profiling;
pub mod random;
pub mod reports;
pub mod sweep;
pub mod trial;
