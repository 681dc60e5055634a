//! Lightweight run profiling: named event counts and timed named spans.
//!
//! - **Event counting**: track how often named events occur during a run.
//! - **Rate calculation**: rates (events per second) since the first count.
//! - **Span timing**: time between opening a span and dropping it.
//! - **Observed fatality**: reported when both `"death"` and `"recovery"`
//!   counts are present.
//!
//! Everything is gated behind the `profiling` feature, which is enabled by
//! default. Without it the public API stays defined but does nothing, so
//! profiling calls can stay in the simulation code at zero cost.
//!
//! ## Example Output
//!
//! ```ignore
//! Span Label          Count           Duration  % runtime
//! -------------------------------------------------------
//! trial                   1  1s 204ms 533us 9ns     99.93%
//! Total Measured          1  1s 204ms 533us 9ns     99.93%
//!
//! Event Label     Count  Rate (per sec)
//! -------------------------------------
//! death          35,120       29,157.88
//! recovery       64,880       53,866.39
//!
//! Observed Fatality Rate: 35.12% (35,120 deaths of 100,000 resolved courses)
//! ```
//!
//! ## How to Use
//!
//! ```rust,ignore
//! increment_named_count("death");
//!
//! fn run_trial(/* ... */) {
//!     let _span = open_span("trial");
//!     // timed work
//! } // `_span` is dropped here, which closes it.
//! ```
//!
//! The `"Total Measured"` span is open exactly when some other span is open,
//! so it shows how much of the run is covered by any span.

mod data;
mod display;
mod file;

pub use data::*;
pub use display::*;
pub use file::write_profiling_data;
#[cfg(feature = "profiling")]
use std::time::Instant;

/// The distinguished total measured time label.
#[cfg(feature = "profiling")]
const TOTAL_MEASURED: &str = "Total Measured";
/// Count incremented for every course that ends in death.
pub const DEATH_LABEL: &str = "death";
/// Count incremented for every course that ends in recovery.
pub const RECOVERY_LABEL: &str = "recovery";
#[cfg(feature = "profiling")]
const NAMED_SPANS_HEADERS: &[&str] = &["Span Label", "Count", "Duration", "% runtime"];
#[cfg(feature = "profiling")]
const NAMED_COUNTS_HEADERS: &[&str] = &["Event Label", "Count", "Rate (per sec)"];

pub struct Span {
    #[cfg(feature = "profiling")]
    label: &'static str,
    #[cfg(feature = "profiling")]
    start_time: Instant,
}

impl Span {
    fn new(#[allow(unused_variables)] label: &'static str) -> Self {
        Self {
            #[cfg(feature = "profiling")]
            label,
            #[cfg(feature = "profiling")]
            start_time: Instant::now(),
        }
    }
}

#[cfg(feature = "profiling")]
impl Drop for Span {
    fn drop(&mut self) {
        let mut container = data::profiling_data();
        container.close_span(self);
    }
}
