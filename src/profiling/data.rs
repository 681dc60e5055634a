use super::Span;
#[cfg(feature = "profiling")]
use super::TOTAL_MEASURED;
#[cfg(feature = "profiling")]
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, OnceLock},
    time::{Duration, Instant},
};

#[cfg(feature = "profiling")]
static PROFILING_DATA: OnceLock<Mutex<ProfilingDataContainer>> = OnceLock::new();

/// Acquires an exclusive lock on the profiling data, blocking until it's available.
///
/// A panicking test can poison the mutex; profiling numbers are not worth
/// failing over, so the poison flag is ignored.
#[cfg(feature = "profiling")]
pub(super) fn profiling_data() -> MutexGuard<'static, ProfilingDataContainer> {
    PROFILING_DATA
        .get_or_init(|| Mutex::new(ProfilingDataContainer::default()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(feature = "profiling")]
#[derive(Default)]
pub(super) struct ProfilingDataContainer {
    pub start_time: Option<Instant>,
    pub counts: HashMap<&'static str, usize>,
    // Span counts live next to the span durations since they are updated and
    // displayed together.
    pub spans: HashMap<&'static str, (Duration, usize)>,
    // While at least one span is open, `coverage` holds the instant the first
    // of them opened. When the count drops back to zero the elapsed time is
    // added to the `Total Measured` span.
    pub open_span_count: usize,
    pub coverage: Option<Instant>,
}

#[cfg(feature = "profiling")]
impl ProfilingDataContainer {
    pub fn increment_named_count(&mut self, key: &'static str) {
        self.add_to_named_count(key, 1);
    }

    pub fn add_to_named_count(&mut self, key: &'static str, amount: usize) {
        self.init_start_time();
        *self.counts.entry(key).or_insert(0) += amount;
    }

    pub fn get_named_count(&self, key: &'static str) -> Option<usize> {
        self.counts.get(&key).copied()
    }

    fn init_start_time(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
    }

    fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map_or(0.0, |start| start.elapsed().as_secs_f64())
    }

    fn open_span(&mut self, label: &'static str) -> Span {
        self.init_start_time();
        if self.open_span_count == 0 {
            self.coverage = Some(Instant::now());
        }
        self.open_span_count += 1;
        Span::new(label)
    }

    /// Do not call directly. This method is called from `Span::drop`.
    pub(super) fn close_span(&mut self, span: &Span) {
        self.open_span_count = self.open_span_count.saturating_sub(1);
        if self.open_span_count == 0 {
            if let Some(coverage) = self.coverage.take() {
                self.close_span_without_coverage(TOTAL_MEASURED, coverage.elapsed());
            }
        }
        self.close_span_without_coverage(span.label, span.start_time.elapsed());
    }

    fn close_span_without_coverage(&mut self, label: &'static str, elapsed: Duration) {
        let (time, count) = self.spans.entry(label).or_insert((Duration::ZERO, 0));
        *time += elapsed;
        *count += 1;
    }

    /// Rows of ("Event Label", "Count", "Rate (per sec)"), sorted by label.
    pub(super) fn get_named_counts_table(&self) -> Vec<(String, usize, f64)> {
        let elapsed = self.elapsed_secs();
        let mut rows: Vec<(String, usize, f64)> = self
            .counts
            .iter()
            .map(|(key, count)| {
                #[allow(clippy::cast_precision_loss)]
                let rate = if elapsed > 0.0 {
                    (*count as f64) / elapsed
                } else {
                    0.0
                };
                ((*key).to_string(), *count, rate)
            })
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }

    /// Rows of ("Span Label", "Count", "Duration", "% runtime"), sorted by
    /// label, with `Total Measured` last.
    pub(super) fn get_named_spans_table(&self) -> Vec<(String, usize, Duration, f64)> {
        let elapsed = self.elapsed_secs();
        let percent = |duration: Duration| {
            if elapsed > 0.0 {
                duration.as_secs_f64() / elapsed * 100.0
            } else {
                0.0
            }
        };

        let mut rows: Vec<(String, usize, Duration, f64)> = self
            .spans
            .iter()
            .filter(|(label, _)| **label != TOTAL_MEASURED)
            .map(|(label, &(duration, count))| {
                ((*label).to_string(), count, duration, percent(duration))
            })
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        if let Some(&(duration, count)) = self.spans.get(&TOTAL_MEASURED) {
            rows.push((TOTAL_MEASURED.to_string(), count, duration, percent(duration)));
        }
        rows
    }
}

#[cfg(feature = "profiling")]
pub fn increment_named_count(key: &'static str) {
    let mut container = profiling_data();
    container.increment_named_count(key);
}

#[cfg(not(feature = "profiling"))]
pub fn increment_named_count(_key: &'static str) {}

#[cfg(feature = "profiling")]
pub fn open_span(label: &'static str) -> Span {
    let mut container = profiling_data();
    container.open_span(label)
}

#[cfg(not(feature = "profiling"))]
pub fn open_span(label: &'static str) -> Span {
    Span::new(label)
}
