#[cfg(feature = "profiling")]
use super::{data::profiling_data, DEATH_LABEL, RECOVERY_LABEL};
#[cfg(feature = "profiling")]
use humantime::format_duration;

/// Prints all collected profiling data.
#[cfg(feature = "profiling")]
pub fn print_profiling_data() {
    print_named_spans();
    print_named_counts();
    print_fatality_rate();
}

#[cfg(not(feature = "profiling"))]
pub fn print_profiling_data() {}

/// Prints a table of the named counts, if any.
#[cfg(feature = "profiling")]
pub fn print_named_counts() {
    let rows = profiling_data().get_named_counts_table();
    if rows.is_empty() {
        return;
    }

    let mut table = vec![super::NAMED_COUNTS_HEADERS
        .iter()
        .map(|s| (*s).to_string())
        .collect::<Vec<_>>()];
    for (label, count, rate) in rows {
        table.push(vec![
            label,
            format_with_commas(count),
            format_with_commas_f64(rate),
        ]);
    }

    println!();
    print_formatted_table(&table);
}

/// Prints a table of the spans, if any.
#[cfg(feature = "profiling")]
pub fn print_named_spans() {
    let rows = profiling_data().get_named_spans_table();
    if rows.is_empty() {
        return;
    }

    let mut table = vec![super::NAMED_SPANS_HEADERS
        .iter()
        .map(|s| (*s).to_string())
        .collect::<Vec<_>>()];
    for (label, count, duration, percent_runtime) in rows {
        table.push(vec![
            label,
            format_with_commas(count),
            format_duration(duration).to_string(),
            format!("{percent_runtime:.2}%"),
        ]);
    }

    println!();
    print_formatted_table(&table);
}

/// Prints the share of profiled courses that ended in death, when any
/// deaths and recoveries were counted.
#[cfg(feature = "profiling")]
pub fn print_fatality_rate() {
    let (deaths, recoveries) = {
        let container = profiling_data();
        (
            container.get_named_count(DEATH_LABEL),
            container.get_named_count(RECOVERY_LABEL),
        )
    };
    if let Some(line) = fatality_rate_line(deaths, recoveries) {
        println!();
        println!("{line}");
    }
}

#[cfg(feature = "profiling")]
fn fatality_rate_line(deaths: Option<usize>, recoveries: Option<usize>) -> Option<String> {
    let (Some(deaths), Some(recoveries)) = (deaths, recoveries) else {
        return None;
    };
    let resolved = deaths + recoveries;
    #[allow(clippy::cast_precision_loss)]
    let rate = (deaths as f64) / (resolved as f64) * 100.0;
    Some(format!(
        "Observed Fatality Rate: {rate:.2}% ({} deaths of {} resolved courses)",
        format_with_commas(deaths),
        format_with_commas(resolved)
    ))
}

/// Prints a table with aligned columns, using the first row as a header.
/// The first column is left-aligned; remaining columns are right-aligned.
#[cfg(feature = "profiling")]
fn print_formatted_table(rows: &[Vec<String>]) {
    print!("{}", format_table(rows));
}

#[cfg(feature = "profiling")]
fn format_table(rows: &[Vec<String>]) -> String {
    use std::fmt::Write;

    if rows.len() < 2 {
        return String::new();
    }

    let mut col_widths = vec![0; rows[0].len()];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            col_widths[i] = col_widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    let push_row = |out: &mut String, row: &[String]| {
        for (i, cell) in row.iter().enumerate() {
            let width = col_widths[i] + 1;
            if i == 0 {
                let _ = write!(out, "{cell:<width$} ");
            } else {
                let _ = write!(out, "{cell:>width$} ");
            }
        }
        out.push('\n');
    };

    push_row(&mut out, &rows[0]);
    let total_width: usize = col_widths.iter().map(|w| *w + 1).sum::<usize>() + 2;
    out.push_str(&"-".repeat(total_width));
    out.push('\n');
    for row in &rows[1..] {
        push_row(&mut out, row);
    }
    out
}

/// Inserts a comma between every group of three digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        result.push(c);
        let digits_left = len - i - 1;
        if digits_left > 0 && digits_left % 3 == 0 {
            result.push(',');
        }
    }
    result
}

/// Formats an integer with thousands separator.
#[must_use]
pub fn format_with_commas(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Formats a float to two decimal places with thousands separator.
#[must_use]
pub fn format_with_commas_f64(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));

    let mut result = group_thousands(int_part);
    if !frac_part.is_empty() {
        result.push('.');
        result.push_str(frac_part);
    }
    if value.is_sign_negative() && value != 0.0 {
        result.insert(0, '-');
    }
    result
}
