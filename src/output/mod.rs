// Output formatting: terminal display and the PNG chart.

pub mod chart;
pub mod terminal;

/// Format a rate for display, two decimals.
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.2}")
}
