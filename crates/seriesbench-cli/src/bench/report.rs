use seriesbench::{ReadMetrics, RunMetrics};

/// Formats `n` with `,` as the thousands separator.
pub fn grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn write_summary(metrics: &RunMetrics) -> String {
    format!(
        "Wrote {} data points ({} failed) in {:.3}s: {} point/s, registration took {:.3}s",
        grouped(metrics.attempted),
        grouped(metrics.failed),
        metrics.elapsed.as_secs_f64(),
        grouped(metrics.points_per_second().round() as u64),
        metrics.registration.as_secs_f64(),
    )
}

pub fn read_summary(metrics: &ReadMetrics) -> String {
    format!(
        "Read {} data points from {} series in {:.3}s: {} point/s",
        grouped(metrics.points),
        grouped(metrics.series as u64),
        metrics.elapsed.as_secs_f64(),
        grouped(metrics.points_per_second().round() as u64),
    )
}
