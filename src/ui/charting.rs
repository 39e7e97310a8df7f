use flick::time_series::TimeSeriesPoint;

/// Compute X (seconds) and Y (reaction ms) bounds for the results chart
pub fn compute_chart_params(points: &[TimeSeriesPoint], session_secs: f64) -> (f64, f64) {
    let mut slowest = 0.0;
    for p in points {
        if p.reaction_ms > slowest {
            slowest = p.reaction_ms;
        }
    }

    let mut overall_duration = session_secs;
    if overall_duration < 1.0 {
        overall_duration = 1.0;
    }

    // Headroom so the slowest hit doesn't sit on the frame.
    let y_max = ((slowest * 1.1) / 100.0).ceil() * 100.0;

    (overall_duration, y_max.max(100.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
