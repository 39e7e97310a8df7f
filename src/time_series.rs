use crate::metrics::ClickEvent;

/// A hit plotted on the results chart: seconds into the session against
/// reaction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub t: f64,
    pub reaction_ms: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: f64, reaction_ms: f64) -> Self {
        Self { t, reaction_ms }
    }
}

impl From<&ClickEvent> for TimeSeriesPoint {
    fn from(e: &ClickEvent) -> Self {
        TimeSeriesPoint {
            t: e.timestamp_ms as f64 / 1000.0,
            reaction_ms: e.reaction_time_ms as f64,
        }
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.t, p.reaction_ms)
    }
}

pub fn reaction_series(events: &[ClickEvent]) -> Vec<TimeSeriesPoint> {
    events.iter().map(TimeSeriesPoint::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Point;

    #[test]
    fn series_converts_timestamps_to_seconds() {
        let events = [ClickEvent {
            timestamp_ms: 1_500,
            reaction_time_ms: 320,
            click_position: Point::default(),
            target_position: Point::default(),
            miss_distance_px: 0.0,
        }];
        let series = reaction_series(&events);
        assert_eq!(series, vec![TimeSeriesPoint::new(1.5, 320.0)]);
        assert_eq!(<(f64, f64)>::from(series[0]), (1.5, 320.0));
    }
}
