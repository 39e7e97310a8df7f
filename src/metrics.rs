use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::util::{mean, median, round_to, std_dev};

/// Radius of a rendered target in arena pixels.
pub const TARGET_RADIUS_PX: f64 = 18.0;

/// Length of a standard session.
pub const SESSION_DURATION_SECS: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A single successful hit, recorded at click time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    /// Milliseconds since the session started.
    pub timestamp_ms: u64,
    /// Milliseconds from the target spawning to the click.
    pub reaction_time_ms: u64,
    pub click_position: Point,
    pub target_position: Point,
    /// Distance between the click and the target centre.
    pub miss_distance_px: f64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    /// Grade a session purely on how many targets were hit.
    pub fn from_clicks(total_clicks: usize) -> Self {
        match total_clicks {
            n if n >= 50 => Tier::S,
            n if n >= 40 => Tier::A,
            n if n >= 30 => Tier::B,
            n if n >= 20 => Tier::C,
            _ => Tier::D,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::S => "S - LEGENDARY",
            Tier::A => "A - EXCELLENT",
            Tier::B => "B - GOOD",
            Tier::C => "C - OKAY",
            Tier::D => "D - PRACTICE MORE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_clicks: usize,
    pub average_reaction_time_ms: u64,
    pub median_reaction_time_ms: u64,
    pub min_reaction_time_ms: u64,
    pub max_reaction_time_ms: u64,
    pub standard_deviation_ms: u64,
    pub clicks_per_second: f64,
    pub accuracy_percentage: u32,
    pub consistency_score: u32,
    pub performance_tier: Tier,
}

/// Summarize a standard-length session. Returns `None` for an empty session.
pub fn summarize(events: &[ClickEvent]) -> Option<SessionSummary> {
    summarize_over(events, SESSION_DURATION_SECS)
}

/// Summarize a session that lasted `session_secs` seconds.
pub fn summarize_over(events: &[ClickEvent], session_secs: f64) -> Option<SessionSummary> {
    let reaction_times = events
        .iter()
        .map(|e| e.reaction_time_ms as f64)
        .collect::<Vec<f64>>();
    let miss_distances = events
        .iter()
        .map(|e| e.miss_distance_px)
        .collect::<Vec<f64>>();

    let average = mean(&reaction_times)?;
    let median = median(&reaction_times)?;
    let sd = std_dev(&reaction_times)?;
    let avg_miss = mean(&miss_distances)?;

    let (min, max) = match events.iter().map(|e| e.reaction_time_ms).minmax() {
        MinMaxResult::NoElements => return None,
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };

    let total_clicks = events.len();

    Some(SessionSummary {
        total_clicks,
        average_reaction_time_ms: average.round() as u64,
        median_reaction_time_ms: median.round() as u64,
        min_reaction_time_ms: min,
        max_reaction_time_ms: max,
        standard_deviation_ms: sd.round() as u64,
        clicks_per_second: clicks_per_second(total_clicks, session_secs),
        accuracy_percentage: accuracy_percentage(avg_miss),
        consistency_score: consistency_score(sd, average),
        performance_tier: Tier::from_clicks(total_clicks),
    })
}

fn clicks_per_second(total_clicks: usize, session_secs: f64) -> f64 {
    if session_secs <= 0.0 {
        return 0.0;
    }
    round_to(total_clicks as f64 / session_secs, 2)
}

fn accuracy_percentage(avg_miss_px: f64) -> u32 {
    (100.0 - (avg_miss_px / TARGET_RADIUS_PX) * 100.0)
        .clamp(0.0, 100.0)
        .round() as u32
}

// Zero average only happens with synthetic input; score it as 0.
fn consistency_score(sd: f64, average: f64) -> u32 {
    if average <= 0.0 {
        return 0;
    }
    (100.0 - (sd / average) * 100.0).clamp(0.0, 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(timestamp_ms: u64, reaction_time_ms: u64, miss_distance_px: f64) -> ClickEvent {
        ClickEvent {
            timestamp_ms,
            reaction_time_ms,
            click_position: Point::new(100.0 + miss_distance_px, 200.0),
            target_position: Point::new(100.0, 200.0),
            miss_distance_px,
        }
    }

    fn hits_with_reactions(reactions: &[u64]) -> Vec<ClickEvent> {
        reactions
            .iter()
            .enumerate()
            .map(|(i, &rt)| hit(i as u64 * 500, rt, 0.0))
            .collect()
    }

    fn n_hits(n: usize) -> Vec<ClickEvent> {
        (0..n).map(|i| hit(i as u64 * 100, 300, 4.0)).collect()
    }

    #[test]
    fn test_empty_session_has_no_summary() {
        assert_eq!(summarize(&[]), None);
        assert_eq!(summarize_over(&[], 60.0), None);
    }

    #[test]
    fn test_three_click_example() {
        let summary = summarize(&hits_with_reactions(&[100, 200, 300])).unwrap();

        assert_eq!(summary.total_clicks, 3);
        assert_eq!(summary.average_reaction_time_ms, 200);
        assert_eq!(summary.median_reaction_time_ms, 200);
        assert_eq!(summary.standard_deviation_ms, 82);
        assert_eq!(summary.min_reaction_time_ms, 100);
        assert_eq!(summary.max_reaction_time_ms, 300);
        assert_eq!(summary.performance_tier, Tier::D);
        // sd / avg = 0.408 -> 59
        assert_eq!(summary.consistency_score, 59);
        assert_eq!(summary.clicks_per_second, 0.1);
    }

    #[test]
    fn test_median_even_count_rounds() {
        let summary = summarize(&hits_with_reactions(&[201, 100])).unwrap();
        assert_eq!(summary.median_reaction_time_ms, 151);
        assert_eq!(summary.min_reaction_time_ms, 100);
        assert_eq!(summary.max_reaction_time_ms, 201);
    }

    #[test]
    fn test_single_click() {
        let summary = summarize(&hits_with_reactions(&[420])).unwrap();
        assert_eq!(summary.total_clicks, 1);
        assert_eq!(summary.min_reaction_time_ms, 420);
        assert_eq!(summary.max_reaction_time_ms, 420);
        assert_eq!(summary.standard_deviation_ms, 0);
        assert_eq!(summary.consistency_score, 100);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = summarize(&hits_with_reactions(&[350, 120, 610, 240])).unwrap();
        let b = summarize(&hits_with_reactions(&[610, 240, 350, 120])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extrema_bound_average_and_median() {
        let summary = summarize(&hits_with_reactions(&[901, 133, 455, 288, 777, 310])).unwrap();
        assert!(summary.min_reaction_time_ms <= summary.median_reaction_time_ms);
        assert!(summary.median_reaction_time_ms <= summary.max_reaction_time_ms);
        assert!(summary.min_reaction_time_ms <= summary.average_reaction_time_ms);
        assert!(summary.average_reaction_time_ms <= summary.max_reaction_time_ms);
    }

    #[test]
    fn test_accuracy_perfect_centre_hits() {
        let events = vec![hit(0, 300, 0.0), hit(400, 320, 0.0)];
        assert_eq!(summarize(&events).unwrap().accuracy_percentage, 100);
    }

    #[test]
    fn test_accuracy_half_radius() {
        let events = vec![hit(0, 300, 9.0), hit(400, 320, 9.0)];
        assert_eq!(summarize(&events).unwrap().accuracy_percentage, 50);
    }

    #[test]
    fn test_accuracy_clamped_at_zero() {
        // Hit radius is wider than the drawn radius, so misses past 18px still count.
        let events = vec![hit(0, 300, 19.5), hit(400, 320, 20.0)];
        assert_eq!(summarize(&events).unwrap().accuracy_percentage, 0);
    }

    #[test]
    fn test_consistency_floor_at_zero() {
        let summary = summarize(&hits_with_reactions(&[10, 10, 10, 2000])).unwrap();
        assert_eq!(summary.consistency_score, 0);
    }

    #[test]
    fn test_consistency_zero_average_is_guarded() {
        let summary = summarize(&hits_with_reactions(&[0, 0, 0])).unwrap();
        assert_eq!(summary.average_reaction_time_ms, 0);
        assert_eq!(summary.consistency_score, 0);
    }

    #[test]
    fn test_clicks_per_second_uses_session_length() {
        let events = n_hits(45);
        assert_eq!(summarize(&events).unwrap().clicks_per_second, 1.5);
        assert_eq!(summarize_over(&events, 60.0).unwrap().clicks_per_second, 0.75);
        assert_eq!(summarize_over(&events, 0.0).unwrap().clicks_per_second, 0.0);
    }

    #[test]
    fn test_total_clicks_matches_length() {
        for n in [1, 7, 33, 64] {
            assert_eq!(summarize(&n_hits(n)).unwrap().total_clicks, n);
        }
    }

    #[test]
    fn test_tier_boundaries() {
        let cases = [
            (50, Tier::S),
            (49, Tier::A),
            (40, Tier::A),
            (39, Tier::B),
            (30, Tier::B),
            (29, Tier::C),
            (20, Tier::C),
            (19, Tier::D),
            (1, Tier::D),
        ];
        for (clicks, tier) in cases {
            assert_eq!(
                summarize(&n_hits(clicks)).unwrap().performance_tier,
                tier,
                "{clicks} clicks"
            );
        }
    }

    #[test]
    fn test_tier_labels_and_display() {
        assert_eq!(Tier::S.label(), "S - LEGENDARY");
        assert_eq!(Tier::D.label(), "D - PRACTICE MORE");
        assert_eq!(Tier::B.to_string(), "B");
    }

    #[test]
    fn test_summarize_does_not_mutate_input() {
        let events = hits_with_reactions(&[300, 100, 200]);
        let before = events.clone();
        let _ = summarize(&events);
        assert_eq!(events, before);
    }

    #[test]
    fn test_point_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
    }
}
