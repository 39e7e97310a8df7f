use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::metrics::{summarize_over, ClickEvent, Point, SessionSummary};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Number of targets kept on screen at once.
    pub fn target_count(&self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub duration_ms: u64,
    pub difficulty: Difficulty,
    /// How long an untouched target stays up before it counts as missed.
    /// Anything below 1 ms is treated as 1 ms.
    pub target_lifetime_ms: u64,
    /// Gap between a target leaving and its replacement appearing.
    pub respawn_delay_ms: u64,
    /// Clicks within this distance of a target centre count as hits.
    pub hit_radius_px: f64,
    /// Warning beeps start once less than this much time remains.
    pub warning_threshold_ms: u64,
    pub warning_interval_ms: u64,
    pub arena: Arena,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 30_000,
            difficulty: Difficulty::Medium,
            target_lifetime_ms: 2_000,
            respawn_delay_ms: 50,
            hit_radius_px: 20.0,
            warning_threshold_ms: 15_000,
            warning_interval_ms: 3_000,
            arena: Arena::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: u64,
    pub position: Point,
    pub spawned_at_ms: u64,
}

/// Things that happened while the session advanced. Front ends turn these
/// into sounds and redraws.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started { difficulty: Difficulty },
    TargetSpawned(Target),
    Hit(ClickEvent),
    TargetExpired(Target),
    Warning { remaining_ms: u64 },
    GameOver { hits: usize, missed: usize },
}

/// One play-through, advanced explicitly through `tick` so that timing is
/// fully determined by the elapsed values passed in.
#[derive(Debug)]
pub struct Session<R: Rng> {
    config: SessionConfig,
    rng: R,
    phase: Phase,
    clock_ms: u64,
    targets: Vec<Target>,
    pending_spawns: Vec<u64>,
    events: Vec<ClickEvent>,
    missed: usize,
    last_warning_ms: Option<u64>,
    next_id: u64,
}

enum Due {
    Spawn(usize),
    Expire(usize),
}

impl<R: Rng> Session<R> {
    pub fn new(config: SessionConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            phase: Phase::Idle,
            clock_ms: 0,
            targets: vec![],
            pending_spawns: vec![],
            events: vec![],
            missed: 0,
            last_warning_ms: None,
            next_id: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        match self.phase {
            Phase::Idle => self.config.duration_ms,
            _ => self.config.duration_ms.saturating_sub(self.clock_ms),
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn events(&self) -> &[ClickEvent] {
        &self.events
    }

    pub fn hits(&self) -> usize {
        self.events.len()
    }

    pub fn missed(&self) -> usize {
        self.missed
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Takes effect on the next `start`.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        summarize_over(&self.events, self.config.duration_ms as f64 / 1000.0)
    }

    /// Begin a fresh session, discarding anything recorded before.
    pub fn start(&mut self) -> Vec<SessionEvent> {
        self.phase = Phase::Active;
        self.clock_ms = 0;
        self.targets.clear();
        self.pending_spawns.clear();
        self.events.clear();
        self.missed = 0;
        self.last_warning_ms = None;

        log::info!(
            "session started: difficulty={} duration={}ms",
            self.config.difficulty,
            self.config.duration_ms
        );

        let mut out = vec![SessionEvent::Started {
            difficulty: self.config.difficulty,
        }];
        for _ in 0..self.config.difficulty.target_count() {
            out.push(SessionEvent::TargetSpawned(self.spawn_target()));
        }
        out
    }

    pub fn restart(&mut self) -> Vec<SessionEvent> {
        self.start()
    }

    /// Back to the start screen.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.clock_ms = 0;
        self.targets.clear();
        self.pending_spawns.clear();
        self.events.clear();
        self.missed = 0;
        self.last_warning_ms = None;
    }

    /// Advance the session clock by `elapsed_ms`, running every spawn and
    /// expiry that falls inside the step in time order.
    pub fn tick(&mut self, elapsed_ms: u64) -> Vec<SessionEvent> {
        let mut out = vec![];
        if self.phase != Phase::Active {
            return out;
        }

        let end = self.config.duration_ms;
        let until = self.clock_ms.saturating_add(elapsed_ms).min(end);

        while let Some((at, due)) = self.next_due() {
            if at > until || at >= end {
                break;
            }
            self.clock_ms = at;
            match due {
                Due::Spawn(idx) => {
                    self.pending_spawns.swap_remove(idx);
                    out.push(SessionEvent::TargetSpawned(self.spawn_target()));
                }
                Due::Expire(idx) => {
                    let target = self.targets.remove(idx);
                    self.missed += 1;
                    self.pending_spawns.push(at + self.config.respawn_delay_ms);
                    log::debug!("target {} expired, missed={}", target.id, self.missed);
                    out.push(SessionEvent::TargetExpired(target));
                }
            }
        }
        self.clock_ms = until;

        let remaining = end - self.clock_ms;
        let beep_due = self
            .last_warning_ms
            .map_or(true, |t| self.clock_ms - t > self.config.warning_interval_ms);
        if remaining > 0 && remaining < self.config.warning_threshold_ms && beep_due {
            self.last_warning_ms = Some(self.clock_ms);
            out.push(SessionEvent::Warning {
                remaining_ms: remaining,
            });
        }

        if self.clock_ms >= end {
            self.finish(&mut out);
        }
        out
    }

    /// Register a click at `point`. Only the first target under the pointer
    /// is hit; clicks on empty space are ignored.
    pub fn click(&mut self, point: Point) -> Option<SessionEvent> {
        if self.phase != Phase::Active {
            return None;
        }

        let idx = self
            .targets
            .iter()
            .position(|t| t.position.distance_to(point) <= self.config.hit_radius_px)?;
        let target = self.targets.remove(idx);

        let event = ClickEvent {
            timestamp_ms: self.clock_ms,
            reaction_time_ms: self.clock_ms - target.spawned_at_ms,
            click_position: point,
            target_position: target.position,
            miss_distance_px: target.position.distance_to(point),
        };
        self.events.push(event);
        self.pending_spawns
            .push(self.clock_ms + self.config.respawn_delay_ms);

        log::debug!(
            "hit target {} after {}ms ({:.1}px off centre)",
            target.id,
            event.reaction_time_ms,
            event.miss_distance_px
        );
        Some(SessionEvent::Hit(event))
    }

    fn finish(&mut self, out: &mut Vec<SessionEvent>) {
        self.phase = Phase::GameOver;
        self.targets.clear();
        self.pending_spawns.clear();
        log::info!(
            "session over: hits={} missed={}",
            self.events.len(),
            self.missed
        );
        out.push(SessionEvent::GameOver {
            hits: self.events.len(),
            missed: self.missed,
        });
    }

    fn spawn_target(&mut self) -> Target {
        let target = Target {
            id: self.next_id,
            position: self.config.arena.random_spawn(&mut self.rng),
            spawned_at_ms: self.clock_ms,
        };
        self.next_id += 1;
        self.targets.push(target);
        target
    }

    // Spawns win ties so a replacement exists before anything else expires.
    fn next_due(&self) -> Option<(u64, Due)> {
        let spawn = self
            .pending_spawns
            .iter()
            .enumerate()
            .min_by_key(|&(_, at)| *at)
            .map(|(idx, &at)| (at, Due::Spawn(idx)));
        let expire = self
            .targets
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.spawned_at_ms)
            .map(|(idx, t)| {
                (
                    t.spawned_at_ms + self.config.target_lifetime_ms.max(1),
                    Due::Expire(idx),
                )
            });

        match (spawn, expire) {
            (Some(s), Some(e)) => Some(if s.0 <= e.0 { s } else { e }),
            (s, e) => s.or(e),
        }
    }
}
