//! Periodic visibility storm cycling calm, warning and active phases.

use std::time::Duration;

use maze_chase_core::{Event, StormConfig, StormPhase};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
pub(crate) struct StormCycle {
    phase: StormPhase,
    min_interval: Duration,
    max_interval: Duration,
    warning: Duration,
    duration: Duration,
    rng: ChaCha8Rng,
}

impl StormCycle {
    pub(crate) fn new(config: &StormConfig, seed: u64) -> Self {
        let mut cycle = Self {
            phase: StormPhase::Calm {
                time_to_next: Duration::ZERO,
            },
            min_interval: config.min_interval(),
            max_interval: config.max_interval(),
            warning: config.warning(),
            duration: config.duration(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        cycle.phase = StormPhase::Calm {
            time_to_next: cycle.sample_interval(),
        };
        cycle
    }

    pub(crate) fn phase(&self) -> StormPhase {
        self.phase
    }

    /// Counts the current phase down by `dt`, moving to the next phase at most once.
    pub(crate) fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let current = self.phase;
        let next = match current {
            StormPhase::Calm { time_to_next } => {
                let left = time_to_next.saturating_sub(dt);
                if left <= self.warning {
                    Some(StormPhase::Warning {
                        remaining: self.warning,
                    })
                } else {
                    self.phase = StormPhase::Calm { time_to_next: left };
                    None
                }
            }
            StormPhase::Warning { remaining } => {
                let left = remaining.saturating_sub(dt);
                if left.is_zero() {
                    Some(StormPhase::Active {
                        remaining: self.duration,
                    })
                } else {
                    self.phase = StormPhase::Warning { remaining: left };
                    None
                }
            }
            StormPhase::Active { remaining } => {
                let left = remaining.saturating_sub(dt);
                if left.is_zero() {
                    Some(StormPhase::Calm {
                        time_to_next: self.sample_interval(),
                    })
                } else {
                    self.phase = StormPhase::Active { remaining: left };
                    None
                }
            }
        };

        if let Some(phase) = next {
            tracing::debug!(?phase, "storm phase changed");
            self.phase = phase;
            out_events.push(Event::StormPhaseChanged { phase });
        }
    }

    fn sample_interval(&mut self) -> Duration {
        if self.max_interval <= self.min_interval {
            return self.min_interval;
        }
        self.rng.gen_range(self.min_interval..=self.max_interval)
    }

    #[cfg(test)]
    fn with_phase(mut self, phase: StormPhase) -> Self {
        self.phase = phase;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    fn calm(millis: u64) -> StormCycle {
        StormCycle::new(&StormConfig::default(), 1).with_phase(StormPhase::Calm {
            time_to_next: Duration::from_millis(millis),
        })
    }

    #[test]
    fn calm_below_warning_enters_warning() {
        let mut storm = calm(2_500);
        let mut events = Vec::new();
        storm.advance(TICK, &mut events);
        let warning = StormPhase::Warning {
            remaining: Duration::from_secs(3),
        };
        assert_eq!(storm.phase(), warning);
        assert_eq!(events, vec![Event::StormPhaseChanged { phase: warning }]);
    }

    #[test]
    fn warning_boundary_is_inclusive() {
        let mut storm = calm(3_100);
        let mut events = Vec::new();
        storm.advance(TICK, &mut events);
        assert_eq!(
            storm.phase(),
            StormPhase::Warning {
                remaining: Duration::from_secs(3)
            }
        );
    }

    #[test]
    fn calm_above_warning_keeps_counting() {
        let mut storm = calm(3_200);
        let mut events = Vec::new();
        storm.advance(TICK, &mut events);
        assert_eq!(
            storm.phase(),
            StormPhase::Calm {
                time_to_next: Duration::from_millis(3_100)
            }
        );
        assert!(events.is_empty());
    }

    #[test]
    fn full_cycle_returns_to_calm_within_interval() {
        let config = StormConfig::default();
        let mut storm = calm(3_000);
        let mut events = Vec::new();

        storm.advance(TICK, &mut events);
        assert!(matches!(storm.phase(), StormPhase::Warning { .. }));

        for _ in 0..30 {
            storm.advance(TICK, &mut events);
        }
        assert_eq!(
            storm.phase(),
            StormPhase::Active {
                remaining: config.duration()
            }
        );

        for _ in 0..80 {
            storm.advance(TICK, &mut events);
        }
        let StormPhase::Calm { time_to_next } = storm.phase() else {
            panic!("storm did not clear: {:?}", storm.phase());
        };
        assert!(time_to_next >= config.min_interval() && time_to_next <= config.max_interval());
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn fresh_cycle_starts_calm() {
        let config = StormConfig::default();
        let storm = StormCycle::new(&config, 42);
        let StormPhase::Calm { time_to_next } = storm.phase() else {
            panic!("storm must start calm");
        };
        assert!(time_to_next >= config.min_interval() && time_to_next <= config.max_interval());
    }
}
