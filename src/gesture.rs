//! Waggle gesture detection
//!
//! Keeps a short, time-bounded history of west/east stick events and fires
//! when the last three alternate (west-east-west or east-west-east).

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::input::Direction;

/// Number of alternating events that make up a waggle
const PATTERN_LEN: usize = 3;

/// A west or east event seen by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub direction: Direction,
    pub at: Instant,
}

/// Sliding-window matcher for the left-right-left waggle
#[derive(Debug)]
pub struct GestureDetector {
    events: VecDeque<GestureEvent>,
    window: Duration,
    /// Collapse consecutive ticks on the same side into one event
    dedup: bool,
}

impl GestureDetector {
    /// Create a detector
    ///
    /// # Arguments
    /// * `window` - Events older than this (relative to the current tick) are dropped
    /// * `dedup` - When true, holding the stick on one side records a single event
    pub fn new(window: Duration, dedup: bool) -> Self {
        Self {
            events: VecDeque::new(),
            window,
            dedup,
        }
    }

    /// Feed one tick's direction
    ///
    /// Returns true when the waggle completes. History is cleared on fire so
    /// the same events cannot trigger twice.
    pub fn update(&mut self, direction: Direction, now: Instant) -> bool {
        if direction.is_horizontal() {
            let repeat = self
                .events
                .back()
                .is_some_and(|last| last.direction == direction);

            if !(self.dedup && repeat) {
                self.events.push_back(GestureEvent { direction, at: now });
                trace!("Gesture event: {} ({} in window)", direction, self.events.len());
            }
        }

        while self
            .events
            .front()
            .is_some_and(|first| now.saturating_duration_since(first.at) > self.window)
        {
            self.events.pop_front();
        }

        if self.matches_waggle() {
            self.events.clear();
            return true;
        }

        false
    }

    fn matches_waggle(&self) -> bool {
        let len = self.events.len();
        if len < PATTERN_LEN {
            return false;
        }

        let tail: Vec<Direction> = self
            .events
            .range(len - PATTERN_LEN..)
            .map(|e| e.direction)
            .collect();

        matches!(
            tail.as_slice(),
            [Direction::West, Direction::East, Direction::West]
                | [Direction::East, Direction::West, Direction::East]
        )
    }

    /// Forget all recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(2);

    fn at(base: Instant, secs: f32) -> Instant {
        base + Duration::from_secs_f32(secs)
    }

    #[test]
    fn test_west_east_west_fires_once_and_clears() {
        let base = Instant::now();
        let mut detector = GestureDetector::new(WINDOW, true);

        assert!(!detector.update(Direction::West, at(base, 0.0)));
        assert!(!detector.update(Direction::East, at(base, 0.5)));
        assert!(detector.update(Direction::West, at(base, 1.0)));
        assert!(detector.is_empty());

        // Holding west afterwards does not re-fire
        assert!(!detector.update(Direction::West, at(base, 1.1)));
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_east_west_east_fires() {
        let base = Instant::now();
        let mut detector = GestureDetector::new(WINDOW, true);

        detector.update(Direction::East, at(base, 0.0));
        detector.update(Direction::West, at(base, 0.3));
        assert!(detector.update(Direction::East, at(base, 0.6)));
    }

    #[test]
    fn test_two_events_never_fire() {
        let base = Instant::now();
        let mut detector = GestureDetector::new(WINDOW, true);

        assert!(!detector.update(Direction::West, at(base, 0.0)));
        assert!(!detector.update(Direction::East, at(base, 0.5)));
        assert!(!detector.update(Direction::Center, at(base, 0.6)));
        assert_eq!(detector.len(), 2);
    }

    #[test]
    fn test_expired_event_breaks_pattern() {
        let base = Instant::now();
        let mut detector = GestureDetector::new(WINDOW, true);

        assert!(!detector.update(Direction::West, at(base, 0.0)));
        assert!(!detector.update(Direction::East, at(base, 1.0)));
        assert!(!detector.update(Direction::West, at(base, 2.1)));
        assert_eq!(detector.len(), 2);
    }

    #[test]
    fn test_dedup_collapses_held_side() {
        let base = Instant::now();
        let mut detector = GestureDetector::new(WINDOW, true);

        for i in 0..5 {
            detector.update(Direction::West, at(base, i as f32 * 0.1));
        }
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_without_dedup_every_tick_is_recorded() {
        let base = Instant::now();
        let mut detector = GestureDetector::new(WINDOW, false);

        detector.update(Direction::West, at(base, 0.0));
        detector.update(Direction::West, at(base, 0.1));
        assert_eq!(detector.len(), 2);

        detector.update(Direction::East, at(base, 0.2));
        assert!(detector.update(Direction::West, at(base, 0.3)));
    }

    #[test]
    fn test_vertical_and_diagonal_directions_are_ignored() {
        let base = Instant::now();
        let mut detector = GestureDetector::new(WINDOW, true);

        detector.update(Direction::West, at(base, 0.0));
        detector.update(Direction::NorthEast, at(base, 0.2));
        detector.update(Direction::North, at(base, 0.3));
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_old_events_evicted_on_any_tick() {
        let base = Instant::now();
        let mut detector = GestureDetector::new(WINDOW, true);

        detector.update(Direction::West, at(base, 0.0));
        detector.update(Direction::Center, at(base, 2.5));
        assert!(detector.is_empty());
    }
}
