//! Lives, serve pauses and match outcome.

use super::state::Outcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTracker {
    lives_remaining: u32,
    miss_pause_ticks: u32,
    serve_hold: u32,
}

impl TurnTracker {
    pub fn new(lives: u32, miss_pause_ticks: u32) -> Self {
        Self {
            lives_remaining: lives,
            miss_pause_ticks,
            serve_hold: 0,
        }
    }

    pub fn lives_remaining(&self) -> u32 {
        self.lives_remaining
    }

    /// Count a miss. Returns `true` when lives remain and the ball must be
    /// re-served; the serve is then held for the configured pause.
    pub fn record_miss(&mut self) -> bool {
        self.lives_remaining = self.lives_remaining.saturating_sub(1);
        if self.lives_remaining == 0 {
            return false;
        }
        self.serve_hold = self.miss_pause_ticks;
        true
    }

    /// Consume one tick of a pending serve pause. Returns `true` while the
    /// ball must stay put.
    pub fn hold_serve(&mut self) -> bool {
        if self.serve_hold == 0 {
            return false;
        }
        self.serve_hold -= 1;
        true
    }

    pub fn is_over(&self, alive_bricks: usize) -> bool {
        self.lives_remaining == 0 || alive_bricks == 0
    }

    /// Lives are checked first: running out of lives and bricks on the same
    /// tick is a loss.
    pub fn outcome(&self, alive_bricks: usize) -> Option<Outcome> {
        if self.lives_remaining == 0 {
            Some(Outcome::Lost)
        } else if alive_bricks == 0 {
            Some(Outcome::Won)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_costs_a_life_and_holds_serve() {
        let mut turns = TurnTracker::new(3, 2);

        assert!(turns.record_miss());
        assert_eq!(turns.lives_remaining(), 2);

        assert!(turns.hold_serve());
        assert!(turns.hold_serve());
        assert!(!turns.hold_serve());
    }

    #[test]
    fn test_last_miss_ends_the_game() {
        let mut turns = TurnTracker::new(1, 100);

        assert!(!turns.record_miss());
        assert_eq!(turns.lives_remaining(), 0);
        assert!(!turns.hold_serve());
        assert!(turns.is_over(50));
        assert_eq!(turns.outcome(50), Some(Outcome::Lost));

        // Never goes below zero
        turns.record_miss();
        assert_eq!(turns.lives_remaining(), 0);
    }

    #[test]
    fn test_outcome() {
        let turns = TurnTracker::new(3, 0);
        assert_eq!(turns.outcome(10), None);
        assert!(!turns.is_over(10));
        assert_eq!(turns.outcome(0), Some(Outcome::Won));
        assert!(turns.is_over(0));
    }

    #[test]
    fn test_simultaneous_exhaustion_is_a_loss() {
        let mut turns = TurnTracker::new(1, 0);
        turns.record_miss();
        assert_eq!(turns.outcome(0), Some(Outcome::Lost));
    }
}
