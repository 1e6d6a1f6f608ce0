//! Participation penalty for the event timer.
//!
//! Every tick the timer picks one eligible player at random. A player who
//! received an event less than `cooldown` ago keeps a small weight so that
//! busy towers still spread events around, but is never starved outright.
use std::collections::HashMap;
use std::time::{Duration, Instant};

use tower_core::RandomSource;
use tower_core::selection::weighted_index;

/// Weight of a player with no recent event.
pub const RESTED_WEIGHT: u32 = 10;
/// Weight while the participation penalty is active.
pub const COOLING_WEIGHT: u32 = 1;

/// Last event time per player.
#[derive(Clone, Debug)]
pub struct ParticipationBook {
    cooldown: Duration,
    last: HashMap<String, Instant>,
}

impl ParticipationBook {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: HashMap::new(),
        }
    }

    pub fn weight(&self, player_id: &str, now: Instant) -> u32 {
        match self.last.get(player_id) {
            Some(at) if now.saturating_duration_since(*at) < self.cooldown => COOLING_WEIGHT,
            _ => RESTED_WEIGHT,
        }
    }

    /// Draw one of `eligible`, or `None` when nobody is eligible.
    pub fn pick<'a>(
        &self,
        eligible: &'a [String],
        now: Instant,
        rng: &mut dyn RandomSource,
    ) -> Option<&'a str> {
        let weights: Vec<u32> = eligible.iter().map(|id| self.weight(id, now)).collect();
        weighted_index(&weights, rng).map(|index| eligible[index].as_str())
    }

    pub fn record(&mut self, player_id: &str, now: Instant) {
        self.last.insert(player_id.to_owned(), now);
    }

    pub fn remove(&mut self, player_id: &str) {
        self.last.remove(player_id);
    }

    /// Forget entries whose penalty has expired.
    pub fn prune(&mut self, now: Instant) {
        let cooldown = self.cooldown;
        self.last
            .retain(|_, at| now.saturating_duration_since(*at) < cooldown);
    }
}

#[cfg(test)]
mod tests {
    use tower_core::PcgRng;

    use super::*;
    use crate::clock::{Clock, ManualClock};

    #[test]
    fn penalty_expires_in_real_time() {
        let clock = ManualClock::new();
        let mut book = ParticipationBook::new(Duration::from_secs(60));
        assert_eq!(book.weight("ada", clock.now()), RESTED_WEIGHT);

        book.record("ada", clock.now());
        assert_eq!(book.weight("ada", clock.now()), COOLING_WEIGHT);
        assert_eq!(book.weight("bo", clock.now()), RESTED_WEIGHT);

        clock.advance(Duration::from_secs(59));
        assert_eq!(book.weight("ada", clock.now()), COOLING_WEIGHT);
        clock.advance(Duration::from_secs(1));
        assert_eq!(book.weight("ada", clock.now()), RESTED_WEIGHT);

        book.prune(clock.now());
        assert!(book.last.is_empty());
    }

    #[test]
    fn rested_players_are_favoured() {
        let clock = ManualClock::new();
        let mut book = ParticipationBook::new(Duration::from_secs(60));
        book.record("ada", clock.now());

        let eligible = vec!["ada".to_owned(), "bo".to_owned()];
        let mut rng = PcgRng::from_seed(3);
        let bo = (0..1_000)
            .filter(|_| book.pick(&eligible, clock.now(), &mut rng) == Some("bo"))
            .count();
        assert!(bo > 850, "bo picked {bo} times");
    }

    #[test]
    fn nobody_eligible_picks_nobody() {
        let book = ParticipationBook::new(Duration::from_secs(60));
        let mut rng = PcgRng::from_seed(1);
        assert_eq!(book.pick(&[], Instant::now(), &mut rng), None);
    }
}
