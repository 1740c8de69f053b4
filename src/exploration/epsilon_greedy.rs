use rand::Rng;

use crate::decay::Decay;

use super::Choice;

/// Epsilon greedy exploration policy with an episode-decaying epsilon threshold
///
/// The threshold is recomputed by [`update`](EpsilonGreedy::update) once per finished
/// episode, never per step.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    schedule: D,
    epsilon: f64,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy, starting at its value for episode 0
    pub fn new(schedule: D) -> Self {
        let epsilon = schedule.evaluate(0.0);
        Self { schedule, epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn schedule(&self) -> &D {
        &self.schedule
    }

    /// Advance the threshold to its value after `episodes` finished episodes
    pub fn update(&mut self, episodes: u32) {
        self.epsilon = self.schedule.evaluate(episodes as f64);
    }

    /// Pin the threshold to zero, making every choice greedy
    pub fn freeze(&mut self) {
        self.epsilon = 0.0;
    }

    /// Invoke epsilon greedy policy, consuming one uniform draw
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if rng.gen::<f64>() > self.epsilon {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }
}
