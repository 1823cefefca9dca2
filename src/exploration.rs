use rand::Rng;

use crate::decay::{self, Decay};

/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

impl Choice {
    /// Draw a choice that explores with probability `epsilon`
    pub fn draw<R: Rng + ?Sized>(epsilon: f32, rng: &mut R) -> Self {
        if rng.gen::<f32>() < epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Exploration rate in effect for the given (0-based) episode
    ///
    /// The schedule is advanced once before the first episode runs, so episode 0
    /// already uses the first decayed value.
    pub fn epsilon(&self, episode: u32) -> f32 {
        self.epsilon.evaluate(episode as f32 + 1.0)
    }

    /// Invoke epsilon greedy policy for current episode
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        Choice::draw(self.epsilon(episode), rng)
    }
}

impl Default for EpsilonGreedy<decay::Geometric> {
    fn default() -> Self {
        Self::new(decay::Geometric::default())
    }
}
