use log::info;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    decay::{self, Decay},
    ensure_interval,
    env::{Environment, Transition},
    error::{Error, Result},
    exploration::EpsilonGreedy,
};

use super::{GreedyPolicy, QTable};

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig<D: Decay = decay::Geometric> {
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate, in `[0,1]`
    pub alpha: f32,
    /// Discount factor, in `[0,1]`
    pub gamma: f32,
    /// Per-episode step cap, derived from the state count when `None`
    pub max_steps: Option<usize>,
    /// Log progress every this many episodes, or never if `0`
    pub log_interval: u32,
    /// Seed for the exploration RNG, drawn from the OS when `None`
    pub seed: Option<u64>,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::default(),
            alpha: 0.1,
            gamma: 0.9,
            max_steps: None,
            log_interval: 1000,
            seed: None,
        }
    }
}

/// What happened during a single training episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub episode: u32,
    /// Sum of rewards received
    pub reward: f32,
    pub steps: usize,
    /// Exploration rate used throughout the episode
    pub epsilon: f32,
    /// Whether the episode ended in a terminal state rather than at the step cap
    pub reached_goal: bool,
}

/// Step cap for environments of a given size when none is configured
pub fn default_max_steps(num_states: usize) -> usize {
    num_states.saturating_mul(5).clamp(200, 500)
}

/// A Q-learning agent that utilizes a dense Q-table to learn its environment
///
/// The agent is the only writer of its table. Once training is done,
/// [`into_policy`](QTableAgent::into_policy) hands the table over to a read-only
/// [`GreedyPolicy`].
///
/// ### Generics
/// - `D` - The [`Decay`] schedule of the exploration rate across episodes
pub struct QTableAgent<D: Decay = decay::Geometric> {
    q_table: QTable,
    exploration: EpsilonGreedy<D>,
    alpha: f32,       // learning rate
    gamma: f32,       // discount factor
    max_steps: usize, // per-episode cap
    log_interval: u32,
    episode: u32, // current episode
    rng: StdRng,
}

impl<D: Decay> QTableAgent<D> {
    /// Initialize a new `QTableAgent` with a zeroed table shaped for `env`
    ///
    /// **Errors** if `alpha` or `gamma` is not in the interval `[0,1]`, if `max_steps`
    /// is zero, or if `env` has no states or no actions
    pub fn new<E: Environment>(config: QTableAgentConfig<D>, env: &E) -> Result<Self> {
        let QTableAgentConfig {
            exploration,
            alpha,
            gamma,
            max_steps,
            log_interval,
            seed,
        } = config;

        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        if max_steps == Some(0) {
            return Err(Error::InvalidConfig(String::from(
                "`max_steps` must be at least 1",
            )));
        }
        if env.num_states() == 0 || env.num_actions() == 0 {
            return Err(Error::InvalidConfig(String::from(
                "environment needs at least one state and one action",
            )));
        }

        Ok(Self {
            q_table: QTable::for_env(env),
            exploration,
            alpha,
            gamma,
            max_steps: max_steps.unwrap_or_else(|| default_max_steps(env.num_states())),
            log_interval,
            episode: 0,
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
        })
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Number of episodes run so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    fn act(&mut self, state: usize, epsilon: f32) -> usize {
        self.q_table.select_action(state, epsilon, &mut self.rng)
    }

    fn learn(&mut self, state: usize, action: usize, transition: Transition) {
        let Transition { next_state, reward } = transition;
        self.q_table
            .update(state, action, reward, next_state, self.alpha, self.gamma);
    }

    /// Run one episode from the start state until a terminal state or the step cap
    pub fn go<E: Environment>(&mut self, env: &E) -> EpisodeSummary {
        let epsilon = self.exploration.epsilon(self.episode);
        let mut state = env.start_state();
        let mut reward = 0.0;
        let mut steps = 0;

        while !env.is_terminal(state) && steps < self.max_steps {
            let action = self.act(state, epsilon);
            let transition = env.transition(state, action);
            self.learn(state, action, transition);

            reward += transition.reward;
            steps += 1;
            state = transition.next_state;
        }

        let summary = EpisodeSummary {
            episode: self.episode,
            reward,
            steps,
            epsilon,
            reached_goal: env.is_terminal(state),
        };

        if self.log_interval > 0 && self.episode % self.log_interval == 0 {
            info!(
                "Episode {:5}: steps={:3}, reward={:8.1}, epsilon={:.4}",
                summary.episode, summary.steps, summary.reward, summary.epsilon
            );
        }

        self.episode += 1;
        summary
    }

    /// Run `episodes` episodes, passing each summary to `on_episode` as it completes
    ///
    /// Returns every summary in episode order.
    pub fn train<E, F>(&mut self, env: &E, episodes: u32, mut on_episode: F) -> Vec<EpisodeSummary>
    where
        E: Environment,
        F: FnMut(&EpisodeSummary),
    {
        info!("Training for {episodes} episodes");
        let summaries = (0..episodes)
            .map(|_| {
                let summary = self.go(env);
                on_episode(&summary);
                summary
            })
            .collect::<Vec<_>>();
        let successes = summaries.iter().filter(|s| s.reached_goal).count();
        info!("Training done: {successes}/{episodes} episodes reached the goal");
        summaries
    }

    /// Finish training and freeze the table into a greedy policy
    pub fn into_policy(self) -> GreedyPolicy {
        GreedyPolicy::new(self.q_table)
    }
}
