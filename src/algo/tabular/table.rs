use rand::Rng;

use crate::{env::Environment, exploration::Choice};

/// A dense table of action values, one row per state
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<f32>,
    num_states: usize,
    num_actions: usize,
}

impl QTable {
    /// A zero-initialized `num_states` x `num_actions` table
    pub fn new(num_states: usize, num_actions: usize) -> Self {
        Self {
            values: vec![0.0; num_states * num_actions],
            num_states,
            num_actions,
        }
    }

    /// A zero-initialized table shaped for the given environment
    pub fn for_env<E: Environment>(env: &E) -> Self {
        Self::new(env.num_states(), env.num_actions())
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn get(&self, state: usize, action: usize) -> f32 {
        self.row(state)[action]
    }

    /// Action values of one state
    pub fn row(&self, state: usize) -> &[f32] {
        let start = state * self.num_actions;
        &self.values[start..start + self.num_actions]
    }

    /// The highest-valued action, preferring the lowest index on ties
    pub fn best_action(&self, state: usize) -> usize {
        let mut best = 0;
        for (action, &value) in self.row(state).iter().enumerate().skip(1) {
            if value > self.get(state, best) {
                best = action;
            }
        }
        best
    }

    pub fn max_value(&self, state: usize) -> f32 {
        self.get(state, self.best_action(state))
    }

    /// Epsilon greedy action selection: a uniformly random action with probability
    /// `epsilon`, otherwise [the best action](QTable::best_action)
    pub fn select_action<R: Rng + ?Sized>(
        &self,
        state: usize,
        epsilon: f32,
        rng: &mut R,
    ) -> usize {
        match Choice::draw(epsilon, rng) {
            Choice::Explore => rng.gen_range(0..self.num_actions),
            Choice::Exploit => self.best_action(state),
        }
    }

    /// Blend the current estimate with the one-step bootstrapped return
    ///
    /// Q(s,a) <- (1 - alpha) * Q(s,a) + alpha * (reward + gamma * max<sub>a'</sub> Q(s',a'))
    pub fn update(
        &mut self,
        state: usize,
        action: usize,
        reward: f32,
        next_state: usize,
        alpha: f32,
        gamma: f32,
    ) {
        let max_next_q = self.max_value(next_state);
        let q_value = self.get(state, action);
        let new_q_value = reward + gamma * max_next_q;
        self.values[state * self.num_actions + action] =
            (1.0 - alpha) * q_value + alpha * new_q_value;
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use statrs::distribution::{ChiSquared, ContinuousCDF};

    use super::*;

    #[test]
    fn starts_at_zero() {
        let table = QTable::new(3, 4);
        assert!((0..3).all(|s| table.row(s) == [0.0; 4]));
        assert_eq!(table.best_action(2), 0, "Ties go to the first action");
    }

    #[test]
    fn update_applies_bellman_blend() {
        let mut table = QTable::new(2, 2);
        table.update(1, 1, 4.0, 1, 1.0, 0.0);
        assert_eq!(table.get(1, 1), 4.0);

        // (1 - 0.5) * 0 + 0.5 * (-1 + 0.5 * 4)
        table.update(0, 0, -1.0, 1, 0.5, 0.5);
        assert_eq!(table.get(0, 0), 0.5);

        // (1 - 0.5) * 0.5 + 0.5 * (-1 + 0.5 * 4)
        table.update(0, 0, -1.0, 1, 0.5, 0.5);
        assert_eq!(table.get(0, 0), 0.75);
        assert_eq!(table.get(0, 1), 0.0, "Other entries untouched");
    }

    #[test]
    fn best_action_prefers_first_maximum() {
        let mut table = QTable::new(1, 4);
        table.update(0, 1, 2.0, 0, 1.0, 0.0);
        table.update(0, 3, 2.0, 0, 1.0, 0.0);
        assert_eq!(table.best_action(0), 1);
        assert_eq!(table.max_value(0), 2.0);

        table.update(0, 2, -5.0, 0, 1.0, 0.0);
        assert_eq!(table.best_action(0), 1);
    }

    #[test]
    fn greedy_selection_ignores_rng() {
        let mut table = QTable::new(1, 4);
        table.update(0, 2, 1.0, 0, 1.0, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert!((0..100).all(|_| table.select_action(0, 0.0, &mut rng) == 2));
    }

    #[test]
    fn exploration_is_uniform() {
        let num_actions = 6;
        let n = 12_000;
        let table = QTable::new(1, num_actions);
        let mut rng = StdRng::seed_from_u64(1234);

        let mut counts = vec![0u32; num_actions];
        for _ in 0..n {
            counts[table.select_action(0, 1.0, &mut rng)] += 1;
        }

        let expected = n as f64 / num_actions as f64;
        let statistic: f64 = counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        let critical = ChiSquared::new((num_actions - 1) as f64)
            .unwrap()
            .inverse_cdf(0.999);
        assert!(
            statistic < critical,
            "Chi-squared {statistic} exceeds {critical} for counts {counts:?}"
        );
    }
}
