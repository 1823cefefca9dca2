use std::fmt;

use log::debug;

use crate::{
    env::Environment,
    grid::{Coord, GridWorld},
};

use super::QTable;

/// How a greedy run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The goal was reached
    ReachedGoal,
    /// The greedy action left the agent in place, so it would repeat forever
    Stuck,
    /// The step limit ran out, typically because the policy cycles
    StepLimit,
}

impl Outcome {
    pub fn reached_goal(self) -> bool {
        self == Outcome::ReachedGoal
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::ReachedGoal => "reached goal",
            Outcome::Stuck => "did not reach goal (stuck)",
            Outcome::StepLimit => "did not reach goal (step limit)",
        })
    }
}

/// A frozen Q-table that always exploits
#[derive(Debug, Clone)]
pub struct GreedyPolicy {
    q_table: QTable,
}

impl GreedyPolicy {
    pub fn new(q_table: QTable) -> Self {
        Self { q_table }
    }

    pub fn table(&self) -> &QTable {
        &self.q_table
    }

    /// The greedy action for `state`
    pub fn action(&self, state: usize) -> usize {
        self.q_table.best_action(state)
    }

    /// Start a fresh walk from the start cell, taking at most one move per state
    pub fn run<'a, const D: usize>(&'a self, env: &'a GridWorld<D>) -> Trajectory<'a, D> {
        self.run_with_limit(env, env.num_states())
    }

    /// Start a fresh walk from the start cell, taking at most `max_moves` moves
    pub fn run_with_limit<'a, const D: usize>(
        &'a self,
        env: &'a GridWorld<D>,
        max_moves: usize,
    ) -> Trajectory<'a, D> {
        Trajectory {
            policy: self,
            env,
            state: env.start_state(),
            moves: 0,
            max_moves,
            outcome: None,
        }
    }

    /// Walk the policy to completion and collect the visited cells
    pub fn evaluate<const D: usize>(&self, env: &GridWorld<D>) -> Evaluation<D> {
        let mut trajectory = self.run(env);
        let path = trajectory.by_ref().collect::<Vec<_>>();
        let outcome = trajectory.outcome().unwrap_or(Outcome::StepLimit);
        debug!("Greedy run {outcome} after {} move(s)", trajectory.moves());
        Evaluation { path, outcome }
    }
}

/// The cells visited by one greedy run, produced lazily
///
/// Yields the start cell first and the final cell last. Once exhausted it stays
/// exhausted; call [`GreedyPolicy::run`] again for a new run.
pub struct Trajectory<'a, const D: usize> {
    policy: &'a GreedyPolicy,
    env: &'a GridWorld<D>,
    state: usize,
    moves: usize,
    max_moves: usize,
    outcome: Option<Outcome>,
}

impl<'a, const D: usize> Trajectory<'a, D> {
    /// How the run ended, or `None` while it is still going
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Moves taken so far
    pub fn moves(&self) -> usize {
        self.moves
    }
}

impl<'a, const D: usize> Iterator for Trajectory<'a, D> {
    type Item = Coord<D>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.outcome.is_some() {
            return None;
        }

        let coord = self.env.coord(self.state);
        if self.env.is_terminal(self.state) {
            self.outcome = Some(Outcome::ReachedGoal);
            return Some(coord);
        }
        if self.moves == self.max_moves {
            self.outcome = Some(Outcome::StepLimit);
            return Some(coord);
        }

        let next_state = self
            .env
            .transition(self.state, self.policy.action(self.state))
            .next_state;
        self.moves += 1;
        if next_state == self.state {
            self.outcome = Some(Outcome::Stuck);
        } else {
            self.state = next_state;
        }

        Some(coord)
    }
}

/// A completed greedy run
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<const D: usize> {
    /// Visited cells from start to the final cell
    pub path: Vec<Coord<D>>,
    pub outcome: Outcome,
}

impl<const D: usize> Evaluation<D> {
    pub fn reached_goal(&self) -> bool {
        self.outcome.reached_goal()
    }

    /// Number of moves between the visited cells
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    const NORTH: usize = 0;
    const SOUTH: usize = 1;
    const WEST: usize = 2;
    const EAST: usize = 3;

    fn world() -> GridWorld<2> {
        "S..\n#.#\n..G".parse::<Grid<2>>().unwrap().into()
    }

    /// A table whose greedy action in each state is given by `actions`
    fn policy_from(actions: &[usize]) -> GreedyPolicy {
        let mut table = QTable::new(actions.len(), 4);
        for (state, &action) in actions.iter().enumerate() {
            table.update(state, action, 1.0, state, 1.0, 0.0);
        }
        GreedyPolicy::new(table)
    }

    #[test]
    fn follows_greedy_actions_to_goal() {
        let env = world();
        let policy = policy_from(&[EAST, SOUTH, 0, 0, SOUTH, 0, 0, EAST, 0]);
        let evaluation = policy.evaluate(&env);
        assert_eq!(
            evaluation.path,
            [[0, 0], [0, 1], [1, 1], [2, 1], [2, 2]],
            "Path follows the table"
        );
        assert_eq!(evaluation.outcome, Outcome::ReachedGoal);
        assert_eq!(evaluation.steps(), 4);
    }

    #[test]
    fn wall_bump_ends_run_as_stuck() {
        let env = world();
        let policy = policy_from(&[SOUTH; 9]);
        let mut trajectory = policy.run(&env);
        assert_eq!(trajectory.next(), Some([0, 0]));
        assert_eq!(trajectory.outcome(), Some(Outcome::Stuck));
        assert_eq!(trajectory.next(), None, "Exhausted runs stay exhausted");
    }

    #[test]
    fn boundary_bump_ends_run_as_stuck() {
        let env = world();
        let policy = policy_from(&[NORTH; 9]);
        let evaluation = policy.evaluate(&env);
        assert_eq!(evaluation.path, [[0, 0]]);
        assert_eq!(evaluation.outcome, Outcome::Stuck);
        assert!(!evaluation.reached_goal());
    }

    #[test]
    fn cycles_hit_the_step_limit() {
        let env = world();
        let policy = policy_from(&[EAST, WEST, 0, 0, 0, 0, 0, 0, 0]);
        let evaluation = policy.evaluate(&env);
        assert_eq!(evaluation.outcome, Outcome::StepLimit);
        assert_eq!(evaluation.steps(), env.num_states());

        let short = policy.run_with_limit(&env, 3).collect::<Vec<_>>();
        assert_eq!(short, [[0, 0], [0, 1], [0, 0], [0, 1]]);
    }

    #[test]
    fn each_run_starts_fresh() {
        let env = world();
        let policy = policy_from(&[EAST, SOUTH, 0, 0, SOUTH, 0, 0, EAST, 0]);
        let first = policy.run(&env).collect::<Vec<_>>();
        let second = policy.run(&env).collect::<Vec<_>>();
        assert_eq!(first, second);
    }
}
