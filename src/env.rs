/// The outcome of applying one action in one state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// The state the agent ends up in, which equals the input state if it could not move
    pub next_state: usize,
    /// The reward received for the attempted move
    pub reward: f32,
}

/// Represents a finite Markov decision process with integer-indexed states and actions,
/// defining the dynamics of an environment in which a tabular agent can operate.
///
/// Dynamics are a pure function of `(state, action)`. The environment itself holds no
/// agent position, so the same instance can be shared by a trainer and an evaluator.
pub trait Environment {
    /// Number of distinct states, indexed `0..num_states()`
    fn num_states(&self) -> usize;

    /// Number of distinct actions, indexed `0..num_actions()`
    ///
    /// Every action is available in every state.
    fn num_actions(&self) -> usize;

    /// The state every episode begins in
    fn start_state(&self) -> usize;

    /// Determine if the state ends an episode
    fn is_terminal(&self, state: usize) -> bool;

    /// Apply `action` in `state`, producing the next state and associated reward
    ///
    /// **Panics** (implementation-defined) if `state` is not below `num_states()` or
    /// `action` is not below `num_actions()`
    fn transition(&self, state: usize, action: usize) -> Transition;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A corridor of `len` states where action 1 moves right, action 0 moves left,
    /// and the last state is terminal
    pub struct MockEnv {
        pub len: usize,
    }

    impl Environment for MockEnv {
        fn num_states(&self) -> usize {
            self.len
        }

        fn num_actions(&self) -> usize {
            2
        }

        fn start_state(&self) -> usize {
            0
        }

        fn is_terminal(&self, state: usize) -> bool {
            state == self.len - 1
        }

        fn transition(&self, state: usize, action: usize) -> Transition {
            let next_state = match action {
                0 => state.saturating_sub(1),
                _ => (state + 1).min(self.len - 1),
            };
            let reward = if self.is_terminal(next_state) { 10.0 } else { -1.0 };
            Transition { next_state, reward }
        }
    }

    #[test]
    fn mock_env_moves_along_corridor() {
        let env = MockEnv { len: 4 };
        assert_eq!(env.transition(0, 0).next_state, 0, "Left wall holds");
        assert_eq!(env.transition(0, 1).next_state, 1);
        let last = env.transition(2, 1);
        assert_eq!(last, Transition { next_state: 3, reward: 10.0 });
        assert!(env.is_terminal(last.next_state));
    }
}
