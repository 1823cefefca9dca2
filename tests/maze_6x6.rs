use qgrid::{
    algo::{tabular::Outcome, QTableAgent, QTableAgentConfig},
    env::Environment,
    grid::{Action, Cell, Grid, GridWorld},
};

const MAZE_6X6: [u8; 36] = [
    0, 0, 0, 0, 0, 0, //
    0, 1, 1, 0, 0, 0, //
    0, 0, 0, 1, 0, 0, //
    1, 0, 1, 1, 0, 0, //
    0, 0, 0, 1, 0, 0, //
    0, 0, 0, 0, 1, 2, //
];

const NUM_EPISODES: u32 = 10000;

fn env() -> GridWorld<2> {
    Grid::from_labels([6, 6], &MAZE_6X6, [0, 0]).unwrap().into()
}

#[test]
fn learns_to_solve_the_maze() {
    let env = env();
    let config: QTableAgentConfig = QTableAgentConfig {
        seed: Some(42),
        log_interval: 0,
        ..Default::default()
    };
    let mut agent = QTableAgent::new(config, &env).unwrap();
    let summaries = agent.train(&env, NUM_EPISODES, |_| {});
    assert_eq!(summaries.len(), NUM_EPISODES as usize);

    let epsilons = summaries.iter().map(|s| s.epsilon).collect::<Vec<_>>();
    assert!(
        epsilons.windows(2).all(|w| w[1] <= w[0]),
        "Exploration never increases"
    );
    assert!(epsilons.iter().all(|&e| e >= 0.01));
    assert!(summaries.last().unwrap().reached_goal);

    let policy = agent.into_policy();
    let evaluation = policy.evaluate(&env);
    assert_eq!(evaluation.outcome, Outcome::ReachedGoal);
    assert_eq!(evaluation.path.first(), Some(&[0, 0]));
    assert_eq!(evaluation.path.last(), Some(&[5, 5]));
    assert!(evaluation.steps() < 20, "Took {} steps", evaluation.steps());
}

#[test]
fn goal_approach_outvalues_every_wall_bump() {
    let env = env();
    let config: QTableAgentConfig = QTableAgentConfig {
        seed: Some(7),
        log_interval: 0,
        ..Default::default()
    };
    let mut agent = QTableAgent::new(config, &env).unwrap();
    agent.train(&env, NUM_EPISODES, |_| {});

    let grid = env.grid();
    let table = agent.q_table();
    let south = Action::<2>::from_index(1).unwrap();
    assert_eq!(south.name(), "South");
    let approach = table.get(grid.coord_to_state([4, 5]), south.index());

    for coord in grid.coords().filter(|&c| grid.cell(c) != Cell::Wall) {
        for action in Action::<2>::all() {
            let bumps_wall = action
                .apply(coord, grid.dims())
                .is_some_and(|next| grid.cell(next) == Cell::Wall);
            if bumps_wall {
                let value = table.get(grid.coord_to_state(coord), action.index());
                assert!(
                    approach > value,
                    "Q({coord:?}, {action}) = {value} >= {approach}"
                );
            }
        }
    }
    assert_eq!(env.num_actions(), 4);
}
