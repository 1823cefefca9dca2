use std::{error::Error, fs, path::Path};

use qgrid::{
    algo::{QTableAgent, QTableAgentConfig},
    grid::{Grid, GridWorld, MapSource},
};
use rand::thread_rng;

const NUM_EPISODES: u32 = 10000;

const MAP: [u8; 36] = [
    0, 0, 0, 0, 0, 0, //
    0, 1, 1, 0, 0, 0, //
    0, 0, 0, 1, 0, 0, //
    1, 0, 1, 1, 0, 0, //
    0, 0, 0, 1, 0, 0, //
    0, 0, 0, 0, 1, 2, //
];

fn main() -> Result<(), Box<dyn Error>> {
    let path = Path::new("demos/maze_2d");

    let grid = Grid::from_labels([6, 6], &MAP, [0, 0])?;
    let env = GridWorld::new(MapSource::from(grid).resolve(&mut thread_rng())?);
    println!("{}\n", env.grid());

    // Progress is printed by the episode callback below
    let config: QTableAgentConfig = QTableAgentConfig {
        log_interval: 0,
        ..Default::default()
    };
    let mut agent = QTableAgent::new(config, &env)?;

    fs::create_dir_all(path.join("out"))?;
    let mut wtr = csv::Writer::from_path(path.join("out/data.csv"))?;
    wtr.write_record(["episode", "reward", "steps", "epsilon"])?;

    let summaries = agent.train(&env, NUM_EPISODES, |summary| {
        if summary.episode % 1000 == 0 {
            println!(
                "Episode {:5}: steps={:3}, epsilon={:.4}",
                summary.episode, summary.steps, summary.epsilon
            );
        }
    });
    for summary in summaries {
        wtr.write_record(&[
            summary.episode.to_string(),
            summary.reward.to_string(),
            summary.steps.to_string(),
            summary.epsilon.to_string(),
        ])?;
    }
    wtr.flush()?;

    let policy = agent.into_policy();
    let evaluation = policy.evaluate(&env);
    for (step, coord) in evaluation.path.iter().enumerate() {
        println!("{step:3}: {coord:?}");
    }
    println!("Agent {} in {} steps", evaluation.outcome, evaluation.steps());

    Ok(())
}
