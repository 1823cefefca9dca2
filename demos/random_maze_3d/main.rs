use std::error::Error;

use log::{info, warn};
use qgrid::{
    algo::{QTableAgent, QTableAgentConfig},
    grid::{GridWorld, MapGenerator, MapSource},
    viz,
};
use rand::thread_rng;

const NUM_EPISODES: u32 = 20000;

fn main() -> Result<(), Box<dyn Error>> {
    let (handle, tx) = viz::init(&viz::SUMMARY_KEYS, NUM_EPISODES);

    let source = MapSource::from(MapGenerator::new([3, 6, 6], [0, 0, 0], [2, 5, 5]));
    let env = GridWorld::new(source.resolve(&mut thread_rng())?);
    for line in env.grid().to_string().lines() {
        info!("{line}");
    }

    let config: QTableAgentConfig = Default::default();
    let mut agent = QTableAgent::new(config, &env)?;

    for _ in 0..NUM_EPISODES {
        let summary = agent.go(&env);
        if tx.send(viz::Update::from(&summary)).is_err() {
            warn!("Dashboard closed, stopping training early");
            break;
        }
    }
    drop(tx);

    let policy = agent.into_policy();
    let mut trajectory = policy.run(&env);
    for coord in trajectory.by_ref() {
        info!("Agent at {coord:?}");
    }
    match trajectory.outcome() {
        Some(outcome) => info!("Agent {outcome} after {} moves", trajectory.moves()),
        None => warn!("Trajectory ended without an outcome"),
    }

    match handle.join() {
        Ok(result) => result?,
        Err(_) => return Err("dashboard thread panicked".into()),
    }

    Ok(())
}
