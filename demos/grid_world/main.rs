use std::{error::Error, fs};

use gridq::{
    algo::{QTableAgent, QTableAgentConfig},
    decay::{Constant, Linear},
    gym::grid_world::{GridWorld, GridWorldConfig, Knowledge, ModeSelection, World},
};
use log::info;
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

const MAP: &str = "
    ..#..A.
    .X#....
    ...X.#.
    S......
    ..#.X.B
";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    const TRAINING_EPISODES: u32 = 5000;
    const VALIDATION_EPISODES: u32 = 200;

    let world: World = MAP.parse()?;
    let env = GridWorld::new(
        world,
        GridWorldConfig {
            mode: ModeSelection::Random,
            ..Default::default()
        },
    )?;
    let mut agent = QTableAgent::new(
        env,
        QTableAgentConfig {
            epsilon: Linear::new(1.0, 0.02, 4000)?.into(),
            alpha: Constant::new(0.2).into(),
            stop_after: Some(TRAINING_EPISODES),
            seed: Some(42),
            ..Default::default()
        },
    );

    while agent.recorder().validation().len() < VALIDATION_EPISODES as usize {
        let finished = agent.tick();
        if finished.is_empty() {
            continue;
        }

        let board = agent.scoreboard();
        if board.episodes() % 500 < finished.len() as u32 {
            let window = agent.window();
            info!(
                "episodes {} | wins {} | losses {} | best {:.2} | mean(last {}) {:.3} | win rate {:.2} | epsilon {:.3}",
                board.episodes(),
                board.wins(),
                board.losses(),
                board.best_reward().unwrap_or_default(),
                window.len(),
                window.mean_reward().unwrap_or_default(),
                window.win_rate().unwrap_or_default(),
                agent.epsilon(),
            );
        }
    }

    for knows in Knowledge::iter() {
        let policy = agent.policy_map(knows);
        let depth = policy.first().map_or(0, Vec::len);
        let rows = (0..depth)
            .rev()
            .map(|z| {
                policy
                    .iter()
                    .map(|column| match column[z] {
                        Some(action) => action.arrow(),
                        None => '#',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        info!("greedy policy ({knows:?}):\n{}", rows.join("\n"));
    }

    let path = "grid_world_summary.txt";
    fs::write(path, agent.summary().to_string())?;
    info!("summary written to {path}");
    Ok(())
}
