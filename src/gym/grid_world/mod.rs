//! A slippery grid world with two goal types, only some of which pay out in a given episode

use log::{info, trace};
use rand::{seq::SliceRandom, Rng};
use rand_distr::Distribution;
use strum::VariantArray;

use crate::{
    assert_interval,
    env::{Environment, Outcome, Transition},
    error::{Error, Result},
    prob::GaussianReward,
};

mod state;
mod world;

pub use state::{Action, Knowledge, Pos, State};
pub use world::{Tile, World};

/// Which goal types end the episode with a reward
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RewardMode {
    OnlyA,
    OnlyB,
    Both,
}

/// How the [`RewardMode`] of each episode is chosen
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModeSelection {
    /// Same mode every episode
    Fixed(RewardMode),
    /// Redrawn uniformly between [`RewardMode::OnlyA`] and [`RewardMode::OnlyB`] at every episode start
    Random,
}

/// Where episodes start
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Spawn {
    Fixed(Pos),
    /// Uniformly among these points
    Points(Vec<Pos>),
    /// Uniformly among the world's start tiles
    StartTiles,
    /// Uniformly among all empty and start tiles
    AnyOpen,
}

/// Configuration for the [`GridWorld`]
#[derive(Debug, Clone)]
pub struct GridWorldConfig {
    /// Reward of every step
    ///
    /// **Default**: `-0.05`
    pub move_cost: f64,
    /// Added each time a move or a slip runs into a wall or the grid edge
    ///
    /// **Default**: `-0.1`
    pub collision_cost: f64,
    /// Added when stepping on a punishment tile
    ///
    /// **Default**: `-2.0`
    pub punishment_cost: f64,
    /// **Default**: a fixed `2.0`
    pub reward_a: GaussianReward,
    /// **Default**: a fixed `2.0`
    pub reward_b: GaussianReward,
    /// Probability of drifting one cell sideways on each step
    ///
    /// **Default**: `0.1`
    pub slidiness: f64,
    /// **Default**: `Fixed(Both)`
    pub mode: ModeSelection,
    /// **Default**: `StartTiles`
    pub spawn: Spawn,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self {
            move_cost: -0.05,
            collision_cost: -0.1,
            punishment_cost: -2.0,
            reward_a: GaussianReward::fixed(2.0),
            reward_b: GaussianReward::fixed(2.0),
            slidiness: 0.1,
            mode: ModeSelection::Fixed(RewardMode::Both),
            spawn: Spawn::StartTiles,
        }
    }
}

/// The grid world environment
///
/// Each step costs `move_cost`; running into a wall or the edge cancels the move and
/// costs `collision_cost`. With probability `slidiness` the agent also drifts one cell
/// perpendicular to the intended direction, which can collide on its own.
///
/// Under a single-goal [`RewardMode`] the other goal type is inert: stepping on it
/// only records in the state's [`Knowledge`] that it is not the live one.
pub struct GridWorld {
    world: World,
    config: GridWorldConfig,
    spawn_points: Vec<Pos>,
    mode: RewardMode,
}

impl GridWorld {
    /// **Panics** if `config.slidiness` is not in the interval `[0,1]`
    pub fn new(world: World, config: GridWorldConfig) -> Result<Self> {
        assert_interval!(config.slidiness, 0.0, 1.0);

        let spawn_points = match &config.spawn {
            Spawn::Fixed(pos) => vec![*pos],
            Spawn::Points(points) => points.clone(),
            Spawn::StartTiles => world.start_tiles(),
            Spawn::AnyOpen => world.open_cells(),
        };
        if spawn_points.is_empty() {
            return Err(Error::NoSpawnPoints);
        }
        for &pos in &spawn_points {
            match world.tile(pos) {
                None => {
                    return Err(Error::OutOfBounds {
                        x: pos.x,
                        z: pos.z,
                        width: world.width(),
                        depth: world.depth(),
                    })
                }
                Some(Tile::Wall) => return Err(Error::SpawnOnWall { x: pos.x, z: pos.z }),
                Some(_) => {}
            }
        }

        let mode = match config.mode {
            ModeSelection::Fixed(mode) => mode,
            ModeSelection::Random => RewardMode::OnlyA,
        };

        info!(
            "grid world {}x{}: {} spawn point(s), {} A goal(s), {} B goal(s), {} punishment(s)",
            world.width(),
            world.depth(),
            spawn_points.len(),
            world.count(Tile::RewardA),
            world.count(Tile::RewardB),
            world.count(Tile::Punishment),
        );

        Ok(Self {
            world,
            config,
            spawn_points,
            mode,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &GridWorldConfig {
        &self.config
    }

    /// The reward mode of the current episode
    pub fn mode(&self) -> RewardMode {
        self.mode
    }

    pub fn spawn_points(&self) -> &[Pos] {
        &self.spawn_points
    }

    pub fn is_wall(&self, state: &State) -> bool {
        self.world.is_blocked(state.pos)
    }

    /// Whether the state is on either goal type
    pub fn is_reward(&self, state: &State) -> bool {
        self.world.tile(state.pos).is_some_and(Tile::is_goal)
    }

    pub fn is_punishment(&self, state: &State) -> bool {
        self.world.tile(state.pos) == Some(Tile::Punishment)
    }

    /// Move `pos` by `(dx, dz)` unless that runs into a wall; returns whether it collided
    fn try_move(&self, pos: &mut Pos, (dx, dz): (i32, i32)) -> bool {
        let dest = pos.offset(dx, dz);
        if self.world.is_blocked(dest) {
            trace!("collision at ({}, {})", dest.x, dest.z);
            true
        } else {
            *pos = dest;
            false
        }
    }
}

impl Environment for GridWorld {
    type State = State;
    type Action = Action;

    fn actions(&self) -> &[Action] {
        Action::VARIANTS
    }

    fn start_state<R: Rng + ?Sized>(&mut self, rng: &mut R) -> State {
        let pos = match self.spawn_points.as_slice() {
            [only] => *only,
            points => *points.choose(rng).expect("spawn points are never empty"),
        };

        if self.config.mode == ModeSelection::Random {
            self.mode = if rng.gen::<f64>() < 0.5 {
                RewardMode::OnlyA
            } else {
                RewardMode::OnlyB
            };
        }

        State::new(pos, Knowledge::None)
    }

    fn transition<R: Rng + ?Sized>(
        &mut self,
        state: &State,
        action: Action,
        rng: &mut R,
    ) -> Transition<State> {
        // Both slip draws happen every step so seeded traces line up
        let slip = rng.gen::<f64>() < self.config.slidiness;
        let slide = if rng.gen::<f64>() < 0.5 { -1 } else { 1 };

        let mut reward = self.config.move_cost;
        let mut next = *state;

        if self.try_move(&mut next.pos, action.delta()) {
            reward += self.config.collision_cost;
        }
        if slip {
            let (lx, lz) = action.lateral();
            if self.try_move(&mut next.pos, (lx * slide, lz * slide)) {
                reward += self.config.collision_cost;
            }
        }

        let mut outcome = Outcome::Continue;
        let tile = self.world.tile(next.pos).unwrap_or(Tile::Wall);
        match (tile, self.mode) {
            (Tile::RewardA, RewardMode::OnlyA | RewardMode::Both) => {
                reward += self.config.reward_a.sample(rng);
                outcome = Outcome::Goal;
            }
            (Tile::RewardB, RewardMode::OnlyB | RewardMode::Both) => {
                reward += self.config.reward_b.sample(rng);
                outcome = Outcome::Goal;
            }
            (Tile::RewardA, RewardMode::OnlyB) => next.knows = Knowledge::VisitedA,
            (Tile::RewardB, RewardMode::OnlyA) => next.knows = Knowledge::VisitedB,
            _ => {}
        }
        if tile == Tile::Punishment {
            reward += self.config.punishment_cost;
            outcome = Outcome::Punished;
        }

        Transition {
            next,
            reward,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn env(map: &str, config: GridWorldConfig) -> GridWorld {
        GridWorld::new(map.parse().unwrap(), config).unwrap()
    }

    fn still() -> GridWorldConfig {
        GridWorldConfig {
            slidiness: 0.0,
            ..Default::default()
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn moves_follow_compass() {
        let mut env = env("...\n.S.\n...", still());
        let mut rng = StdRng::seed_from_u64(0);
        let start = env.start_state(&mut rng);
        assert_eq!(start, State::at(1, 1));

        let cases = [
            (Action::North, Pos::new(1, 2)),
            (Action::East, Pos::new(2, 1)),
            (Action::South, Pos::new(1, 0)),
            (Action::West, Pos::new(0, 1)),
        ];
        for (action, expected) in cases {
            let t = env.transition(&start, action, &mut rng);
            assert_eq!(t.next.pos, expected, "{action:?} moves one cell");
            assert!(approx(t.reward, -0.05), "plain move costs move_cost");
            assert_eq!(t.outcome, Outcome::Continue);
        }
    }

    #[test]
    fn wall_bounce() {
        let mut env = env("S#", still());
        let mut rng = StdRng::seed_from_u64(1);
        let start = env.start_state(&mut rng);

        let t = env.transition(&start, Action::East, &mut rng);
        assert_eq!(t.next, start, "position unchanged, knowledge untouched");
        assert!(approx(t.reward, -0.05 - 0.1), "exactly one collision penalty");

        let t = env.transition(&start, Action::South, &mut rng);
        assert_eq!(t.next, start, "grid edge behaves like a wall");
        assert!(approx(t.reward, -0.15));
    }

    #[test]
    fn certain_slip_drifts_sideways() {
        let config = GridWorldConfig {
            slidiness: 1.0,
            ..Default::default()
        };
        let mut env = env(".....\n.....\n..S..\n.....\n.....", config);
        let mut rng = StdRng::seed_from_u64(5);
        let start = env.start_state(&mut rng);

        for _ in 0..50 {
            let t = env.transition(&start, Action::North, &mut rng);
            assert_eq!(t.next.pos.z, 3, "primary move kept");
            assert_eq!(start.pos.x.abs_diff(t.next.pos.x), 1, "drifted east or west");
            assert!(approx(t.reward, -0.05));
        }
    }

    #[test]
    fn slip_and_move_collide_independently() {
        let config = GridWorldConfig {
            slidiness: 1.0,
            ..Default::default()
        };
        // A 1x1 world: both the move and the drift hit the edge
        let mut env = env("S", config);
        let mut rng = StdRng::seed_from_u64(9);
        let start = env.start_state(&mut rng);
        let t = env.transition(&start, Action::West, &mut rng);
        assert_eq!(t.next, start);
        assert!(approx(t.reward, -0.05 - 0.1 - 0.1), "two penalties add up");
    }

    #[test]
    fn draw_order_is_slip_then_direction() {
        let config = GridWorldConfig {
            slidiness: 0.5,
            ..Default::default()
        };
        let mut env = env("...\n.S.\n...", config);
        let start = State::at(1, 1);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut mirror = StdRng::seed_from_u64(seed);
            let slip = mirror.gen::<f64>() < 0.5;
            let slide = if mirror.gen::<f64>() < 0.5 { -1 } else { 1 };

            let t = env.transition(&start, Action::East, &mut rng);
            let expected_z = if slip { 1 + slide } else { 1 };
            assert_eq!(t.next.pos, Pos::new(2, expected_z), "seed {seed}");
            assert_eq!(rng.gen::<u64>(), mirror.gen::<u64>(), "two draws consumed");
        }
    }

    #[test]
    fn gaussian_goal_reward_draws_after_slip() {
        let config = GridWorldConfig {
            reward_a: GaussianReward::new(5.0, 1.0),
            slidiness: 0.5,
            ..Default::default()
        };
        // East lands on the goal; a slip drifts off the grid and only costs a collision
        let mut env = env("SA", config);
        let start = State::at(0, 0);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut mirror = StdRng::seed_from_u64(seed);
            let slip = mirror.gen::<f64>() < 0.5;
            let _direction = mirror.gen::<f64>();
            let noise = crate::prob::box_muller(&mut mirror);

            let t = env.transition(&start, Action::East, &mut rng);
            let collision = if slip { -0.1 } else { 0.0 };
            let expected = -0.05 + collision + 5.0 + 1.0 * noise;
            assert_eq!(t.outcome, Outcome::Goal);
            assert_eq!(t.next, State::at(1, 0));
            assert!(approx(t.reward, expected), "seed {seed}: {} vs {expected}", t.reward);
            assert_eq!(rng.gen::<u64>(), mirror.gen::<u64>(), "four draws consumed");
        }

        let mut rng = StdRng::seed_from_u64(1);
        let mut mirror = StdRng::seed_from_u64(1);
        env.transition(&start, Action::West, &mut rng);
        mirror.gen::<f64>();
        mirror.gen::<f64>();
        assert_eq!(
            rng.gen::<u64>(),
            mirror.gen::<u64>(),
            "no reward draws without a goal"
        );
    }

    #[test]
    fn both_mode_pays_either_goal() {
        let mut env = env("ASB", still());
        let mut rng = StdRng::seed_from_u64(2);
        let start = env.start_state(&mut rng);
        for action in [Action::West, Action::East] {
            let t = env.transition(&start, action, &mut rng);
            assert_eq!(t.outcome, Outcome::Goal);
            assert!(approx(t.reward, -0.05 + 2.0));
            assert!(env.is_reward(&t.next));
        }
    }

    #[test]
    fn wrong_goal_reveals_knowledge() {
        let config = GridWorldConfig {
            mode: ModeSelection::Fixed(RewardMode::OnlyA),
            ..still()
        };
        let mut env = env("A.SB", config);
        let mut rng = StdRng::seed_from_u64(4);
        let start = env.start_state(&mut rng);

        let t = env.transition(&start, Action::East, &mut rng);
        assert_eq!(t.next, State::new(Pos::new(3, 0), Knowledge::VisitedB));
        assert!(approx(t.reward, -0.05), "no goal reward");
        assert_eq!(t.outcome, Outcome::Continue, "episode goes on");

        let t = env.transition(&t.next, Action::West, &mut rng);
        assert_eq!(t.next.knows, Knowledge::VisitedB, "knowledge persists");
        let t = env.transition(&t.next, Action::West, &mut rng);
        let t = env.transition(&t.next, Action::West, &mut rng);
        assert_eq!(t.outcome, Outcome::Goal, "live goal still pays");
        assert_eq!(t.next.knows, Knowledge::VisitedB);

        assert_eq!(env.start_state(&mut rng).knows, Knowledge::None, "reset");
    }

    #[test]
    fn only_b_reveals_a() {
        let config = GridWorldConfig {
            mode: ModeSelection::Fixed(RewardMode::OnlyB),
            ..still()
        };
        let mut env = env("AS", config);
        let mut rng = StdRng::seed_from_u64(4);
        let start = env.start_state(&mut rng);
        let t = env.transition(&start, Action::West, &mut rng);
        assert_eq!(t.next.knows, Knowledge::VisitedA);
        assert_eq!(t.outcome, Outcome::Continue);
    }

    #[test]
    fn punishment_ends_episode() {
        let mut env = env("SX", still());
        let mut rng = StdRng::seed_from_u64(6);
        let start = env.start_state(&mut rng);
        let t = env.transition(&start, Action::East, &mut rng);
        assert_eq!(t.outcome, Outcome::Punished);
        assert!(approx(t.reward, -0.05 - 2.0));
        assert!(env.is_punishment(&t.next));
        assert!(!t.outcome.is_win());
    }

    #[test]
    fn random_mode_draws_both() {
        let config = GridWorldConfig {
            mode: ModeSelection::Random,
            ..still()
        };
        let mut env = env("SAB", config);
        let mut rng = StdRng::seed_from_u64(8);
        let modes = (0..200)
            .map(|_| {
                env.start_state(&mut rng);
                env.mode()
            })
            .collect::<Vec<_>>();
        assert!(modes.contains(&RewardMode::OnlyA));
        assert!(modes.contains(&RewardMode::OnlyB));
        assert!(!modes.contains(&RewardMode::Both), "never both when randomized");
    }

    #[test]
    fn spawn_points_are_uniform_choices() {
        let config = GridWorldConfig {
            spawn: Spawn::Points(vec![Pos::new(0, 0), Pos::new(2, 0)]),
            ..still()
        };
        let mut env = env("...", config);
        let mut rng = StdRng::seed_from_u64(10);
        let starts = (0..100)
            .map(|_| env.start_state(&mut rng).pos)
            .collect::<Vec<_>>();
        assert!(starts.contains(&Pos::new(0, 0)));
        assert!(starts.contains(&Pos::new(2, 0)));
        assert!(starts.iter().all(|p| *p != Pos::new(1, 0)));
    }

    #[test]
    fn any_open_avoids_walls_and_goals() {
        let config = GridWorldConfig {
            spawn: Spawn::AnyOpen,
            ..still()
        };
        let mut env = env("#A\n.X", config);
        assert_eq!(env.spawn_points(), [Pos::new(0, 0)]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(env.start_state(&mut rng).pos, Pos::new(0, 0));
    }

    #[test]
    fn rejects_bad_spawns() {
        let world: World = "#.".parse().unwrap();
        let no_start = GridWorld::new(world.clone(), still());
        assert!(matches!(no_start, Err(Error::NoSpawnPoints)));

        let on_wall = GridWorldConfig {
            spawn: Spawn::Fixed(Pos::new(0, 0)),
            ..still()
        };
        assert!(matches!(
            GridWorld::new(world.clone(), on_wall),
            Err(Error::SpawnOnWall { x: 0, z: 0 })
        ));

        let outside = GridWorldConfig {
            spawn: Spawn::Fixed(Pos::new(5, 0)),
            ..still()
        };
        assert!(matches!(
            GridWorld::new(world, outside),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn predicates() {
        let env = env("S#\nAX", still());
        assert!(env.is_wall(&State::at(1, 1)));
        assert!(env.is_wall(&State::at(-1, 0)), "out of bounds is a wall");
        assert!(env.is_reward(&State::at(0, 0)));
        assert!(env.is_punishment(&State::at(1, 0)));
        assert!(!env.is_reward(&State::at(0, 1)));
        assert_eq!(env.actions().len(), 4);
    }
}
