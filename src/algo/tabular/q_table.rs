use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    assert_interval,
    decay::{Constant, Decay, Linear, Schedule},
    env::{Environment, Transition},
    exploration::{Choice, EpsilonGreedy},
    gym::grid_world::{Action, GridWorld, Knowledge, State},
    stats::{EpisodeRecord, RollingWindow, RunRecorder, RunSummary, Scoreboard, Stream},
};

use super::{Hashable, QTable};

/// How a target value is blended into the stored estimate
///
/// The two forms are algebraically equal for a single update; they round differently,
/// so a run sticks to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateRule {
    /// Q ← Q + α(target − Q)
    #[default]
    Incremental,
    /// Q ← (1 − α)Q + α·target
    MovingAverage,
}

impl UpdateRule {
    pub fn apply(self, q: f64, target: f64, alpha: f64) -> f64 {
        match self {
            UpdateRule::Incremental => q + alpha * (target - q),
            UpdateRule::MovingAverage => (1.0 - alpha) * q + alpha * target,
        }
    }
}

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig {
    /// Exploration rate, advanced once per finished episode
    ///
    /// **Default**: linear from `1.0` to `0.02` over `10000` episodes
    pub epsilon: Schedule,
    /// Learning rate, advanced once per finished episode; updates are skipped while it is `<= 0`
    ///
    /// **Default**: constant `0.2`
    pub alpha: Schedule,
    /// Discount factor, must be in `[0,1]`
    ///
    /// **Default**: `0.99`
    pub gamma: f64,
    /// Value of action slots that were never written
    ///
    /// **Default**: `0.0`
    pub default_value: f64,
    /// **Default**: [`UpdateRule::Incremental`]
    pub update_rule: UpdateRule,
    /// An episode whose reward sinks below this is ended as a loss
    ///
    /// **Default**: `-1000.0`
    pub early_termination_floor: f64,
    /// Terminal target of one extra update applied when an episode is cut off
    ///
    /// **Default**: `None`
    pub early_termination_penalty: Option<f64>,
    /// Number of training episodes after which learning freezes for good
    ///
    /// **Default**: `None`
    pub stop_after: Option<u32>,
    /// Simulation steps run by one [`tick`](QTableAgent::tick)
    ///
    /// **Default**: `50`
    pub steps_per_tick: usize,
    /// Number of episodes in the rolling statistics window
    ///
    /// **Default**: `500`
    pub window: usize,
    /// Seed for the run's random generator, drawn from entropy when `None`
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            epsilon: Linear::new(1.0, 0.02, 10_000)
                .expect("default schedule is valid")
                .into(),
            alpha: Constant::new(0.2).into(),
            gamma: 0.99,
            default_value: 0.0,
            update_rule: UpdateRule::default(),
            early_termination_floor: -1000.0,
            early_termination_penalty: None,
            steps_per_tick: 50,
            stop_after: None,
            window: 500,
            seed: None,
        }
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// A Q-learning agent that owns its environment and drives the simulation step by step
///
/// Each [`step`](QTableAgent::step) picks an action epsilon-greedily, applies it to the
/// environment, updates the table and, on a terminal transition, finalizes the episode:
/// the outcome is recorded, ε and α advance along their schedules and a new start state
/// is drawn. Once learning freezes (ε = α = 0), later episodes are recorded as
/// validation episodes.
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - The state type must be `Copy`, `Eq`, and `Hash` to be used as a table key
pub struct QTableAgent<E>
where
    E: Environment,
    E::State: Hashable,
{
    env: E,
    table: QTable<E::State, E::Action>,
    exploration: EpsilonGreedy<Schedule>,
    alpha_schedule: Schedule,
    alpha: f64,
    gamma: f64,
    update_rule: UpdateRule,
    early_termination_floor: f64,
    early_termination_penalty: Option<f64>,
    stop_after: Option<u32>,
    steps_per_tick: usize,
    rng: StdRng,
    state: E::State,
    episode: u32, // finished training episodes
    steps: u32,   // steps in the running episode
    frozen: bool,
    scoreboard: Scoreboard,
    window: RollingWindow,
    recorder: RunRecorder,
}

impl<E> QTableAgent<E>
where
    E: Environment,
    E::State: Hashable,
{
    /// Initialize a new `QTableAgent` and draw the first start state
    ///
    /// **Panics** if `gamma` is not in the interval `[0,1]`, or if `steps_per_tick` or
    /// `window` is zero
    pub fn new(mut env: E, config: QTableAgentConfig) -> Self {
        assert_interval!(config.gamma, 0.0, 1.0);
        assert!(config.steps_per_tick > 0, "`steps_per_tick` must be non-zero.");

        let mut rng = build_rng(config.seed);
        let state = env.start_state(&mut rng);
        Self {
            env,
            table: QTable::new(config.default_value),
            exploration: EpsilonGreedy::new(config.epsilon),
            alpha: config.alpha.evaluate(0.0),
            alpha_schedule: config.alpha,
            gamma: config.gamma,
            update_rule: config.update_rule,
            early_termination_floor: config.early_termination_floor,
            early_termination_penalty: config.early_termination_penalty,
            stop_after: config.stop_after,
            steps_per_tick: config.steps_per_tick,
            rng,
            state,
            episode: 0,
            steps: 0,
            frozen: false,
            scoreboard: Scoreboard::default(),
            window: RollingWindow::new(config.window),
            recorder: RunRecorder::new(),
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn table(&self) -> &QTable<E::State, E::Action> {
        &self.table
    }

    /// The state the next step starts from
    pub fn state(&self) -> E::State {
        self.state
    }

    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Number of finished training episodes
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Whether learning has frozen
    pub fn is_complete(&self) -> bool {
        self.frozen
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn recorder(&self) -> &RunRecorder {
        &self.recorder
    }

    /// Summary of the run so far, timed from the agent's creation
    pub fn summary(&self) -> RunSummary<'_> {
        RunSummary {
            epsilon: self.exploration.schedule().params(),
            alpha: self.alpha_schedule.params(),
            gamma: self.gamma,
            training_time: self.recorder.elapsed(),
            recorder: &self.recorder,
        }
    }

    /// Choose an action based on the current state and exploration policy
    fn act(&mut self, state: E::State) -> E::Action {
        match self.exploration.choose(&mut self.rng) {
            Choice::Exploit => {
                let action = self.table.arg_max(state);
                self.scoreboard.set_expected(self.table.max(state));
                action
            }
            Choice::Explore => self.table.arg_random(&mut self.rng),
        }
    }

    /// Move the estimate for `(state, action)` toward the observed target
    ///
    /// A terminal target is the reward alone; otherwise it bootstraps from the best
    /// value of the next state.
    fn learn(
        &mut self,
        state: E::State,
        action: E::Action,
        reward: f64,
        next_state: E::State,
        terminal: bool,
    ) {
        let target = if terminal {
            reward
        } else {
            reward + self.gamma * self.table.max(next_state)
        };
        let q_value = self.table.get(&state, action);
        let value = self.update_rule.apply(q_value, target, self.alpha);
        self.table.set(state, action, value);
    }

    /// Run one simulation step, returning the episode's record if it ended
    pub fn step(&mut self) -> Option<EpisodeRecord> {
        let state = self.state;
        let action = self.act(state);
        let Transition {
            next,
            reward,
            outcome,
        } = self.env.transition(&state, action, &mut self.rng);

        let terminal = outcome.is_terminal();
        if self.alpha > 0.0 {
            self.learn(state, action, reward, next, terminal);
        }
        self.steps += 1;
        self.scoreboard.add_step_reward(reward);

        if terminal {
            return Some(self.end_episode(outcome.is_win()));
        }

        if self.scoreboard.current_reward() < self.early_termination_floor {
            trace!("episode cut off after {} steps", self.steps);
            if let (Some(penalty), true) = (self.early_termination_penalty, self.alpha > 0.0) {
                self.learn(state, action, penalty, next, true);
            }
            return Some(self.end_episode(false));
        }

        self.state = next;
        None
    }

    /// Run the configured batch of steps, returning every episode that ended during it
    pub fn tick(&mut self) -> Vec<EpisodeRecord> {
        (0..self.steps_per_tick)
            .filter_map(|_| self.step())
            .collect()
    }

    /// Step until the running episode ends
    pub fn run_episode(&mut self) -> EpisodeRecord {
        loop {
            if let Some(record) = self.step() {
                return record;
            }
        }
    }

    /// Run `episodes` full episodes
    pub fn train(&mut self, episodes: u32) -> Vec<EpisodeRecord> {
        (0..episodes).map(|_| self.run_episode()).collect()
    }

    /// Permanently switch to greedy replay with learning disabled
    ///
    /// Has no effect after the first call.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        self.frozen = true;
        self.exploration.freeze();
        self.alpha = 0.0;
        info!("learning frozen after {} training episodes", self.episode);
    }

    fn end_episode(&mut self, win: bool) -> EpisodeRecord {
        let reward = self.scoreboard.current_reward();
        let stream = if self.frozen {
            Stream::Validation
        } else {
            Stream::Training
        };
        let epsilon = self.exploration.epsilon();
        let record = self
            .recorder
            .record(stream, reward, win, self.steps, epsilon, self.alpha);
        self.scoreboard.finish(reward, win);
        self.window.push(reward, win);
        debug!(
            "{:?} episode {}: reward {:.4}, win {}, steps {}, epsilon {}, alpha {}",
            stream, record.ord, reward, win, self.steps, record.epsilon, record.alpha
        );

        if !self.frozen {
            self.episode += 1;
            self.exploration.update(self.episode);
            self.alpha = self.alpha_schedule.evaluate(self.episode as f64);
            if self.stop_after.is_some_and(|n| self.episode >= n) {
                self.freeze();
            }
        }

        self.state = self.env.start_state(&mut self.rng);
        self.steps = 0;
        record
    }
}

impl QTableAgent<GridWorld> {
    /// Best value of every cell for the given knowledge, `None` on walls, indexed `[x][z]`
    pub fn value_map(&mut self, knows: Knowledge) -> Vec<Vec<Option<f64>>> {
        let world = self.env.world();
        (0..world.width() as i32)
            .map(|x| {
                (0..world.depth() as i32)
                    .map(|z| {
                        let state = State::new((x, z).into(), knows);
                        (!world.is_blocked(state.pos)).then(|| self.table.max(state))
                    })
                    .collect()
            })
            .collect()
    }

    /// Greedy action of every cell for the given knowledge, `None` on walls, indexed `[x][z]`
    pub fn policy_map(&mut self, knows: Knowledge) -> Vec<Vec<Option<Action>>> {
        let world = self.env.world();
        (0..world.width() as i32)
            .map(|x| {
                (0..world.depth() as i32)
                    .map(|z| {
                        let state = State::new((x, z).into(), knows);
                        (!world.is_blocked(state.pos)).then(|| self.table.arg_max(state))
                    })
                    .collect()
            })
            .collect()
    }
}
