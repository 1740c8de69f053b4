use rand::Rng;

/// An action drawn from a small, fixed, ordered set, usable directly as an array index
pub trait DiscreteAction: Copy + Eq + Sized {
    /// Number of actions
    const COUNT: usize;

    /// Position of the action in the ordered action list
    fn index(self) -> usize;

    /// Inverse of [`index`](DiscreteAction::index)
    fn from_index(ix: usize) -> Option<Self>;
}

/// How a transition ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The episode goes on
    Continue,
    /// A live goal was reached
    Goal,
    /// A punishment was reached
    Punished,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Continue
    }

    pub fn is_win(self) -> bool {
        self == Outcome::Goal
    }
}

/// The result of taking one action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<S> {
    pub next: S,
    pub reward: f64,
    pub outcome: Outcome,
}

/// Represents an episodic Markov decision process with a discrete action space
///
/// The environment owns no randomness; every stochastic decision draws from the
/// generator passed in by the caller so a seeded run is reproducible.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Copy;

    /// A representation of an action that an agent can take to affect the environment
    type Action: DiscreteAction;

    /// All actions, in index order
    fn actions(&self) -> &[Self::Action];

    /// Pick the initial state of a new episode
    fn start_state<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Self::State;

    /// Resolve the effect of `action` taken in `state`
    fn transition<R: Rng + ?Sized>(
        &mut self,
        state: &Self::State,
        action: Self::Action,
        rng: &mut R,
    ) -> Transition<Self::State>;
}
