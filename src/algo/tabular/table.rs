use std::{collections::HashMap, marker::PhantomData};

use rand::Rng;

use crate::env::DiscreteAction;

use super::Hashable;

/// A sparse action-value table
///
/// Each state owns a row with one value per action. Rows are created lazily, filled with
/// the table's default value, the first time a state is written or scanned with
/// [`max`](QTable::max), [`arg_max`](QTable::arg_max) or [`mean`](QTable::mean).
/// [`get`](QTable::get) never allocates.
///
/// ### Generics
/// - `S` - The state key; two states share a row only if they are equal
/// - `A` - The action type, whose index addresses a slot in the row
#[derive(Debug, Clone)]
pub struct QTable<S, A> {
    table: HashMap<S, Box<[f64]>>,
    default_value: f64,
    _action: PhantomData<A>,
}

impl<S, A> QTable<S, A>
where
    S: Hashable,
    A: DiscreteAction,
{
    pub fn new(default_value: f64) -> Self {
        Self {
            table: HashMap::new(),
            default_value,
            _action: PhantomData,
        }
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Number of materialized states
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains(&self, state: &S) -> bool {
        self.table.contains_key(state)
    }

    /// The row of a materialized state, indexed by action
    pub fn values(&self, state: &S) -> Option<&[f64]> {
        self.table.get(state).map(|row| &row[..])
    }

    fn row(&mut self, state: S) -> &mut [f64] {
        let default_value = self.default_value;
        self.table
            .entry(state)
            .or_insert_with(|| vec![default_value; A::COUNT].into_boxed_slice())
    }

    /// The stored value, or the default for an untouched state
    pub fn get(&self, state: &S, action: A) -> f64 {
        self.table
            .get(state)
            .map_or(self.default_value, |row| row[action.index()])
    }

    /// Overwrite one action's value, materializing the state's row if needed
    pub fn set(&mut self, state: S, action: A, value: f64) {
        self.row(state)[action.index()] = value;
    }

    /// Highest value over all actions
    pub fn max(&mut self, state: S) -> f64 {
        self.row(state)
            .iter()
            .fold(f64::NEG_INFINITY, |best, &v| if v > best { v } else { best })
    }

    /// Action with the highest value
    ///
    /// Only a strictly greater value displaces the current best, so ties go to the
    /// lowest-indexed action.
    pub fn arg_max(&mut self, state: S) -> A {
        let mut best = f64::NEG_INFINITY;
        let mut best_ix = 0;
        for (ix, &v) in self.row(state).iter().enumerate() {
            if v > best {
                best = v;
                best_ix = ix;
            }
        }
        A::from_index(best_ix).expect("row length equals the action count")
    }

    /// Uniformly random action, independent of the stored values
    pub fn arg_random<R: Rng + ?Sized>(&self, rng: &mut R) -> A {
        A::from_index(rng.gen_range(0..A::COUNT)).expect("index is below the action count")
    }

    /// Average value over all actions
    pub fn mean(&mut self, state: S) -> f64 {
        let row = self.row(state);
        row.iter().sum::<f64>() / row.len() as f64
    }

    /// Forget every state
    pub fn clear(&mut self) {
        self.table.clear();
    }
}
