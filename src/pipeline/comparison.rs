//! Baseline and wrapper learners for evaluation runs

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    Result,
    ports::Learner,
    q_learning::{ActionCatalog, QLearner},
    types::SensorState,
};

/// Random learner - Picks a uniformly random catalog action every step
pub struct RandomLearner {
    name: String,
    actions: ActionCatalog,
    rng: StdRng,
}

impl RandomLearner {
    /// Create a new random learner with a deterministic seed
    pub fn with_seed(name: String, actions: ActionCatalog, seed: u64) -> Self {
        Self {
            name,
            actions,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Learner for RandomLearner {
    fn select_action(&mut self, _state: &SensorState) -> Result<i32> {
        Ok(self.actions.choose(&mut self.rng))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Frozen learner - Greedy policy of a trained Q-learner, never updated
///
/// Wraps a learner with exploration turned off, the way a loaded model is
/// replayed for demonstration.
pub struct FrozenLearner {
    name: String,
    inner: QLearner,
}

impl FrozenLearner {
    pub fn new(name: String, mut inner: QLearner) -> Result<Self> {
        inner.set_epsilon(0.0)?;
        Ok(Self { name, inner })
    }

    pub fn into_inner(self) -> QLearner {
        self.inner
    }
}

impl Learner for FrozenLearner {
    fn select_action(&mut self, state: &SensorState) -> Result<i32> {
        Ok(self.inner.best_action(state))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_learner_is_seedable() {
        let actions = ActionCatalog::default();
        let mut a = RandomLearner::with_seed("a".to_string(), actions.clone(), 5);
        let mut b = RandomLearner::with_seed("b".to_string(), actions.clone(), 5);
        let state = SensorState::new(1.0, 1.0, 1.0);
        for _ in 0..20 {
            let action = a.select_action(&state).unwrap();
            assert!(actions.contains(action));
            assert_eq!(action, b.select_action(&state).unwrap());
        }
    }

    #[test]
    fn test_frozen_learner_ignores_updates() {
        let inner = QLearner::default().with_seed(3);
        let table = inner.table().clone();
        let mut frozen = FrozenLearner::new("frozen".to_string(), inner).unwrap();

        let state = SensorState::new(12.0, 4.0, 6.0);
        frozen.learn(&state, 0, 100.0, &state).unwrap();
        assert_eq!(frozen.select_action(&state).unwrap(), table.best_action(&state));

        let inner = frozen.into_inner();
        assert_eq!(inner.table(), &table);
        assert_eq!(inner.epsilon(), 0.0);
    }
}
