use rand::Rng;

use super::{ annealing_schedule, argmax_with_random_tie_break, PolicyState };
use crate::errors::ConfigurationError;

/// Epsilon-greedy action selection. With probability epsilon the policy
/// explores by pulling an arm chosen uniformly at random; otherwise it
/// exploits by pulling the arm with the highest current value estimate,
/// breaking ties uniformly at random.
///
/// When `epsilon` is `None` the policy anneals: the exploration probability
/// is recomputed before every selection from the total number of pulls so
/// far, starting at full exploration and shrinking as evidence accumulates.
#[derive(PartialEq, Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: Option<f64>,
    state: PolicyState,
}

impl EpsilonGreedy {
    pub fn new(
        epsilon: Option<f64>,
        num_arms: usize,
        initial_value_estimates: Option<&[f64]>,
    ) -> Result<Self, ConfigurationError> {
        if let Some(epsilon) = epsilon {
            if !(0.0..=1.0).contains(&epsilon) {
                return Err(ConfigurationError::EpsilonOutOfRange { epsilon });
            }
        }
        Ok(EpsilonGreedy {
            epsilon,
            state: PolicyState::new(num_arms, initial_value_estimates)?,
        })
    }

    /// Exploration probability used for the upcoming selection.
    pub fn current_epsilon(&self) -> f64 {
        self.epsilon.unwrap_or_else(|| annealing_schedule(self.state.total_pulls()))
    }

    pub fn select_arm(&self, rng: &mut impl Rng) -> usize {
        if rng.gen::<f64>() < self.current_epsilon() {
            return rng.gen_range(0..self.state.num_arms());
        }
        argmax_with_random_tie_break(self.state.value_estimates(), rng)
    }

    pub fn update(&mut self, chosen_arm: usize, reward: f64) {
        self.state.record_reward(chosen_arm, reward);
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn state(&self) -> &PolicyState {
        &self.state
    }
}
