use rand::Rng;

use super::{ sample_from_distribution, PolicyState };
use crate::errors::ConfigurationError;

/// Weights above this are rescaled before the next update. The selection
/// distribution is invariant under a common scale factor, so rescaling
/// only keeps the weights inside the comfortable floating-point range.
const WEIGHT_RESCALE_THRESHOLD: f64 = 1e100;

/// EXP3 (exponential-weight exploration and exploitation). Designed for
/// adversarial reward sequences: each arm carries a cumulative weight, the
/// selection distribution mixes the normalized weights with a uniform
/// component of size `gamma`, and the chosen arm's weight grows
/// multiplicatively by an importance-weighted reward term. Arms that were
/// unlikely to be chosen receive a proportionally larger boost when they do
/// pay out, which keeps the weights unbiased.
///
/// Counts and incremental-mean estimates are maintained alongside the
/// weights as bookkeeping; selection is driven by the weights alone.
#[derive(PartialEq, Debug, Clone)]
pub struct Exp3 {
    gamma: f64,
    weights: Vec<f64>,
    probabilities: Vec<f64>,
    state: PolicyState,
}

impl Exp3 {
    pub fn new(
        gamma: f64,
        num_arms: usize,
        initial_value_estimates: Option<&[f64]>,
    ) -> Result<Self, ConfigurationError> {
        if !(gamma > 0.0 && gamma <= 1.0) {
            return Err(ConfigurationError::GammaOutOfRange { gamma });
        }
        let state = PolicyState::new(num_arms, initial_value_estimates)?;
        Ok(Exp3 {
            gamma,
            weights: vec![1.0; num_arms],
            probabilities: vec![1.0 / (num_arms as f64); num_arms],
            state,
        })
    }

    /// Selection distribution: normalized weights mixed with `gamma` of
    /// uniform exploration, so every arm keeps probability >= gamma / k.
    fn recompute_probabilities(&mut self) {
        let total_weight: f64 = self.weights.iter().sum();
        let num_arms = self.weights.len() as f64;
        let uniform = self.gamma / num_arms;
        for (probability, &weight) in self.probabilities.iter_mut().zip(&self.weights) {
            *probability = (1.0 - self.gamma) * (weight / total_weight) + uniform;
        }
    }

    pub fn selection_probabilities(&mut self) -> Vec<f64> {
        self.recompute_probabilities();
        self.probabilities.clone()
    }

    pub fn select_arm(&mut self, rng: &mut impl Rng) -> usize {
        self.recompute_probabilities();
        sample_from_distribution(&self.probabilities, rng)
    }

    /// Importance-weighted multiplicative update of the chosen arm's
    /// weight; every other weight is unchanged. The division by the
    /// selection probability is safe because the uniform mixture keeps it
    /// at gamma / k or above.
    pub fn update(&mut self, chosen_arm: usize, reward: f64) {
        let probability = self.probabilities[chosen_arm];
        let estimated_reward = reward / probability;
        let num_arms = self.weights.len() as f64;
        self.weights[chosen_arm] *= (self.gamma * estimated_reward / num_arms).exp();

        let max_weight = self.weights.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if max_weight > WEIGHT_RESCALE_THRESHOLD {
            for weight in &mut self.weights {
                *weight /= max_weight;
            }
        }

        self.state.record_reward(chosen_arm, reward);
    }

    pub fn reset(&mut self) {
        let num_arms = self.weights.len();
        self.weights.fill(1.0);
        self.probabilities.fill(1.0 / (num_arms as f64));
        self.state.reset();
    }

    pub fn state(&self) -> &PolicyState {
        &self.state
    }
}
