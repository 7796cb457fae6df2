use rand::Rng;

use super::{ annealing_schedule, sample_from_distribution, PolicyState };
use crate::errors::ConfigurationError;

/// Softmax (Boltzmann) action selection. Arms are sampled from a
/// categorical distribution proportional to `exp(estimate / temperature)`:
/// a high temperature flattens the distribution towards uniform
/// exploration, a low temperature concentrates it on the best-looking arm.
///
/// When `temperature` is `None` the policy anneals, drawing the temperature
/// from the shared schedule so the distribution sharpens as pulls
/// accumulate.
#[derive(PartialEq, Debug, Clone)]
pub struct Softmax {
    temperature: Option<f64>,
    state: PolicyState,
}

impl Softmax {
    pub fn new(
        temperature: Option<f64>,
        num_arms: usize,
        initial_value_estimates: Option<&[f64]>,
    ) -> Result<Self, ConfigurationError> {
        if let Some(temperature) = temperature {
            if !(temperature > 0.0) || !temperature.is_finite() {
                return Err(ConfigurationError::TemperatureOutOfRange { temperature });
            }
        }
        Ok(Softmax {
            temperature,
            state: PolicyState::new(num_arms, initial_value_estimates)?,
        })
    }

    /// Temperature used for the upcoming selection.
    pub fn current_temperature(&self) -> f64 {
        self.temperature.unwrap_or_else(|| annealing_schedule(self.state.total_pulls()))
    }

    /// Categorical distribution over arms for the upcoming selection.
    /// Scores are shifted by their maximum before exponentiation, so a
    /// small temperature cannot overflow the exponential; the distribution
    /// is unchanged by the shift.
    pub fn selection_probabilities(&self) -> Vec<f64> {
        let temperature = self.current_temperature();
        let scores: Vec<f64> = self.state
            .value_estimates()
            .iter()
            .map(|estimate| estimate / temperature)
            .collect();
        let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exponentials: Vec<f64> = scores.iter().map(|score| (score - max_score).exp()).collect();
        let normalizer: f64 = exponentials.iter().sum();
        if normalizer <= 0.0 || !normalizer.is_finite() {
            // Every score underflowed at once; fall back to uniform.
            return vec![1.0 / (self.state.num_arms() as f64); self.state.num_arms()];
        }
        exponentials
            .iter()
            .map(|exponential| exponential / normalizer)
            .collect()
    }

    pub fn select_arm(&self, rng: &mut impl Rng) -> usize {
        sample_from_distribution(&self.selection_probabilities(), rng)
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

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_rejects_zero_temperature() {
        let result = Softmax::new(Some(0.0), 3, None);

        assert_eq!(result, Err(ConfigurationError::TemperatureOutOfRange { temperature: 0.0 }));
    }

    #[test]
    fn test_rejects_negative_and_infinite_temperature() {
        assert!(Softmax::new(Some(-1.0), 3, None).is_err());
        assert!(Softmax::new(Some(f64::INFINITY), 3, None).is_err());
        assert!(Softmax::new(Some(f64::NAN), 3, None).is_err());
    }

    #[test]
    fn test_probabilities_form_a_distribution() {
        let mut policy = Softmax::new(Some(0.2), 4, None).unwrap();
        policy.update(0, 1.0);
        policy.update(1, 0.0);
        policy.update(2, 1.0);

        let probabilities = policy.selection_probabilities();

        let total: f64 = probabilities.iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        for &probability in &probabilities {
            assert!(probability > 0.0 && probability <= 1.0);
        }
    }

    #[test]
    fn test_equal_estimates_give_a_uniform_distribution() {
        let policy = Softmax::new(Some(0.5), 4, None).unwrap();

        let probabilities = policy.selection_probabilities();

        for &probability in &probabilities {
            assert_relative_eq!(probability, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_better_estimates_get_higher_probability() {
        let mut policy = Softmax::new(Some(0.3), 3, None).unwrap();
        policy.update(0, 0.0);
        policy.update(1, 1.0);
        policy.update(2, 0.0);

        let probabilities = policy.selection_probabilities();

        assert!(probabilities[1] > probabilities[0]);
        assert!(probabilities[1] > probabilities[2]);
    }

    #[test]
    fn test_near_zero_temperature_stays_finite_and_greedy() {
        let mut policy = Softmax::new(Some(1e-300), 3, None).unwrap();
        policy.update(1, 1.0);

        let probabilities = policy.selection_probabilities();

        for &probability in &probabilities {
            assert!(probability.is_finite(), "Probability overflowed: {:?}", probabilities);
        }
        assert_relative_eq!(probabilities[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_selection_frequency_tracks_probabilities() {
        let selections = 50_000;
        let mut rng = StdRng::seed_from_u64(1);
        let mut policy = Softmax::new(Some(0.5), 3, None).unwrap();
        policy.update(0, 1.0);
        policy.update(1, 0.0);
        policy.update(2, 0.0);
        let probabilities = policy.selection_probabilities();

        let mut frequency = [0usize; 3];
        for _ in 0..selections {
            frequency[policy.select_arm(&mut rng)] += 1;
        }

        for (arm, &count) in frequency.iter().enumerate() {
            let share = (count as f64) / (selections as f64);
            assert_relative_eq!(share, probabilities[arm], epsilon = 0.01);
        }
    }

    #[test]
    fn test_annealing_temperature_starts_at_one_and_shrinks() {
        let mut policy = Softmax::new(None, 3, None).unwrap();
        assert_eq!(policy.current_temperature(), 1.0);

        for step in 0..500 {
            policy.update(step % 3, 0.0);
        }

        assert!(policy.current_temperature() < 0.2);
    }
}
