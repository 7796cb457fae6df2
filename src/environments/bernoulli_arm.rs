use rand::distributions::{ Bernoulli, Distribution };
use rand::Rng;

use crate::errors::ConfigurationError;

/// BernoulliArm represents one selectable option, similar to a lever on a
/// slot machine. It has a fixed probability of paying out that never changes
/// over time and is not known to the policies playing it.
#[derive(PartialEq, Debug, Clone)]
pub struct BernoulliArm {
    probability: f64,
    distribution: Bernoulli,
}

impl BernoulliArm {
    /// Creates an arm with the given success probability. Probabilities
    /// outside [0, 1] are rejected before any simulation can start.
    pub fn new(probability: f64) -> Result<Self, ConfigurationError> {
        let distribution = Bernoulli::new(probability)
            .map_err(|_| ConfigurationError::ProbabilityOutOfRange { probability })?;
        Ok(BernoulliArm {
            probability,
            distribution,
        })
    }

    /// Creates an arm with a success probability drawn uniformly from [0, 1).
    pub fn new_random(rng: &mut impl Rng) -> Self {
        let probability: f64 = rng.gen();
        BernoulliArm {
            probability,
            // A uniform draw is always a valid probability.
            distribution: Bernoulli::new(probability).expect("probability is in [0, 1)"),
        }
    }

    /// Creates one arm per entry of the given success probabilities,
    /// preserving order. An empty slice is rejected: a bandit with no arms
    /// has nothing to select.
    pub fn new_as_vector(probabilities: &[f64]) -> Result<Vec<BernoulliArm>, ConfigurationError> {
        if probabilities.is_empty() {
            return Err(ConfigurationError::NoArms);
        }
        probabilities
            .iter()
            .map(|&probability| BernoulliArm::new(probability))
            .collect()
    }

    /// Pulls the arm once. Returns 1.0 with the arm's success probability
    /// and 0.0 otherwise. All randomness flows through the caller's
    /// generator, so a seeded generator reproduces the same rewards.
    pub fn draw(&self, rng: &mut impl Rng) -> f64 {
        match self.distribution.sample(rng) {
            true => 1.0,
            false => 0.0,
        }
    }

    /// Added ONLY for purposes of collecting statistics about a run. The
    /// policies learn the probability from rewards; reporting code compares
    /// what was learned against this actual value.
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_create_arm_with_valid_probability() {
        let arm = BernoulliArm::new(0.5).unwrap();

        assert_eq!(arm.probability(), 0.5);
    }

    #[test]
    fn test_create_arm_with_probability_greater_than_one() {
        let result = BernoulliArm::new(1.5);

        assert_eq!(
            result,
            Err(ConfigurationError::ProbabilityOutOfRange { probability: 1.5 }),
            "Probability above one must be rejected at construction"
        );
    }

    #[test]
    fn test_create_arm_with_probability_less_than_zero() {
        let result = BernoulliArm::new(-0.5);

        assert_eq!(result, Err(ConfigurationError::ProbabilityOutOfRange { probability: -0.5 }));
    }

    #[test]
    fn test_draw_always_returns_zero_when_probability_is_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let arm = BernoulliArm::new(0.0).unwrap();

        for _ in 0..100 {
            assert_eq!(arm.draw(&mut rng), 0.0, "Draw result is not zero when probability is zero");
        }
    }

    #[test]
    fn test_draw_always_returns_one_when_probability_is_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let arm = BernoulliArm::new(1.0).unwrap();

        for _ in 0..100 {
            assert_eq!(arm.draw(&mut rng), 1.0, "Draw result is not one when probability is one");
        }
    }

    #[test]
    fn test_empirical_mean_converges_to_probability() {
        let num_of_draws = 100_000;
        let probability = 0.3;
        let mut rng = StdRng::seed_from_u64(7);
        let arm = BernoulliArm::new(probability).unwrap();

        let total: f64 = (0..num_of_draws).map(|_| arm.draw(&mut rng)).sum();
        let empirical_mean = total / (num_of_draws as f64);

        assert_relative_eq!(empirical_mean, probability, epsilon = 0.01);
    }

    #[test]
    fn test_draws_are_reproducible_with_the_same_seed() {
        let arm = BernoulliArm::new(0.5).unwrap();
        let mut first_rng = StdRng::seed_from_u64(42);
        let mut second_rng = StdRng::seed_from_u64(42);

        let first: Vec<f64> = (0..1000).map(|_| arm.draw(&mut first_rng)).collect();
        let second: Vec<f64> = (0..1000).map(|_| arm.draw(&mut second_rng)).collect();

        assert_eq!(first, second, "Identical seeds must reproduce identical reward sequences");
    }

    #[test]
    fn test_create_random_arm() {
        let mut rng = StdRng::seed_from_u64(3);

        let arm = BernoulliArm::new_random(&mut rng);

        assert!(
            (0.0..=1.0).contains(&arm.probability()),
            "Randomly created arm has an invalid probability: {}",
            arm.probability()
        );
    }

    #[test]
    fn test_create_vector_of_arms_preserves_order() {
        let probabilities = [0.1, 0.2, 0.3, 0.5, 0.9];

        let arms = BernoulliArm::new_as_vector(&probabilities).unwrap();

        assert_eq!(arms.len(), probabilities.len());
        for (arm, &probability) in arms.iter().zip(probabilities.iter()) {
            assert_eq!(arm.probability(), probability);
        }
    }

    #[test]
    fn test_create_vector_of_arms_rejects_empty_slice() {
        let result = BernoulliArm::new_as_vector(&[]);

        assert_eq!(result, Err(ConfigurationError::NoArms));
    }

    #[test]
    fn test_create_vector_of_arms_rejects_invalid_probability() {
        let result = BernoulliArm::new_as_vector(&[0.5, 1.2]);

        assert_eq!(result, Err(ConfigurationError::ProbabilityOutOfRange { probability: 1.2 }));
    }
}
