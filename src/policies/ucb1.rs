use rand::Rng;

use super::{ argmax_with_random_tie_break, PolicyState };
use crate::errors::ConfigurationError;

/// Upper Confidence Bound selection (UCB1). This policy is explicitly
/// curious: every arm is pulled at least once before any confidence bound
/// is trusted. Afterwards each arm's value estimate is augmented with a
/// bonus measuring how much less is known about that arm than the others,
/// so rarely-pulled arms keep getting a chance even when they look a
/// little worse than the current best.
#[derive(PartialEq, Debug, Clone)]
pub struct Ucb1 {
    state: PolicyState,
}

impl Ucb1 {
    pub fn new(
        num_arms: usize,
        initial_value_estimates: Option<&[f64]>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Ucb1 {
            state: PolicyState::new(num_arms, initial_value_estimates)?,
        })
    }

    pub fn select_arm(&self, rng: &mut impl Rng) -> usize {
        // An arm that was never pulled has an unbounded confidence bonus
        // and must be tried before the bound means anything.
        let untried: Vec<usize> = self.state
            .counts()
            .iter()
            .enumerate()
            .filter(|(_, &count)| count == 0)
            .map(|(index, _)| index)
            .collect();
        if !untried.is_empty() {
            return untried[rng.gen_range(0..untried.len())];
        }

        let total_pulls = self.state.total_pulls() as f64;
        let bonus_scale = 2.0 * (total_pulls + 1.0).ln();
        let ucb_values: Vec<f64> = self.state
            .counts()
            .iter()
            .zip(self.state.value_estimates())
            .map(|(&count, &estimate)| estimate + (bonus_scale / (count as f64)).sqrt())
            .collect();

        argmax_with_random_tie_break(&ucb_values, rng)
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
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_first_selections_cover_every_arm_exactly_once() {
        let num_of_arms = 7;
        let mut rng = StdRng::seed_from_u64(1);
        let mut policy = Ucb1::new(num_of_arms, None).unwrap();

        let mut pulled = vec![false; num_of_arms];
        for _ in 0..num_of_arms {
            let arm = policy.select_arm(&mut rng);
            assert!(!pulled[arm], "Arm {} was pulled twice before full coverage", arm);
            pulled[arm] = true;
            policy.update(arm, 0.0);
        }

        assert!(pulled.iter().all(|&was_pulled| was_pulled));
    }

    #[test]
    fn test_bonus_prefers_the_less_pulled_arm() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut policy = Ucb1::new(2, None).unwrap();
        // Equal estimates, unequal counts: arm 1 was pulled once, arm 0
        // three times. The larger bonus must send the next pull to arm 1.
        policy.update(0, 1.0);
        policy.update(0, 1.0);
        policy.update(0, 1.0);
        policy.update(1, 1.0);

        assert_eq!(policy.select_arm(&mut rng), 1);
    }

    #[test]
    fn test_converges_on_the_better_arm() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut policy = Ucb1::new(2, None).unwrap();
        // Simulate a deterministic environment: arm 1 always pays, arm 0
        // never does.
        let mut arm_one_pulls = 0;
        for _ in 0..1000 {
            let arm = policy.select_arm(&mut rng);
            let reward = if arm == 1 { 1.0 } else { 0.0 };
            policy.update(arm, reward);
            if arm == 1 {
                arm_one_pulls += 1;
            }
        }

        assert!(
            arm_one_pulls > 900,
            "UCB1 pulled the winning arm only {} of 1000 times",
            arm_one_pulls
        );
    }

    #[test]
    fn test_rejects_zero_arms() {
        assert_eq!(Ucb1::new(0, None), Err(ConfigurationError::NoArms));
    }

    #[test]
    fn test_reset_forgets_learned_counts() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut policy = Ucb1::new(3, None).unwrap();
        for arm in 0..3 {
            policy.update(arm, 1.0);
        }

        policy.reset();

        // All arms count as untried again, so three selections with updates
        // cover all three arms once more.
        let mut pulled = vec![false; 3];
        for _ in 0..3 {
            let arm = policy.select_arm(&mut rng);
            pulled[arm] = true;
            policy.update(arm, 0.0);
        }
        assert!(pulled.iter().all(|&was_pulled| was_pulled));
    }
}
