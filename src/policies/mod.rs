pub mod epsilon_greedy;
pub mod exp3;
pub mod softmax;
pub mod ucb1;

use rand::Rng;

use crate::errors::ConfigurationError;
use self::epsilon_greedy::EpsilonGreedy;
use self::exp3::Exp3;
use self::softmax::Softmax;
use self::ucb1::Ucb1;

/// Per-arm statistics every policy maintains: how many times each arm was
/// pulled and a running estimate of its expected reward. Counts and
/// estimates always have one entry per arm, and only the arm actually
/// pulled is updated on each step.
#[derive(PartialEq, Debug, Clone)]
pub struct PolicyState {
    counts: Vec<u64>,
    value_estimates: Vec<f64>,
    initial_value_estimates: Vec<f64>,
}

impl PolicyState {
    /// Creates the pessimistic initial state: zero pulls everywhere and
    /// either zero estimates or the caller's prior belief, one per arm.
    pub fn new(
        num_arms: usize,
        initial_value_estimates: Option<&[f64]>,
    ) -> Result<Self, ConfigurationError> {
        if num_arms == 0 {
            return Err(ConfigurationError::NoArms);
        }
        let initial = match initial_value_estimates {
            Some(estimates) if estimates.len() != num_arms => {
                return Err(ConfigurationError::InitialEstimatesLengthMismatch {
                    expected: num_arms,
                    actual: estimates.len(),
                });
            }
            Some(estimates) => estimates.to_vec(),
            None => vec![0.0; num_arms],
        };
        Ok(PolicyState {
            counts: vec![0; num_arms],
            value_estimates: initial.clone(),
            initial_value_estimates: initial,
        })
    }

    /// Returns the state to what it was at construction. Called between
    /// simulations so that no learned knowledge leaks across trials.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.value_estimates.clone_from(&self.initial_value_estimates);
    }

    /// Incremental mean update for the pulled arm:
    /// new_estimate = old_estimate + (reward - old_estimate) / new_count
    pub fn record_reward(&mut self, chosen_arm: usize, reward: f64) {
        self.counts[chosen_arm] += 1;
        let new_count = self.counts[chosen_arm] as f64;
        let old_estimate = self.value_estimates[chosen_arm];
        self.value_estimates[chosen_arm] = old_estimate + (reward - old_estimate) / new_count;
    }

    pub fn num_arms(&self) -> usize {
        self.counts.len()
    }

    /// Total number of pulls across all arms.
    pub fn total_pulls(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn value_estimates(&self) -> &[f64] {
        &self.value_estimates
    }
}

/// Returns the index of the largest value, breaking ties uniformly at
/// random so that no arm is favoured just for having a lower index.
pub fn argmax_with_random_tie_break(values: &[f64], rng: &mut impl Rng) -> usize {
    let max_value = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let max_indices: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, &value)| value == max_value)
        .map(|(index, _)| index)
        .collect();

    max_indices[rng.gen_range(0..max_indices.len())]
}

/// Samples an index from a categorical distribution via a cumulative scan.
/// Falls back to the last index when floating-point rounding leaves the
/// tail of the distribution marginally short of 1.
pub fn sample_from_distribution(probabilities: &[f64], rng: &mut impl Rng) -> usize {
    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (index, probability) in probabilities.iter().enumerate() {
        cumulative += probability;
        if draw < cumulative {
            return index;
        }
    }
    probabilities.len() - 1
}

/// Exploration-parameter schedule shared by the annealing policies.
/// Equals 1.0 before the first pull (full exploration) and decreases
/// towards 0 as pulls accumulate.
pub fn annealing_schedule(total_pulls: u64) -> f64 {
    1.0 / (1.0 + (1.0 + total_pulls as f64).ln())
}

/// Configuration of one policy variant. Doubles as the factory the
/// simulation runner uses to build a fresh policy for every simulation.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum PolicyKind {
    EpsilonGreedy { epsilon: f64 },
    AnnealingEpsilonGreedy,
    Ucb1,
    Softmax { temperature: f64 },
    AnnealingSoftmax,
    Exp3 { gamma: f64 },
}

impl PolicyKind {
    /// Builds a policy over `num_arms` arms, optionally seeded with prior
    /// value estimates. All parameter validation happens here, before any
    /// simulation step runs.
    pub fn build(
        &self,
        num_arms: usize,
        initial_value_estimates: Option<&[f64]>,
    ) -> Result<Policy, ConfigurationError> {
        let policy = match *self {
            PolicyKind::EpsilonGreedy { epsilon } => Policy::EpsilonGreedy(EpsilonGreedy::new(
                Some(epsilon),
                num_arms,
                initial_value_estimates,
            )?),
            PolicyKind::AnnealingEpsilonGreedy => {
                Policy::EpsilonGreedy(EpsilonGreedy::new(None, num_arms, initial_value_estimates)?)
            }
            PolicyKind::Ucb1 => Policy::Ucb1(Ucb1::new(num_arms, initial_value_estimates)?),
            PolicyKind::Softmax { temperature } => Policy::Softmax(Softmax::new(
                Some(temperature),
                num_arms,
                initial_value_estimates,
            )?),
            PolicyKind::AnnealingSoftmax => {
                Policy::Softmax(Softmax::new(None, num_arms, initial_value_estimates)?)
            }
            PolicyKind::Exp3 { gamma } => {
                Policy::Exp3(Exp3::new(gamma, num_arms, initial_value_estimates)?)
            }
        };
        Ok(policy)
    }

    /// Short name used for result file names and report headings.
    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::EpsilonGreedy { .. } => "epsilon_greedy",
            PolicyKind::AnnealingEpsilonGreedy => "annealing_epsilon_greedy",
            PolicyKind::Ucb1 => "ucb1",
            PolicyKind::Softmax { .. } => "softmax",
            PolicyKind::AnnealingSoftmax => "annealing_softmax",
            PolicyKind::Exp3 { .. } => "exp3",
        }
    }
}

/// The closed set of bandit policies. The runner stays algorithm-agnostic
/// by dispatching over this sum type; each variant keeps its own statistics
/// and answers the same select/update/reset capability set.
#[derive(PartialEq, Debug, Clone)]
pub enum Policy {
    EpsilonGreedy(EpsilonGreedy),
    Ucb1(Ucb1),
    Softmax(Softmax),
    Exp3(Exp3),
}

impl Policy {
    /// Chooses the arm to pull next. Every random decision, including
    /// tie-breaking, flows through the caller's generator.
    pub fn select_arm(&mut self, rng: &mut impl Rng) -> usize {
        match self {
            Policy::EpsilonGreedy(policy) => policy.select_arm(rng),
            Policy::Ucb1(policy) => policy.select_arm(rng),
            Policy::Softmax(policy) => policy.select_arm(rng),
            Policy::Exp3(policy) => policy.select_arm(rng),
        }
    }

    /// Incorporates the reward observed for the arm that was pulled.
    pub fn update(&mut self, chosen_arm: usize, reward: f64) {
        match self {
            Policy::EpsilonGreedy(policy) => policy.update(chosen_arm, reward),
            Policy::Ucb1(policy) => policy.update(chosen_arm, reward),
            Policy::Softmax(policy) => policy.update(chosen_arm, reward),
            Policy::Exp3(policy) => policy.update(chosen_arm, reward),
        }
    }

    /// Discards everything learned and returns to the initial state.
    pub fn reset(&mut self) {
        match self {
            Policy::EpsilonGreedy(policy) => policy.reset(),
            Policy::Ucb1(policy) => policy.reset(),
            Policy::Softmax(policy) => policy.reset(),
            Policy::Exp3(policy) => policy.reset(),
        }
    }

    pub fn state(&self) -> &PolicyState {
        match self {
            Policy::EpsilonGreedy(policy) => policy.state(),
            Policy::Ucb1(policy) => policy.state(),
            Policy::Softmax(policy) => policy.state(),
            Policy::Exp3(policy) => policy.state(),
        }
    }
}
