use rand::rngs::StdRng;
use rand::{ Rng, SeedableRng };
use rayon::prelude::*;

use crate::constants::PRINT_EACH_STEP;
use crate::environments::bernoulli_arm::BernoulliArm;
use crate::errors::ConfigurationError;
use crate::policies::PolicyKind;

/// One observation row. Produced once per (simulation, time step) pair and
/// immutable afterwards; the statistics code only ever reads these.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct SimulationRecord {
    /// 1-based index of the simulation that produced this row.
    pub simulation: usize,
    /// 1-based step within the simulation.
    pub time_step: usize,
    /// 0-based index of the arm the policy chose. The same base is used
    /// everywhere: internally, in these records and in the result files.
    pub chosen_arm: usize,
    /// Observed reward for this pull, 0 or 1.
    pub reward: u8,
    /// Running sum of rewards within this simulation. Equals the first
    /// reward at step 1 and never decreases afterwards.
    pub cumulative_reward: u64,
}

/// Monte-Carlo harness. Runs many statistically independent simulations of
/// one policy against a fixed set of Bernoulli arms and records every step.
///
/// Each simulation gets a fresh policy (built from the `PolicyKind`
/// factory) and a private generator seeded `base_seed + simulation_index`,
/// so a run is exactly reproducible given the same configuration and seed,
/// and simulations can execute in parallel without sharing any state.
pub struct SimulationRunner {
    arms: Vec<BernoulliArm>,
    num_simulations: usize,
    horizon: usize,
    base_seed: u64,
}

impl SimulationRunner {
    /// Validates the whole environment configuration up front; a runner
    /// that constructs successfully cannot fail while simulating.
    ///
    /// When `random_seed` is `None` a seed is drawn from entropy once and
    /// stored, so repeated runs of the same runner instance still agree
    /// with each other.
    pub fn new(
        arm_success_probabilities: &[f64],
        num_simulations: usize,
        horizon: usize,
        random_seed: Option<u64>,
    ) -> Result<Self, ConfigurationError> {
        let arms = BernoulliArm::new_as_vector(arm_success_probabilities)?;
        if num_simulations == 0 {
            return Err(ConfigurationError::NoSimulations);
        }
        if horizon == 0 {
            return Err(ConfigurationError::ZeroHorizon);
        }
        let base_seed = random_seed.unwrap_or_else(|| rand::thread_rng().gen());
        Ok(SimulationRunner {
            arms,
            num_simulations,
            horizon,
            base_seed,
        })
    }

    pub fn arms(&self) -> &[BernoulliArm] {
        &self.arms
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Runs every simulation sequentially. Output holds exactly
    /// `num_simulations * horizon` records in (simulation, time step)
    /// lexicographic order.
    pub fn run(&self, policy_kind: &PolicyKind) -> Result<Vec<SimulationRecord>, ConfigurationError> {
        self.run_with_initial_estimates(policy_kind, None)
    }

    /// Like [`run`](Self::run), but seeds every simulation's fresh policy
    /// with the given prior value estimates (one per arm).
    pub fn run_with_initial_estimates(
        &self,
        policy_kind: &PolicyKind,
        initial_value_estimates: Option<&[f64]>,
    ) -> Result<Vec<SimulationRecord>, ConfigurationError> {
        let mut records = Vec::with_capacity(self.num_simulations * self.horizon);
        for simulation in 1..=self.num_simulations {
            records.extend(self.run_single_simulation(policy_kind, initial_value_estimates, simulation)?);
        }
        Ok(records)
    }

    /// Runs all simulations across the rayon thread pool. Simulations are
    /// embarrassingly parallel here: each owns its policy and generator,
    /// so the output is identical to the sequential [`run`](Self::run).
    pub fn run_in_parallel(
        &self,
        policy_kind: &PolicyKind,
    ) -> Result<Vec<SimulationRecord>, ConfigurationError> {
        self.run_in_parallel_with_initial_estimates(policy_kind, None)
    }

    pub fn run_in_parallel_with_initial_estimates(
        &self,
        policy_kind: &PolicyKind,
        initial_value_estimates: Option<&[f64]>,
    ) -> Result<Vec<SimulationRecord>, ConfigurationError> {
        let per_simulation: Vec<Vec<SimulationRecord>> = (1..=self.num_simulations)
            .into_par_iter()
            .map(|simulation| {
                self.run_single_simulation(policy_kind, initial_value_estimates, simulation)
            })
            .collect::<Result<_, _>>()?;
        Ok(per_simulation.into_iter().flatten().collect())
    }

    /// One independent simulation: build a fresh policy, then for each step
    /// select an arm, draw its reward, feed the reward back and record the
    /// outcome together with the running cumulative reward.
    fn run_single_simulation(
        &self,
        policy_kind: &PolicyKind,
        initial_value_estimates: Option<&[f64]>,
        simulation: usize,
    ) -> Result<Vec<SimulationRecord>, ConfigurationError> {
        let mut policy = policy_kind.build(self.arms.len(), initial_value_estimates)?;
        let mut rng = StdRng::seed_from_u64(self.base_seed.wrapping_add(simulation as u64));
        let mut cumulative_reward: u64 = 0;
        let mut records = Vec::with_capacity(self.horizon);

        for time_step in 1..=self.horizon {
            let chosen_arm = policy.select_arm(&mut rng);
            let reward = self.arms[chosen_arm].draw(&mut rng);
            policy.update(chosen_arm, reward);
            cumulative_reward += reward as u64;

            if PRINT_EACH_STEP {
                println!(
                    "Simulation={} \t Step={} \t Playing arm {} \t Reward is {}",
                    simulation,
                    time_step,
                    chosen_arm,
                    reward
                );
            }

            records.push(SimulationRecord {
                simulation,
                time_step,
                chosen_arm,
                reward: reward as u8,
                cumulative_reward,
            });
        }
        Ok(records)
    }
}
