use std::cmp;
use std::fs::{ self, File };
use std::io::prelude::*;
use std::path::PathBuf;

use chrono::prelude::*;
use polars::prelude::*;

use crate::constants::{
    ARM_SUCCESS_PROBABILITIES,
    EPSILON,
    EPSILON_SWEEP,
    GAMMA,
    HORIZON,
    IS_VERBOSE_MODE,
    KNOWN_BEST_ARM,
    NUM_OF_SIMULATIONS,
    POLARS_MAX_COLS,
    RANDOM_SEED,
    TEMPERATURE,
};
use crate::environments::bernoulli_arm::BernoulliArm;
use crate::errors::ReportError;
use crate::policies::PolicyKind;
use crate::simulation_runner::{ SimulationRecord, SimulationRunner };

/// Directory all result files of a comparison run are written into.
const RESULTS_DIRECTORY: &str = "files/multi_armed_bandits";

/// Sets environment variables so that the dataframes are printed in full.
fn set_polars_environment_variables() {
    let max_rows = cmp::max(NUM_OF_SIMULATIONS, ARM_SUCCESS_PROBABILITIES.len());
    std::env::set_var("POLARS_FMT_MAX_COLS", POLARS_MAX_COLS);
    std::env::set_var("POLARS_FMT_MAX_ROWS", max_rows.to_string());
}

fn get_timestamped_file_path(directory: &str, file_name: &str) -> PathBuf {
    let local: DateTime<Local> = Local::now();
    let datetime_str: &str = &local.format("%Y-%m-%d_%H:%M:%S").to_string();
    let file_name = format!("{}_{}.txt", file_name, datetime_str);
    PathBuf::from(directory).join(file_name)
}

/// One record as the tab-delimited row consumed by the external plotting
/// scripts: simulation, time step, chosen arm, reward, cumulative reward.
pub fn tab_delimited_row(record: &SimulationRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        record.simulation,
        record.time_step,
        record.chosen_arm,
        record.reward,
        record.cumulative_reward
    )
}

/// Serializes a whole record stream into tab-delimited rows, one per line,
/// in the order the runner produced them. No header row.
pub fn records_to_tab_delimited(records: &[SimulationRecord]) -> String {
    let mut output = String::new();
    for record in records {
        output.push_str(&tab_delimited_row(record));
        output.push('\n');
    }
    output
}

/// Writes the record stream of one policy run to a results file.
pub fn write_records(records: &[SimulationRecord], path: &PathBuf) -> std::io::Result<()> {
    fs::write(path, records_to_tab_delimited(records))
}

/// Summarizes a record stream per arm: how often each arm was pulled
/// across all simulations, the reward it returned, and how far the
/// empirical mean reward sits from the arm's actual success probability.
pub fn per_arm_summary(
    records: &[SimulationRecord],
    arms: &[BernoulliArm],
) -> PolarsResult<DataFrame> {
    let mut frequency = vec![0u32; arms.len()];
    let mut total_reward = vec![0.0f64; arms.len()];
    for record in records {
        frequency[record.chosen_arm] += 1;
        total_reward[record.chosen_arm] += record.reward as f64;
    }
    let actual_probabilities: Vec<f64> = arms.iter().map(|arm| arm.probability()).collect();

    let mut df = DataFrame::new(
        vec![
            Series::new("arm", Vec::from_iter(0..arms.len() as u32)),
            Series::new("actual_probability", &actual_probabilities),
            Series::new("frequency", &frequency),
            Series::new("total_reward", &total_reward)
        ]
    )?;

    df = df
        .lazy()
        .with_column((col("total_reward") / col("frequency")).alias("mean_reward"))
        .collect()?;

    df = df
        .lazy()
        .with_column((col("actual_probability") - col("mean_reward")).alias("diff_actual_mean"))
        .collect()?;

    df.sort(["actual_probability"], true)
}

/// Summarizes a record stream per simulation: total and mean reward each
/// simulation collected over the horizon.
pub fn per_simulation_summary(
    records: &[SimulationRecord],
    horizon: usize,
) -> PolarsResult<DataFrame> {
    let mut simulations: Vec<u32> = Vec::new();
    let mut total_rewards: Vec<f64> = Vec::new();
    for record in records.iter().filter(|record| record.time_step == horizon) {
        simulations.push(record.simulation as u32);
        total_rewards.push(record.cumulative_reward as f64);
    }

    let mut df = DataFrame::new(
        vec![Series::new("simulation", &simulations), Series::new("total_reward", &total_rewards)]
    )?;

    df = df
        .lazy()
        .with_column((col("total_reward") / lit(horizon as f64)).alias("mean_reward"))
        .collect()?;

    Ok(df)
}

/// Fraction of simulations whose final-step choice was `known_best_arm`.
/// The best arm is supplied by the caller; the policies never see it.
pub fn final_step_selection_frequency(
    records: &[SimulationRecord],
    horizon: usize,
    known_best_arm: usize,
) -> f64 {
    let mut final_steps = 0usize;
    let mut best_arm_selections = 0usize;
    for record in records.iter().filter(|record| record.time_step == horizon) {
        final_steps += 1;
        if record.chosen_arm == known_best_arm {
            best_arm_selections += 1;
        }
    }
    if final_steps == 0 {
        return 0.0;
    }
    (best_arm_selections as f64) / (final_steps as f64)
}

/// The six policy configurations compared by the default run.
fn policies_under_comparison() -> [PolicyKind; 6] {
    [
        PolicyKind::EpsilonGreedy { epsilon: EPSILON },
        PolicyKind::AnnealingEpsilonGreedy,
        PolicyKind::Ucb1,
        PolicyKind::Softmax { temperature: TEMPERATURE },
        PolicyKind::AnnealingSoftmax,
        PolicyKind::Exp3 { gamma: GAMMA },
    ]
}

/// Runs the full policy comparison over the default scenario: every policy
/// is simulated, its record stream is written to a per-policy results
/// file, and a timestamped summary with the per-arm and per-simulation
/// dataframes is saved alongside.
pub fn run_full_comparison() -> Result<(), ReportError> {
    set_polars_environment_variables();
    fs::create_dir_all(RESULTS_DIRECTORY)?;

    let runner = SimulationRunner::new(
        &ARM_SUCCESS_PROBABILITIES,
        NUM_OF_SIMULATIONS,
        HORIZON,
        Some(RANDOM_SEED)
    )?;

    let mut lines: Vec<String> = Vec::new();
    lines.push(
        format!(
            "### Multi-Armed Bandit comparison: {} simulations of {} steps over arms {:?} ###",
            NUM_OF_SIMULATIONS,
            HORIZON,
            ARM_SUCCESS_PROBABILITIES
        )
    );

    for policy_kind in &policies_under_comparison() {
        let records = runner.run_in_parallel(policy_kind)?;

        let records_path = PathBuf::from(RESULTS_DIRECTORY).join(
            format!("{}_results.tsv", policy_kind.name())
        );
        write_records(&records, &records_path)?;
        if IS_VERBOSE_MODE {
            println!("# Records for {} saved in {:?} #", policy_kind.name(), records_path);
        }

        let by_arm = per_arm_summary(&records, runner.arms())?;
        let by_simulation = per_simulation_summary(&records, HORIZON)?;
        let best_arm_frequency = final_step_selection_frequency(&records, HORIZON, KNOWN_BEST_ARM);

        lines.push(format!("\n### Results for policy: {} ###", policy_kind.name()));
        lines.push(format!("{:?}\n", by_arm));
        lines.push(format!("{:?}\n", by_simulation));
        lines.push(
            format!(
                "Final-step selection frequency of arm {}: {:.3}",
                KNOWN_BEST_ARM,
                best_arm_frequency
            )
        );
    }

    let summary_path = get_timestamped_file_path(RESULTS_DIRECTORY, "run_result");
    let mut output = File::create(&summary_path)?;
    for line in &lines {
        writeln!(output, "{}", line)?;
    }
    println!("Statistics for all policies saved in file: {:?}", summary_path);

    Ok(())
}

/// Sweeps the fixed epsilon-greedy policy over several epsilon values and
/// writes all record streams into one file, each row prefixed with the
/// epsilon that produced it.
pub fn run_epsilon_sweep() -> Result<(), ReportError> {
    fs::create_dir_all(RESULTS_DIRECTORY)?;

    let runner = SimulationRunner::new(
        &ARM_SUCCESS_PROBABILITIES,
        NUM_OF_SIMULATIONS,
        HORIZON,
        Some(RANDOM_SEED)
    )?;

    let mut output = String::new();
    for &epsilon in &EPSILON_SWEEP {
        let records = runner.run_in_parallel(&(PolicyKind::EpsilonGreedy { epsilon }))?;
        for record in &records {
            output.push_str(&format!("{}\t{}\n", epsilon, tab_delimited_row(record)));
        }
    }

    let sweep_path = PathBuf::from(RESULTS_DIRECTORY).join("epsilon_greedy_sweep_results.tsv");
    fs::write(&sweep_path, output)?;
    println!("Epsilon sweep records saved in file: {:?}", sweep_path);

    Ok(())
}
