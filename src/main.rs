mod constants;
mod environments;
mod errors;
mod policies;
mod simulation_runner;
mod statistics_calculator;

fn main() {
    statistics_calculator::run_full_comparison().expect("Policy comparison run failed");
    statistics_calculator::run_epsilon_sweep().expect("Epsilon sweep run failed");
}
