/// If true, prints in console additional information about each run.
pub const IS_VERBOSE_MODE: bool = false;
/// If true, prints out the arm chosen and reward received for each step of
/// every simulation. Only sensible for very small runs.
pub const PRINT_EACH_STEP: bool = false;
/// Success probability of each arm in the default comparison scenario.
/// The last arm is the clear winner; a policy that learns well converges
/// on it within a few hundred steps.
pub const ARM_SUCCESS_PROBABILITIES: [f64; 5] = [0.1, 0.2, 0.3, 0.5, 0.9];
/// Index of the arm known to be best in the default scenario. Used only by
/// the reporting code to measure how often policies find it; the policies
/// themselves never see this value.
pub const KNOWN_BEST_ARM: usize = 4;
/// Number of independent Monte-Carlo simulations each policy is run over.
pub const NUM_OF_SIMULATIONS: usize = 100;
/// Number of arm pulls in one simulation.
pub const HORIZON: usize = 500;
/// Base seed for the default comparison run. Every simulation derives its
/// own generator from this, so repeated runs emit identical record files.
pub const RANDOM_SEED: u64 = 1;
/// Exploration probability of the fixed epsilon-greedy policy.
/// Epsilon is expected to be in bounds 0 <= EPSILON <= 1. When EPSILON = 0,
/// the policy always takes the greedy action and exploits what it has
/// learned. When EPSILON = 1, it always explores the action space.
pub const EPSILON: f64 = 0.1;
/// Temperature of the fixed softmax policy. Lower values concentrate the
/// selection distribution on the best-looking arm.
pub const TEMPERATURE: f64 = 0.1;
/// Uniform-exploration mixture of the EXP3 policy, in (0, 1].
pub const GAMMA: f64 = 0.1;
/// Epsilon values covered by the epsilon-greedy sweep report.
pub const EPSILON_SWEEP: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];
/// Limits how many columns polars prints when dataframes are written out.
pub const POLARS_MAX_COLS: &str = "12";
