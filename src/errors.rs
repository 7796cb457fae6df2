use thiserror::Error;

/// Rejected configuration. Raised while constructing arms, policies or the
/// simulation runner, before any simulation step executes.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("At least one arm is required")]
    NoArms,
    #[error("Arm success probability {probability} is outside the range [0, 1]")]
    ProbabilityOutOfRange { probability: f64 },
    #[error("Epsilon {epsilon} is outside the range [0, 1]")]
    EpsilonOutOfRange { epsilon: f64 },
    #[error("Temperature {temperature} must be positive and finite")]
    TemperatureOutOfRange { temperature: f64 },
    #[error("Gamma {gamma} is outside the range (0, 1]")]
    GammaOutOfRange { gamma: f64 },
    #[error("Expected {expected} initial value estimates, got {actual}")]
    InitialEstimatesLengthMismatch { expected: usize, actual: usize },
    #[error("Number of simulations must be at least 1")]
    NoSimulations,
    #[error("Horizon must be at least 1")]
    ZeroHorizon,
}

/// Failures while producing result files and summary dataframes.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("I/O error while writing results: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to assemble results dataframe: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
