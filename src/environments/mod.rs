pub mod bernoulli_arm;
