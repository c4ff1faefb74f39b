pub mod evaluator;
pub mod executor;
