pub mod job;
pub mod scheduler;
