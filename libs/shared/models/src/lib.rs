pub mod error;
pub mod workflow;
