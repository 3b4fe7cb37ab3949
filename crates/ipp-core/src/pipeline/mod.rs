pub mod config;
mod job;

pub use config::{ExecutionConfig, JobConfig, Operation};
pub use job::{apply_operation, output_path_for, process_file, run_job};
