pub mod board;
pub mod config;
pub mod seed;
pub mod task;

pub use board::*;
pub use config::*;
pub use seed::seed_tasks;
pub use task::*;
