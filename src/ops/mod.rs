pub mod calendar;
pub mod reconcile;
pub mod search;
pub mod task_ops;
