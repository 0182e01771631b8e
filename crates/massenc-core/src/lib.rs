pub mod config;
pub mod convert;
pub mod logging;
pub mod plan;
pub mod scheduler;
